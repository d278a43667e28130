/// An operator instruction recognized in a channel message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Post the command reference.
    Help,
    /// Replace the database firewall allow-list with the given IP literal.
    UpdateIp(String),
    /// Anything else; produces no action and no reply.
    Unrecognized(String),
}

/// Classify a raw message body into a `Command`.
///
/// The IP literal is taken verbatim from the second space-separated token of
/// an `!actualizar_ip` message. No syntax validation happens here; a bad
/// literal surfaces later as a provider rejection.
pub fn interpret(body: &str) -> Command {
    let text = body.trim();

    if text == "!" || text == "!ayuda" {
        return Command::Help;
    }

    if text.starts_with("!actualizar_ip") {
        match text.split(' ').nth(1) {
            Some(ip) if !ip.is_empty() => return Command::UpdateIp(ip.to_string()),
            // Missing argument: degrade instead of faulting.
            _ => return Command::Unrecognized(text.to_string()),
        }
    }

    Command::Unrecognized(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_keywords() {
        assert_eq!(interpret("!"), Command::Help);
        assert_eq!(interpret("!ayuda"), Command::Help);
        assert_eq!(interpret("  !ayuda  "), Command::Help);
    }

    #[test]
    fn test_update_ip_extracts_token() {
        assert_eq!(
            interpret("!actualizar_ip 203.0.113.7"),
            Command::UpdateIp("203.0.113.7".to_string())
        );
        assert_eq!(
            interpret("  !actualizar_ip 10.0.0.1\n"),
            Command::UpdateIp("10.0.0.1".to_string())
        );
    }

    #[test]
    fn test_update_ip_token_has_no_surrounding_whitespace() {
        let Command::UpdateIp(ip) = interpret("!actualizar_ip 192.0.2.44") else {
            panic!("expected UpdateIp");
        };
        assert_eq!(ip, ip.trim());
        assert_eq!(ip, "192.0.2.44");
    }

    #[test]
    fn test_update_ip_missing_argument_degrades() {
        assert_eq!(
            interpret("!actualizar_ip"),
            Command::Unrecognized("!actualizar_ip".to_string())
        );
        // Double space leaves an empty second token.
        assert_eq!(
            interpret("!actualizar_ip  1.2.3.4"),
            Command::Unrecognized("!actualizar_ip  1.2.3.4".to_string())
        );
    }

    #[test]
    fn test_everything_else_is_unrecognized() {
        assert_eq!(
            interpret("hello"),
            Command::Unrecognized("hello".to_string())
        );
        assert_eq!(interpret(""), Command::Unrecognized(String::new()));
        assert_eq!(
            interpret("!desconocido"),
            Command::Unrecognized("!desconocido".to_string())
        );
    }
}
