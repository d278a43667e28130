use std::collections::HashSet;

/// Record of message ids that have already been acted upon.
///
/// Ids are only ever added, never removed, for the life of the process. The
/// poll loop inspects a single message per cycle, so growth is bounded by the
/// number of distinct acted-on messages, not by uptime.
#[derive(Debug, Default)]
pub struct DedupLedger {
    seen: HashSet<String>,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn record(&mut self, id: &str) {
        self.seen.insert(id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_contains() {
        let mut ledger = DedupLedger::new();
        assert!(!ledger.contains("1700000000.000100"));

        ledger.record("1700000000.000100");
        assert!(ledger.contains("1700000000.000100"));
        assert!(!ledger.contains("1700000000.000200"));
    }

    #[test]
    fn test_record_is_idempotent() {
        let mut ledger = DedupLedger::new();
        ledger.record("a");
        ledger.record("a");
        assert!(ledger.contains("a"));
    }
}
