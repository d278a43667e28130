use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, error, info};

use crate::commands::{self, Command};
use crate::dedup::DedupLedger;
use crate::firewall::AccessProvider;
use crate::slack::MessageSource;

const HELP_TEXT: &str = "📝 Comandos disponibles:\n\
     • `!actualizar_ip <IP>`: actualiza la IP en las reglas de firewall de la base de datos.\n  \
     Ejemplo: `!actualizar_ip 192.168.1.100`\n\
     • `!ayuda`: muestra esta lista de comandos.";

/// Command executor: owns the dedup ledger and drives the poll loop.
pub struct Bot {
    source: Arc<dyn MessageSource>,
    provider: Arc<dyn AccessProvider>,
    channel_id: String,
    database_id: String,
    interval: Duration,
    ledger: DedupLedger,
}

impl Bot {
    pub fn new(
        source: Arc<dyn MessageSource>,
        provider: Arc<dyn AccessProvider>,
        channel_id: String,
        database_id: String,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            provider,
            channel_id,
            database_id,
            interval,
            ledger: DedupLedger::new(),
        }
    }

    /// Poll forever. Faults inside a cycle are logged and do not stop the
    /// loop; only process termination ends it.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            "Polling channel '{}' every {}s",
            self.channel_id,
            self.interval.as_secs()
        );

        let mut tick = tokio::time::interval(self.interval);
        loop {
            tick.tick().await;
            if let Err(e) = self.poll_once().await {
                error!("Poll cycle failed: {:#}", e);
            }
        }
    }

    /// One cycle: fetch → dedup-check → interpret → act → record.
    async fn poll_once(&mut self) -> Result<()> {
        let Some(message) = self.source.fetch_latest_message(&self.channel_id).await? else {
            return Ok(());
        };

        // The same standing message comes back on every tick; act once.
        if self.ledger.contains(&message.id) {
            return Ok(());
        }

        debug!("Mensaje recibido: {}", message.body);

        match commands::interpret(&message.body) {
            Command::Help => {
                self.source.post_message(&message.channel, HELP_TEXT).await;
                info!("Lista de comandos mostrada");
                self.ledger.record(&message.id);
            }
            Command::UpdateIp(ip) => {
                match self.provider.set_allowed_ip(&self.database_id, &ip).await {
                    Ok(()) => {
                        let reply = format!("IP actualizada correctamente a: {}", ip);
                        self.source.post_message(&message.channel, &reply).await;
                        info!("IP actualizada correctamente a: {}", ip);
                    }
                    Err(e) => {
                        // The operator sees only the IP; the cause stays in
                        // the log.
                        error!("Error al actualizar la IP {}: {:#}", ip, e);
                        let reply = format!("Error al actualizar la IP: {}", ip);
                        self.source.post_message(&message.channel, &reply).await;
                    }
                }
                // A failed update is not retried on the next cycle.
                self.ledger.record(&message.id);
            }
            Command::Unrecognized(_) => {
                // No reply and no ledger entry; a standing unrecognized
                // message is re-inspected and re-ignored every cycle.
            }
        }

        Ok(())
    }
}
