use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DigitalOceanConfig;

/// The remote allow-list mutation as seen by the executor.
#[async_trait]
pub trait AccessProvider: Send + Sync {
    /// Replace the resource's firewall rule set with a single entry for `ip`.
    ///
    /// This is a replace, not an append: whatever IP was allowed before is
    /// revoked unless it is re-sent. No retries happen here.
    async fn set_allowed_ip(&self, resource_id: &str, ip: &str) -> Result<()>;
}

#[derive(Debug, Clone, Serialize)]
struct FirewallRule {
    #[serde(rename = "type")]
    rule_type: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct FirewallRequest {
    rules: Vec<FirewallRule>,
}

#[derive(Debug, Deserialize)]
struct DatabasesResponse {
    #[serde(default)]
    databases: Vec<DatabaseInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseInfo {
    pub id: String,
    pub name: String,
}

/// Build the one-entry rule set sent on every update.
fn replace_rules(ip: &str) -> Vec<FirewallRule> {
    vec![FirewallRule {
        rule_type: "ip_addr".to_string(),
        value: ip.to_string(),
    }]
}

pub struct DigitalOceanClient {
    client: reqwest::Client,
    config: DigitalOceanConfig,
}

impl DigitalOceanClient {
    pub fn new(config: DigitalOceanConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// List managed databases visible to the token, for discovering the
    /// `database_id` to put in the config file.
    pub async fn list_databases(&self) -> Result<Vec<DatabaseInfo>> {
        let response = self
            .client
            .get("https://api.digitalocean.com/v2/databases")
            .bearer_auth(&self.config.token)
            .send()
            .await
            .context("Failed to call the DigitalOcean databases API")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("DigitalOcean API error ({}): {}", status, error_body);
        }

        let list: DatabasesResponse = response
            .json()
            .await
            .context("Failed to parse the databases response")?;

        Ok(list.databases)
    }
}

#[async_trait]
impl AccessProvider for DigitalOceanClient {
    async fn set_allowed_ip(&self, resource_id: &str, ip: &str) -> Result<()> {
        let url = format!(
            "https://api.digitalocean.com/v2/databases/{}/firewall",
            resource_id
        );
        let request = FirewallRequest {
            rules: replace_rules(ip),
        };

        debug!("Replacing firewall rules of {} with {}", resource_id, ip);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.config.token)
            .json(&request)
            .send()
            .await
            .context("Failed to call the DigitalOcean firewall API")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("DigitalOcean API error ({}): {}", status, error_body);
        }

        Ok(())
    }
}
