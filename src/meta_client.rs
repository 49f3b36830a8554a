use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::config::{RelayConfig, GRAPH_VERSION};
use crate::models::CapiPayload;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing META_ACCESS_TOKEN env var")]
    MissingAccessToken,

    #[error("meta returned status {status}")]
    Upstream { status: u16, body: Value },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

/// Outbound side of the relay: one POST to the Graph events endpoint per
/// inbound request, no retries. The caller decides how to surface a failure.
pub struct MetaClient {
    http: Client,
    config: RelayConfig,
}

impl MetaClient {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub async fn send(&self, payload: &CapiPayload) -> Result<Value, RelayError> {
        let token = self
            .config
            .access_token
            .as_deref()
            .ok_or(RelayError::MissingAccessToken)?;

        let endpoint = format!(
            "{}/{}/{}/events",
            self.config.graph_base_url, GRAPH_VERSION, self.config.pixel_id
        );

        let resp = self
            .http
            .post(&endpoint)
            .query(&[("access_token", token)])
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        // a body that is not JSON is a transport failure, same as not reaching
        // the endpoint at all
        let body: Value = resp.json().await?;

        if !status.is_success() {
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}
