//! HTTP mail gateway client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use thiserror::Error;

/// Configuration for the outbound mail gateway.
#[derive(Debug, Clone)]
pub struct MailGatewayConfig {
    /// Gateway base address, e.g. `"http://localhost:8025"`.
    pub addr: String,

    /// Bearer token for the gateway.
    pub token: String,

    /// From-address stamped on every message.
    pub from: String,
}

/// Errors that can occur when talking to the mail gateway.
#[derive(Debug, Error)]
pub enum MailerError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a non-2xx response.
    #[error("unexpected response from mail gateway: {0}")]
    UnexpectedResponse(String),
}

/// Something that can deliver a plain-text message to one recipient.
#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<(), MailerError>;
}

/// HTTP client that posts messages to the mail gateway.
#[derive(Debug, Clone)]
pub struct MailGatewayClient {
    config: MailGatewayConfig,
    http: Client,
}

impl MailGatewayClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: MailGatewayConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for MailGatewayClient {
    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<(), MailerError> {
        let url = format!("{}/v1/messages", self.config.addr);

        let body = serde_json::json!({
            "from": self.config.from,
            "to": to,
            "subject": subject,
            "text": text,
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(MailerError::UnexpectedResponse(format!(
                "send request failed with status {status}: {text}"
            )));
        }

        Ok(())
    }
}
