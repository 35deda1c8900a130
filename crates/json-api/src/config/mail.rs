//! Mail Gateway Config

use clap::Args;

/// Outbound mail gateway settings.
#[derive(Debug, Args)]
pub struct MailConfig {
    /// Mail gateway base address
    #[arg(long, env = "MAIL_GATEWAY_ADDR", default_value = "http://localhost:8025")]
    pub mail_gateway_addr: String,

    /// Mail gateway bearer token
    #[arg(long, env = "MAIL_GATEWAY_TOKEN", default_value = "")]
    pub mail_gateway_token: String,

    /// From-address for outbound mail
    #[arg(long, env = "MAIL_FROM", default_value = "no-reply@botica.local")]
    pub mail_from: String,
}
