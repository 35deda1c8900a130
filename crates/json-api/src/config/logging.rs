//! Logging Config

use clap::Args;

/// Logging output settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Default log filter, overridable via `RUST_LOG`
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
