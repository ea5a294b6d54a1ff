//! Logging setup
//!
//! Logs go to stderr so `--json` output on stdout stays machine readable.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing
///
/// # Environment Variables
///
/// - `RUST_LOG`: filter directives (overrides `-v`)
/// - `SONA_LOG_FORMAT`: `json` for structured logs, anything else for pretty output
pub fn init_logging(verbosity: u8) -> Result<()> {
    let log_format = std::env::var("SONA_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let default_directive = match verbosity {
        0 => "sona=warn",
        1 => "sona=info",
        _ => "sona=debug",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .context("Failed to create env filter")?;

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to install JSON subscriber")?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to install subscriber")?;
        }
    }

    Ok(())
}
