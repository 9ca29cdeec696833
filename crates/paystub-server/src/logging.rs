//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! `RUST_LOG` overrides the configured level; without it, workspace crates
//! log at the requested level and external crates stay at warn.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON format for machine parsing.
    Json,
}

/// Initialize the global subscriber. Call once at startup.
pub fn init_logging(level: Level, format: LogFormat) {
    let filter = build_env_filter(level);
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact())
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    let level_str = level.as_str().to_lowercase();
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,paystub_server={level},paystub_core={level},paystub_deliver={level},\
             paystub_ingest={level},paystub_model={level},paystub_render={level},\
             paystub_validate={level}",
            level = level_str
        ))
    })
}
