//! Logging initialization
//!
//! Library code only emits `tracing` events; binaries call [`init_logging`]
//! once at startup. Filtering follows `INGOT_LOG`, then `RUST_LOG`, then the
//! configured default level.

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding filter directives (e.g. `ingot=debug`)
pub const LOG_ENV: &str = "INGOT_LOG";

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Used when neither `INGOT_LOG` nor `RUST_LOG` is set
    pub level: Level,
    pub format: LogFormat,
    pub include_thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: Level::INFO,
            format: LogFormat::Text,
            include_thread_ids: false,
        }
    }
}

impl LogConfig {
    fn filter(&self) -> Result<EnvFilter> {
        let directives = std::env::var(LOG_ENV)
            .or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
            .unwrap_or_else(|_| self.level.to_string().to_lowercase());

        EnvFilter::try_new(&directives)
            .with_context(|| format!("Failed to parse log filter: {}", directives))
    }
}

/// Install the global subscriber, writing to stderr
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = config.filter()?;
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_thread_ids(config.include_thread_ids);

    match config.format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .context("Failed to initialize logging")?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .try_init()
            .context("Failed to initialize logging")?,
    }

    Ok(())
}
