//! Diagnostic logging on stderr
//!
//! `RUST_LOG` wins when set; otherwise `--log-level` picks the level for wsmap's
//! own events.

use crate::core::error::{WsError, WsResult};
use std::io::IsTerminal;
use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log level options for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevel {
  /// Show all logs (trace level)
  Trace,
  /// Show debug and above (includes every subprocess invocation)
  Debug,
  /// Show info and above
  Info,
  /// Show warnings and above (default)
  Warn,
  /// Show errors only
  Error,
}

impl From<LogLevel> for Level {
  fn from(level: LogLevel) -> Self {
    match level {
      LogLevel::Trace => Level::TRACE,
      LogLevel::Debug => Level::DEBUG,
      LogLevel::Info => Level::INFO,
      LogLevel::Warn => Level::WARN,
      LogLevel::Error => Level::ERROR,
    }
  }
}

/// Filter directive used when `RUST_LOG` is unset
fn default_directive(level: Level) -> String {
  format!("wsmap={}", level.as_str().to_lowercase())
}

/// Install the global subscriber. Call once, before any command runs.
pub fn init(level: LogLevel) -> WsResult<()> {
  let env_filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(default_directive(level.into())))
    .map_err(|e| WsError::message(format!("Failed to create log filter: {}", e)))?;

  let layer = tracing_subscriber::fmt::layer()
    .compact()
    .with_writer(std::io::stderr)
    .with_ansi(std::io::stderr().is_terminal())
    .with_target(false);

  tracing_subscriber::registry()
    .with(env_filter)
    .with(layer)
    .try_init()
    .map_err(|e| WsError::message(format!("Failed to install logger: {}", e)))?;

  Ok(())
}
