//! Output format selection shared by all commands

use crate::core::error::{WsError, WsResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
  Text,
  Json,
  NamesOnly,
}

impl OutputFormat {
  /// Parse a `--format` value; `names-only` is accepted only where `allow_names` is set
  pub fn parse(s: &str, allow_names: bool) -> WsResult<Self> {
    let valid = if allow_names {
      "text, json, names-only"
    } else {
      "text, json"
    };

    match s.to_lowercase().as_str() {
      "text" => Ok(Self::Text),
      "json" => Ok(Self::Json),
      "names" | "names-only" if allow_names => Ok(Self::NamesOnly),
      _ => Err(WsError::message(format!("Unknown format '{}'. Valid formats: {}", s, valid))),
    }
  }
}

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> WsResult<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
