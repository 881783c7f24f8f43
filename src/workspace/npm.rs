//! Installed dependency listing via `npm list --json --silent`

use crate::core::error::{ParseError, WsError, WsResult};
use crate::core::process::{self, CommandEnv};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Installed dependencies of one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpmDep {
  pub name: String,
  pub dependencies: Vec<String>,
}

/// Top level of the `npm list --json` document (fields we care about)
#[derive(Debug, Deserialize)]
struct NpmListJson {
  #[serde(default)]
  name: Option<String>,
  #[serde(default)]
  dependencies: BTreeMap<String, serde_json::Value>,
}

/// Run `npm list` in `env.cwd()`.
///
/// npm exits non-zero for missing or extraneous packages but still prints the
/// tree, so the exit status only matters when stdout is empty.
pub fn npm_list(program: &str, env: &CommandEnv) -> WsResult<NpmDep> {
  let mut cmd = env.command(program);
  cmd.args(["list", "--json", "--silent"]);

  let label = format!("{} list --json --silent", program);
  let stdout = process::run_lenient(cmd, &label)?;
  parse_npm_list(&stdout)
}

pub fn parse_npm_list(text: &str) -> WsResult<NpmDep> {
  let doc: NpmListJson = serde_json::from_str(text).map_err(|e| {
    WsError::Parse(ParseError::Document {
      source: "npm list".to_string(),
      reason: e.to_string(),
    })
  })?;

  Ok(NpmDep {
    name: doc.name.unwrap_or_default(),
    dependencies: doc.dependencies.into_keys().collect(),
  })
}
