//! Yarn workspace listing (`yarn workspaces list --json -v`)
//!
//! The listing is line-delimited JSON, one object per workspace including the
//! root. Each line is deserialized into a typed [`Package`]; the root is dropped.

use super::{Package, Workspace, WorkspaceSource};
use crate::core::error::{ParseError, ResultExt, WsError, WsResult};
use crate::core::process::{self, CommandEnv};
use std::fs;
use std::path::PathBuf;

const LIST_ARGS: [&str; 4] = ["workspaces", "list", "--json", "-v"];

/// Runs yarn in the environment's working directory
pub struct YarnWorkspaces {
  program: String,
}

impl YarnWorkspaces {
  pub fn new(program: impl Into<String>) -> Self {
    Self { program: program.into() }
  }
}

impl WorkspaceSource for YarnWorkspaces {
  fn describe(&self) -> String {
    format!("{} {}", self.program, LIST_ARGS.join(" "))
  }

  fn load(&self, env: &CommandEnv) -> WsResult<Workspace> {
    let mut cmd = env.command(&self.program);
    cmd.args(LIST_ARGS);

    let stdout = process::run_checked(cmd, &self.describe())?;
    parse_workspace_listing(&stdout)
  }
}

/// Reads a saved listing from disk.
///
/// Relative paths resolve against the environment's working directory.
pub struct ListingFile {
  path: PathBuf,
}

impl ListingFile {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }
}

impl WorkspaceSource for ListingFile {
  fn describe(&self) -> String {
    self.path.display().to_string()
  }

  fn load(&self, env: &CommandEnv) -> WsResult<Workspace> {
    let path = env.cwd().join(&self.path);
    let content =
      fs::read_to_string(&path).with_context(|| format!("Failed to read workspace listing {}", path.display()))?;
    parse_workspace_listing(&process::strip_ansi(&content))
  }
}

/// Parse line-delimited listing output into a workspace keyed by package name.
///
/// Blank lines are ignored. A later entry with an already-seen name replaces
/// the earlier one.
pub fn parse_workspace_listing(text: &str) -> WsResult<Workspace> {
  let mut workspace = Workspace::new();

  for (idx, line) in text.lines().enumerate() {
    let line = line.trim();
    if line.is_empty() {
      continue;
    }

    let package: Package = serde_json::from_str(line).map_err(|e| {
      WsError::Parse(ParseError::ListingLine {
        line: idx + 1,
        reason: e.to_string(),
      })
    })?;

    if package.is_root() {
      continue;
    }

    if let Some(other) = workspace.find_by_location(&package.location)
      && other != package.name
    {
      tracing::warn!(
        location = %package.location,
        first = other,
        second = %package.name,
        "two workspace packages share a location"
      );
    }

    if let Some(previous) = workspace.insert(package) {
      tracing::debug!(name = %previous.name, location = %previous.location, "duplicate package name replaced");
    }
  }

  Ok(workspace)
}
