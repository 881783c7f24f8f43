//! `wsmap changed` - List files changed according to git
//!
//! Scopes:
//! - `--since <ref>`: working tree against a ref (default from config)
//! - `--staged`: staged changes
//! - `--head`: files touched by the current commit

use super::output::{OutputFormat, print_json};
use crate::core::context::WorkspaceContext;
use crate::core::error::WsResult;
use crate::core::vcs::{ChangeScope, SystemGit};
use serde_json::json;

/// Run the changed command
pub fn run_changed(
  ctx: &WorkspaceContext,
  since: Option<String>,
  staged: bool,
  head: bool,
  format: String,
) -> WsResult<()> {
  let output_format = OutputFormat::parse(&format, true)?;
  let scope = select_scope(since, staged, head, &ctx.config.resolve.default_since);

  let git = SystemGit::open(&ctx.env, &ctx.config.tools.git)?;
  let files = git.changed_files(&scope)?;

  match output_format {
    OutputFormat::Text => {
      println!("Changed files ({}): {}", scope, files.len());
      for file in &files {
        println!("  {}", file);
      }
    }
    OutputFormat::Json => print_json(&json!({
        "scope": scope.to_string(),
        "root": git.root(),
        "changed_files": files,
    }))?,
    OutputFormat::NamesOnly => {
      for file in &files {
        println!("{}", file);
      }
    }
  }

  Ok(())
}

/// Pick the change scope from CLI flags (clap keeps them mutually exclusive)
fn select_scope(since: Option<String>, staged: bool, head: bool, default_since: &str) -> ChangeScope {
  if staged {
    ChangeScope::Staged
  } else if head {
    ChangeScope::Head
  } else {
    ChangeScope::Since(since.unwrap_or_else(|| default_since.to_string()))
  }
}

/// `wsmap root` - Print the repository root
pub fn run_root(ctx: &WorkspaceContext) -> WsResult<()> {
  let git = SystemGit::open(&ctx.env, &ctx.config.tools.git)?;
  println!("{}", git.root().display());
  Ok(())
}
