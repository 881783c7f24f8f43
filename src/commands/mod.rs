//! CLI commands for wsmap
//!
//! ## Workspace
//! - **list**: Packages in the workspace
//! - **deps**: Direct workspace dependencies, resolved by name
//! - **npm**: Installed dependencies per package (`npm list`)
//!
//! ## Version control
//! - **changed**: Files changed since a ref, staged, or in HEAD
//! - **root**: Repository root
//!
//! All commands accept `&WorkspaceContext`; none read ambient process state.

pub mod changed;
pub mod deps;
pub mod list;
pub mod npm;
pub mod output;

pub use changed::{run_changed, run_root};
pub use deps::{DepsOptions, run_deps};
pub use list::run_list;
pub use npm::run_npm;

use crate::core::context::WorkspaceContext;
use crate::core::error::WsResult;
use crate::workspace::{ListingFile, Workspace, WorkspaceSource, YarnWorkspaces};
use std::path::Path;

/// Load the workspace from a saved listing when given, otherwise from yarn
fn load_workspace(ctx: &WorkspaceContext, listing: Option<&Path>) -> WsResult<Workspace> {
  let source: Box<dyn WorkspaceSource> = match listing {
    Some(path) => Box::new(ListingFile::new(path)),
    None => Box::new(YarnWorkspaces::new(ctx.config.tools.yarn.clone())),
  };

  let workspace = source.load(&ctx.env)?;
  if workspace.is_empty() {
    tracing::warn!(source = %source.describe(), "workspace has no packages besides the root");
  }
  tracing::info!(source = %source.describe(), packages = workspace.len(), "loaded workspace");
  Ok(workspace)
}
