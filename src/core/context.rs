//! Unified invocation context - build once, pass everywhere
//!
//! `WorkspaceContext` is built in main.rs from the working directory, the
//! loaded config and a single snapshot of the process environment. Commands
//! receive it by reference and never consult ambient state themselves.

use crate::core::config::WsmapConfig;
use crate::core::error::WsResult;
use crate::core::process::CommandEnv;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone)]
pub struct WorkspaceContext {
  /// Directory wsmap operates in (absolute path)
  pub root: PathBuf,

  /// wsmap configuration (defaults when no file exists)
  pub config: Arc<WsmapConfig>,

  /// Explicit subprocess environment rooted at `root`
  pub env: CommandEnv,
}

impl WorkspaceContext {
  /// Build context from a root directory and an environment snapshot.
  pub fn build<I>(root: &Path, ambient: I) -> WsResult<Self>
  where
    I: IntoIterator<Item = (String, String)>,
  {
    let root = root.to_path_buf();
    let config = WsmapConfig::load(&root)?;
    let env = CommandEnv::from_snapshot(&root, ambient, &config.env);

    Ok(Self {
      root,
      config: Arc::new(config),
      env,
    })
  }

  /// Get workspace root as Path reference (convenience)
  pub fn workspace_root(&self) -> &Path {
    &self.root
  }
}
