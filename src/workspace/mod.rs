//! Workspace model and the sources that produce it
//!
//! A [`Workspace`] maps package names to [`Package`] records. It is gathered by a
//! [`WorkspaceSource`] (yarn, or a saved listing) and handed to the resolver in
//! `crate::graph`. Parsing happens here so that malformed package-manager output
//! never reaches the resolver.

pub mod npm;
pub mod yarn;

use crate::core::error::WsResult;
use crate::core::process::CommandEnv;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use npm::{NpmDep, npm_list};
pub use yarn::{ListingFile, YarnWorkspaces};

/// Location yarn reports for the workspace root
pub const ROOT_LOCATION: &str = ".";

/// One package in the workspace, as reported by `yarn workspaces list --json -v`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
  /// Workspace-relative directory
  pub location: String,

  pub name: String,

  /// Locations (not names) of the workspace packages this one depends on
  #[serde(default)]
  pub workspace_dependencies: Vec<String>,

  /// Workspace dependencies whose declared range the local package doesn't satisfy
  #[serde(default)]
  pub mismatched_workspace_dependencies: Vec<String>,
}

impl Package {
  pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
    Self {
      location: location.into(),
      name: name.into(),
      workspace_dependencies: Vec::new(),
      mismatched_workspace_dependencies: Vec::new(),
    }
  }

  /// Builder-style helper to declare dependency locations
  #[cfg(test)]
  pub fn depends_on<I, S>(mut self, locations: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.workspace_dependencies.extend(locations.into_iter().map(Into::into));
    self
  }

  pub fn is_root(&self) -> bool {
    self.location == ROOT_LOCATION
  }
}

/// Package name → package, iterated in ascending name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Workspace {
  packages: BTreeMap<String, Package>,
}

impl Workspace {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert `package` under its own name, returning any package previously stored there
  pub fn insert(&mut self, package: Package) -> Option<Package> {
    self.packages.insert(package.name.clone(), package)
  }

  pub fn get(&self, name: &str) -> Option<&Package> {
    self.packages.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.packages.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.packages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.packages.is_empty()
  }

  /// `(name, package)` pairs in ascending name order
  pub fn iter(&self) -> impl Iterator<Item = (&str, &Package)> {
    self.packages.iter().map(|(name, pkg)| (name.as_str(), pkg))
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.packages.keys().map(String::as_str)
  }

  /// Name of the package living at `location`, if any
  pub fn find_by_location(&self, location: &str) -> Option<&str> {
    self
      .packages
      .iter()
      .find(|(_, pkg)| pkg.location == location)
      .map(|(name, _)| name.as_str())
  }
}

impl FromIterator<Package> for Workspace {
  /// Keys each package by its own name, skipping the workspace root
  fn from_iter<T: IntoIterator<Item = Package>>(iter: T) -> Self {
    let mut workspace = Workspace::new();
    for package in iter {
      if !package.is_root() {
        workspace.insert(package);
      }
    }
    workspace
  }
}

/// The fields of package.json that mark a workspace root
#[derive(Deserialize)]
struct RootManifest {
  #[serde(default)]
  workspaces: Option<serde_json::Value>,
}

/// Find the project root by walking up from `start`.
///
/// The root is the nearest directory whose package.json declares `workspaces`;
/// yarn reports package locations relative to it. Falls back to `start`.
pub fn find_project_root(start: &Path) -> PathBuf {
  let mut current = Some(start);

  while let Some(dir) = current {
    let manifest = dir.join("package.json");
    if let Ok(content) = std::fs::read_to_string(&manifest)
      && let Ok(pkg) = serde_json::from_str::<RootManifest>(&content)
      && pkg.workspaces.is_some()
    {
      return dir.to_path_buf();
    }
    current = dir.parent();
  }

  tracing::debug!(start = %start.display(), "no package.json with workspaces found, using start directory");
  start.to_path_buf()
}

/// Capability that produces a [`Workspace`].
///
/// The working directory and environment are passed explicitly; implementations
/// must not read ambient process state.
pub trait WorkspaceSource {
  /// Short label for logs and error messages
  fn describe(&self) -> String;

  fn load(&self, env: &CommandEnv) -> WsResult<Workspace>;
}
