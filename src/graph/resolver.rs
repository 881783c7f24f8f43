//! Dependency resolution: location-based declarations → name-based lists
//!
//! Yarn reports each package's workspace dependencies by *location*. The
//! resolver cross-references those locations against every package in the
//! workspace and produces, per package, the *names* of its direct
//! dependencies. Only one hop is resolved; nothing here walks the graph.
//!
//! `resolve` is pure: no I/O, no shared state, total over any workspace.

use crate::workspace::{Package, Workspace};
use serde::Serialize;
use std::collections::BTreeMap;

/// Direct workspace dependencies of one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
  pub name: String,

  /// Dependency names in workspace iteration order
  pub dependencies: Vec<String>,
}

/// A declared dependency location that no package occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
  /// Package that declared the dependency
  pub package: String,
  pub location: String,
}

/// Output of [`resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
  /// Package name → resolved dependencies; empty when mapping was skipped
  pub all_dependencies: BTreeMap<String, ResolvedDependency>,

  /// Every package, in ascending name order
  pub workspace_array: Vec<Package>,

  /// Declared locations omitted from `all_dependencies`
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub dangling: Vec<DanglingReference>,
}

impl ResolutionResult {
  /// Direct dependencies of `name`.
  ///
  /// `None` when the package is unknown or dependency mapping was skipped.
  pub fn dependencies_of(&self, name: &str) -> Option<&[String]> {
    self.all_dependencies.get(name).map(|r| r.dependencies.as_slice())
  }

  /// Packages that list `name` as a direct dependency, ascending.
  pub fn dependents_of(&self, name: &str) -> Vec<String> {
    self
      .all_dependencies
      .values()
      .filter(|r| r.dependencies.iter().any(|d| d == name))
      .map(|r| r.name.clone())
      .collect()
  }
}

/// Resolve a workspace.
///
/// With `skip_dependency_mapping` set only `workspace_array` is produced.
/// Otherwise every package gets an entry in `all_dependencies` (possibly with an
/// empty list). A package depending on its own location lists itself.
pub fn resolve(workspace: &Workspace, skip_dependency_mapping: bool) -> ResolutionResult {
  let mut result = ResolutionResult {
    workspace_array: Vec::with_capacity(workspace.len()),
    ..Default::default()
  };

  for (name, package) in workspace.iter() {
    result.workspace_array.push(package.clone());

    if !skip_dependency_mapping {
      let resolved = map_dependencies(workspace, name, package);
      result.dangling.extend(dangling_references(workspace, name, package));
      result.all_dependencies.insert(name.to_string(), resolved);
    }
  }

  result
}

fn map_dependencies(workspace: &Workspace, name: &str, package: &Package) -> ResolvedDependency {
  ResolvedDependency {
    name: name.to_string(),
    dependencies: workspace
      .iter()
      .map(|(_, candidate)| candidate)
      .filter(|candidate| package.workspace_dependencies.contains(&candidate.location))
      .map(|candidate| candidate.name.clone())
      .collect(),
  }
}

fn dangling_references<'a>(
  workspace: &'a Workspace,
  name: &'a str,
  package: &'a Package,
) -> impl Iterator<Item = DanglingReference> + 'a {
  package
    .workspace_dependencies
    .iter()
    .filter(move |location| workspace.find_by_location(location).is_none())
    .map(move |location| DanglingReference {
      package: name.to_string(),
      location: location.clone(),
    })
}
