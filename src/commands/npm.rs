//! `wsmap npm` - Installed dependencies of each workspace package
//!
//! Runs `npm list --json --silent` inside every package directory (or one,
//! with `--package`). Runs are independent, so they execute in parallel via
//! rayon; results are reported in package-name order.

use super::output::{OutputFormat, print_json};
use crate::core::context::WorkspaceContext;
use crate::core::error::{WsError, WsResult};
use crate::ui::SharedProgress;
use crate::workspace::{NpmDep, Package, find_project_root, npm_list};
use rayon::prelude::*;
use std::path::PathBuf;

/// Run the npm command
pub fn run_npm(
  ctx: &WorkspaceContext,
  listing: Option<PathBuf>,
  package: Option<String>,
  format: String,
) -> WsResult<()> {
  let output_format = OutputFormat::parse(&format, false)?;

  let workspace = super::load_workspace(ctx, listing.as_deref())?;

  let targets: Vec<(&str, &Package)> = match package.as_deref() {
    Some(name) => {
      let pkg = workspace.get(name).ok_or_else(|| {
        WsError::with_help(
          format!("Package '{}' not found in workspace", name),
          format!(
            "Available workspace packages: {}",
            workspace.names().collect::<Vec<_>>().join(", ")
          ),
        )
      })?;
      vec![(name, pkg)]
    }
    None => workspace.iter().collect(),
  };

  let progress = (output_format == OutputFormat::Text && targets.len() > 1)
    .then(|| SharedProgress::new(targets.len(), "npm list"));

  // Locations are relative to the project root, which may sit above --cwd
  let project_root = find_project_root(ctx.workspace_root());
  let program = ctx.config.tools.npm.as_str();
  let results: Vec<(String, WsResult<NpmDep>)> = targets
    .par_iter()
    .map(|(name, pkg)| {
      let dir = project_root.join(&pkg.location);
      let listed = if dir.is_dir() {
        npm_list(program, &ctx.env.with_cwd(dir)).map(|mut dep| {
          if dep.name.is_empty() {
            dep.name = name.to_string();
          }
          dep
        })
      } else {
        Err(WsError::message(format!("package directory {} does not exist", dir.display())))
      };

      if let Some(progress) = &progress {
        progress.inc();
      }
      (name.to_string(), listed)
    })
    .collect();

  let mut listed = Vec::with_capacity(results.len());
  let mut failures = Vec::new();
  for (name, result) in results {
    match result {
      Ok(dep) => listed.push(dep),
      Err(e) => {
        tracing::error!(package = %name, error = %e, "npm list failed");
        failures.push(name);
      }
    }
  }

  match output_format {
    OutputFormat::Json => print_json(&listed)?,
    _ => display_text(&listed),
  }

  if !failures.is_empty() {
    return Err(WsError::message(format!(
      "npm list failed for {} package(s): {}",
      failures.len(),
      failures.join(", ")
    )));
  }

  Ok(())
}

fn display_text(listed: &[NpmDep]) {
  println!("Installed Dependencies");
  println!("======================");
  println!();

  for dep in listed {
    println!("📦 {} ({} dependencies)", dep.name, dep.dependencies.len());
    for name in &dep.dependencies {
      println!("   → {}", name);
    }
  }
}
