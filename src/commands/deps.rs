//! `wsmap deps` - Resolve workspace dependencies by package name
//!
//! Loads the workspace, resolves each package's declared dependency locations
//! to package names, and prints either the whole map or one package's direct
//! dependencies (or, with `--reverse`, its direct dependents).

use super::output::{OutputFormat, print_json};
use crate::core::config::DanglingPolicy;
use crate::core::context::WorkspaceContext;
use crate::core::error::{ValidationError, WsError, WsResult};
use crate::graph::{DanglingReference, ResolutionResult, resolve};
use crate::workspace::Workspace;
use serde_json::json;
use std::path::PathBuf;

/// Options for the deps command
#[derive(Debug, Clone, Default)]
pub struct DepsOptions {
  pub listing: Option<PathBuf>,
  pub no_transitive: bool,
  pub package: Option<String>,
  pub reverse: bool,
  pub strict: bool,
  pub format: String,
}

/// Run the deps command
pub fn run_deps(ctx: &WorkspaceContext, opts: DepsOptions) -> WsResult<()> {
  let output_format = OutputFormat::parse(&opts.format, false)?;

  let workspace = super::load_workspace(ctx, opts.listing.as_deref())?;
  let mut result = resolve(&workspace, opts.no_transitive);

  let policy = if opts.strict {
    DanglingPolicy::Error
  } else {
    ctx.config.resolve.dangling
  };
  apply_dangling_policy(&result.dangling, policy)?;
  if policy == DanglingPolicy::Ignore {
    result.dangling.clear();
  }

  match opts.package {
    Some(name) => {
      ensure_known(&workspace, &name)?;
      display_package(&result, &name, opts.reverse, output_format)
    }
    None => match output_format {
      OutputFormat::Json => print_json(&result),
      _ => {
        display_text(&result, opts.no_transitive);
        Ok(())
      }
    },
  }
}

/// Report or reject dangling references according to `policy`
fn apply_dangling_policy(dangling: &[DanglingReference], policy: DanglingPolicy) -> WsResult<()> {
  if dangling.is_empty() {
    return Ok(());
  }

  match policy {
    DanglingPolicy::Ignore => Ok(()),
    DanglingPolicy::Warn => {
      for reference in dangling {
        tracing::warn!(
          package = %reference.package,
          location = %reference.location,
          "workspace dependency location matches no package; omitted"
        );
      }
      Ok(())
    }
    DanglingPolicy::Error => Err(WsError::Validation(ValidationError::DanglingDependencies {
      references: dangling
        .iter()
        .map(|r| (r.package.clone(), r.location.clone()))
        .collect(),
    })),
  }
}

fn ensure_known(workspace: &Workspace, name: &str) -> WsResult<()> {
  if workspace.contains(name) {
    return Ok(());
  }

  Err(WsError::with_help(
    format!("Package '{}' not found in workspace", name),
    format!(
      "Available workspace packages: {}",
      workspace.names().collect::<Vec<_>>().join(", ")
    ),
  ))
}

fn display_package(result: &ResolutionResult, name: &str, reverse: bool, format: OutputFormat) -> WsResult<()> {
  let (label, names) = if reverse {
    ("dependents", result.dependents_of(name))
  } else {
    (
      "dependencies",
      result.dependencies_of(name).map(<[String]>::to_vec).unwrap_or_default(),
    )
  };

  if format == OutputFormat::Json {
    let mut doc = serde_json::Map::new();
    doc.insert("name".to_string(), json!(name));
    doc.insert(label.to_string(), json!(names));
    return print_json(&doc);
  }

  println!("Direct {} of {}: {}", label, name, names.len());
  for dep in &names {
    println!("  {} {}", if reverse { "⬆ " } else { "→" }, dep);
  }

  Ok(())
}

fn display_text(result: &ResolutionResult, skipped: bool) {
  println!("Workspace Dependencies");
  println!("======================");
  println!();
  println!("Packages: {}", result.workspace_array.len());
  if skipped {
    println!("(dependency mapping skipped)");
  }
  println!();

  for package in &result.workspace_array {
    println!("📦 {} ({})", package.name, package.location);

    if let Some(deps) = result.dependencies_of(&package.name) {
      if deps.is_empty() {
        println!("   (no workspace dependencies)");
      }
      for dep in deps {
        println!("   → {}", dep);
      }
    }
  }

  if !result.dangling.is_empty() {
    println!();
    println!("Unresolved dependency locations: {}", result.dangling.len());
    for reference in &result.dangling {
      println!("  ⚠  {} -> {}", reference.package, reference.location);
    }
  }
}
