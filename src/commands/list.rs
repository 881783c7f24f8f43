//! `wsmap list` - Show the packages in the workspace

use super::output::{OutputFormat, print_json};
use crate::core::context::WorkspaceContext;
use crate::core::error::WsResult;
use crate::graph::resolve;
use std::path::PathBuf;

/// Run the list command
pub fn run_list(ctx: &WorkspaceContext, listing: Option<PathBuf>, format: String) -> WsResult<()> {
  let output_format = OutputFormat::parse(&format, true)?;

  let workspace = super::load_workspace(ctx, listing.as_deref())?;
  let result = resolve(&workspace, true);

  match output_format {
    OutputFormat::Text => {
      println!("Workspace Packages");
      println!("==================");
      println!();
      println!("Packages: {}", result.workspace_array.len());

      let width = result
        .workspace_array
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0);
      for package in &result.workspace_array {
        println!("  📦 {:<width$}  {}", package.name, package.location, width = width);
      }
    }
    OutputFormat::Json => print_json(&result.workspace_array)?,
    OutputFormat::NamesOnly => {
      for package in &result.workspace_array {
        println!("{}", package.name);
      }
    }
  }

  Ok(())
}
