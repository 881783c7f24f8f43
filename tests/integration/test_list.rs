//! Integration tests for `wsmap list`

use crate::helpers::{TestWorkspace, run_wsmap, stdout_json};
use anyhow::Result;

#[cfg(unix)]
#[test]
fn test_list_text_via_yarn() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("@acme/core", "packages/core", &[])?;
  ws.add_package("@acme/ui", "packages/ui", &["packages/core"])?;
  ws.install_stub_tools()?;

  let output = run_wsmap(&ws.path, &["list"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Packages: 2"), "got: {}", stdout);
  assert!(stdout.contains("@acme/core"));
  assert!(stdout.contains("packages/ui"));
  assert!(!stdout.contains("monorepo"), "root package must be excluded");

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_list_names_only() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("web", "apps/web", &["packages/core"])?;
  ws.add_package("core", "packages/core", &[])?;
  ws.install_stub_tools()?;

  let output = run_wsmap(&ws.path, &["list", "--format", "names"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  let lines: Vec<&str> = stdout.trim().lines().collect();
  assert_eq!(lines, vec!["core", "web"]);

  Ok(())
}

#[test]
fn test_list_json_from_listing_file() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("core", "packages/core", &[])?;
  ws.add_package("ui", "packages/ui", &["packages/core"])?;

  let listing = ws.listing_path();
  let output = run_wsmap(
    &ws.path,
    &["list", "--listing", listing.to_str().unwrap(), "--format", "json"],
  )?;
  let json = stdout_json(&output)?;

  let packages = json.as_array().expect("array of packages");
  assert_eq!(packages.len(), 2);
  assert_eq!(packages[1]["name"], "ui");
  assert_eq!(packages[1]["location"], "packages/ui");
  assert_eq!(packages[1]["workspaceDependencies"][0], "packages/core");

  Ok(())
}

#[test]
fn test_list_cwd_option() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("core", "packages/core", &[])?;

  let listing = ws.listing_path();
  let elsewhere = tempfile::TempDir::new()?;
  let output = run_wsmap(
    elsewhere.path(),
    &[
      "list",
      "--cwd",
      ws.path.to_str().unwrap(),
      "--listing",
      listing.to_str().unwrap(),
      "--format",
      "names",
    ],
  )?;

  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "core");

  Ok(())
}
