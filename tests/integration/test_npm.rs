//! Integration tests for `wsmap npm`

#![cfg(unix)]

use crate::helpers::{TestWorkspace, run_wsmap, run_wsmap_raw, stdout_json};
use anyhow::Result;

#[test]
fn test_npm_lists_each_package() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("@acme/core", "packages/core", &[])?;
  ws.add_package("@acme/ui", "packages/ui", &["packages/core"])?;
  ws.install_stub_tools()?;

  let output = run_wsmap(&ws.path, &["npm", "--format", "json"])?;
  let json = stdout_json(&output)?;
  let listed = json.as_array().expect("array of packages");

  assert_eq!(listed.len(), 2);
  // The stub names each document after the package directory
  assert_eq!(listed[0]["name"], "core");
  assert_eq!(listed[1]["name"], "ui");
  let deps = listed[1]["dependencies"].as_array().unwrap();
  assert!(deps.iter().any(|d| d == "left-pad"));
  assert!(deps.iter().any(|d| d == "ui-helper"));

  Ok(())
}

#[test]
fn test_npm_from_package_subdirectory() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let core = ws.add_package("@acme/core", "packages/core", &[])?;
  ws.add_package("@acme/ui", "packages/ui", &["packages/core"])?;
  ws.install_stub_tools()?;

  let output = run_wsmap(&core, &["npm", "--format", "json"])?;
  let json = stdout_json(&output)?;
  let names: Vec<_> = json
    .as_array()
    .expect("array of packages")
    .iter()
    .map(|dep| dep["name"].as_str().unwrap_or_default().to_string())
    .collect();

  assert_eq!(names, vec!["core", "ui"]);

  Ok(())
}

#[test]
fn test_npm_single_package_text() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("@acme/core", "packages/core", &[])?;
  ws.add_package("@acme/ui", "packages/ui", &[])?;
  ws.install_stub_tools()?;

  let output = run_wsmap(&ws.path, &["npm", "--package", "@acme/ui"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("📦 ui (2 dependencies)"), "got: {}", stdout);
  assert!(!stdout.contains("core-helper"));

  Ok(())
}

#[test]
fn test_npm_unknown_package() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("@acme/core", "packages/core", &[])?;
  ws.install_stub_tools()?;

  let output = run_wsmap_raw(&ws.path, &["npm", "--package", "@acme/missing"])?;
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}

#[test]
fn test_npm_reports_failed_packages() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.add_package("@acme/core", "packages/core", &[])?;
  ws.install_stub_tools()?;
  // An npm that prints nothing and fails is an error for that package
  ws.write_file(
    "wsmap.toml",
    &format!(
      "[tools]\nyarn = \"{}\"\nnpm = \"false\"\n",
      ws.tools.join("yarn").display()
    ),
  )?;

  let output = run_wsmap_raw(&ws.path, &["npm"])?;
  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("npm list failed for 1 package(s): @acme/core"), "got: {}", stderr);

  Ok(())
}
