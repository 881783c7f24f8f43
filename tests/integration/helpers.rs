//! Test helpers for integration tests

use anyhow::{Context, Result};
use serde_json::json;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A yarn workspace inside a git repository, with stub package-manager binaries
pub struct TestWorkspace {
  _root: TempDir,
  _tools: TempDir,
  pub path: PathBuf,
  pub tools: PathBuf,
  listing: RefCell<Vec<serde_json::Value>>,
}

impl TestWorkspace {
  /// Create a new workspace with a root package.json and an initial commit
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let tools = TempDir::new()?;
    let path = root.path().to_path_buf();

    // Initialize git repo with main as default branch
    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    std::fs::write(
      path.join("package.json"),
      r#"{
  "name": "monorepo",
  "private": true,
  "workspaces": ["packages/*", "apps/*"]
}
"#,
    )?;

    let ws = Self {
      path,
      tools: tools.path().to_path_buf(),
      _root: root,
      _tools: tools,
      listing: RefCell::new(vec![json!({
        "location": ".",
        "name": "monorepo",
        "workspaceDependencies": [],
        "mismatchedWorkspaceDependencies": []
      })]),
    };
    ws.write_listing()?;

    git(&ws.path, &["add", "."])?;
    git(&ws.path, &["commit", "-m", "Initial workspace setup"])?;

    Ok(ws)
  }

  /// Add a package at `location`, depending on the packages at `dep_locations`
  pub fn add_package(&self, name: &str, location: &str, dep_locations: &[&str]) -> Result<PathBuf> {
    let package_path = self.path.join(location);
    std::fs::create_dir_all(&package_path)?;

    std::fs::write(
      package_path.join("package.json"),
      serde_json::to_string_pretty(&json!({ "name": name, "version": "1.0.0" }))?,
    )?;
    std::fs::write(package_path.join("index.js"), format!("module.exports = '{}';\n", name))?;

    self.listing.borrow_mut().push(json!({
      "location": location,
      "name": name,
      "workspaceDependencies": dep_locations,
      "mismatchedWorkspaceDependencies": []
    }));
    self.write_listing()?;

    Ok(package_path)
  }

  /// Path of the line-delimited listing the stub yarn prints
  pub fn listing_path(&self) -> PathBuf {
    self.tools.join("listing.jsonl")
  }

  fn write_listing(&self) -> Result<()> {
    let lines: Vec<String> = self.listing.borrow().iter().map(|v| v.to_string()).collect();
    std::fs::write(self.listing_path(), lines.join("\n") + "\n")?;
    Ok(())
  }

  /// Commit current changes
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;

    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Write a file relative to the workspace root
  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let file_path = self.path.join(path);
    if let Some(parent) = file_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
  }

  /// Write wsmap.toml pointing the tools at stub scripts
  pub fn write_config(&self, extra: &str) -> Result<()> {
    let config = format!(
      "[tools]\nyarn = \"{}\"\nnpm = \"{}\"\n\n{}",
      self.tools.join("yarn").display(),
      self.tools.join("npm").display(),
      extra
    );
    std::fs::write(self.path.join("wsmap.toml"), config)?;
    Ok(())
  }

  /// Install stub `yarn` and `npm` scripts and a config that uses them
  #[cfg(unix)]
  pub fn install_stub_tools(&self) -> Result<()> {
    // The escape sequence checks that terminal codes are stripped before parsing
    write_script(
      &self.tools.join("yarn"),
      &format!(
        r#"#!/bin/sh
if [ "$*" != "workspaces list --json -v" ]; then
  echo "unexpected arguments: $*" >&2
  exit 64
fi
printf '\033[2K'
cat "{}"
"#,
        self.listing_path().display()
      ),
    )?;

    // npm list exits 1 when the tree has problems but still prints JSON
    write_script(
      &self.tools.join("npm"),
      r#"#!/bin/sh
name=$(basename "$(pwd)")
printf '{"name":"%s","version":"1.0.0","dependencies":{"left-pad":{"version":"1.3.0"},"%s-helper":{"version":"0.1.0"}}}\n' "$name" "$name"
exit 1
"#,
    )?;

    self.write_config("")
  }

  /// Replace the stub yarn with one that fails
  #[cfg(unix)]
  pub fn break_yarn(&self) -> Result<()> {
    write_script(
      &self.tools.join("yarn"),
      "#!/bin/sh\necho \"Usage Error: This command can only be run from within a workspace\" >&2\nexit 1\n",
    )
  }
}

#[cfg(unix)]
fn write_script(path: &Path, content: &str) -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  std::fs::write(path, content)?;
  let mut perms = std::fs::metadata(path)?.permissions();
  perms.set_mode(0o755);
  std::fs::set_permissions(path, perms)?;
  Ok(())
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run wsmap without checking the exit status
pub fn run_wsmap_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  let wsmap_bin = env!("CARGO_BIN_EXE_wsmap");

  Command::new(wsmap_bin)
    .current_dir(cwd)
    .env_remove("RUST_LOG")
    .args(args)
    .output()
    .context("Failed to run wsmap")
}

/// Run wsmap, failing on a non-zero exit
pub fn run_wsmap(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_wsmap_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "wsmap command failed: wsmap {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Parse stdout as JSON
pub fn stdout_json(output: &Output) -> Result<serde_json::Value> {
  serde_json::from_slice(&output.stdout).context("stdout is not valid JSON")
}
