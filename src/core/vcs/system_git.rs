//! System git backend
//!
//! Uses git porcelain/plumbing commands through the system binary. All
//! commands run with the caller's explicit [`CommandEnv`].

use crate::core::error::{GitError, ProcessError, WsError, WsResult};
use crate::core::process::CommandEnv;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Which set of changed files to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeScope {
  /// Working tree compared to a ref (`git diff --name-only <ref>`)
  Since(String),
  /// Staged changes (`git diff --name-only --cached`)
  Staged,
  /// Files touched by the HEAD commit
  Head,
}

impl fmt::Display for ChangeScope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ChangeScope::Since(r) => write!(f, "since {}", r),
      ChangeScope::Staged => write!(f, "staged"),
      ChangeScope::Head => write!(f, "in HEAD"),
    }
  }
}

impl ChangeScope {
  fn git_args(&self) -> Vec<&str> {
    match self {
      ChangeScope::Since(r) => vec!["diff", "--name-only", r.as_str(), "--"],
      ChangeScope::Staged => vec!["diff", "--name-only", "--cached"],
      ChangeScope::Head => vec!["show", "--pretty=", "--name-only", "HEAD"],
    }
  }
}

/// Git backend using the system git binary
pub struct SystemGit {
  /// Git executable
  program: String,

  /// Environment the repository was opened with
  env: CommandEnv,

  /// Working tree root
  work_tree: PathBuf,
}

impl SystemGit {
  /// Open the git repository containing `env.cwd()`
  ///
  /// This performs ONE subprocess call to find the working tree root.
  pub fn open(env: &CommandEnv, program: &str) -> WsResult<Self> {
    let mut git = Self {
      program: program.to_string(),
      env: env.clone(),
      work_tree: env.cwd().to_path_buf(),
    };

    let output = git
      .git_cmd()
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .map_err(|source| {
        WsError::Process(ProcessError::SpawnFailed {
          program: program.to_string(),
          source,
        })
      })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(WsError::Git(GitError::RepoNotFound {
          path: env.cwd().to_path_buf(),
        }));
      }
      return Err(WsError::message(format!("Failed to open git repository: {}", stderr.trim())));
    }

    git.work_tree = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
    Ok(git)
  }

  /// Working tree root (`git rev-parse --show-toplevel`)
  pub fn root(&self) -> &Path {
    &self.work_tree
  }

  /// List files changed in `scope`, relative to the repository root
  pub fn changed_files(&self, scope: &ChangeScope) -> WsResult<Vec<String>> {
    if let ChangeScope::Since(r) = scope
      && r.starts_with('-')
    {
      return Err(WsError::with_help(
        format!("Invalid git ref '{}'", r),
        "Refs passed to --since cannot start with '-'.",
      ));
    }

    let args = scope.git_args();

    let output = self
      .git_cmd()
      .args(&args)
      .output()
      .map_err(|source| {
        WsError::Process(ProcessError::SpawnFailed {
          program: self.program.clone(),
          source,
        })
      })?;

    if !output.status.success() {
      return Err(WsError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    Ok(parse_name_only(&String::from_utf8_lossy(&output.stdout)))
  }

  /// Create a git command in the opened environment
  ///
  /// - Runs against the environment's working directory
  /// - Passes only the explicit environment variables
  /// - Adds configuration overrides for stable output
  fn git_cmd(&self) -> Command {
    let mut cmd = self.env.command(&self.program);

    cmd.arg("-C").arg(self.env.cwd());
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII
    cmd.arg("-c").arg("color.ui=false");

    cmd
  }
}

/// Parse `--name-only` output into paths, dropping blank lines
fn parse_name_only(stdout: &str) -> Vec<String> {
  stdout
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .map(String::from)
    .collect()
}
