//! Subprocess execution with an explicit environment
//!
//! Every external program wsmap runs (git, yarn, npm) is started through a
//! [`CommandEnv`]. The environment is cleared and only the variables recorded
//! in the `CommandEnv` are passed on, so nothing leaks in from the ambient
//! process state after startup.

use crate::core::config::EnvConfig;
use crate::core::error::{ProcessError, WsError, WsResult};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::LazyLock;

/// CSI / escape sequences emitted by package managers even when piped
static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"[\x1b\x{9b}][\[()#;?]*(?:[0-9]{1,4}(?:;[0-9]{0,4})*)?[0-9A-ORZcf-nqry=><]")
    .expect("ANSI escape pattern is a valid regex")
});

/// Working directory and environment variables for a subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEnv {
  cwd: PathBuf,
  vars: BTreeMap<String, String>,
}

impl CommandEnv {
  /// Empty environment rooted at `cwd`
  pub fn new(cwd: impl Into<PathBuf>) -> Self {
    Self {
      cwd: cwd.into(),
      vars: BTreeMap::new(),
    }
  }

  /// Build from a snapshot of the ambient environment, filtered through config.
  ///
  /// `ambient` is taken as a parameter so that the only read of the real
  /// process environment happens at startup.
  pub fn from_snapshot<I>(cwd: impl Into<PathBuf>, ambient: I, config: &EnvConfig) -> Self
  where
    I: IntoIterator<Item = (String, String)>,
  {
    let mut env = Self::new(cwd);

    for (key, value) in ambient {
      if config.inherit_all || config.inherit.iter().any(|k| k == &key) {
        env.vars.insert(key, value);
      }
    }

    for (key, value) in &config.vars {
      env.vars.insert(key.clone(), value.clone());
    }

    env
  }

  /// Set a variable, replacing any previous value
  #[cfg(test)]
  pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.vars.insert(key.into(), value.into());
    self
  }

  /// Same variables, different working directory
  pub fn with_cwd(&self, cwd: impl Into<PathBuf>) -> Self {
    Self {
      cwd: cwd.into(),
      vars: self.vars.clone(),
    }
  }

  pub fn cwd(&self) -> &Path {
    &self.cwd
  }

  #[cfg(test)]
  pub fn var(&self, key: &str) -> Option<&str> {
    self.vars.get(key).map(String::as_str)
  }

  /// Create a command for `program` running in this environment
  pub fn command(&self, program: &str) -> Command {
    let mut cmd = Command::new(program);
    cmd.current_dir(&self.cwd);
    cmd.env_clear();
    cmd.envs(&self.vars);
    cmd
  }
}

/// Run a command and return its cleaned stdout, failing on non-zero exit.
pub fn run_checked(mut cmd: Command, label: &str) -> WsResult<String> {
  let output = execute(&mut cmd, label)?;

  if !output.status.success() {
    return Err(WsError::Process(ProcessError::CommandFailed {
      command: label.to_string(),
      code: output.status.code(),
      stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }));
  }

  Ok(clean_output(&output.stdout))
}

/// Run a command and return its cleaned stdout.
///
/// A non-zero exit is only an error when nothing was written to stdout; some
/// tools (`npm list`) report problems through the exit code while still
/// printing a usable document.
pub fn run_lenient(mut cmd: Command, label: &str) -> WsResult<String> {
  let output = execute(&mut cmd, label)?;
  let stdout = clean_output(&output.stdout);

  if !output.status.success() {
    if stdout.is_empty() {
      return Err(WsError::Process(ProcessError::CommandFailed {
        command: label.to_string(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }
    tracing::debug!(command = %label, code = ?output.status.code(), "command exited unsuccessfully, using its output");
  }

  Ok(stdout)
}

fn execute(cmd: &mut Command, label: &str) -> WsResult<Output> {
  tracing::debug!(command = %label, cwd = ?cmd.get_current_dir(), "running");

  cmd.output().map_err(|source| {
    WsError::Process(ProcessError::SpawnFailed {
      program: cmd.get_program().to_string_lossy().to_string(),
      source,
    })
  })
}

fn clean_output(stdout: &[u8]) -> String {
  strip_ansi(String::from_utf8_lossy(stdout).trim()).into_owned()
}

/// Remove terminal escape sequences from `text`
pub fn strip_ansi(text: &str) -> std::borrow::Cow<'_, str> {
  ANSI_ESCAPE.replace_all(text, "")
}
