//! Error types for wsmap with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes errors and provides
//! contextual help messages to users. Process and git failures carry the command
//! line and captured stderr so they can be diagnosed without re-running anything.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for wsmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, malformed package-manager output)
  User = 1,
  /// System error (git, subprocess, I/O)
  System = 2,
  /// Validation failure (dangling dependency references under strict mode)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for wsmap
#[derive(Debug)]
pub enum WsError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Subprocess errors (package manager invocations)
  Process(ProcessError),

  /// Structured output could not be parsed
  Parse(ParseError),

  /// Workspace validation errors
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// A categorized error with a note on what wsmap was doing when it failed
  Context { context: String, source: Box<WsError> },

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl WsError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    WsError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    WsError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// `Message` errors accumulate context lines. Categorized errors are wrapped
  /// so their exit code and help text survive.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      WsError::Message { message, context, help } => WsError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      other => WsError::Context {
        context: ctx_str,
        source: Box::new(other),
      },
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      WsError::Config(_) => ExitCode::User,
      WsError::Git(_) => ExitCode::System,
      WsError::Process(_) => ExitCode::System,
      WsError::Parse(_) => ExitCode::User,
      WsError::Validation(_) => ExitCode::Validation,
      WsError::Io(_) => ExitCode::System,
      WsError::Context { source, .. } => source.exit_code(),
      WsError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      WsError::Config(e) => e.help_message(),
      WsError::Git(e) => e.help_message(),
      WsError::Process(e) => e.help_message(),
      WsError::Parse(e) => e.help_message(),
      WsError::Validation(e) => e.help_message(),
      WsError::Message { help, .. } => help.clone(),
      WsError::Context { source, .. } => source.help_message(),
      WsError::Io(_) => None,
    }
  }
}

impl fmt::Display for WsError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      WsError::Config(e) => write!(f, "{}", e),
      WsError::Git(e) => write!(f, "{}", e),
      WsError::Process(e) => write!(f, "{}", e),
      WsError::Parse(e) => write!(f, "{}", e),
      WsError::Validation(e) => write!(f, "{}", e),
      WsError::Io(e) => write!(f, "I/O error: {}", e),
      WsError::Context { context, source } => write!(f, "{}\n{}", context, source),
      WsError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for WsError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      WsError::Io(e) => Some(e),
      WsError::Context { source, .. } => Some(&**source),
      _ => None,
    }
  }
}

impl From<io::Error> for WsError {
  fn from(err: io::Error) -> Self {
    WsError::Io(err)
  }
}

impl From<toml_edit::de::Error> for WsError {
  fn from(err: toml_edit::de::Error) -> Self {
    WsError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for WsError {
  fn from(err: serde_json::Error) -> Self {
    WsError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Missing or empty required field
  MissingField { field: String },

  /// Field has a value wsmap cannot use
  InvalidValue { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MissingField { field } => Some(format!("Set `{}` in wsmap.toml or remove the key.", field)),
      ConfigError::InvalidValue { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::InvalidValue { field, reason } => {
        write!(f, "Invalid value for {}: {}", field, reason)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::CommandFailed { stderr, .. } => {
        if stderr.contains("unknown revision") || stderr.contains("bad revision") {
          Some("Check that the ref exists locally. Remote refs may need a `git fetch` first.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run wsmap inside a git repository or pass --cwd. Checked: {}",
        path.display()
      )),
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
    }
  }
}

/// Subprocess errors
#[derive(Debug)]
pub enum ProcessError {
  /// The program could not be started at all
  SpawnFailed { program: String, source: io::Error },

  /// The program ran and exited unsuccessfully
  CommandFailed {
    command: String,
    code: Option<i32>,
    stderr: String,
  },
}

impl ProcessError {
  fn help_message(&self) -> Option<String> {
    match self {
      ProcessError::SpawnFailed { program, source } if source.kind() == io::ErrorKind::NotFound => Some(format!(
        "'{}' was not found. Install it, or point [tools] in wsmap.toml at the right binary. \
         If it is installed, check that PATH is forwarded via [env].",
        program
      )),
      _ => None,
    }
  }
}

impl fmt::Display for ProcessError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ProcessError::SpawnFailed { program, source } => {
        write!(f, "Failed to execute {}: {}", program, source)
      }
      ProcessError::CommandFailed { command, code, stderr } => {
        match code {
          Some(code) => write!(f, "Command failed with exit code {}: {}", code, command)?,
          None => write!(f, "Command terminated by signal: {}", command)?,
        }
        if !stderr.is_empty() {
          write!(f, "\n{}", stderr)?;
        }
        Ok(())
      }
    }
  }
}

/// Package-manager output that does not match the expected schema
#[derive(Debug)]
pub enum ParseError {
  /// A line of line-delimited JSON output failed to deserialize
  ListingLine { line: usize, reason: String },

  /// A whole JSON document failed to deserialize
  Document { source: String, reason: String },
}

impl ParseError {
  fn help_message(&self) -> Option<String> {
    match self {
      ParseError::ListingLine { .. } => {
        Some("wsmap expects the output of `yarn workspaces list --json -v` (yarn 2 or newer).".to_string())
      }
      ParseError::Document { .. } => None,
    }
  }
}

impl fmt::Display for ParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ParseError::ListingLine { line, reason } => {
        write!(f, "Malformed workspace listing at line {}: {}", line, reason)
      }
      ParseError::Document { source, reason } => {
        write!(f, "Malformed output from {}: {}", source, reason)
      }
    }
  }
}

/// Validation errors
#[derive(Debug)]
pub enum ValidationError {
  /// Declared workspace dependencies that resolve to no package
  DanglingDependencies { references: Vec<(String, String)> },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::DanglingDependencies { .. } => Some(
        "A package declares a dependency on a location no workspace package occupies. \
         Check the workspaces globs in package.json, or set resolve.dangling = \"warn\"."
          .to_string(),
      ),
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::DanglingDependencies { references } => {
        write!(f, "{} dangling workspace dependency reference(s):", references.len())?;
        for (package, location) in references {
          write!(f, "\n  {} -> {}", package, location)?;
        }
        Ok(())
      }
    }
  }
}

/// Result type alias for wsmap
pub type WsResult<T> = Result<T, WsError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> WsResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> WsResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<WsError>,
{
  fn context(self, ctx: impl Into<String>) -> WsResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> WsResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &WsError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
