//! wsmap.toml: tool locations, subprocess environment and resolution policy

use crate::core::error::{ConfigError, ResultExt, WsError, WsResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for wsmap
/// Searched in order: wsmap.toml, .wsmap.toml, .config/wsmap.toml, in the
/// working directory and then each parent
///
/// Every section is optional; a workspace without a config file gets the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WsmapConfig {
  #[serde(default)]
  pub tools: ToolsConfig,
  #[serde(default)]
  pub env: EnvConfig,
  #[serde(default)]
  pub resolve: ResolveConfig,
}

/// External programs wsmap shells out to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
  #[serde(default = "default_yarn")]
  pub yarn: String,
  #[serde(default = "default_npm")]
  pub npm: String,
  #[serde(default = "default_git")]
  pub git: String,
}

fn default_yarn() -> String {
  "yarn".to_string()
}

fn default_npm() -> String {
  "npm".to_string()
}

fn default_git() -> String {
  "git".to_string()
}

impl Default for ToolsConfig {
  fn default() -> Self {
    Self {
      yarn: default_yarn(),
      npm: default_npm(),
      git: default_git(),
    }
  }
}

/// Environment forwarded to subprocesses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvConfig {
  /// Forward the whole ambient environment (default: false)
  #[serde(default)]
  pub inherit_all: bool,

  /// Ambient variables forwarded by name
  #[serde(default = "default_inherit")]
  pub inherit: Vec<String>,

  /// Extra variables set explicitly (win over inherited ones)
  #[serde(default)]
  pub vars: BTreeMap<String, String>,
}

fn default_inherit() -> Vec<String> {
  [
    "PATH",
    "HOME",
    "USERPROFILE",
    "APPDATA",
    "LOCALAPPDATA",
    "SYSTEMROOT",
    "TMPDIR",
    "TEMP",
    "TMP",
  ]
  .into_iter()
  .map(String::from)
  .collect()
}

impl Default for EnvConfig {
  fn default() -> Self {
    Self {
      inherit_all: false,
      inherit: default_inherit(),
      vars: BTreeMap::new(),
    }
  }
}

/// What to do with declared dependency locations no package occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingPolicy {
  /// Omit silently
  Ignore,
  /// Omit and log a warning
  #[default]
  Warn,
  /// Fail the command
  Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfig {
  #[serde(default)]
  pub dangling: DanglingPolicy,

  /// Ref `wsmap changed` diffs against when no scope is given
  #[serde(default = "default_since")]
  pub default_since: String,
}

fn default_since() -> String {
  "origin/main".to_string()
}

impl Default for ResolveConfig {
  fn default() -> Self {
    Self {
      dangling: DanglingPolicy::default(),
      default_since: default_since(),
    }
  }
}

impl WsmapConfig {
  /// Find config file in search order: wsmap.toml, .wsmap.toml, .config/wsmap.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("wsmap.toml"),
      path.join(".wsmap.toml"),
      path.join(".config").join("wsmap.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load the nearest config in `path` or its ancestors, falling back to defaults
  pub fn load(path: &Path) -> WsResult<Self> {
    let Some(config_path) = path.ancestors().find_map(Self::find_config_path) else {
      tracing::debug!(dir = %path.display(), "no wsmap config found, using defaults");
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
  }

  /// Parse and validate config text
  pub fn parse(content: &str) -> WsResult<Self> {
    let config: WsmapConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> WsResult<()> {
    for (field, value) in [
      ("tools.yarn", &self.tools.yarn),
      ("tools.npm", &self.tools.npm),
      ("tools.git", &self.tools.git),
    ] {
      if value.trim().is_empty() {
        return Err(WsError::Config(ConfigError::MissingField {
          field: field.to_string(),
        }));
      }
    }

    if self.resolve.default_since.trim().is_empty() {
      return Err(WsError::Config(ConfigError::MissingField {
        field: "resolve.default_since".to_string(),
      }));
    }

    if let Some(key) = self.env.vars.keys().find(|k| k.is_empty() || k.contains('=')) {
      return Err(WsError::Config(ConfigError::InvalidValue {
        field: "env.vars".to_string(),
        reason: format!("'{}' is not a valid variable name", key),
      }));
    }

    Ok(())
  }
}
