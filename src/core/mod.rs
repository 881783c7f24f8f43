//! Core plumbing for wsmap
//!
//! - **config**: wsmap.toml parsing and validation
//! - **context**: Invocation context shared by all commands
//! - **error**: Error types with contextual help messages and exit codes
//! - **process**: Subprocess execution with an explicit environment
//! - **vcs**: Git operations (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod process;
pub mod vcs;
