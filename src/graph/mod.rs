//! Workspace dependency graph
//!
//! Built from a [`Workspace`](crate::workspace::Workspace) as plain maps keyed by
//! package name. Edges are one hop: a package's direct workspace dependencies.

pub mod resolver;

pub use resolver::{DanglingReference, ResolutionResult, resolve};
