//! Progress indicators for long-running operations
//!
//! Uses `linya` for allocation-free, concurrency-optimized progress bars.
//! Bars are drawn on stderr so stdout stays machine-readable.

use linya::{Bar, Progress};
use std::sync::Mutex;

/// Single bar shared by reference across worker threads
pub struct SharedProgress {
  progress: Mutex<Progress>,
  bar: Bar,
}

impl SharedProgress {
  /// Create a bar with `total` steps
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self {
      progress: Mutex::new(progress),
      bar,
    }
  }

  /// Increment progress by 1 (thread-safe)
  ///
  /// A poisoned lock only skips the redraw.
  pub fn inc(&self) {
    if let Ok(mut progress) = self.progress.lock() {
      progress.inc_and_draw(&self.bar, 1);
    }
  }
}
