//! Progress indicators for long-running operations
//!
//! Uses `linya` for allocation-free, concurrency-optimized progress bars

use linya::{Bar, Progress};
use std::sync::{Arc, Mutex};

/// Multi-bar progress for parallel operations
/// Thread-safe wrapper for concurrent progress tracking
#[derive(Clone)]
pub struct MultiProgress {
  progress: Arc<Mutex<Progress>>,
}

impl MultiProgress {
  pub fn new() -> Self {
    Self {
      progress: Arc::new(Mutex::new(Progress::new())),
    }
  }

  /// Add a bar; the handle is shared with workers
  pub fn add_bar(&self, total: usize, label: impl Into<String>) -> Bar {
    self.progress.lock().unwrap().bar(total, label.into())
  }

  /// Increment a bar by 1
  pub fn inc(&self, bar: &Bar) {
    self.progress.lock().unwrap().inc_and_draw(bar, 1);
  }
}

impl Default for MultiProgress {
  fn default() -> Self {
    Self::new()
  }
}
