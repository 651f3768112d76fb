//! Diagnostic logging contract for the transformation engines
//!
//! The engines never print directly: every diagnostic (which directive
//! failed, on which node, why) flows through `TransformLogger`, and the
//! caller decides where it goes. The CLI installs `ConsoleLogger`; tests use
//! `BufferLogger` to assert on what was reported; `NullLogger` silences a
//! transformation entirely.
//!
//! Loggers must be `Sync` because batch apply fans transformations across
//! rayon workers sharing one logger.

use std::path::Path;
#[cfg(test)]
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// How prominently a message should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageImportance {
  Low,
  Normal,
  High,
}

/// Sink for transformation diagnostics
pub trait TransformLogger: Sync {
  fn log_message(&self, importance: MessageImportance, message: &str);
  fn log_warning(&self, message: &str);
  fn log_error(&self, message: &str);

  /// Error with a source position, for parse and directive failures
  fn log_error_at(&self, file: &Path, line: u64, column: u64, message: &str) {
    self.log_error(&format!("{}({},{}): {}", file.display(), line, column, message));
  }

  /// Open a nested section; messages until the matching `end_section` belong
  /// to it. Only emitted when the transformer was built with sections enabled.
  fn start_section(&self, importance: MessageImportance, message: &str) {
    self.log_message(importance, message);
  }

  fn end_section(&self, importance: MessageImportance, message: &str) {
    self.log_message(importance, message);
  }
}

/// Logger that discards everything
#[cfg(test)]
pub struct NullLogger;

#[cfg(test)]
impl TransformLogger for NullLogger {
  fn log_message(&self, _importance: MessageImportance, _message: &str) {}
  fn log_warning(&self, _message: &str) {}
  fn log_error(&self, _message: &str) {}
}

/// Console logger with ANSI styling and section indentation
pub struct ConsoleLogger {
  /// Minimum importance printed for plain messages
  threshold: MessageImportance,
  /// Current section nesting depth
  depth: AtomicUsize,
}

impl ConsoleLogger {
  pub fn new(verbose: bool) -> Self {
    Self {
      threshold: if verbose { MessageImportance::Low } else { MessageImportance::Normal },
      depth: AtomicUsize::new(0),
    }
  }

  fn indent(&self) -> String {
    "  ".repeat(self.depth.load(Ordering::Relaxed))
  }
}

impl TransformLogger for ConsoleLogger {
  fn log_message(&self, importance: MessageImportance, message: &str) {
    if importance >= self.threshold {
      eprintln!("{}{}", self.indent(), message);
    }
  }

  fn log_warning(&self, message: &str) {
    let yellow = anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow)));
    eprintln!("{}{}warning:{} {}", self.indent(), yellow.render(), yellow.render_reset(), message);
  }

  fn log_error(&self, message: &str) {
    let red = anstyle::Style::new()
      .bold()
      .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red)));
    eprintln!("{}{}error:{} {}", self.indent(), red.render(), red.render_reset(), message);
  }

  fn start_section(&self, importance: MessageImportance, message: &str) {
    self.log_message(importance, message);
    self.depth.fetch_add(1, Ordering::Relaxed);
  }

  fn end_section(&self, importance: MessageImportance, message: &str) {
    // Unmatched end_section stays at depth 0 instead of underflowing
    let _ = self.depth.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |depth| depth.checked_sub(1));
    self.log_message(importance, message);
  }
}

/// Recorded log entry, for assertions in tests
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
  Message(String),
  Warning(String),
  Error(String),
}

/// Logger that records entries in memory
#[cfg(test)]
#[derive(Default)]
pub struct BufferLogger {
  entries: Mutex<Vec<LogEntry>>,
}

#[cfg(test)]
impl BufferLogger {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn entries(&self) -> Vec<LogEntry> {
    self.entries.lock().unwrap().clone()
  }

  pub fn errors(&self) -> Vec<String> {
    self
      .entries()
      .into_iter()
      .filter_map(|entry| match entry {
        LogEntry::Error(message) => Some(message),
        _ => None,
      })
      .collect()
  }

  pub fn warnings(&self) -> Vec<String> {
    self
      .entries()
      .into_iter()
      .filter_map(|entry| match entry {
        LogEntry::Warning(message) => Some(message),
        _ => None,
      })
      .collect()
  }
}

#[cfg(test)]
impl TransformLogger for BufferLogger {
  fn log_message(&self, _importance: MessageImportance, message: &str) {
    self.entries.lock().unwrap().push(LogEntry::Message(message.to_string()));
  }

  fn log_warning(&self, message: &str) {
    self.entries.lock().unwrap().push(LogEntry::Warning(message.to_string()));
  }

  fn log_error(&self, message: &str) {
    self.entries.lock().unwrap().push(LogEntry::Error(message.to_string()));
  }
}
