//! Error types for cfgshift operations
//!
//! All fallible operations return `ShiftResult<T>`. Errors carry enough
//! structure for the CLI to print an actionable message (and an optional
//! help line) and to pick a process exit code.
//!
//! Engine-level transform failures (a directive that fails to apply) are NOT
//! errors: they are reported through the logger and surfaced as
//! `TransformOutcome::Failed` by `Transformer::transform`. Errors are reserved
//! for invalid input, missing files, unsupported formats and I/O faults.

use std::fmt;
use std::path::PathBuf;

/// Result alias used throughout the crate
pub type ShiftResult<T> = Result<T, ShiftError>;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// Operation completed
  #[allow(dead_code)]
  Success,
  /// Operation ran but failed (transform failed, checks failed)
  Failure,
  /// Bad invocation or configuration
  Usage,
}

impl ExitCode {
  pub fn as_i32(self) -> i32 {
    match self {
      ExitCode::Success => 0,
      ExitCode::Failure => 1,
      ExitCode::Usage => 2,
    }
  }
}

/// Configuration (cfgshift.toml) errors
#[derive(Debug)]
pub enum ConfigError {
  /// No cfgshift.toml found in the search path
  NotFound { root: PathBuf },
  /// File exists but is not valid TOML / does not match the schema
  Parse { path: PathBuf, reason: String },
  /// Parsed but semantically invalid (empty configurations, bad destination pattern, ...)
  Invalid { path: PathBuf, reason: String },
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { root } => {
        write!(f, "No cfgshift.toml found under {}", root.display())
      }
      ConfigError::Parse { path, reason } => {
        write!(f, "Failed to parse {}: {}", path.display(), reason)
      }
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), reason)
      }
    }
  }
}

/// Transformation errors (everything up to, but not including, an
/// engine-reported failure to apply a directive)
#[derive(Debug)]
pub enum TransformError {
  /// Source file does not exist
  SourceNotFound { path: PathBuf },
  /// Transform file does not exist
  TransformNotFound { path: PathBuf },
  /// File is neither well-formed XML, nor .json, nor .ini
  UnsupportedFormat { path: PathBuf },
  /// BOM detected an encoding this tool cannot decode
  UnsupportedEncoding { path: PathBuf, encoding: String },
  /// Source or transform document could not be parsed at all
  Parse { path: PathBuf, reason: String },
}

impl fmt::Display for TransformError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TransformError::SourceNotFound { path } => {
        write!(f, "Source file not found: {}", path.display())
      }
      TransformError::TransformNotFound { path } => {
        write!(f, "Transform file not found: {}", path.display())
      }
      TransformError::UnsupportedFormat { path } => {
        write!(f, "File format not supported for transformation: {}", path.display())
      }
      TransformError::UnsupportedEncoding { path, encoding } => {
        write!(f, "{} is encoded as {} which cfgshift cannot decode", path.display(), encoding)
      }
      TransformError::Parse { path, reason } => {
        write!(f, "Failed to parse {}: {}", path.display(), reason)
      }
    }
  }
}

/// Top-level error type for cfgshift
#[derive(Debug)]
pub enum ShiftError {
  /// Configuration file problems
  Config(ConfigError),
  /// Transformation pipeline problems
  Transform(TransformError),
  /// Free-form error with an optional help line
  Message { message: String, help: Option<String> },
}

impl ShiftError {
  /// Create a free-form error
  pub fn message(message: impl Into<String>) -> Self {
    ShiftError::Message {
      message: message.into(),
      help: None,
    }
  }

  /// Create a free-form error with a help line shown below the message
  pub fn with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
    ShiftError::Message {
      message: message.into(),
      help: Some(help.into()),
    }
  }

  /// Help line for this error, if any
  pub fn help(&self) -> Option<&str> {
    match self {
      ShiftError::Config(ConfigError::NotFound { .. }) => {
        Some("Run 'cfgshift init' to create a cfgshift.toml")
      }
      ShiftError::Message { help, .. } => help.as_deref(),
      _ => None,
    }
  }

  /// Exit code the CLI should terminate with
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ShiftError::Config(_) => ExitCode::Usage,
      ShiftError::Transform(_) => ExitCode::Failure,
      ShiftError::Message { .. } => ExitCode::Failure,
    }
  }
}

impl fmt::Display for ShiftError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShiftError::Config(err) => write!(f, "{}", err),
      ShiftError::Transform(err) => write!(f, "{}", err),
      ShiftError::Message { message, .. } => write!(f, "{}", message),
    }
  }
}

impl std::error::Error for ShiftError {}

impl From<ConfigError> for ShiftError {
  fn from(err: ConfigError) -> Self {
    ShiftError::Config(err)
  }
}

impl From<TransformError> for ShiftError {
  fn from(err: TransformError) -> Self {
    ShiftError::Transform(err)
  }
}

impl From<std::io::Error> for ShiftError {
  fn from(err: std::io::Error) -> Self {
    ShiftError::message(format!("I/O error: {}", err))
  }
}

impl From<anyhow::Error> for ShiftError {
  fn from(err: anyhow::Error) -> Self {
    ShiftError::message(format!("{:#}", err))
  }
}

/// Extension methods for attaching help text to results
pub trait ResultExt<T> {
  /// Attach a help line to the error, if the result is an error
  fn help(self, help: &str) -> ShiftResult<T>;
}

impl<T> ResultExt<T> for ShiftResult<T> {
  fn help(self, help: &str) -> ShiftResult<T> {
    self.map_err(|err| match err {
      ShiftError::Message { message, .. } => ShiftError::Message {
        message,
        help: Some(help.to_string()),
      },
      other => ShiftError::Message {
        message: other.to_string(),
        help: Some(help.to_string()),
      },
    })
  }
}

/// Print an error (and its help line, if any) to stderr with ANSI styling
pub fn print_error(err: &ShiftError) {
  let red = anstyle::Style::new()
    .bold()
    .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red)));
  let yellow = anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow)));

  eprintln!("{}error:{} {}", red.render(), red.render_reset(), err);
  if let Some(help) = err.help() {
    eprintln!("{}help:{} {}", yellow.render(), yellow.render_reset(), help);
  }
}
