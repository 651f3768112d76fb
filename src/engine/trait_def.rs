//! Transformer trait abstraction
//!
//! Each supported file format implements the `Transformer` trait, so callers
//! dispatch on capability instead of inspecting file types themselves. The
//! format of a file is resolved once by `engine::classify_file` into a
//! `TransformerKind`, and `engine::get_transformer` hands back the matching
//! implementation.
//!
//! # Error signaling
//!
//! `transform` distinguishes three situations:
//!
//! - `Ok(TransformOutcome::Applied)` - the destination file was written
//! - `Ok(TransformOutcome::Failed)` - the transformation engine could not
//!   apply a directive (unmatched locator, malformed instruction). Details
//!   were reported through the logger; nothing was written.
//! - `Err(_)` - invalid input, missing files, unsupported format/encoding,
//!   or an I/O fault. Never used for an engine-level failure.

use crate::core::error::ShiftResult;
use std::fmt;
use std::path::Path;

/// File format a transformer handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformerKind {
  /// Well-formed XML, transformed with XDT-style directives
  Xml,
  /// `.json` files, transformed with JDT-style merge semantics
  Json,
  /// `.ini` files, transformed with sectioned key=value replacement
  Ini,
  /// None of the above; cannot be transformed
  Unsupported,
}

impl fmt::Display for TransformerKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TransformerKind::Xml => write!(f, "XML"),
      TransformerKind::Json => write!(f, "JSON"),
      TransformerKind::Ini => write!(f, "INI"),
      TransformerKind::Unsupported => write!(f, "unsupported"),
    }
  }
}

/// Result of a transformation attempt that ran to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOutcome {
  /// Destination written
  Applied,
  /// Engine reported a failure; destination untouched, details on the logger
  Failed,
}

impl TransformOutcome {
  #[allow(dead_code)]
  pub fn is_applied(self) -> bool {
    matches!(self, TransformOutcome::Applied)
  }
}

/// A format-specific transformation engine
///
/// Instances are immutable: they carry their logger and options from
/// construction (see `engine::get_transformer`).
pub trait Transformer {
  /// Format this transformer handles
  fn kind(&self) -> TransformerKind;

  /// Whether this transformer can handle the given file
  #[allow(dead_code)]
  fn is_file_supported(&self, path: &Path) -> bool;

  /// Apply `transform` to `source`, writing `destination`
  ///
  /// `source` and `transform` must exist; the destination is not created or
  /// altered unless the whole transformation succeeds.
  fn transform(&self, source: &Path, transform: &Path, destination: &Path) -> ShiftResult<TransformOutcome>;

  /// Write a minimal skeleton transform file for `source`
  ///
  /// No-op when the target exists and `overwrite` is false. The skeleton is
  /// written in the source file's encoding.
  fn create_transform_file(&self, source: &Path, transform_to_create: &Path, overwrite: bool) -> ShiftResult<()>;
}
