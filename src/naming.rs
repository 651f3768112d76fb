//! File-name based transform matching
//!
//! The naming convention `Name.Cfg.ext` is the only thing relating a base
//! configuration file to its transforms: `App.Debug.config` is the Debug
//! transform of `App.config`. These predicates decide whether a candidate
//! file name is a transform of a base document, and for configuration-aware
//! matching, which build configuration it targets.
//!
//! All matching is case-insensitive, on both the base-name prefix and the
//! configuration comparison, matching file-system and build-configuration
//! conventions. The predicates never fail: missing or degenerate input
//! degrades to `false`.
//!
//! Name splitting uses last-dot semantics via plain string operations rather
//! than `std::path`, so `.config` splits to an empty stem plus `config` and
//! extensionless names behave identically on every platform.

/// Split a file name into (stem, extension) at the last dot
///
/// `App.Debug.config` -> (`App.Debug`, `config`); `App` -> (`App`, ``);
/// `.config` -> (``, `config`).
fn split_name(name: &str) -> (&str, &str) {
  match name.rfind('.') {
    Some(pos) => (&name[..pos], &name[pos + 1..]),
    None => (name, ""),
  }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
  a.to_lowercase() == b.to_lowercase()
}

/// The configuration-identifying substring between a base file's name and its
/// extension in a transform file's name
///
/// Returns `None` when `transform_name` cannot be a transform of
/// `document_name`: empty input, differing extensions, candidate not starting
/// with the document stem plus a dot, or an empty remainder. The infix is
/// returned in its original casing.
pub fn transform_infix<'a>(document_name: &str, transform_name: &'a str) -> Option<&'a str> {
  if document_name.is_empty() || transform_name.is_empty() {
    return None;
  }

  let (doc_stem, doc_ext) = split_name(document_name);
  let (candidate_stem, candidate_ext) = split_name(transform_name);

  if !eq_ignore_case(doc_ext, candidate_ext) {
    return None;
  }

  // The candidate stem must extend the document stem by ".<infix>"
  let prefix_len = doc_stem.len() + 1;
  if candidate_stem.len() <= prefix_len || !candidate_stem.is_char_boundary(doc_stem.len()) {
    return None;
  }
  if !eq_ignore_case(&candidate_stem[..doc_stem.len()], doc_stem) {
    return None;
  }
  if candidate_stem.as_bytes()[doc_stem.len()] != b'.' {
    return None;
  }

  let infix = &candidate_stem[prefix_len..];
  // Degenerate split: stripping the prefix left the stem unchanged
  if infix.is_empty() || eq_ignore_case(infix, candidate_stem) {
    return None;
  }

  Some(infix)
}

/// Whether `transform_name` is a transform of `document_name` for ANY
/// configuration: extensions match and a non-trivial infix exists
pub fn is_generic_transform(document_name: &str, transform_name: &str) -> bool {
  transform_infix(document_name, transform_name).is_some()
}

/// Whether `transform_name` is the transform of `document_name` for one of
/// the given build configurations
///
/// The infix must equal a configuration name case-insensitively as a whole
/// string. Configurations may themselves contain dots (`Debug.Test`), so the
/// comparison is never segment-by-segment: infix `Debug.Test` matches
/// configuration `Debug.Test`, but `Test.Debug` and `Debug.Test.Release` do
/// not.
pub fn is_transform_for_configuration<S: AsRef<str>>(
  document_name: &str,
  transform_name: &str,
  configurations: &[S],
) -> bool {
  if configurations.is_empty() {
    return false;
  }

  match transform_infix(document_name, transform_name) {
    Some(infix) => configurations.iter().any(|cfg| eq_ignore_case(cfg.as_ref(), infix)),
    None => false,
  }
}

/// Conventional transform file name for a document under a configuration:
/// `App.config` + `Debug` -> `App.Debug.config`
pub fn transform_name_for(document_name: &str, configuration: &str) -> String {
  let (stem, ext) = split_name(document_name);
  if ext.is_empty() {
    format!("{}.{}", stem, configuration)
  } else {
    format!("{}.{}.{}", stem, configuration, ext)
  }
}
