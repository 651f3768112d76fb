//! Health checks and validation infrastructure
//!
//! This module provides a unified interface for running project diagnostics.
//! All checks implement the `Check` trait, making it easy to add new checks
//! without modifying core logic.
//!
//! # Built-in Checks
//!
//! - **config-validity**: cfgshift.toml exists, parses and is valid
//! - **sources-exist**: every configured base file is on disk
//! - **formats-supported**: every base file classifies as XML, JSON or INI
//! - **orphan-transforms**: transform-named files matching no configuration

mod config_valid;
mod formats;
mod orphans;
mod runner;
mod sources;
mod trait_def;

// Re-export public API
pub use runner::create_default_runner;
pub use trait_def::{CheckContext, CheckResult, Severity};

// Individual checks are not exported - they're registered in create_default_runner()
// This keeps the API simple and prevents misuse
