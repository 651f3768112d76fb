//! Core building blocks for cfgshift operations
//!
//! This module contains the fundamental pieces shared by all commands:
//!
//! - **config**: cfgshift.toml parsing and validation
//! - **context**: unified project context built once and passed everywhere
//! - **encoding**: BOM-based text encoding detection and conversion
//! - **error**: error types with contextual help messages and exit codes

pub mod config;
pub mod context;
pub mod encoding;
pub mod error;
