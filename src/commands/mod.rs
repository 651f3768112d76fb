//! CLI commands for cfgshift
//!
//! This module contains all user-facing command implementations:
//!
//! ## Setup & Inspection
//! - **init**: Initialize cfgshift.toml for a project
//! - **doctor**: Run health checks and validation
//! - **status**: Show transform coverage per entry and configuration
//! - **resolve**: List the transform files of a base document
//!
//! ## Transformation
//! - **create**: Generate skeleton transform files
//! - **apply**: Apply transformations (one-shot or configured batch)
//!
//! Commands accept `&ProjectContext` to avoid redundant config loads.

pub mod apply;
pub mod create;
pub mod doctor;
pub mod init;
pub mod resolve;
pub mod status;

pub use apply::{run_apply, run_apply_explicit};
pub use create::run_create;
pub use doctor::run_doctor;
pub use init::run_init;
pub use resolve::run_resolve;
pub use status::run_status;
