//! Core types for running a single SQL migration against a hosted database
//!
//! This crate knows nothing about HTTP or configuration. It owns the
//! migration text, the preview shown to the operator, and the executor
//! seam every backend implements.

pub mod executor;
pub mod migration;

pub use executor::*;
pub use migration::*;
