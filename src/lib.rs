//! # systest
//!
//! Drives deployment-manager system tests from YAML suites and blueprints:
//! it resolves layered configuration, materializes per-configuration
//! workspaces and delegates the heavy lifting to the `cfy` CLI and the
//! manager's REST API.

/// Argument parsing, dispatch and command handlers.
pub mod cli;
/// File names, environment variables and defaults.
pub mod constants;
/// Per-invocation state shared by the handlers.
pub mod context;
/// Configuration resolution and workspace generation.
pub mod core;
/// Serde models of the YAML documents and manager resources.
pub mod models;
/// Child processes and the manager REST API.
pub mod system;
