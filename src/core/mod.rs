// src/core/mod.rs

/// Cancelling a deployment's running executions.
pub mod cancellation;
/// Layering the suites and blueprints documents.
pub mod config_resolver;
/// Materializing configuration and blueprint workspaces.
pub mod generator;
/// `{{ name }}` substitution against a variable mapping.
pub mod interpolator;
/// Home expansion and path normalization.
pub mod paths;
/// The persisted settings file.
pub mod settings;
/// On-disk layout of the generated workspaces.
pub mod workspace;
/// Reading and writing YAML files.
pub mod yaml_file;
/// Dotted-path overrides applied to YAML files.
pub mod yaml_patcher;
