// src/constants.rs

/// Environment variable that overrides the location of the settings file.
pub const SETTINGS_ENV_VAR: &str = "SYSTEST_SETTINGS";

/// Default location of the settings file, before home expansion.
pub const DEFAULT_SETTINGS_PATH: &str = "~/.cloudify-systest";

/// Environment variable that overrides the orchestration CLI executable.
pub const CFY_PROGRAM_ENV_VAR: &str = "SYSTEST_CFY";

/// The orchestration CLI executable used when no override is set.
pub const DEFAULT_CFY_PROGRAM: &str = "cfy";

/// The persisted handler configuration of a configuration workspace.
pub const HANDLER_CONFIGURATION_FILENAME: &str = "handler-configuration.yaml";

/// The persisted blueprint configuration of a blueprint workspace.
pub const BLUEPRINT_CONFIGURATION_FILENAME: &str = "blueprint-configuration.yaml";

/// Generated inputs file, shared name for configurations and blueprints.
pub const INPUTS_FILENAME: &str = "inputs.yaml";

/// Directory of a workspace holding the copied manager blueprint.
pub const MANAGER_BLUEPRINT_DIR: &str = "manager-blueprint";
/// Name the manager blueprint file is renamed to once copied.
pub const MANAGER_BLUEPRINT_FILENAME: &str = "manager-blueprint.yaml";

/// Directory of a configuration workspace holding its blueprint workspaces.
pub const BLUEPRINTS_DIR: &str = "blueprints";
/// Directory of a blueprint workspace holding the copied blueprint.
pub const BLUEPRINT_DIR: &str = "blueprint";
/// Name the application blueprint file is renamed to once copied.
pub const BLUEPRINT_FILENAME: &str = "blueprint.yaml";

/// Working-directory state written by `cfy init` (inside a workspace).
pub const CLI_WORKDIR: &str = ".cloudify";
/// `cfy` settings, including `colors`.
pub const CLI_CONFIG_FILENAME: &str = "config.yaml";
/// Where `cfy bootstrap` records the management address.
pub const CLI_CONTEXT_FILENAME: &str = "context";

/// Message returned by configuration-scoped commands when the workspace is missing.
pub const NO_INIT: &str = "Not initialized";

/// Message returned by `status` when the configuration has no manager yet.
pub const NO_BOOTSTRAP: &str = "Not bootstrapped";

/// How many times an execution is re-read while waiting for it to be cancelled.
pub const CANCEL_POLL_LIMIT: u32 = 3;

/// Pause between two reads of an execution being cancelled, in milliseconds.
pub const CANCEL_POLL_INTERVAL_MS: u64 = 1000;

/// Pause between two empty event pages, in milliseconds.
pub const EVENTS_POLL_INTERVAL_MS: u64 = 1000;

/// Seconds `deploy` lets the install workflow run.
pub const DEFAULT_DEPLOY_TIMEOUT_SECS: u64 = 1800;
/// Seconds `events` waits for an execution to end.
pub const DEFAULT_EVENTS_TIMEOUT_SECS: u64 = 3600;
/// Events requested per page.
pub const DEFAULT_EVENTS_BATCH_SIZE: usize = 1000;
