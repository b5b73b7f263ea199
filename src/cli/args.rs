// EN: src/cli/args.rs
use crate::constants::{
    DEFAULT_DEPLOY_TIMEOUT_SECS, DEFAULT_EVENTS_BATCH_SIZE, DEFAULT_EVENTS_TIMEOUT_SECS,
};
use clap::Parser;
use std::path::PathBuf;

/// Arguments of `init`.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Writes the systest settings file.")]
pub struct InitArgs {
    /// Directory that holds the generated configuration workspaces.
    #[arg(long)]
    pub basedir: Option<PathBuf>,

    /// The shared suites YAML.
    #[arg(long, alias = "main_suites_yaml")]
    pub main_suites_yaml: Option<PathBuf>,

    /// The user suites YAML, layered over the main one.
    #[arg(long, alias = "user_suites_yaml")]
    pub user_suites_yaml: Option<PathBuf>,

    /// The blueprints YAML. Defaults to the user suites YAML.
    #[arg(long, alias = "blueprints_yaml")]
    pub blueprints_yaml: Option<PathBuf>,

    /// Fail instead of prompting for missing values.
    #[arg(long, alias = "no_input")]
    pub no_input: bool,
}

/// Arguments of `generate`.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Generates a configuration workspace.")]
pub struct GenerateArgs {
    /// Name of the handler configuration.
    pub configuration: String,

    /// Remove the existing workspace first.
    #[arg(long, alias = "reset_config")]
    pub reset_config: bool,
}

/// Arguments of the commands that only take a configuration name.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct ConfigurationArgs {
    /// Name of the handler configuration.
    pub configuration: String,
}

/// Arguments of `bootstrap`.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Bootstraps the manager of a configuration.")]
pub struct BootstrapArgs {
    /// Name of the handler configuration.
    pub configuration: String,

    /// Regenerate the workspace from scratch before bootstrapping.
    #[arg(long, alias = "reset_config")]
    pub reset_config: bool,
}

/// Arguments of `generate-blueprint`.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Generates a blueprint workspace.")]
pub struct GenerateBlueprintArgs {
    /// Name of the handler configuration.
    pub configuration: String,
    /// Name of the blueprint, also used as its deployment id.
    pub blueprint: String,

    /// Remove the existing blueprint workspace first.
    #[arg(long)]
    pub reset: bool,
}

/// Arguments of `deploy`.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Uploads, creates and installs a blueprint.")]
pub struct DeployArgs {
    /// Name of the handler configuration.
    pub configuration: String,
    /// Name of the blueprint, also used as its deployment id.
    pub blueprint: String,

    /// Use the blueprint workspace as it is on disk.
    #[arg(long, alias = "skip_generation")]
    pub skip_generation: bool,

    /// Regenerate the blueprint workspace from scratch.
    #[arg(long)]
    pub reset: bool,

    /// Seconds to wait for the install workflow.
    #[arg(long, default_value_t = DEFAULT_DEPLOY_TIMEOUT_SECS)]
    pub timeout: u64,
}

/// Arguments of `undeploy`.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Uninstalls and deletes a deployed blueprint.")]
pub struct UndeployArgs {
    /// Name of the handler configuration.
    pub configuration: String,
    /// Name of the blueprint, also used as its deployment id.
    pub blueprint: String,

    /// Cancel the deployment's running executions first.
    #[arg(long, alias = "cancel_executions")]
    pub cancel_executions: bool,
}

/// Arguments of `events`.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Dumps the events of an execution as JSON.")]
pub struct EventsArgs {
    /// Name of the handler configuration.
    pub configuration: String,
    /// Id of the execution whose events are fetched.
    pub execution_id: String,

    /// File to write the events to. Defaults to stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Events requested per page.
    #[arg(long, alias = "batch_size", default_value_t = DEFAULT_EVENTS_BATCH_SIZE)]
    pub batch_size: usize,

    /// Include log records along with events.
    #[arg(long, alias = "include_logs")]
    pub include_logs: bool,

    /// Seconds to wait for the execution to end.
    #[arg(long, default_value_t = DEFAULT_EVENTS_TIMEOUT_SECS)]
    pub timeout: u64,
}
