// EN: src/cli/handlers/commons.rs

// Shared helpers for the configuration-scoped handlers.

use anyhow::{Context, Result, anyhow};
use colored::Colorize;

use crate::{
    constants::{NO_BOOTSTRAP, NO_INIT},
    context::AppContext,
    core::workspace::{ConfigurationWorkspace, Workspace},
    system::{cfy::Cfy, manager_client::ManagerClient},
};

/// Opens the workspace of `name`, or prints `Not initialized` and returns
/// `None` when it has not been generated yet.
pub fn existing_workspace(context: &AppContext, name: &str) -> Result<Option<ConfigurationWorkspace>> {
    let workspace = ConfigurationWorkspace::new(name, context.settings()?);
    if !workspace.exists() {
        println!("{}", NO_INIT.yellow());
        return Ok(None);
    }
    Ok(Some(workspace))
}

/// A `cfy` runner working inside the workspace directory.
pub fn cfy(context: &AppContext, workspace: &ConfigurationWorkspace) -> Result<Cfy> {
    Cfy::from_command_line(context.cfy_command(), workspace.dir())
        .with_context(|| format!("Invalid cfy command '{}'", context.cfy_command()))
}

/// Builds the client for a manager address.
pub fn connect(context: &AppContext, manager_ip: &str) -> Result<Box<dyn ManagerClient>> {
    context
        .connect(manager_ip)
        .with_context(|| format!("Could not create a client for manager '{}'", manager_ip))
}

/// The client of a bootstrapped configuration.
pub fn manager_client(
    context: &AppContext,
    workspace: &ConfigurationWorkspace,
) -> Result<Box<dyn ManagerClient>> {
    let configuration = workspace.handler_configuration()?;
    let manager_ip = configuration
        .manager_ip
        .filter(|ip| !ip.trim().is_empty())
        .ok_or_else(|| anyhow!("{}: configuration '{}' has no manager.", NO_BOOTSTRAP, workspace.name()))?;
    connect(context, &manager_ip)
}
