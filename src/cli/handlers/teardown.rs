// EN: src/cli/handlers/teardown.rs

use anyhow::{Context, Result};
use clap::Parser;
use scopeguard::defer;

use crate::{
    cli::args::ConfigurationArgs,
    context::AppContext,
    core::{
        generator,
        workspace::{ConfigurationWorkspace, Workspace},
    },
};

use super::commons;

/// The main handler for the `teardown` command.
pub fn handle(args: Vec<String>, context: &AppContext) -> Result<()> {
    let teardown_args = ConfigurationArgs::try_parse_from(&args)?;
    let Some(workspace) = commons::existing_workspace(context, &teardown_args.configuration)? else {
        return Ok(());
    };
    commons::cfy(context, &workspace)?.teardown(true, true)?;
    Ok(())
}

/// The main handler for the `cleanup` command.
///
/// Tears down whatever the configuration left behind. A workspace generated
/// only for this purpose is removed afterwards, whether the teardown worked
/// or not.
pub fn handle_cleanup(args: Vec<String>, context: &AppContext) -> Result<()> {
    let cleanup_args = ConfigurationArgs::try_parse_from(&args)?;
    let settings = context.settings()?;
    let name = &cleanup_args.configuration;

    let workspace = ConfigurationWorkspace::new(name, settings);
    let temporary = !workspace.exists();
    defer! {
        if temporary {
            if let Err(e) = workspace.reset() {
                log::warn!("Could not remove temporary workspace: {}", e);
            }
        }
    }

    if temporary {
        log::info!("Generating a temporary workspace for '{}'", name);
        generator::generate_configuration(settings, name, false)
            .with_context(|| format!("Could not generate configuration '{}'", name))?;
    }

    commons::cfy(context, &workspace)?.teardown(true, true)?;
    Ok(())
}
