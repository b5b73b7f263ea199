// EN: src/cli/handlers/status.rs

use anyhow::{Context, Result};
use clap::Parser;
use walkdir::WalkDir;

use crate::{
    cli::args::ConfigurationArgs,
    constants::{NO_BOOTSTRAP, NO_INIT},
    context::AppContext,
    core::workspace::{ConfigurationWorkspace, Workspace},
    system::manager_client::ManagerClient,
};

use super::commons;

/// The main handler for the `status` command.
pub fn handle(args: Vec<String>, context: &AppContext) -> Result<()> {
    let status_args = ConfigurationArgs::try_parse_from(&args)?;
    let workspace = ConfigurationWorkspace::new(&status_args.configuration, context.settings()?);
    println!("{}", status_line(&workspace, |ip| commons::connect(context, ip))?);
    Ok(())
}

/// The main handler for the `global-status` command.
/// Prints one `name: status` line per directory under the base directory.
pub fn handle_global(_args: Vec<String>, context: &AppContext) -> Result<()> {
    let settings = context.settings()?;
    for line in global_status_lines(&settings.basedir, |ip| commons::connect(context, ip))? {
        println!("{}", line);
    }
    Ok(())
}

/// Describes the state of a configuration's manager in one line.
///
/// Only connectivity failures are folded into the line; any other error
/// reaching the manager is returned.
pub fn status_line<F>(workspace: &ConfigurationWorkspace, connect: F) -> Result<String>
where
    F: Fn(&str) -> Result<Box<dyn ManagerClient>>,
{
    if !workspace.exists() || !workspace.handler_configuration_path().exists() {
        return Ok(NO_INIT.to_string());
    }
    let manager_ip = match workspace.handler_configuration()?.manager_ip {
        Some(ip) if !ip.trim().is_empty() => ip,
        _ => return Ok(NO_BOOTSTRAP.to_string()),
    };

    let client = connect(&manager_ip)?;
    match client.version() {
        Ok(version) => Ok(format!("[{}] Running ({})", manager_ip, version)),
        Err(e) if e.is_connectivity() => {
            log::debug!("Manager {} unreachable: {}", manager_ip, e);
            Ok(format!("[{}] Not reachable", manager_ip))
        }
        Err(e) => Err(e).with_context(|| format!("Could not query manager {}", manager_ip)),
    }
}

/// `name: status` for every workspace directory under `basedir`, sorted by name.
pub fn global_status_lines<F>(basedir: &std::path::Path, connect: F) -> Result<Vec<String>>
where
    F: Fn(&str) -> Result<Box<dyn ManagerClient>>,
{
    if !basedir.is_dir() {
        return Ok(Vec::new());
    }
    let mut lines = Vec::new();
    for entry in WalkDir::new(basedir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        let workspace = ConfigurationWorkspace::in_basedir(&name, basedir);
        lines.push(format!("{}: {}", name, status_line(&workspace, &connect)?));
    }
    Ok(lines)
}
