// EN: src/cli/handlers/bootstrap.rs

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::Colorize;
use serde_yaml::Value;

use crate::{
    cli::args::BootstrapArgs,
    context::AppContext,
    core::{
        generator,
        workspace::{ConfigurationWorkspace, Workspace},
    },
    system::cfy::read_management_ip,
};

use super::commons;

/// The main handler for the `bootstrap` command.
///
/// Generates the workspace when missing (or when asked to reset), bootstraps
/// the manager with `cfy` and records the manager address it reports.
pub fn handle(args: Vec<String>, context: &AppContext) -> Result<()> {
    let bootstrap_args = BootstrapArgs::try_parse_from(&args)?;
    let settings = context.settings()?;
    let name = &bootstrap_args.configuration;

    let mut workspace = ConfigurationWorkspace::new(name, settings);
    if !workspace.exists() || bootstrap_args.reset_config {
        workspace = generator::generate_configuration(settings, name, bootstrap_args.reset_config)
            .with_context(|| format!("Could not generate configuration '{}'", name))?;
    }

    let cfy = commons::cfy(context, &workspace)?;
    cfy.init()?;

    let mut cli_config = workspace.cli_config()?;
    cli_config.insert(Value::from("colors"), Value::Bool(true));
    workspace.set_cli_config(&cli_config)?;

    cfy.bootstrap(&workspace.manager_blueprint_path(), &workspace.inputs_path())?;

    let manager_ip = read_management_ip(&workspace.cli_context_path())?.ok_or_else(|| {
        anyhow!(
            "Bootstrap finished but no manager address was found in '{}'.",
            workspace.cli_context_path().display()
        )
    })?;
    let mut handler_configuration = workspace.handler_configuration()?;
    handler_configuration.manager_ip = Some(manager_ip.clone());
    workspace.set_handler_configuration(&handler_configuration)?;

    log::info!("Configuration '{}' bootstrapped at {}", name, manager_ip);
    println!(
        "{} Manager of '{}' running at {}",
        "✔".green(),
        name.cyan(),
        manager_ip.yellow()
    );
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::cli::handlers::testing::{STUB_MANAGER_IP, Sandbox};
    use crate::core::settings::SettingsStore;

    #[test]
    fn test_bootstrap_generates_workspace_and_records_manager() {
        let sandbox = Sandbox::new();

        handle(vec!["conf".to_string()], &sandbox.context).unwrap();

        let workspace = sandbox.workspace();
        assert!(workspace.exists());
        assert_eq!(
            workspace.handler_configuration().unwrap().manager_ip.as_deref(),
            Some(STUB_MANAGER_IP)
        );
        assert_eq!(workspace.cli_config().unwrap().get("colors"), Some(&Value::Bool(true)));
        assert_eq!(
            sandbox.cfy_calls(),
            vec![
                "init".to_string(),
                format!(
                    "bootstrap --blueprint-path={} --inputs={}",
                    workspace.manager_blueprint_path().display(),
                    workspace.inputs_path().display()
                ),
            ]
        );
    }

    #[test]
    fn test_bootstrap_keeps_an_existing_workspace() {
        let sandbox = Sandbox::new();
        let workspace = sandbox.generated(None);
        std::fs::write(workspace.dir().join("notes.txt"), "kept").unwrap();

        handle(vec!["conf".to_string()], &sandbox.context).unwrap();

        assert!(workspace.dir().join("notes.txt").exists());
    }

    #[test]
    fn test_bootstrap_without_recorded_address_fails() {
        let sandbox = Sandbox::new();
        let context = AppContext::new(SettingsStore::at(sandbox.context.store().path())).with_cfy_command("true");

        let err = handle(vec!["conf".to_string()], &context).unwrap_err();

        assert!(err.to_string().contains("no manager address"));
        assert_eq!(sandbox.workspace().handler_configuration().unwrap().manager_ip, None);
    }
}
