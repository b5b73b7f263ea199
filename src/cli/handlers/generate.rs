// EN: src/cli/handlers/generate.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::args::{GenerateArgs, GenerateBlueprintArgs},
    context::AppContext,
    core::{generator, workspace::Workspace},
};

use super::commons;

/// The main handler for the `generate` command.
pub fn handle(args: Vec<String>, context: &AppContext) -> Result<()> {
    let generate_args = GenerateArgs::try_parse_from(&args)?;
    let settings = context.settings()?;

    let workspace = generator::generate_configuration(
        settings,
        &generate_args.configuration,
        generate_args.reset_config,
    )
    .with_context(|| format!("Could not generate configuration '{}'", generate_args.configuration))?;

    println!(
        "{} Configuration '{}' generated in {}",
        "✔".green(),
        workspace.name().cyan(),
        workspace.dir().display()
    );
    Ok(())
}

/// The main handler for the `generate-blueprint` command.
pub fn handle_blueprint(args: Vec<String>, context: &AppContext) -> Result<()> {
    let blueprint_args = GenerateBlueprintArgs::try_parse_from(&args)?;
    let Some(workspace) = commons::existing_workspace(context, &blueprint_args.configuration)? else {
        return Ok(());
    };

    let blueprint = generator::generate_blueprint(
        context.settings()?,
        &workspace,
        &blueprint_args.blueprint,
        blueprint_args.reset,
    )
    .with_context(|| format!("Could not generate blueprint '{}'", blueprint_args.blueprint))?;

    println!(
        "{} Blueprint '{}' generated in {}",
        "✔".green(),
        blueprint.name().cyan(),
        blueprint.dir().display()
    );
    Ok(())
}
