// EN: src/cli/handlers/init.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::PathBuf;

use crate::{cli::args::InitArgs, context::AppContext};

/// The main handler for the `init` command.
/// Writes the settings file that every other command reads.
pub fn handle(args: Vec<String>, context: &AppContext) -> Result<()> {
    let init_args = InitArgs::try_parse_from(&args)?;
    let is_interactive = !init_args.no_input;

    let basedir = resolve_path(init_args.basedir, "basedir", "Base directory", is_interactive)?;
    let main_suites_yaml = resolve_path(
        init_args.main_suites_yaml,
        "main-suites-yaml",
        "Main suites YAML",
        is_interactive,
    )?;
    let user_suites_yaml = resolve_path(
        init_args.user_suites_yaml,
        "user-suites-yaml",
        "User suites YAML",
        is_interactive,
    )?;

    let settings = context.store().write(
        &basedir,
        &main_suites_yaml,
        &user_suites_yaml,
        init_args.blueprints_yaml.as_deref(),
    )?;

    println!(
        "\n{} Settings written to {}",
        "✔".green(),
        context.store().path().display().to_string().cyan()
    );
    println!("  basedir:          {}", settings.basedir.display());
    println!("  main suites:      {}", settings.main_suites_yaml.display());
    println!("  user suites:      {}", settings.user_suites_yaml.display());
    println!("  blueprints:       {}", settings.blueprints_yaml.display());
    Ok(())
}

/// Takes the value from its flag, prompting for it when missing and allowed to.
fn resolve_path(
    value: Option<PathBuf>,
    flag: &str,
    prompt: &str,
    is_interactive: bool,
) -> Result<PathBuf> {
    if let Some(path) = value {
        return Ok(path);
    }
    if !is_interactive {
        return Err(anyhow!("Missing required option '--{}'.", flag));
    }
    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .validate_with(|raw: &String| -> Result<(), &str> {
            if raw.trim().is_empty() {
                Err("A path is required.")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(PathBuf::from(input.trim()))
}
