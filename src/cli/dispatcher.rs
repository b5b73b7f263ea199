// EN: src/cli/dispatcher.rs

use anyhow::{Result, anyhow};
use colored::Colorize;

use crate::{cli::handlers, context::AppContext};

/// Defines a command, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    summary: &'static str,
    handler: fn(Vec<String>, &AppContext) -> Result<()>,
}

/// The single source of truth for all commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "init",
        aliases: &[],
        summary: "Write the settings file",
        handler: handlers::init::handle,
    },
    CommandDefinition {
        name: "generate",
        aliases: &["gen"],
        summary: "Generate a configuration workspace",
        handler: handlers::generate::handle,
    },
    CommandDefinition {
        name: "status",
        aliases: &["st"],
        summary: "Show the manager status of a configuration",
        handler: handlers::status::handle,
    },
    CommandDefinition {
        name: "bootstrap",
        aliases: &[],
        summary: "Bootstrap the manager of a configuration",
        handler: handlers::bootstrap::handle,
    },
    CommandDefinition {
        name: "teardown",
        aliases: &[],
        summary: "Tear down the manager of a configuration",
        handler: handlers::teardown::handle,
    },
    CommandDefinition {
        name: "global-status",
        aliases: &["global_status", "gs"],
        summary: "Show the status of every configuration",
        handler: handlers::status::handle_global,
    },
    CommandDefinition {
        name: "generate-blueprint",
        aliases: &["generate_blueprint", "genbp"],
        summary: "Generate a blueprint workspace",
        handler: handlers::generate::handle_blueprint,
    },
    CommandDefinition {
        name: "deploy",
        aliases: &[],
        summary: "Upload, create and install a blueprint",
        handler: handlers::deploy::handle,
    },
    CommandDefinition {
        name: "undeploy",
        aliases: &[],
        summary: "Uninstall and delete a deployed blueprint",
        handler: handlers::deploy::handle_undeploy,
    },
    CommandDefinition {
        name: "cleanup",
        aliases: &[],
        summary: "Force a teardown, generating a temporary workspace if needed",
        handler: handlers::teardown::handle_cleanup,
    },
    CommandDefinition {
        name: "events",
        aliases: &[],
        summary: "Dump the events of an execution as JSON",
        handler: handlers::events::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// The command listing shown when no command is given.
pub fn commands_overview() -> String {
    let width = COMMAND_REGISTRY
        .iter()
        .map(|cmd| cmd.name.len())
        .max()
        .unwrap_or(0);
    COMMAND_REGISTRY
        .iter()
        .map(|cmd| {
            let name = format!("{:<width$}", cmd.name, width = width);
            format!("  {}  {}", name.cyan(), cmd.summary)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Routes `systest <command> [args...]` to the command's handler.
pub fn dispatch(all_args: Vec<String>, context: &AppContext) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let Some((name, rest)) = all_args.split_first() else {
        println!("{}\n\n{}", "Commands:".yellow().bold(), commands_overview());
        return Ok(());
    };

    let command = find_command(name)
        .ok_or_else(|| anyhow!("Unknown command '{}'. Run `systest` to list commands.", name))?;
    (command.handler)(rest.to_vec(), context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::SettingsStore;
    use tempfile::tempdir;

    #[test]
    fn test_aliases_resolve_to_their_command() {
        assert_eq!(find_command("gs").map(|c| c.name), Some("global-status"));
        assert_eq!(find_command("global_status").map(|c| c.name), Some("global-status"));
        assert_eq!(find_command("generate").map(|c| c.name), Some("generate"));
        assert!(find_command("overview").is_none());
    }

    #[test]
    fn test_names_and_aliases_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for cmd in COMMAND_REGISTRY {
            assert!(seen.insert(cmd.name), "duplicate {}", cmd.name);
            for alias in cmd.aliases {
                assert!(seen.insert(*alias), "duplicate {}", alias);
            }
        }
    }

    #[test]
    fn test_unknown_command_is_an_error() {
        let dir = tempdir().unwrap();
        let context = AppContext::new(SettingsStore::at(dir.path().join("settings")));
        let err = dispatch(vec!["frobnicate".to_string()], &context).unwrap_err();
        assert!(err.to_string().contains("frobnicate"));
    }

    #[test]
    fn test_commands_need_settings() {
        let dir = tempdir().unwrap();
        let context = AppContext::new(SettingsStore::at(dir.path().join("settings")));
        let err = dispatch(vec!["status".to_string(), "conf".to_string()], &context).unwrap_err();
        assert!(err.to_string().contains("Not initialized"));
    }
}
