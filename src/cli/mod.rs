// EN: src/cli/mod.rs

use clap::Parser;

/// Per-command argument structs.
pub mod args;
/// The command registry and routing.
pub mod dispatcher;
/// One handler per command.
pub mod handlers;

const HELP_TEMPLATE: &str = "\
<title>systest</title> <dim>{version}</dim>
{about}

<title>Usage:</title> <cmd>systest</cmd> <hl><command></hl> [args...]

<group>Settings</group>
  <cmd>init</cmd>                 Write the settings file
<group>Configurations</group>
  <cmd>generate</cmd>             Generate a configuration workspace
  <cmd>status</cmd>               Show the manager status of a configuration
  <cmd>global-status</cmd>        Show the status of every configuration
  <cmd>bootstrap</cmd>            Bootstrap the manager of a configuration
  <err>teardown</err>             Tear down the manager of a configuration
  <err>cleanup</err>              Force a teardown of a configuration
<group>Blueprints</group>
  <cmd>generate-blueprint</cmd>   Generate a blueprint workspace
  <cmd>deploy</cmd>               Upload, create and install a blueprint
  <err>undeploy</err>             Uninstall and delete a deployed blueprint
  <cmd>events</cmd>               Dump the events of an execution as JSON

Run <cmd>systest</cmd> <hl><command></hl> <cmd>--help</cmd> for the options of a command.
";

/// Builds the color-aware help string at runtime.
fn build_help_string() -> &'static str {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let hl = if use_colors { "\x1b[1;36m" } else { "" }; // Bold Cyan
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let group = if use_colors { "\x1b[1;32m" } else { "" }; // Bold Green
    let err = if use_colors { "\x1b[91m" } else { "" }; // Bright Red (destructive)
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = HELP_TEMPLATE
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<err>", err)
        .replace("</err>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// systest: drives deployment-manager system tests from YAML suites.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = build_help_string(),
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The command followed by its own arguments, parsed by its handler.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// The message printed for a failed command: the error followed by each of
/// its causes, so a handler's context never hides the underlying failure.
pub fn error_message(error: &anyhow::Error) -> String {
    format!("{:#}", error)
}
