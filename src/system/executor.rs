// EN: src/system/executor.rs

use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Could not split command line '{0}' into arguments.")]
    InvalidCommandLine(String),
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{command}' exited with a non-zero status ({status}).")]
    NonZeroExitStatus { command: String, status: String },
}

/// Renders a program and its arguments the way a shell user would type them.
pub fn render_command_line(program: &str, args: &[String]) -> String {
    let parts = std::iter::once(program).chain(args.iter().map(String::as_str));
    shlex::try_join(parts).unwrap_or_else(|_| {
        std::iter::once(program.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    })
}

/// Runs `program` with `args` in `cwd` and waits for it to finish.
///
/// Output goes straight to the user's terminal. A non-zero exit is an error;
/// nothing is retried.
pub fn execute_command(program: &str, args: &[String], cwd: &Path) -> Result<(), ExecutionError> {
    if program.trim().is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }

    let command_line = render_command_line(program, args);
    let clean_cwd = dunce::simplified(cwd);
    log::debug!("Executing '{}' in {}", command_line, clean_cwd.display());

    let status = StdCommand::new(program)
        .args(args)
        .current_dir(clean_cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?;

    if !status.success() {
        return Err(ExecutionError::NonZeroExitStatus {
            command: command_line,
            status: status.to_string(),
        });
    }
    Ok(())
}
