// EN: src/system/cfy.rs

// Typed front-end over the `cfy` orchestration CLI. Every call blocks until
// the subprocess exits; its exit semantics are owned by `cfy` itself.

use crate::core::yaml_file::{self, YamlFileError};
use crate::system::executor::{self, ExecutionError};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// One `cfy` call: a subcommand path plus keyword arguments.
///
/// Keywords render as `--kebab-name=value`; boolean keywords render as a bare
/// `--flag` when true and are omitted when false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    subcommand: Vec<String>,
    args: Vec<String>,
}

impl Invocation {
    /// An invocation of `subcommand` without keywords.
    pub fn new(subcommand: &[&str]) -> Self {
        Self {
            subcommand: subcommand.iter().map(|s| s.to_string()).collect(),
            args: Vec::new(),
        }
    }

    /// Appends `--name=value`, with underscores in `name` turned into dashes.
    pub fn option(mut self, name: &str, value: impl ToString) -> Self {
        self.args
            .push(format!("--{}={}", kebab(name), value.to_string()));
        self
    }

    /// Like [`Self::option`], for a filesystem path.
    pub fn path(self, name: &str, value: &Path) -> Self {
        let rendered = value.display().to_string();
        self.option(name, rendered)
    }

    /// Appends a bare `--name` when `enabled`, nothing otherwise.
    pub fn flag(mut self, name: &str, enabled: bool) -> Self {
        if enabled {
            self.args.push(format!("--{}", kebab(name)));
        }
        self
    }

    /// The full argument vector, subcommand first.
    pub fn to_args(&self) -> Vec<String> {
        self.subcommand.iter().chain(&self.args).cloned().collect()
    }
}

fn kebab(name: &str) -> String {
    name.replace('_', "-")
}

/// Runs `cfy` operations from inside a workspace directory.
#[derive(Debug, Clone)]
pub struct Cfy {
    program: String,
    leading_args: Vec<String>,
    cwd: PathBuf,
}

impl Cfy {
    /// A runner for a shell-style command line such as `cfy` or
    /// `python -m cloudify_cli`. Words after the first are passed before
    /// every subcommand.
    pub fn from_command_line(command_line: &str, cwd: &Path) -> Result<Self, ExecutionError> {
        let mut words = shlex::split(command_line)
            .ok_or_else(|| ExecutionError::InvalidCommandLine(command_line.to_string()))?
            .into_iter();
        let program = words.next().ok_or(ExecutionError::EmptyCommand)?;
        Ok(Self {
            program,
            leading_args: words.collect(),
            cwd: cwd.to_path_buf(),
        })
    }

    /// Runs `invocation` and waits for `cfy` to exit.
    pub fn run(&self, invocation: &Invocation) -> Result<(), ExecutionError> {
        let args: Vec<String> = self
            .leading_args
            .iter()
            .cloned()
            .chain(invocation.to_args())
            .collect();
        executor::execute_command(&self.program, &args, &self.cwd)
    }

    /// `cfy init`
    pub fn init(&self) -> Result<(), ExecutionError> {
        self.run(&Invocation::new(&["init"]))
    }

    /// `cfy bootstrap`
    pub fn bootstrap(&self, blueprint_path: &Path, inputs: &Path) -> Result<(), ExecutionError> {
        self.run(
            &Invocation::new(&["bootstrap"])
                .path("blueprint_path", blueprint_path)
                .path("inputs", inputs),
        )
    }

    /// `cfy teardown`
    pub fn teardown(&self, force: bool, ignore_deployments: bool) -> Result<(), ExecutionError> {
        self.run(
            &Invocation::new(&["teardown"])
                .flag("force", force)
                .flag("ignore_deployments", ignore_deployments),
        )
    }

    /// `cfy blueprints upload`
    pub fn blueprints_upload(
        &self,
        blueprint_path: &Path,
        blueprint_id: &str,
    ) -> Result<(), ExecutionError> {
        self.run(
            &Invocation::new(&["blueprints", "upload"])
                .path("blueprint_path", blueprint_path)
                .option("blueprint_id", blueprint_id),
        )
    }

    /// `cfy deployments create`
    pub fn deployments_create(
        &self,
        blueprint_id: &str,
        deployment_id: &str,
        inputs: &Path,
    ) -> Result<(), ExecutionError> {
        self.run(
            &Invocation::new(&["deployments", "create"])
                .option("blueprint_id", blueprint_id)
                .option("deployment_id", deployment_id)
                .path("inputs", inputs),
        )
    }

    /// Starts `workflow` on `deployment_id`. A timeout, when given, is passed to `cfy` as-is.
    pub fn executions_start(
        &self,
        workflow: &str,
        deployment_id: &str,
        include_logs: bool,
        timeout_secs: Option<u64>,
    ) -> Result<(), ExecutionError> {
        let mut invocation = Invocation::new(&["executions", "start"])
            .option("workflow", workflow)
            .option("deployment_id", deployment_id)
            .flag("include_logs", include_logs);
        if let Some(timeout) = timeout_secs {
            invocation = invocation.option("timeout", timeout);
        }
        self.run(&invocation)
    }

    /// `cfy deployments delete`
    pub fn deployments_delete(
        &self,
        deployment_id: &str,
        ignore_live_nodes: bool,
    ) -> Result<(), ExecutionError> {
        self.run(
            &Invocation::new(&["deployments", "delete"])
                .option("deployment_id", deployment_id)
                .flag("ignore_live_nodes", ignore_live_nodes),
        )
    }

    /// `cfy blueprints delete`
    pub fn blueprints_delete(&self, blueprint_id: &str) -> Result<(), ExecutionError> {
        self.run(&Invocation::new(&["blueprints", "delete"]).option("blueprint_id", blueprint_id))
    }
}

/// Reads the management server address that `cfy bootstrap` recorded in the
/// working-directory context file.
pub fn read_management_ip(context_path: &Path) -> Result<Option<String>, YamlFileError> {
    if !context_path.exists() {
        return Ok(None);
    }
    let context: Value = yaml_file::read_yaml(context_path)?;
    Ok(find_management_ip(&context))
}

fn find_management_ip(value: &Value) -> Option<String> {
    match value {
        Value::Tagged(tagged) => find_management_ip(&tagged.value),
        Value::Mapping(mapping) => ["_management_ip", "management_ip", "management_server"]
            .iter()
            .find_map(|key| mapping.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}
