//! # Workspaces
//!
//! A configuration workspace is the directory `<basedir>/<name>` that holds every
//! artifact generated for one handler configuration. Blueprint workspaces live
//! inside it, under `blueprints/<blueprint>`.
//!
//! ```text
//! <basedir>/<name>/
//!   handler-configuration.yaml
//!   inputs.yaml
//!   manager-blueprint/manager-blueprint.yaml
//!   .cloudify/{config.yaml,context}
//!   blueprints/<blueprint>/
//!     blueprint-configuration.yaml
//!     inputs.yaml
//!     blueprint/blueprint.yaml
//! ```
use crate::constants::{
    BLUEPRINT_CONFIGURATION_FILENAME, BLUEPRINT_DIR, BLUEPRINT_FILENAME, BLUEPRINTS_DIR,
    CLI_CONFIG_FILENAME, CLI_CONTEXT_FILENAME, CLI_WORKDIR, HANDLER_CONFIGURATION_FILENAME,
    INPUTS_FILENAME, MANAGER_BLUEPRINT_DIR, MANAGER_BLUEPRINT_FILENAME,
};
use crate::core::yaml_file::{self, YamlFileError};
use crate::models::{BlueprintConfiguration, HandlerConfiguration, Settings};
use serde_yaml::Mapping;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Could not {action} workspace directory '{path}': {source}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    File(#[from] YamlFileError),
}

/// Directory lifecycle shared by configuration and blueprint workspaces.
pub trait Workspace {
    fn dir(&self) -> &Path;

    /// True iff the directory is present on disk.
    fn exists(&self) -> bool {
        self.dir().is_dir()
    }

    /// Removes the directory and everything in it. Absent directories are fine.
    fn reset(&self) -> Result<(), WorkspaceError> {
        match fs::remove_dir_all(self.dir()) {
            Ok(()) => {
                log::info!("Removed workspace {}", self.dir().display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(WorkspaceError::Io {
                action: "remove",
                path: self.dir().display().to_string(),
                source,
            }),
        }
    }

    /// Creates the directory and its parents if missing.
    fn ensure(&self) -> Result<(), WorkspaceError> {
        fs::create_dir_all(self.dir()).map_err(|source| WorkspaceError::Io {
            action: "create",
            path: self.dir().display().to_string(),
            source,
        })
    }
}

/// The on-disk instance of one named handler configuration.
#[derive(Debug, Clone)]
pub struct ConfigurationWorkspace {
    name: String,
    dir: PathBuf,
}

impl ConfigurationWorkspace {
    /// The workspace of configuration `name` under the settings' base directory.
    pub fn new(name: &str, settings: &Settings) -> Self {
        Self::in_basedir(name, &settings.basedir)
    }

    /// The workspace of configuration `name` under `basedir`.
    pub fn in_basedir(name: &str, basedir: &Path) -> Self {
        Self {
            name: name.to_string(),
            dir: basedir.join(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler_configuration_path(&self) -> PathBuf {
        self.dir.join(HANDLER_CONFIGURATION_FILENAME)
    }

    pub fn inputs_path(&self) -> PathBuf {
        self.dir.join(INPUTS_FILENAME)
    }

    pub fn manager_blueprint_dir(&self) -> PathBuf {
        self.dir.join(MANAGER_BLUEPRINT_DIR)
    }

    pub fn manager_blueprint_path(&self) -> PathBuf {
        self.manager_blueprint_dir().join(MANAGER_BLUEPRINT_FILENAME)
    }

    pub fn cli_config_path(&self) -> PathBuf {
        self.dir.join(CLI_WORKDIR).join(CLI_CONFIG_FILENAME)
    }

    pub fn cli_context_path(&self) -> PathBuf {
        self.dir.join(CLI_WORKDIR).join(CLI_CONTEXT_FILENAME)
    }

    pub fn blueprints_dir(&self) -> PathBuf {
        self.dir.join(BLUEPRINTS_DIR)
    }

    /// The workspace of `blueprint` inside this configuration.
    pub fn blueprint(&self, blueprint: &str) -> BlueprintWorkspace {
        BlueprintWorkspace {
            name: blueprint.to_string(),
            dir: self.blueprints_dir().join(blueprint),
        }
    }

    /// The persisted handler configuration.
    pub fn handler_configuration(&self) -> Result<HandlerConfiguration, YamlFileError> {
        yaml_file::read_yaml(&self.handler_configuration_path())
    }

    /// Overwrites the whole handler configuration file.
    pub fn set_handler_configuration(
        &self,
        configuration: &HandlerConfiguration,
    ) -> Result<(), YamlFileError> {
        yaml_file::write_yaml(&self.handler_configuration_path(), configuration)
    }

    /// The `cfy` configuration of this workspace; empty when `cfy init` has not run.
    pub fn cli_config(&self) -> Result<Mapping, YamlFileError> {
        let path = self.cli_config_path();
        if !path.exists() {
            return Ok(Mapping::new());
        }
        let config: Option<Mapping> = yaml_file::read_yaml(&path)?;
        Ok(config.unwrap_or_default())
    }

    /// Overwrites the `cfy` configuration of this workspace.
    pub fn set_cli_config(&self, config: &Mapping) -> Result<(), YamlFileError> {
        yaml_file::write_yaml(&self.cli_config_path(), config)
    }

    /// The `properties` of the persisted handler configuration (empty if unset).
    pub fn properties(&self) -> Result<Mapping, YamlFileError> {
        Ok(self.handler_configuration()?.properties.unwrap_or_default())
    }
}

impl Workspace for ConfigurationWorkspace {
    fn dir(&self) -> &Path {
        &self.dir
    }
}

/// The on-disk instance of one blueprint, generated for a configuration.
#[derive(Debug, Clone)]
pub struct BlueprintWorkspace {
    name: String,
    dir: PathBuf,
}

impl BlueprintWorkspace {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs_path(&self) -> PathBuf {
        self.dir.join(INPUTS_FILENAME)
    }

    pub fn blueprint_dir(&self) -> PathBuf {
        self.dir.join(BLUEPRINT_DIR)
    }

    pub fn blueprint_path(&self) -> PathBuf {
        self.blueprint_dir().join(BLUEPRINT_FILENAME)
    }

    pub fn blueprint_configuration_path(&self) -> PathBuf {
        self.dir.join(BLUEPRINT_CONFIGURATION_FILENAME)
    }

    /// The persisted blueprint configuration.
    pub fn blueprint_configuration(&self) -> Result<BlueprintConfiguration, YamlFileError> {
        yaml_file::read_yaml(&self.blueprint_configuration_path())
    }

    /// Overwrites the whole blueprint configuration file.
    pub fn set_blueprint_configuration(
        &self,
        configuration: &BlueprintConfiguration,
    ) -> Result<(), YamlFileError> {
        yaml_file::write_yaml(&self.blueprint_configuration_path(), configuration)
    }
}

impl Workspace for BlueprintWorkspace {
    fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_is_idempotent() {
        let base = tempdir().unwrap();
        let workspace = ConfigurationWorkspace::in_basedir("conf", base.path());
        assert!(!workspace.exists());

        workspace.ensure().unwrap();
        workspace.ensure().unwrap();

        assert!(workspace.exists());
        let entries: Vec<_> = fs::read_dir(base.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let base = tempdir().unwrap();
        let workspace = ConfigurationWorkspace::in_basedir("conf", base.path());
        workspace.ensure().unwrap();
        fs::write(workspace.inputs_path(), "{}").unwrap();

        workspace.reset().unwrap();
        assert!(!workspace.exists());
        workspace.reset().unwrap();
    }

    #[test]
    fn test_handler_configuration_is_overwritten_wholesale() {
        let base = tempdir().unwrap();
        let workspace = ConfigurationWorkspace::in_basedir("conf", base.path());
        workspace.ensure().unwrap();

        let mut first = HandlerConfiguration {
            inputs: "a.yaml".to_string(),
            manager_blueprint: "b.yaml".to_string(),
            manager_ip: Some("10.0.0.1".to_string()),
            ..Default::default()
        };
        workspace.set_handler_configuration(&first).unwrap();

        first.manager_ip = None;
        workspace.set_handler_configuration(&first).unwrap();

        let read = workspace.handler_configuration().unwrap();
        assert_eq!(read, first);
        assert!(read.manager_ip.is_none());
    }

    #[test]
    fn test_path_accessors_are_fixed_joins() {
        let workspace = ConfigurationWorkspace::in_basedir("conf", Path::new("/work"));

        assert_eq!(workspace.dir(), Path::new("/work/conf"));
        assert_eq!(workspace.inputs_path(), PathBuf::from("/work/conf/inputs.yaml"));
        assert_eq!(
            workspace.manager_blueprint_path(),
            PathBuf::from("/work/conf/manager-blueprint/manager-blueprint.yaml")
        );
        assert_eq!(
            workspace.cli_config_path(),
            PathBuf::from("/work/conf/.cloudify/config.yaml")
        );

        let blueprint = workspace.blueprint("hello");
        assert_eq!(blueprint.name(), "hello");
        assert_eq!(
            blueprint.blueprint_path(),
            PathBuf::from("/work/conf/blueprints/hello/blueprint/blueprint.yaml")
        );
        assert_eq!(
            blueprint.inputs_path(),
            PathBuf::from("/work/conf/blueprints/hello/inputs.yaml")
        );
    }

    #[test]
    fn test_cli_config_defaults_to_empty() {
        let base = tempdir().unwrap();
        let workspace = ConfigurationWorkspace::in_basedir("conf", base.path());
        assert!(workspace.cli_config().unwrap().is_empty());

        let mut config = Mapping::new();
        config.insert(Value::from("colors"), Value::from(true));
        workspace.set_cli_config(&config).unwrap();
        assert_eq!(workspace.cli_config().unwrap(), config);
    }
}
