// src/context.rs

use std::env;
use std::fmt;

use crate::constants::{CFY_PROGRAM_ENV_VAR, DEFAULT_CFY_PROGRAM};
use crate::core::settings::{SettingsError, SettingsStore};
use crate::models::Settings;
use crate::system::manager_client::{ClientError, ManagerClient, RestManagerClient};

/// Builds a manager client for a manager address.
pub type Connector = Box<dyn Fn(&str) -> Result<Box<dyn ManagerClient>, ClientError>>;

/// Per-invocation state handed to every command handler.
///
/// Settings are read lazily on first use and cached for the rest of the run.
/// The `cfy` command line and the way manager clients are built are carried
/// here so handlers never reach for them on their own.
pub struct AppContext {
    store: SettingsStore,
    cfy_command: String,
    connector: Connector,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("store", &self.store)
            .field("cfy_command", &self.cfy_command)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// A context running plain `cfy` and talking REST to managers.
    pub fn new(store: SettingsStore) -> Self {
        Self {
            store,
            cfy_command: DEFAULT_CFY_PROGRAM.to_string(),
            connector: Box::new(|manager_ip: &str| {
                RestManagerClient::new(manager_ip)
                    .map(|client| Box::new(client) as Box<dyn ManagerClient>)
            }),
        }
    }

    /// A context over the settings file named by `SYSTEST_SETTINGS`, or the
    /// default one, running the `cfy` command line named by `SYSTEST_CFY`.
    pub fn from_env() -> Result<Self, SettingsError> {
        let context = Self::new(SettingsStore::from_env()?);
        match env::var(CFY_PROGRAM_ENV_VAR) {
            Ok(command) if !command.trim().is_empty() => Ok(context.with_cfy_command(command)),
            _ => Ok(context),
        }
    }

    /// Runs `cfy` through `command` instead, split like a shell would.
    pub fn with_cfy_command(mut self, command: impl Into<String>) -> Self {
        self.cfy_command = command.into();
        self
    }

    /// Builds manager clients with `connector` instead of over REST.
    pub fn with_connector<F>(mut self, connector: F) -> Self
    where
        F: Fn(&str) -> Result<Box<dyn ManagerClient>, ClientError> + 'static,
    {
        self.connector = Box::new(connector);
        self
    }

    /// The settings file backing this context.
    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// The settings, read on first use.
    pub fn settings(&self) -> Result<&Settings, SettingsError> {
        self.store.load()
    }

    /// The shell-style command line that runs `cfy`.
    pub fn cfy_command(&self) -> &str {
        &self.cfy_command
    }

    /// A manager client for `manager_ip`.
    pub fn connect(&self, manager_ip: &str) -> Result<Box<dyn ManagerClient>, ClientError> {
        (self.connector)(manager_ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::manager_client::testing::FakeManager;
    use std::path::Path;

    #[test]
    fn test_defaults_run_plain_cfy() {
        let context = AppContext::new(SettingsStore::at(Path::new("/nowhere/settings")));
        assert_eq!(context.cfy_command(), "cfy");
        assert!(format!("{context:?}").contains("cfy_command"));
    }

    #[test]
    fn test_connector_can_be_replaced() {
        let context = AppContext::new(SettingsStore::at(Path::new("/nowhere/settings")))
            .with_cfy_command("sh stub.sh")
            .with_connector(|_| {
                Ok(Box::new(FakeManager {
                    version: Some("3.4".to_string()),
                    ..Default::default()
                }))
            });

        assert_eq!(context.cfy_command(), "sh stub.sh");
        assert_eq!(context.connect("10.0.0.5").unwrap().version().unwrap(), "3.4");
    }
}
