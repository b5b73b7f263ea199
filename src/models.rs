// src/models.rs

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::collections::BTreeMap;
use std::path::PathBuf;

// --- SETTINGS ---

/// The global settings document, written by `systest init`.
///
/// Every path is absolute and expanded by the time it is written.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub basedir: PathBuf,
    pub main_suites_yaml: PathBuf,
    pub user_suites_yaml: PathBuf,
    pub blueprints_yaml: PathBuf,
}

// --- SUITES ---

/// A suites document (both the "main" and the "user" one share this shape).
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SuitesDocument {
    #[serde(default, skip_serializing_if = "Mapping::is_empty")]
    pub variables: Mapping,
    #[serde(default)]
    pub handler_configurations: BTreeMap<String, HandlerConfiguration>,
    /// Anything else the document carries, preserved as-is.
    #[serde(flatten)]
    pub extra: Mapping,
}

/// Describes which inputs and manager blueprint a configuration uses, and
/// where its manager lives once bootstrapped.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct HandlerConfiguration {
    pub inputs: String,
    pub manager_blueprint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs_override: Option<Mapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_blueprint_override: Option<Mapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_manager_blueprint_dependencies: Option<bool>,
    /// Exposed to blueprint templates as the `properties` variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Mapping>,
    #[serde(flatten)]
    pub extra: Mapping,
}

// --- BLUEPRINTS ---

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct BlueprintsDocument {
    #[serde(default, skip_serializing_if = "Mapping::is_empty")]
    pub variables: Mapping,
    #[serde(default)]
    pub blueprints: BTreeMap<String, BlueprintConfiguration>,
    #[serde(flatten)]
    pub extra: Mapping,
}

/// A deployable blueprint with its own inputs and override rules.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct BlueprintConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<String>,
    pub blueprint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs_override: Option<Mapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint_override: Option<Mapping>,
    #[serde(flatten)]
    pub extra: Mapping,
}

// --- DEPLOYMENT MANAGER ---

/// Lifecycle states reported by the manager for a workflow execution.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Pending,
    Started,
    Cancelling,
    ForceCancelling,
    Cancelled,
    Terminated,
    Failed,
    #[serde(other)]
    Unknown,
}

impl ExecutionStatus {
    /// Terminal states: an execution in one of these will never change again.
    pub fn is_end_state(self) -> bool {
        matches!(self, Self::Terminated | Self::Failed | Self::Cancelled)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Execution {
    pub id: String,
    pub status: ExecutionStatus,
    #[serde(default)]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub deployment_id: Option<String>,
}
