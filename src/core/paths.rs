// src/core/paths.rs

use crate::constants::{DEFAULT_SETTINGS_PATH, SETTINGS_ENV_VAR};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Failed to expand path '{path}': {reason}")]
    Expansion { path: String, reason: String },
    #[error("Could not make '{path}' absolute: {source}")]
    Absolute {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Returns the path of the global settings file.
///
/// `SYSTEST_SETTINGS` wins when set; otherwise `~/.cloudify-systest` is used.
pub fn settings_path() -> Result<PathBuf, PathError> {
    let override_value = env::var(SETTINGS_ENV_VAR).ok();
    settings_path_from(override_value.as_deref())
}

/// Same as [`settings_path`], with the environment override passed explicitly.
pub fn settings_path_from(override_value: Option<&str>) -> Result<PathBuf, PathError> {
    let raw = match override_value {
        Some(value) if !value.trim().is_empty() => value,
        _ => DEFAULT_SETTINGS_PATH,
    };
    expand_user(raw)
}

/// Expands the home directory (`~`) and environment variables (`$VAR`) in a path.
pub fn expand_user(raw: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(raw).map_err(|e| PathError::Expansion {
        path: raw.to_string(),
        reason: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Expands `raw` and anchors it to the current directory if it is relative.
///
/// The target does not need to exist.
pub fn absolutize(raw: &Path) -> Result<PathBuf, PathError> {
    let expanded = expand_user(&raw.to_string_lossy())?;
    let absolute = std::path::absolute(&expanded).map_err(|source| PathError::Absolute {
        path: expanded.display().to_string(),
        source,
    })?;
    Ok(dunce::simplified(&absolute).to_path_buf())
}
