// src/core/yaml_file.rs

// Whole-file YAML reads and writes shared by every document type.

use serde::{Serialize, de::DeserializeOwned};
use serde_yaml::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum YamlFileError {
    #[error("Could not read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{path}' is not valid YAML: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Could not serialize YAML for '{path}': {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Could not write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Reads and parses a YAML file into `T`.
///
/// Merge keys (`<<: *anchor`) are resolved before the document is typed.
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, YamlFileError> {
    let content = fs::read_to_string(path).map_err(|source| YamlFileError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let parse_error = |source| YamlFileError::Parse {
        path: path.display().to_string(),
        source,
    };
    let mut document: Value = serde_yaml::from_str(&content).map_err(parse_error)?;
    document.apply_merge().map_err(parse_error)?;
    serde_yaml::from_value(document).map_err(parse_error)
}

/// Serializes `value` and overwrites `path` with it, creating the parent directory if needed.
pub fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<(), YamlFileError> {
    let content = serde_yaml::to_string(value).map_err(|source| YamlFileError::Serialize {
        path: path.display().to_string(),
        source,
    })?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| YamlFileError::Write {
                path: path.display().to_string(),
                source,
            })?;
        }
    }
    fs::write(path, content).map_err(|source| YamlFileError::Write {
        path: path.display().to_string(),
        source,
    })
}
