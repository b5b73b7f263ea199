// src/core/yaml_patcher.rs

use crate::core::{
    interpolator::{self, SubstitutionError},
    yaml_file::{self, YamlFileError},
};
use serde_yaml::{Mapping, Value};
use std::path::Path;
use thiserror::Error;

/// Separator between the segments of an override key (`network.name`).
pub const KEY_SEPARATOR: char = '.';

#[derive(Error, Debug)]
pub enum PatchError {
    #[error(transparent)]
    File(#[from] YamlFileError),
    #[error(transparent)]
    Substitution(#[from] SubstitutionError),
    #[error("Override key '{0}' must be a non-empty dotted path.")]
    InvalidKey(String),
    #[error("Override keys must be strings, found {0:?}.")]
    NonStringKey(Value),
    #[error("Override keys '{shorter}' and '{longer}' overlap; one would overwrite the other.")]
    OverlappingKeys { shorter: String, longer: String },
    #[error("Cannot set '{key}': '{segment}' is not a mapping.")]
    NotAMapping { key: String, segment: String },
    #[error("Cannot set '{key}': index {index} is out of bounds.")]
    IndexOutOfBounds { key: String, index: usize },
}

/// Sets `value` at `dotted_key` inside `document`, creating intermediate mappings.
///
/// A numeric segment addresses an existing element when the current node is a
/// sequence. Walking through any other scalar is an error.
pub fn set_value(document: &mut Value, dotted_key: &str, value: Value) -> Result<(), PatchError> {
    let segments = split_key(dotted_key)?;
    let Some((last, parents)) = segments.split_last() else {
        return Err(PatchError::InvalidKey(dotted_key.to_string()));
    };

    let mut current = document;
    let mut walked = String::new();
    for segment in parents {
        if !walked.is_empty() {
            walked.push(KEY_SEPARATOR);
        }
        walked.push_str(segment);
        current = child_mut(current, segment, dotted_key, &walked)?;
    }

    if current.is_null() {
        *current = Value::Mapping(Mapping::new());
    }
    match current {
        Value::Mapping(mapping) => {
            mapping.insert(Value::from(*last), value);
            Ok(())
        }
        Value::Sequence(items) => {
            let index = parse_index(last, dotted_key, &walked)?;
            let slot = items.get_mut(index).ok_or(PatchError::IndexOutOfBounds {
                key: dotted_key.to_string(),
                index,
            })?;
            *slot = value;
            Ok(())
        }
        _ => Err(PatchError::NotAMapping {
            key: dotted_key.to_string(),
            segment: walked,
        }),
    }
}

/// Applies `overrides` to the YAML file at `target`.
///
/// Every value is substituted against `context` before the file is touched;
/// the file is then read, patched in memory and rewritten once.
pub fn apply_override(
    target: &Path,
    overrides: &Mapping,
    context: &Mapping,
) -> Result<(), PatchError> {
    if overrides.is_empty() {
        return Ok(());
    }

    let mut entries = Vec::with_capacity(overrides.len());
    for (key, raw) in overrides {
        let key = key
            .as_str()
            .ok_or_else(|| PatchError::NonStringKey(key.clone()))?;
        split_key(key)?;
        entries.push((key, interpolator::substitute_value(raw, context)?));
    }
    reject_overlaps(entries.iter().map(|(key, _)| *key))?;

    let mut document: Value = yaml_file::read_yaml(target)?;
    for (key, value) in entries {
        log::debug!("Patching '{}' in {}", key, target.display());
        set_value(&mut document, key, value)?;
    }
    yaml_file::write_yaml(target, &document)?;
    Ok(())
}

/// Applies the override held in `slot` (if any) to `target`, then clears the slot.
///
/// Clearing keeps a persisted configuration from carrying an override that
/// has already been applied to its generated files.
pub fn apply_and_discard(
    slot: &mut Option<Mapping>,
    target: &Path,
    context: &Mapping,
) -> Result<(), PatchError> {
    if let Some(overrides) = slot.as_ref() {
        apply_override(target, overrides, context)?;
    }
    *slot = None;
    Ok(())
}

fn split_key(dotted_key: &str) -> Result<Vec<&str>, PatchError> {
    let segments: Vec<&str> = dotted_key.split(KEY_SEPARATOR).collect();
    if segments.iter().any(|s| s.trim().is_empty()) {
        return Err(PatchError::InvalidKey(dotted_key.to_string()));
    }
    Ok(segments)
}

fn reject_overlaps<'k>(keys: impl Iterator<Item = &'k str>) -> Result<(), PatchError> {
    let mut seen: Vec<&str> = Vec::new();
    for key in keys {
        for other in &seen {
            let (shorter, longer) = if other.len() <= key.len() {
                (*other, key)
            } else {
                (key, *other)
            };
            let is_prefix = longer == shorter
                || longer
                    .strip_prefix(shorter)
                    .is_some_and(|rest| rest.starts_with(KEY_SEPARATOR));
            if is_prefix {
                return Err(PatchError::OverlappingKeys {
                    shorter: shorter.to_string(),
                    longer: longer.to_string(),
                });
            }
        }
        seen.push(key);
    }
    Ok(())
}

fn child_mut<'v>(
    node: &'v mut Value,
    segment: &str,
    dotted_key: &str,
    walked: &str,
) -> Result<&'v mut Value, PatchError> {
    if node.is_null() {
        *node = Value::Mapping(Mapping::new());
    }
    match node {
        Value::Mapping(mapping) => {
            let key = Value::from(segment);
            let child = mapping
                .entry(key)
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            if child.is_null() {
                *child = Value::Mapping(Mapping::new());
            }
            Ok(child)
        }
        Value::Sequence(items) => {
            let index = parse_index(segment, dotted_key, walked)?;
            items.get_mut(index).ok_or(PatchError::IndexOutOfBounds {
                key: dotted_key.to_string(),
                index,
            })
        }
        _ => Err(PatchError::NotAMapping {
            key: dotted_key.to_string(),
            segment: walked.to_string(),
        }),
    }
}

fn parse_index(segment: &str, dotted_key: &str, walked: &str) -> Result<usize, PatchError> {
    segment.parse().map_err(|_| PatchError::NotAMapping {
        key: dotted_key.to_string(),
        segment: walked.to_string(),
    })
}
