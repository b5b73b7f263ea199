// src/core/settings.rs

use crate::core::{
    paths::{self, PathError},
    yaml_file::{self, YamlFileError},
};
use crate::models::Settings;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Not initialized: no settings found at '{path}'. Run `systest init` to configure systest.")]
    NotInitialized { path: String },
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    File(#[from] YamlFileError),
}

/// Owns the location of the settings file and the settings read from it.
///
/// The document is parsed on the first `load()` and cached for the lifetime
/// of the store. `write()` does NOT refresh that cache: build a new store to
/// observe freshly written settings.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    cached: OnceCell<Settings>,
}

impl SettingsStore {
    /// A store bound to the path resolved from the environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Ok(Self::at(paths::settings_path()?))
    }

    /// A store bound to an explicit settings file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: OnceCell::new(),
        }
    }

    /// Location of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the settings, reading the file on first use only.
    pub fn load(&self) -> Result<&Settings, SettingsError> {
        if let Some(settings) = self.cached.get() {
            return Ok(settings);
        }
        if !self.path.exists() {
            return Err(SettingsError::NotInitialized {
                path: self.path.display().to_string(),
            });
        }
        log::debug!("Loading settings from {}", self.path.display());
        let settings: Settings = yaml_file::read_yaml(&self.path)?;
        Ok(self.cached.get_or_init(|| settings))
    }

    /// Normalizes the given paths and overwrites the settings file with them.
    ///
    /// `blueprints_yaml` falls back to `user_suites_yaml` when not supplied.
    pub fn write(
        &self,
        basedir: &Path,
        main_suites_yaml: &Path,
        user_suites_yaml: &Path,
        blueprints_yaml: Option<&Path>,
    ) -> Result<Settings, SettingsError> {
        let settings = Settings {
            basedir: paths::absolutize(basedir)?,
            main_suites_yaml: paths::absolutize(main_suites_yaml)?,
            user_suites_yaml: paths::absolutize(user_suites_yaml)?,
            blueprints_yaml: paths::absolutize(blueprints_yaml.unwrap_or(user_suites_yaml))?,
        };
        yaml_file::write_yaml(&self.path, &settings)?;
        log::info!("Settings written to {}", self.path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_without_file_is_not_initialized() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::at(dir.path().join("settings"));

        let err = store.load().unwrap_err();
        assert!(matches!(err, SettingsError::NotInitialized { .. }));
        assert!(err.to_string().contains("systest init"));
    }

    #[test]
    fn test_write_then_fresh_load_round_trips() {
        let dir = tempdir().unwrap();
        let settings_file = dir.path().join("settings");
        let store = SettingsStore::at(&settings_file);

        let written = store
            .write(
                Path::new("/tmp/x"),
                Path::new("/tmp/main.yaml"),
                Path::new("/tmp/user.yaml"),
                None,
            )
            .unwrap();

        assert_eq!(written.basedir, PathBuf::from("/tmp/x"));
        // Blueprints default to the user suites file.
        assert_eq!(written.blueprints_yaml, PathBuf::from("/tmp/user.yaml"));

        let fresh = SettingsStore::at(&settings_file);
        assert_eq!(fresh.load().unwrap(), &written);
    }

    #[test]
    fn test_relative_paths_are_written_absolute() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::at(dir.path().join("settings"));

        let written = store
            .write(
                Path::new("work"),
                Path::new("main.yaml"),
                Path::new("user.yaml"),
                Some(Path::new("bps.yaml")),
            )
            .unwrap();

        assert!(written.basedir.is_absolute());
        assert!(written.main_suites_yaml.is_absolute());
        assert!(written.blueprints_yaml.ends_with("bps.yaml"));
    }

    #[test]
    fn test_load_is_cached_across_writes() {
        let dir = tempdir().unwrap();
        let settings_file = dir.path().join("settings");
        let store = SettingsStore::at(&settings_file);

        store
            .write(Path::new("/a"), Path::new("/a/m.yaml"), Path::new("/a/u.yaml"), None)
            .unwrap();
        let first = store.load().unwrap().clone();

        store
            .write(Path::new("/b"), Path::new("/b/m.yaml"), Path::new("/b/u.yaml"), None)
            .unwrap();
        assert_eq!(store.load().unwrap(), &first);

        let fresh = SettingsStore::at(&settings_file);
        assert_eq!(fresh.load().unwrap().basedir, PathBuf::from("/b"));
    }
}
