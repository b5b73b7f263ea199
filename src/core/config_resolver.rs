//! # Config Resolver
//!
//! Loads the suites and blueprints documents named by the settings and layers
//! their `variables` sections. Precedence, lowest to highest:
//!
//! 1. main suites variables
//! 2. user suites variables
//! 3. blueprints variables
//!
//! Layering replaces top-level keys only; nested mappings are never merged.
use crate::core::yaml_file::{self, YamlFileError};
use crate::models::{BlueprintsDocument, Settings, SuitesDocument};
use serde::Deserialize;
use serde_yaml::Mapping;

/// The only part of the main suites document that is ever consulted.
#[derive(Deserialize, Debug, Default)]
struct SharedVariables {
    #[serde(default)]
    variables: Mapping,
}

/// Overwrites `base` with every top-level entry of `overlay`.
///
/// Keys already in `base` keep their position; new keys are appended.
pub fn merge_variables(mut base: Mapping, overlay: &Mapping) -> Mapping {
    base.extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
    base
}

/// Resolves the user suites document, optionally inheriting main suite variables.
#[derive(Debug)]
pub struct SuiteConfigResolver<'a> {
    settings: &'a Settings,
}

impl<'a> SuiteConfigResolver<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Parses the user suites document.
    ///
    /// With `with_variables`, the main suites document is parsed too and its
    /// variables are overwritten by the user ones. Without it, the document is
    /// returned exactly as parsed and the main suites file is never opened.
    pub fn load_suites(&self, with_variables: bool) -> Result<SuitesDocument, YamlFileError> {
        log::debug!(
            "Loading user suites from {}",
            self.settings.user_suites_yaml.display()
        );
        let mut suites: SuitesDocument = yaml_file::read_yaml(&self.settings.user_suites_yaml)?;
        if with_variables {
            let main: SharedVariables = yaml_file::read_yaml(&self.settings.main_suites_yaml)?;
            suites.variables = merge_variables(main.variables, &suites.variables);
        }
        Ok(suites)
    }
}

/// Resolves the blueprints document, optionally inheriting the suite variables.
#[derive(Debug)]
pub struct BlueprintConfigResolver<'a> {
    settings: &'a Settings,
}

impl<'a> BlueprintConfigResolver<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    pub fn load_blueprints(
        &self,
        with_variables: bool,
    ) -> Result<BlueprintsDocument, YamlFileError> {
        log::debug!(
            "Loading blueprints from {}",
            self.settings.blueprints_yaml.display()
        );
        let mut blueprints: BlueprintsDocument =
            yaml_file::read_yaml(&self.settings.blueprints_yaml)?;
        if with_variables {
            let suites = SuiteConfigResolver::new(self.settings).load_suites(true)?;
            blueprints.variables = merge_variables(suites.variables, &blueprints.variables);
        }
        Ok(blueprints)
    }
}
