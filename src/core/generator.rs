//! # Generator
//!
//! Materializes configuration and blueprint workspaces from the resolved
//! suites and blueprints documents:
//!
//! 1. copy the source inputs file and the source blueprint's whole directory
//!    into the workspace,
//! 2. point the persisted configuration at the copies,
//! 3. apply the `*_override` sections to the copies (then drop them),
//! 4. persist the configuration next to the copies.
//!
//! Regenerating an existing workspace overwrites every generated file.
use crate::core::{
    config_resolver::{BlueprintConfigResolver, SuiteConfigResolver},
    paths::{self, PathError},
    workspace::{BlueprintWorkspace, ConfigurationWorkspace, Workspace, WorkspaceError},
    yaml_file::YamlFileError,
    yaml_patcher::{self, PatchError},
};
use crate::models::Settings;
use serde_yaml::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("No handler configuration named '{0}' in the suites file.")]
    UnknownConfiguration(String),
    #[error("No blueprint named '{0}' in the blueprints file.")]
    UnknownBlueprint(String),
    #[error("Could not copy '{from}' to '{to}': {source}")]
    Copy {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Blueprint path '{0}' has no file name.")]
    InvalidBlueprintPath(String),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(transparent)]
    File(#[from] YamlFileError),
    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Generates the workspace of handler configuration `name`.
///
/// With `reset`, an existing workspace is removed first.
pub fn generate_configuration(
    settings: &Settings,
    name: &str,
    reset: bool,
) -> Result<ConfigurationWorkspace, GenerateError> {
    let workspace = ConfigurationWorkspace::new(name, settings);
    let suites = SuiteConfigResolver::new(settings).load_suites(true)?;
    let mut handler_configuration = suites
        .handler_configurations
        .get(name)
        .cloned()
        .ok_or_else(|| GenerateError::UnknownConfiguration(name.to_string()))?;

    let original_inputs = paths::expand_user(&handler_configuration.inputs)?;
    let original_blueprint = paths::expand_user(&handler_configuration.manager_blueprint)?;

    if reset {
        workspace.reset()?;
    }
    workspace.ensure()?;
    log::info!("Generating configuration '{}' in {}", name, workspace.dir().display());

    materialize(
        &original_inputs,
        &original_blueprint,
        &workspace.inputs_path(),
        &workspace.manager_blueprint_dir(),
        &workspace.manager_blueprint_path(),
    )?;

    handler_configuration.inputs = workspace.inputs_path().display().to_string();
    handler_configuration.manager_blueprint =
        workspace.manager_blueprint_path().display().to_string();
    handler_configuration.install_manager_blueprint_dependencies = Some(false);

    yaml_patcher::apply_and_discard(
        &mut handler_configuration.inputs_override,
        &workspace.inputs_path(),
        &suites.variables,
    )?;
    yaml_patcher::apply_and_discard(
        &mut handler_configuration.manager_blueprint_override,
        &workspace.manager_blueprint_path(),
        &suites.variables,
    )?;

    workspace.set_handler_configuration(&handler_configuration)?;
    Ok(workspace)
}

/// Generates the workspace of `blueprint` inside an existing configuration workspace.
pub fn generate_blueprint(
    settings: &Settings,
    configuration: &ConfigurationWorkspace,
    blueprint: &str,
    reset: bool,
) -> Result<BlueprintWorkspace, GenerateError> {
    let mut blueprints = BlueprintConfigResolver::new(settings).load_blueprints(true)?;
    let workspace = configuration.blueprint(blueprint);
    let mut blueprint_configuration = blueprints
        .blueprints
        .get(blueprint)
        .cloned()
        .ok_or_else(|| GenerateError::UnknownBlueprint(blueprint.to_string()))?;

    if reset {
        workspace.reset()?;
    }
    workspace.ensure()?;
    log::info!(
        "Generating blueprint '{}' for configuration '{}'",
        blueprint,
        configuration.name()
    );

    let original_blueprint = paths::expand_user(&blueprint_configuration.blueprint)?;
    // Blueprints without inputs still get an (empty) inputs file to patch.
    let empty_inputs;
    let original_inputs = match blueprint_configuration.inputs.as_deref() {
        Some(inputs) if !inputs.is_empty() => paths::expand_user(inputs)?,
        _ => {
            empty_inputs = empty_inputs_file()?;
            empty_inputs.path().to_path_buf()
        }
    };

    materialize(
        &original_inputs,
        &original_blueprint,
        &workspace.inputs_path(),
        &workspace.blueprint_dir(),
        &workspace.blueprint_path(),
    )?;

    blueprint_configuration.inputs = Some(workspace.inputs_path().display().to_string());
    blueprint_configuration.blueprint = workspace.blueprint_path().display().to_string();

    blueprints.variables.insert(
        Value::from("properties"),
        Value::Mapping(configuration.properties()?),
    );

    yaml_patcher::apply_and_discard(
        &mut blueprint_configuration.inputs_override,
        &workspace.inputs_path(),
        &blueprints.variables,
    )?;
    yaml_patcher::apply_and_discard(
        &mut blueprint_configuration.blueprint_override,
        &workspace.blueprint_path(),
        &blueprints.variables,
    )?;

    workspace.set_blueprint_configuration(&blueprint_configuration)?;
    Ok(workspace)
}

/// Copies the inputs file to `inputs_target` and the blueprint's directory to
/// `blueprint_dir`, then renames the copied blueprint file to `blueprint_target`.
fn materialize(
    original_inputs: &Path,
    original_blueprint: &Path,
    inputs_target: &Path,
    blueprint_dir: &Path,
    blueprint_target: &Path,
) -> Result<(), GenerateError> {
    copy_file(original_inputs, inputs_target)?;

    let file_name = original_blueprint
        .file_name()
        .ok_or_else(|| GenerateError::InvalidBlueprintPath(original_blueprint.display().to_string()))?;
    let source_dir = original_blueprint
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    if blueprint_dir.exists() {
        fs::remove_dir_all(blueprint_dir).map_err(|source| copy_error(source_dir, blueprint_dir, source))?;
    }
    copy_dir(source_dir, blueprint_dir)?;

    let copied = blueprint_dir.join(file_name);
    if copied != blueprint_target {
        fs::rename(&copied, blueprint_target)
            .map_err(|source| copy_error(&copied, blueprint_target, source))?;
    }
    Ok(())
}

fn copy_file(from: &Path, to: &Path) -> Result<(), GenerateError> {
    log::debug!("Copying {} -> {}", from.display(), to.display());
    fs::copy(from, to).map_err(|source| copy_error(from, to, source))?;
    Ok(())
}

fn copy_dir(from: &Path, to: &Path) -> Result<(), GenerateError> {
    log::debug!("Copying directory {} -> {}", from.display(), to.display());
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry.map_err(|e| copy_error(from, to, e.into()))?;
        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target: PathBuf = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|source| copy_error(entry.path(), &target, source))?;
        } else {
            copy_file(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn copy_error(from: &Path, to: &Path, source: std::io::Error) -> GenerateError {
    GenerateError::Copy {
        from: from.display().to_string(),
        to: to.display().to_string(),
        source,
    }
}

fn empty_inputs_file() -> Result<NamedTempFile, GenerateError> {
    let mut file = NamedTempFile::new().map_err(|source| GenerateError::Copy {
        from: "<empty inputs>".to_string(),
        to: std::env::temp_dir().display().to_string(),
        source,
    })?;
    file.write_all(b"{}\n")
        .and_then(|()| file.flush())
        .map_err(|source| copy_error(Path::new("<empty inputs>"), file.path(), source))?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::yaml_file;
    use serde_yaml::Mapping;
    use tempfile::{TempDir, tempdir};

    /// Lays out a main suites file, a user suites/blueprints file, one manager
    /// blueprint directory and one application blueprint directory.
    fn fixture() -> (TempDir, Settings) {
        let dir = tempdir().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join("src/manager")).unwrap();
        fs::write(root.join("src/manager/openstack.yaml"), "node_templates: {}\n").unwrap();
        fs::write(root.join("src/manager/script.sh"), "echo hi\n").unwrap();
        fs::write(root.join("src/inputs.yaml"), "image: ubuntu\n").unwrap();

        fs::create_dir_all(root.join("src/hello")).unwrap();
        fs::write(root.join("src/hello/hello.yaml"), "inputs: {}\n").unwrap();

        fs::write(root.join("main.yaml"), "variables: {net_name: main-net, image: centos}\n")
            .unwrap();
        let user = format!(
            r#"
variables:
  net_name: net1
handler_configurations:
  conf1:
    inputs: {root}/src/inputs.yaml
    manager_blueprint: {root}/src/manager/openstack.yaml
    handler: openstack_handler
    properties:
      flavor: m1.small
    inputs_override:
      network.name: '{{{{ net_name }}}}'
      image: '{{{{ image }}}}'
    manager_blueprint_override:
      node_templates.manager.type: compute
blueprints:
  hello:
    blueprint: {root}/src/hello/hello.yaml
    inputs_override:
      network.name: '{{{{ net_name }}}}'
      flavor: '{{{{ properties.flavor }}}}'
"#,
            root = root.display()
        );
        fs::write(root.join("user.yaml"), user).unwrap();

        let settings = Settings {
            basedir: root.join("work"),
            main_suites_yaml: root.join("main.yaml"),
            user_suites_yaml: root.join("user.yaml"),
            blueprints_yaml: root.join("user.yaml"),
        };
        (dir, settings)
    }

    fn read(path: &Path) -> Value {
        yaml_file::read_yaml(path).unwrap()
    }

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_generate_configuration_materializes_workspace() {
        let (_dir, settings) = fixture();

        let workspace = generate_configuration(&settings, "conf1", false).unwrap();

        assert!(workspace.exists());
        assert!(workspace.manager_blueprint_dir().join("script.sh").exists());
        assert!(!workspace.manager_blueprint_dir().join("openstack.yaml").exists());
        assert_eq!(
            read(&workspace.inputs_path()),
            yaml("{image: centos, network: {name: net1}}")
        );
        assert_eq!(
            read(&workspace.manager_blueprint_path()),
            yaml("{node_templates: {manager: {type: compute}}}")
        );

        let handler = workspace.handler_configuration().unwrap();
        assert_eq!(handler.inputs, workspace.inputs_path().display().to_string());
        assert_eq!(
            handler.manager_blueprint,
            workspace.manager_blueprint_path().display().to_string()
        );
        assert_eq!(handler.install_manager_blueprint_dependencies, Some(false));
        assert!(handler.inputs_override.is_none());
        assert!(handler.manager_blueprint_override.is_none());
        assert_eq!(
            handler.extra.get("handler").and_then(Value::as_str),
            Some("openstack_handler")
        );
    }

    #[test]
    fn test_regeneration_overwrites_and_reset_clears() {
        let (_dir, settings) = fixture();
        let workspace = generate_configuration(&settings, "conf1", false).unwrap();
        let stray = workspace.dir().join("stray.txt");
        fs::write(&stray, "left over").unwrap();

        let again = generate_configuration(&settings, "conf1", false).unwrap();
        assert!(stray.exists());
        assert_eq!(
            read(&again.inputs_path()),
            yaml("{image: centos, network: {name: net1}}")
        );

        generate_configuration(&settings, "conf1", true).unwrap();
        assert!(!stray.exists());
    }

    #[test]
    fn test_unknown_configuration_is_reported() {
        let (_dir, settings) = fixture();
        let err = generate_configuration(&settings, "nope", false).unwrap_err();
        assert!(matches!(err, GenerateError::UnknownConfiguration(ref n) if n == "nope"));
    }

    #[test]
    fn test_generate_blueprint_without_inputs_uses_empty_document() {
        let (_dir, settings) = fixture();
        let configuration = generate_configuration(&settings, "conf1", false).unwrap();

        let blueprint = generate_blueprint(&settings, &configuration, "hello", false).unwrap();

        assert_eq!(
            read(&blueprint.inputs_path()),
            yaml("{network: {name: net1}, flavor: m1.small}")
        );
        assert_eq!(read(&blueprint.blueprint_path()), yaml("inputs: {}"));

        let persisted = blueprint.blueprint_configuration().unwrap();
        assert!(persisted.inputs_override.is_none());
        assert_eq!(
            persisted.inputs.as_deref(),
            Some(blueprint.inputs_path().display().to_string().as_str())
        );
    }

    #[test]
    fn test_unresolved_override_variable_fails_generation() {
        let (dir, settings) = fixture();
        let user = fs::read_to_string(&settings.user_suites_yaml)
            .unwrap()
            .replace("{{ image }}", "{{ missing }}");
        fs::write(dir.path().join("user.yaml"), user).unwrap();

        let err = generate_configuration(&settings, "conf1", false).unwrap_err();
        assert!(matches!(err, GenerateError::Patch(PatchError::Substitution(_))));
    }

    #[test]
    fn test_properties_default_to_empty_mapping() {
        let (_dir, settings) = fixture();
        let configuration = generate_configuration(&settings, "conf1", false).unwrap();
        let mut handler = configuration.handler_configuration().unwrap();
        handler.properties = None;
        configuration.set_handler_configuration(&handler).unwrap();

        assert_eq!(configuration.properties().unwrap(), Mapping::new());
    }
}
