// EN: src/cli/handlers/testing.rs

// A throwaway settings file, suites file and `cfy` stand-in for driving
// handlers end to end.

use std::fs;
use std::path::Path;
use std::rc::Rc;

use tempfile::{TempDir, tempdir};

use crate::{
    context::AppContext,
    core::{generator, settings::SettingsStore, workspace::ConfigurationWorkspace},
    system::manager_client::{ManagerClient, testing::FakeManager},
};

/// Address the stand-in `cfy bootstrap` records in the workspace context.
pub(crate) const STUB_MANAGER_IP: &str = "10.0.0.9";

pub(crate) struct Sandbox {
    dir: TempDir,
    pub(crate) context: AppContext,
}

impl Sandbox {
    /// Settings pointing at one handler configuration `conf` and one blueprint
    /// `hello`, with `cfy` replaced by a script that logs its arguments.
    pub(crate) fn new() -> Self {
        let dir = tempdir().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join("src/manager")).unwrap();
        fs::write(root.join("src/manager/bp.yaml"), "node_templates: {}\n").unwrap();
        fs::write(root.join("src/inputs.yaml"), "image: centos\n").unwrap();
        fs::create_dir_all(root.join("src/hello")).unwrap();
        fs::write(root.join("src/hello/hello.yaml"), "inputs: {}\n").unwrap();

        fs::write(root.join("main.yaml"), "variables: {}\n").unwrap();
        fs::write(
            root.join("user.yaml"),
            format!(
                "handler_configurations:\n  conf:\n    inputs: {0}/src/inputs.yaml\n    manager_blueprint: {0}/src/manager/bp.yaml\nblueprints:\n  hello:\n    blueprint: {0}/src/hello/hello.yaml\n",
                root.display()
            ),
        )
        .unwrap();

        fs::write(
            root.join("cfy.sh"),
            format!(
                "echo \"$*\" >> '{log}'\nif [ \"$1\" = bootstrap ]; then\n  mkdir -p .cloudify\n  echo '_management_ip: {ip}' > .cloudify/context\nfi\n",
                log = root.join("cfy.log").display(),
                ip = STUB_MANAGER_IP
            ),
        )
        .unwrap();

        let store = SettingsStore::at(root.join("settings"));
        store
            .write(&root.join("work"), &root.join("main.yaml"), &root.join("user.yaml"), None)
            .unwrap();
        let context = AppContext::new(store)
            .with_cfy_command(format!("sh {}", root.join("cfy.sh").display()));

        Self { dir, context }
    }

    /// Routes every manager connection to `manager`.
    pub(crate) fn with_manager(self, manager: Rc<FakeManager>) -> Self {
        Self {
            context: self
                .context
                .with_connector(move |_| Ok(Box::new(Rc::clone(&manager)) as Box<dyn ManagerClient>)),
            dir: self.dir,
        }
    }

    pub(crate) fn root(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn workspace(&self) -> ConfigurationWorkspace {
        ConfigurationWorkspace::new("conf", self.context.settings().unwrap())
    }

    /// Generates `conf`, optionally recording a manager address for it.
    pub(crate) fn generated(&self, manager_ip: Option<&str>) -> ConfigurationWorkspace {
        let workspace =
            generator::generate_configuration(self.context.settings().unwrap(), "conf", false).unwrap();
        if let Some(ip) = manager_ip {
            let mut configuration = workspace.handler_configuration().unwrap();
            configuration.manager_ip = Some(ip.to_string());
            workspace.set_handler_configuration(&configuration).unwrap();
        }
        workspace
    }

    /// Argument lines the stand-in `cfy` was called with, oldest first.
    pub(crate) fn cfy_calls(&self) -> Vec<String> {
        fs::read_to_string(self.root().join("cfy.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
