// EN: src/cli/handlers/deploy.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::args::{DeployArgs, UndeployArgs},
    context::AppContext,
    core::{
        cancellation::{self, CancelOutcome, PollPolicy},
        generator,
    },
};

use super::commons;

/// The main handler for the `deploy` command.
///
/// The blueprint id and the deployment id are both the blueprint's name.
pub fn handle(args: Vec<String>, context: &AppContext) -> Result<()> {
    let deploy_args = DeployArgs::try_parse_from(&args)?;
    let Some(workspace) = commons::existing_workspace(context, &deploy_args.configuration)? else {
        return Ok(());
    };
    let blueprint_id = deploy_args.blueprint.as_str();

    let blueprint = if deploy_args.skip_generation {
        workspace.blueprint(blueprint_id)
    } else {
        generator::generate_blueprint(context.settings()?, &workspace, blueprint_id, deploy_args.reset)
            .with_context(|| format!("Could not generate blueprint '{}'", blueprint_id))?
    };

    let cfy = commons::cfy(context, &workspace)?;
    cfy.blueprints_upload(&blueprint.blueprint_path(), blueprint_id)?;
    cfy.deployments_create(blueprint_id, blueprint_id, &blueprint.inputs_path())?;
    cfy.executions_start("install", blueprint_id, true, Some(deploy_args.timeout))?;

    println!("{} Deployment '{}' installed", "✔".green(), blueprint_id.cyan());
    Ok(())
}

/// The main handler for the `undeploy` command.
pub fn handle_undeploy(args: Vec<String>, context: &AppContext) -> Result<()> {
    let undeploy_args = UndeployArgs::try_parse_from(&args)?;
    let Some(workspace) = commons::existing_workspace(context, &undeploy_args.configuration)? else {
        return Ok(());
    };
    let deployment_id = undeploy_args.blueprint.as_str();

    if undeploy_args.cancel_executions {
        let client = commons::manager_client(context, &workspace)?;
        let outcomes =
            cancellation::cancel_active_executions(client.as_ref(), deployment_id, PollPolicy::default())
                .with_context(|| format!("Could not cancel executions of '{}'", deployment_id))?;
        for (execution_id, outcome) in outcomes {
            match outcome {
                CancelOutcome::Cancelled { .. } => {
                    println!("  Execution {} cancelled", execution_id)
                }
                CancelOutcome::Forced => println!(
                    "  Execution {} {}",
                    execution_id,
                    "forced to cancelled".yellow()
                ),
            }
        }
    }

    let cfy = commons::cfy(context, &workspace)?;
    cfy.executions_start("uninstall", deployment_id, true, None)?;
    cfy.deployments_delete(deployment_id, true)?;
    cfy.blueprints_delete(deployment_id)?;

    println!("{} Deployment '{}' removed", "✔".green(), deployment_id.cyan());
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::cli::handlers::testing::Sandbox;
    use crate::core::workspace::Workspace;
    use crate::models::{Execution, ExecutionStatus};
    use crate::system::manager_client::testing::FakeManager;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_deploy_generates_uploads_creates_and_installs() {
        let sandbox = Sandbox::new();
        let workspace = sandbox.generated(None);

        handle(args(&["conf", "hello"]), &sandbox.context).unwrap();

        let blueprint = workspace.blueprint("hello");
        assert!(blueprint.blueprint_path().exists());
        assert_eq!(
            sandbox.cfy_calls(),
            vec![
                format!(
                    "blueprints upload --blueprint-path={} --blueprint-id=hello",
                    blueprint.blueprint_path().display()
                ),
                format!(
                    "deployments create --blueprint-id=hello --deployment-id=hello --inputs={}",
                    blueprint.inputs_path().display()
                ),
                "executions start --workflow=install --deployment-id=hello --include-logs --timeout=1800"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_deploy_with_skip_generation_uses_the_workspace_on_disk() {
        let sandbox = Sandbox::new();
        let workspace = sandbox.generated(None);

        handle(
            args(&["conf", "hello", "--skip-generation", "--timeout", "60"]),
            &sandbox.context,
        )
        .unwrap();

        assert!(!workspace.blueprint("hello").exists());
        let calls = sandbox.cfy_calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[2].ends_with("--timeout=60"));
    }

    #[test]
    fn test_deploy_of_missing_workspace_runs_nothing() {
        let sandbox = Sandbox::new();
        handle(args(&["conf", "hello"]), &sandbox.context).unwrap();
        assert!(sandbox.cfy_calls().is_empty());
    }

    #[test]
    fn test_undeploy_uninstalls_then_deletes() {
        let sandbox = Sandbox::new();
        sandbox.generated(None);

        handle_undeploy(args(&["conf", "hello"]), &sandbox.context).unwrap();

        assert_eq!(
            sandbox.cfy_calls(),
            vec![
                "executions start --workflow=uninstall --deployment-id=hello --include-logs",
                "deployments delete --deployment-id=hello --ignore-live-nodes",
                "blueprints delete --blueprint-id=hello",
            ]
        );
    }

    #[test]
    fn test_undeploy_cancels_running_executions_first() {
        let manager = Rc::new(FakeManager {
            executions: vec![
                Execution {
                    id: "install-1".to_string(),
                    status: ExecutionStatus::Terminated,
                    workflow_id: Some("install".to_string()),
                    deployment_id: Some("hello".to_string()),
                },
                Execution {
                    id: "scale-1".to_string(),
                    status: ExecutionStatus::Started,
                    workflow_id: Some("scale".to_string()),
                    deployment_id: Some("hello".to_string()),
                },
            ],
            polled_statuses: RefCell::new(VecDeque::from(vec![ExecutionStatus::Cancelled])),
            ..Default::default()
        });
        let sandbox = Sandbox::new().with_manager(Rc::clone(&manager));
        sandbox.generated(Some("10.0.0.5"));

        handle_undeploy(args(&["conf", "hello", "--cancel-executions"]), &sandbox.context).unwrap();

        assert_eq!(
            *manager.calls.borrow(),
            vec!["list:hello", "cancel:scale-1", "get:scale-1"]
        );
        assert_eq!(sandbox.cfy_calls().len(), 3);
    }

    #[test]
    fn test_undeploy_cancel_needs_a_bootstrapped_manager() {
        let manager = Rc::new(FakeManager::default());
        let sandbox = Sandbox::new().with_manager(Rc::clone(&manager));
        sandbox.generated(None);

        let err = handle_undeploy(args(&["conf", "hello", "--cancel-executions"]), &sandbox.context)
            .unwrap_err();

        assert!(err.to_string().contains("Not bootstrapped"));
        assert!(manager.calls.borrow().is_empty());
        assert!(sandbox.cfy_calls().is_empty());
    }
}
