// EN: src/cli/handlers/events.rs

use anyhow::{Context, Result};
use clap::Parser;
use std::{fs, io::Write, time::Duration};

use crate::{
    cli::args::EventsArgs,
    context::AppContext,
    system::events::{EventCollector, EventsFetcher},
};

use super::commons;

/// The main handler for the `events` command.
///
/// Progress goes to stderr so that stdout carries nothing but the JSON array
/// when no output file is given.
pub fn handle(args: Vec<String>, context: &AppContext) -> Result<()> {
    let events_args = EventsArgs::try_parse_from(&args)?;
    let Some(workspace) = commons::existing_workspace(context, &events_args.configuration)? else {
        return Ok(());
    };
    let client = commons::manager_client(context, &workspace)?;

    let fetcher = EventsFetcher::new(
        client.as_ref(),
        events_args.execution_id.as_str(),
        events_args.batch_size,
        events_args.include_logs,
    );
    let mut collector = EventCollector::new();
    fetcher
        .fetch_and_process_events(
            |batch| {
                let fetched = collector.handle(batch);
                eprintln!("Fetched: {}", fetched);
            },
            Duration::from_secs(events_args.timeout),
        )
        .with_context(|| format!("Could not fetch events of execution '{}'", events_args.execution_id))?;

    let events_json = serde_json::to_string(collector.events())?;
    match &events_args.output {
        Some(path) => fs::write(path, events_json)
            .with_context(|| format!("Could not write events to '{}'", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(events_json.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::handlers::testing::Sandbox;
    use crate::models::ExecutionStatus;
    use crate::system::manager_client::testing::FakeManager;
    use serde_json::{Value as JsonValue, json};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[test]
    fn test_events_are_written_to_the_output_file() {
        let manager = Rc::new(FakeManager {
            polled_statuses: RefCell::new(VecDeque::from(vec![ExecutionStatus::Terminated])),
            event_pages: RefCell::new(VecDeque::from(vec![
                vec![json!({"event_type": "workflow_started"})],
                vec![json!({"event_type": "workflow_succeeded"})],
            ])),
            ..Default::default()
        });
        let sandbox = Sandbox::new().with_manager(Rc::clone(&manager));
        sandbox.generated(Some("10.0.0.5"));
        let output = sandbox.root().join("events.json");

        handle(
            vec![
                "conf".to_string(),
                "exec-1".to_string(),
                "--output".to_string(),
                output.display().to_string(),
                "--batch-size".to_string(),
                "1".to_string(),
            ],
            &sandbox.context,
        )
        .unwrap();

        let written: JsonValue = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(
            written,
            json!([
                {"event_type": "workflow_started"},
                {"event_type": "workflow_succeeded"}
            ])
        );
        assert_eq!(manager.calls_to("events:exec-1"), 3);
    }

    #[test]
    fn test_events_of_missing_workspace_fetch_nothing() {
        let manager = Rc::new(FakeManager::default());
        let sandbox = Sandbox::new().with_manager(Rc::clone(&manager));

        handle(vec!["conf".to_string(), "exec-1".to_string()], &sandbox.context).unwrap();

        assert!(manager.calls.borrow().is_empty());
    }
}
