// src/core/cancellation.rs

use crate::constants::{CANCEL_POLL_INTERVAL_MS, CANCEL_POLL_LIMIT};
use crate::models::{Execution, ExecutionStatus};
use crate::system::manager_client::{ClientError, ManagerClient};
use std::thread;
use std::time::Duration;

/// Bounds of the wait for an execution to reach `cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Re-reads allowed before the status is forced.
    pub limit: u32,
    /// Pause before each re-read.
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            limit: CANCEL_POLL_LIMIT,
            interval: Duration::from_millis(CANCEL_POLL_INTERVAL_MS),
        }
    }
}

/// How a cancelled execution reached `cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The manager reported `cancelled` after `polls` re-reads.
    Cancelled { polls: u32 },
    /// The poll limit ran out; the status was overwritten with `cancelled`.
    Forced,
}

/// Cancels every execution of `deployment_id` that has not ended yet.
///
/// Returns the id and outcome of each execution that was cancelled.
pub fn cancel_active_executions(
    client: &dyn ManagerClient,
    deployment_id: &str,
    policy: PollPolicy,
) -> Result<Vec<(String, CancelOutcome)>, ClientError> {
    let mut outcomes = Vec::new();
    for execution in client.list_executions(deployment_id)? {
        if execution.status.is_end_state() {
            continue;
        }
        let id = execution.id.clone();
        let outcome = cancel_and_wait(client, &execution, policy)?;
        outcomes.push((id, outcome));
    }
    Ok(outcomes)
}

/// Requests cancellation of `execution` and blocks until the manager reports it
/// as `cancelled`, re-reading at most `policy.limit` times. Once the limit is
/// reached the status is forced to `cancelled` without another read.
pub fn cancel_and_wait(
    client: &dyn ManagerClient,
    execution: &Execution,
    policy: PollPolicy,
) -> Result<CancelOutcome, ClientError> {
    log::info!("Cancelling execution {}", execution.id);
    let mut current = client.cancel_execution(&execution.id)?;
    let mut polls = 0;
    while current.status != ExecutionStatus::Cancelled {
        if polls >= policy.limit {
            log::warn!(
                "Execution {} still '{:?}' after {} checks; forcing it to cancelled.",
                execution.id,
                current.status,
                polls
            );
            client.update_execution_status(&execution.id, ExecutionStatus::Cancelled)?;
            return Ok(CancelOutcome::Forced);
        }
        thread::sleep(policy.interval);
        current = client.get_execution(&execution.id)?;
        polls += 1;
    }
    Ok(CancelOutcome::Cancelled { polls })
}
