// EN: src/system/events.rs

use crate::constants::EVENTS_POLL_INTERVAL_MS;
use crate::system::manager_client::{ClientError, ManagerClient};
use serde_json::Value as JsonValue;
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventsError {
    #[error("Batch size must be greater than zero.")]
    InvalidBatchSize,
    #[error("Timed out after {timeout:?} waiting for execution '{execution_id}' to end.")]
    Timeout {
        execution_id: String,
        timeout: Duration,
    },
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Pages through the events of one execution until it has ended.
pub struct EventsFetcher<'a> {
    client: &'a dyn ManagerClient,
    execution_id: String,
    batch_size: usize,
    include_logs: bool,
    poll_interval: Duration,
}

impl fmt::Debug for EventsFetcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventsFetcher")
            .field("execution_id", &self.execution_id)
            .field("batch_size", &self.batch_size)
            .field("include_logs", &self.include_logs)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl<'a> EventsFetcher<'a> {
    /// A fetcher polling once per second; see [`Self::with_poll_interval`].
    pub fn new(
        client: &'a dyn ManagerClient,
        execution_id: impl Into<String>,
        batch_size: usize,
        include_logs: bool,
    ) -> Self {
        Self {
            client,
            execution_id: execution_id.into(),
            batch_size,
            include_logs,
            poll_interval: Duration::from_millis(EVENTS_POLL_INTERVAL_MS),
        }
    }

    /// Pause between two reads of an execution that has not ended.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Delivers every non-empty batch to `handler`, in order, and returns the
    /// total number of events delivered.
    ///
    /// The execution status is read before each drain, so once an ended
    /// status is seen the following drain is the last one.
    pub fn fetch_and_process_events<F>(
        &self,
        mut handler: F,
        timeout: Duration,
    ) -> Result<usize, EventsError>
    where
        F: FnMut(Vec<JsonValue>),
    {
        if self.batch_size == 0 {
            return Err(EventsError::InvalidBatchSize);
        }
        // Too far out to represent means no deadline at all.
        let deadline = Instant::now().checked_add(timeout);
        let mut offset = 0;
        loop {
            let ended = self
                .client
                .get_execution(&self.execution_id)?
                .status
                .is_end_state();
            self.drain(&mut offset, &mut handler)?;
            if ended {
                log::debug!("Execution {} ended; {} events fetched", self.execution_id, offset);
                return Ok(offset);
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(EventsError::Timeout {
                    execution_id: self.execution_id.clone(),
                    timeout,
                });
            }
            thread::sleep(self.poll_interval);
        }
    }

    fn drain<F>(&self, offset: &mut usize, handler: &mut F) -> Result<(), EventsError>
    where
        F: FnMut(Vec<JsonValue>),
    {
        loop {
            let page = self.client.list_events(
                &self.execution_id,
                *offset,
                self.batch_size,
                self.include_logs,
            )?;
            if page.items.is_empty() {
                return Ok(());
            }
            *offset += page.items.len();
            handler(page.items);
        }
    }
}

/// Accumulates delivered batches in arrival order.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<JsonValue>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `batch` and returns how many events have been collected so far.
    pub fn handle(&mut self, batch: Vec<JsonValue>) -> usize {
        self.events.extend(batch);
        self.events.len()
    }

    /// Everything collected so far, in arrival order.
    pub fn events(&self) -> &[JsonValue] {
        &self.events
    }

    pub fn into_events(self) -> Vec<JsonValue> {
        self.events
    }
}
