/*!
 * Job event reporting.
 *
 * The orchestrator reports to a `JobObserver`: zero or more `on_progress`
 * calls (one per file reaching a terminal state), then exactly one
 * `on_complete`. Observers are called from the task running the job, one
 * event at a time, in that order.
 */

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::job::{BatchResult, ProgressSnapshot};

/// Receives progress and completion events for one job
pub trait JobObserver: Send + Sync {
    /// A file reached a terminal state
    fn on_progress(&self, _snapshot: &ProgressSnapshot) {}

    /// The job finished; always the last event
    fn on_complete(&self, _result: &BatchResult) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl JobObserver for NoopObserver {}

/// Event forwarded by channel and recording observers
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    Progress(ProgressSnapshot),
    Complete(BatchResult),
}

/// Forwards events to an unbounded channel, for consumers on another task
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: mpsc::UnboundedSender<JobEvent>,
}

impl ChannelObserver {
    /// Create the observer and the receiving end of its channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<JobEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl JobObserver for ChannelObserver {
    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        // A dropped receiver means nobody is listening any more
        let _ = self.sender.send(JobEvent::Progress(snapshot.clone()));
    }

    fn on_complete(&self, result: &BatchResult) {
        let _ = self.sender.send(JobEvent::Complete(result.clone()));
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<JobEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in the order they were received
    pub fn events(&self) -> Vec<JobEvent> {
        self.events.lock().clone()
    }

    /// Progress snapshots only
    pub fn progress(&self) -> Vec<ProgressSnapshot> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                JobEvent::Progress(snapshot) => Some(snapshot.clone()),
                JobEvent::Complete(_) => None,
            })
            .collect()
    }

    /// Completion events only
    pub fn completions(&self) -> Vec<BatchResult> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                JobEvent::Complete(result) => Some(result.clone()),
                JobEvent::Progress(_) => None,
            })
            .collect()
    }
}

impl JobObserver for RecordingObserver {
    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        self.events.lock().push(JobEvent::Progress(snapshot.clone()));
    }

    fn on_complete(&self, result: &BatchResult) {
        self.events.lock().push(JobEvent::Complete(result.clone()));
    }
}
