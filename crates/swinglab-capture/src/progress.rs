//! Progress reporting for extraction runs.
//!
//! A callback-based channel that lets the pipeline emit progress without
//! being coupled to the transport (UI, logging, websocket). Senders never
//! block: events are dropped when the consumer falls behind.

use tokio::sync::mpsc;

use swinglab_models::ProgressReport;

/// Progress event emitted during an extraction run.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The run started with this many targeted samples.
    Started { frames_total: u32 },

    /// One sample finished (successfully or as a gap).
    Frame(ProgressReport),

    /// The run completed.
    Complete,

    /// The run failed.
    Failed { error: String },
}

/// Progress sender for async contexts.
///
/// Uses a bounded channel to avoid blocking the extraction loop.
#[derive(Clone)]
pub struct ProgressSender {
    tx: mpsc::Sender<ProgressEvent>,
}

impl ProgressSender {
    pub fn new(tx: mpsc::Sender<ProgressEvent>) -> Self {
        Self { tx }
    }

    /// Send a progress event (non-blocking, drops when full).
    pub fn send(&self, event: ProgressEvent) {
        let _ = self.tx.try_send(event);
    }

    pub fn started(&self, frames_total: u32) {
        self.send(ProgressEvent::Started { frames_total });
    }

    pub fn frame(&self, report: ProgressReport) {
        self.send(ProgressEvent::Frame(report));
    }

    pub fn complete(&self) {
        self.send(ProgressEvent::Complete);
    }

    pub fn failed(&self, error: impl Into<String>) {
        self.send(ProgressEvent::Failed {
            error: error.into(),
        });
    }
}

/// Progress receiver for collecting events.
pub struct ProgressReceiver {
    rx: mpsc::Receiver<ProgressEvent>,
}

impl ProgressReceiver {
    /// Receive the next progress event.
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        self.rx.recv().await
    }

    /// Try to receive a progress event without blocking.
    pub fn try_recv(&mut self) -> Option<ProgressEvent> {
        self.rx.try_recv().ok()
    }
}

/// Create a progress channel pair.
pub fn channel(capacity: usize) -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ProgressSender::new(tx), ProgressReceiver { rx })
}

/// A no-op sender for when progress reporting is not needed.
pub fn noop_sender() -> ProgressSender {
    let (tx, _rx) = mpsc::channel(1);
    ProgressSender::new(tx)
}
