//! Workflow observers.
//!
//! `ChannelObserver` forwards events to an async consumer (e.g. a UI task);
//! `TracingObserver` turns them into log records.

use std::sync::Arc;
use tokio::sync::mpsc;

use storydoc_core::{WorkflowEvent, WorkflowObserver};

/// Sends every event into an unbounded channel.
pub struct ChannelObserver {
    sender: mpsc::UnboundedSender<WorkflowEvent>,
}

impl ChannelObserver {
    /// Create a new observer with the given channel sender
    pub fn new(sender: mpsc::UnboundedSender<WorkflowEvent>) -> Self {
        Self { sender }
    }

    /// Creates an observer together with the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<WorkflowEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl WorkflowObserver for ChannelObserver {
    fn notify(&self, event: &WorkflowEvent) {
        // Non-blocking send - if the receiver is dropped, we just skip
        let _ = self.sender.send(event.clone());
    }
}

/// Logs every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl WorkflowObserver for TracingObserver {
    fn notify(&self, event: &WorkflowEvent) {
        match event {
            WorkflowEvent::FileUploadFailed {
                channel,
                filename,
                detail,
            } => tracing::warn!(%channel, %filename, %detail, "file upload failed"),
            WorkflowEvent::BatchAborted {
                channel,
                filename,
                skipped,
            } => tracing::warn!(%channel, %filename, skipped, "upload batch aborted"),
            WorkflowEvent::GenerationFailed { message } => {
                tracing::warn!(%message, "generation failed")
            }
            other => tracing::debug!(event = ?other, "workflow event"),
        }
    }
}

/// Fans each event out to several observers, in order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn WorkflowObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn WorkflowObserver>) -> Self {
        self.observers.push(observer);
        self
    }
}

impl WorkflowObserver for CompositeObserver {
    fn notify(&self, event: &WorkflowEvent) {
        for observer in &self.observers {
            observer.notify(event);
        }
    }
}
