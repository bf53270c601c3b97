//! Workflow notifications for the presentation layer.

use serde::{Deserialize, Serialize};

use crate::file::UploadChannel;

/// Events emitted by the workflow controller while it works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowEvent {
    /// A new selection started uploading.
    UploadStarted { channel: UploadChannel, total: usize },
    /// One file was accepted by the service.
    FileUploaded {
        channel: UploadChannel,
        filename: String,
    },
    /// One file was rejected or could not be sent.
    FileUploadFailed {
        channel: UploadChannel,
        filename: String,
        detail: String,
    },
    /// Emitted after each successful file of a batch.
    Progress {
        channel: UploadChannel,
        completed: usize,
        total: usize,
    },
    /// Every file of the selection succeeded; the view should refresh.
    BatchCompleted { channel: UploadChannel },
    /// The batch stopped at `filename`; remaining files were not attempted.
    BatchAborted {
        channel: UploadChannel,
        filename: String,
        skipped: usize,
    },
    GenerationStarted,
    GenerationSucceeded { filename: String },
    GenerationFailed { message: String },
}

/// Receives workflow events.
///
/// Called synchronously from inside the controller; implementations should
/// return quickly.
pub trait WorkflowObserver: Send + Sync {
    fn notify(&self, event: &WorkflowEvent);
}

/// Observer that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl WorkflowObserver for NoopObserver {
    fn notify(&self, _event: &WorkflowEvent) {}
}
