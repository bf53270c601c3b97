//! Results of upload batches.

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::file::UploadChannel;

/// Result of one upload gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub filename: String,
    pub success: bool,
    pub error_detail: Option<String>,
}

impl UploadOutcome {
    pub fn succeeded(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            success: true,
            error_detail: None,
        }
    }

    pub fn failed(filename: impl Into<String>, error: &GatewayError) -> Self {
        Self {
            filename: filename.into(),
            success: false,
            error_detail: Some(error.to_string()),
        }
    }
}

/// Outcome of one submitted selection on a channel.
///
/// `outcomes` holds one entry per attempted file, in order. A batch stops at
/// the first failure, so `outcomes.len()` can be smaller than `total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReport {
    pub channel: UploadChannel,
    pub total: usize,
    pub outcomes: Vec<UploadOutcome>,
}

impl UploadReport {
    pub fn new(channel: UploadChannel, total: usize) -> Self {
        Self {
            channel,
            total,
            outcomes: Vec::with_capacity(total),
        }
    }

    /// Every file of the batch was attempted and succeeded.
    pub fn is_complete(&self) -> bool {
        self.total > 0
            && self.outcomes.len() == self.total
            && self.outcomes.iter().all(|outcome| outcome.success)
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// The outcome that aborted the batch, if any.
    pub fn failure(&self) -> Option<&UploadOutcome> {
        self.outcomes.iter().find(|outcome| !outcome.success)
    }

    /// Files that were never attempted because an earlier one failed.
    pub fn skipped(&self) -> usize {
        self.total - self.outcomes.len()
    }
}
