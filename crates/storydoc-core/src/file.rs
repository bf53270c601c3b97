//! File selections and upload channels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, StorydocError};

/// Content type used when the selection carries no better hint.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A named binary payload plus a content-type hint.
///
/// Immutable once built. The payload is shared, so cloning a selection
/// does not copy file contents. Two `FileRef`s are equal when name, content
/// type and bytes are all equal.
#[derive(Clone, PartialEq, Eq)]
pub struct FileRef {
    name: String,
    content_type: String,
    data: Arc<[u8]>,
}

impl FileRef {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Arc<[u8]>>,
    ) -> Self {
        let content_type = content_type.into();
        Self {
            name: name.into(),
            content_type: if content_type.trim().is_empty() {
                DEFAULT_CONTENT_TYPE.to_string()
            } else {
                content_type
            },
            data: data.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileRef")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// The two upload destinations of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadChannel {
    UserStories,
    DatabaseSchema,
}

impl UploadChannel {
    /// Path appended to the service base URL.
    pub fn endpoint_suffix(self) -> &'static str {
        match self {
            UploadChannel::UserStories => "/upload/userstories",
            UploadChannel::DatabaseSchema => "/upload/databaseschema",
        }
    }

    /// Extensions the selection controls accept for this channel.
    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            UploadChannel::UserStories => &["txt", "md", "json", "csv"],
            UploadChannel::DatabaseSchema => &["sql", "json", "yaml", "txt"],
        }
    }

    pub fn accepts(self, file_name: &str) -> bool {
        extension_of(file_name)
            .map(|ext| self.allowed_extensions().contains(&ext.as_str()))
            .unwrap_or(false)
    }

    /// Rejects a file name whose extension is not on the allow-list.
    pub fn check(self, file_name: &str) -> Result<()> {
        if self.accepts(file_name) {
            Ok(())
        } else {
            Err(StorydocError::validation(format!(
                "'{}' is not an accepted {} file (allowed: {})",
                file_name,
                self.label(),
                self.allowed_extensions().join(", ")
            )))
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            UploadChannel::UserStories => "user stories",
            UploadChannel::DatabaseSchema => "database schema",
        }
    }
}

impl fmt::Display for UploadChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
