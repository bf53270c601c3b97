use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::file::FileRef;

/// Name shown when the user has not entered one.
pub const GUEST_NAME: &str = "Guest";

/// Content type offered for downloads of the generated document.
pub const GENERATED_CONTENT_TYPE: &str = "text/plain";

/// A document returned by one successful generate call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub content: String,
    pub filename: String,
}

impl GeneratedDocument {
    pub fn content_type(&self) -> &'static str {
        GENERATED_CONTENT_TYPE
    }
}

/// One interactive user's workflow state.
///
/// Created empty, mutated only by the workflow controller, dropped when the
/// session ends. Nothing here is persisted.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_name: String,
    pub user_stories_uploaded: bool,
    pub schema_uploaded: bool,
    /// Last user-story selection seen; used only for change detection.
    pub user_stories_selection: Vec<FileRef>,
    pub schema_selection: Option<FileRef>,
    pub generated: Option<GeneratedDocument>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_name: String::new(),
            user_stories_uploaded: false,
            schema_uploaded: false,
            user_stories_selection: Vec::new(),
            schema_selection: None,
            generated: None,
        }
    }

    /// Both uploads are complete, so generation may be requested.
    pub fn can_generate(&self) -> bool {
        self.user_stories_uploaded && self.schema_uploaded
    }

    pub fn display_name(&self) -> &str {
        let trimmed = self.user_name.trim();
        if trimmed.is_empty() { GUEST_NAME } else { trimmed }
    }

    pub fn generated_content(&self) -> Option<&str> {
        self.generated.as_ref().map(|doc| doc.content.as_str())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
