use serde::{Deserialize, Serialize};

use super::model::{GeneratedDocument, Session};

/// What the controller is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    #[default]
    Idle,
    UploadingUserStories,
    UploadingSchema,
    Generating,
}

impl Activity {
    pub fn is_idle(self) -> bool {
        matches!(self, Activity::Idle)
    }
}

/// Upload status line of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Pending,
    Processed,
}

impl UploadStatus {
    fn from_flag(flag: bool) -> Self {
        if flag {
            UploadStatus::Processed
        } else {
            UploadStatus::Pending
        }
    }
}

/// Read-only snapshot of a session for rendering.
///
/// The presentation layer renders only from this value; `generate_enabled`
/// is the single source for the generate trigger's enabled state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: String,
    pub display_name: String,
    pub user_stories: UploadStatus,
    pub schema: UploadStatus,
    pub selected_user_stories: Vec<String>,
    pub selected_schema: Option<String>,
    pub activity: Activity,
    pub generate_enabled: bool,
    pub generated: Option<GeneratedDocument>,
}

impl SessionView {
    pub fn new(session: &Session, activity: Activity) -> Self {
        Self {
            session_id: session.id.clone(),
            display_name: session.display_name().to_string(),
            user_stories: UploadStatus::from_flag(session.user_stories_uploaded),
            schema: UploadStatus::from_flag(session.schema_uploaded),
            selected_user_stories: session
                .user_stories_selection
                .iter()
                .map(|file| file.name().to_string())
                .collect(),
            selected_schema: session
                .schema_selection
                .as_ref()
                .map(|file| file.name().to_string()),
            activity,
            generate_enabled: activity.is_idle() && session.can_generate(),
            generated: session.generated.clone(),
        }
    }
}
