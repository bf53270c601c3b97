//! Workflow controller: the upload/generation state machine of one session.
//!
//! Every operation takes `&mut self`, so a new selection or generate request
//! cannot re-enter the controller while a flow is in flight. Gateway calls
//! are issued one at a time, in order, and are never cancelled.

use chrono::Local;
use std::sync::Arc;

use storydoc_core::disposition::resolve_filename;
use storydoc_core::{
    Activity, FileRef, GeneratedDocument, GenerationError, GenerationGateway, GenerationResponse,
    NoopObserver, Session, SessionView, UploadChannel, UploadGateway, UploadOutcome, UploadReport,
    WorkflowEvent, WorkflowObserver,
};

/// Drives one [`Session`] through upload and generation.
pub struct WorkflowController {
    session: Session,
    activity: Activity,
    uploads: Arc<dyn UploadGateway>,
    generator: Arc<dyn GenerationGateway>,
    observer: Arc<dyn WorkflowObserver>,
}

impl WorkflowController {
    /// Creates a controller for `session` that reports to no observer.
    ///
    /// # Arguments
    ///
    /// * `session` - Session state owned by this controller from now on
    /// * `uploads` - Gateway for both upload channels
    /// * `generator` - Gateway for the generate endpoint
    pub fn new(
        session: Session,
        uploads: Arc<dyn UploadGateway>,
        generator: Arc<dyn GenerationGateway>,
    ) -> Self {
        Self {
            session,
            activity: Activity::Idle,
            uploads,
            generator,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Sets the observer that receives [`WorkflowEvent`]s.
    pub fn with_observer(mut self, observer: Arc<dyn WorkflowObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_id(&self) -> &str {
        &self.session.id
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> SessionView {
        SessionView::new(&self.session, self.activity)
    }

    pub fn set_user_name(&mut self, name: impl Into<String>) {
        self.session.user_name = name.into();
    }

    /// Handles a new user-story selection.
    ///
    /// An empty selection, or one equal to the cached selection, is a no-op
    /// and returns `None`. Otherwise the selection is cached, the upload flag
    /// is reset and the files are uploaded in order; the first failure
    /// aborts the batch.
    pub async fn on_user_stories_selected(&mut self, files: Vec<FileRef>) -> Option<UploadReport> {
        if files.is_empty() || files == self.session.user_stories_selection {
            tracing::debug!(session_id = %self.session.id, "user story selection unchanged");
            return None;
        }

        self.session.user_stories_selection = files;
        self.session.user_stories_uploaded = false;
        let files = self.session.user_stories_selection.clone();
        Some(self.upload_batch(UploadChannel::UserStories, &files).await)
    }

    /// Handles a new schema selection.
    ///
    /// Returns `None` when `file` equals the cached schema selection.
    pub async fn on_schema_selected(&mut self, file: FileRef) -> Option<UploadReport> {
        if self.session.schema_selection.as_ref() == Some(&file) {
            tracing::debug!(session_id = %self.session.id, "schema selection unchanged");
            return None;
        }

        self.session.schema_selection = Some(file.clone());
        self.session.schema_uploaded = false;
        Some(
            self.upload_batch(UploadChannel::DatabaseSchema, std::slice::from_ref(&file))
                .await,
        )
    }

    /// Uploads the cached user-story selection again, even though it has not
    /// changed. Returns `None` when nothing has been selected yet.
    pub async fn resubmit_user_stories(&mut self) -> Option<UploadReport> {
        if self.session.user_stories_selection.is_empty() {
            return None;
        }
        self.session.user_stories_uploaded = false;
        let files = self.session.user_stories_selection.clone();
        Some(self.upload_batch(UploadChannel::UserStories, &files).await)
    }

    /// Uploads the cached schema selection again.
    pub async fn resubmit_schema(&mut self) -> Option<UploadReport> {
        let file = self.session.schema_selection.clone()?;
        self.session.schema_uploaded = false;
        Some(
            self.upload_batch(UploadChannel::DatabaseSchema, std::slice::from_ref(&file))
                .await,
        )
    }

    /// Returns the generate trigger, or `None` while it is disabled.
    ///
    /// Generation is only reachable through the returned token, which exists
    /// only when both uploads are complete.
    pub fn generate_trigger(&mut self) -> Option<GenerateTrigger<'_>> {
        if self.session.can_generate() {
            Some(GenerateTrigger { controller: self })
        } else {
            None
        }
    }

    async fn upload_batch(&mut self, channel: UploadChannel, files: &[FileRef]) -> UploadReport {
        let total = files.len();
        self.set_activity(match channel {
            UploadChannel::UserStories => Activity::UploadingUserStories,
            UploadChannel::DatabaseSchema => Activity::UploadingSchema,
        });
        self.observer
            .notify(&WorkflowEvent::UploadStarted { channel, total });
        tracing::info!(session_id = %self.session.id, %channel, total, "upload started");

        let mut report = UploadReport::new(channel, total);
        for (index, file) in files.iter().enumerate() {
            match self.uploads.upload(channel, file).await {
                Ok(()) => {
                    tracing::info!(%channel, file = file.name(), "uploaded");
                    report.outcomes.push(UploadOutcome::succeeded(file.name()));
                    self.observer.notify(&WorkflowEvent::FileUploaded {
                        channel,
                        filename: file.name().to_string(),
                    });
                    self.observer.notify(&WorkflowEvent::Progress {
                        channel,
                        completed: index + 1,
                        total,
                    });
                }
                Err(err) => {
                    tracing::warn!(%channel, file = file.name(), error = %err, "upload failed, aborting batch");
                    report.outcomes.push(UploadOutcome::failed(file.name(), &err));
                    self.observer.notify(&WorkflowEvent::FileUploadFailed {
                        channel,
                        filename: file.name().to_string(),
                        detail: err.to_string(),
                    });
                    self.observer.notify(&WorkflowEvent::BatchAborted {
                        channel,
                        filename: file.name().to_string(),
                        skipped: total - (index + 1),
                    });
                    break;
                }
            }
        }

        if report.is_complete() {
            match channel {
                UploadChannel::UserStories => self.session.user_stories_uploaded = true,
                UploadChannel::DatabaseSchema => self.session.schema_uploaded = true,
            }
            self.observer
                .notify(&WorkflowEvent::BatchCompleted { channel });
            tracing::info!(session_id = %self.session.id, %channel, "upload complete");
        }

        self.set_activity(Activity::Idle);
        report
    }

    async fn run_generation(&mut self) -> Result<GeneratedDocument, GenerationError> {
        self.session.generated = None;
        self.set_activity(Activity::Generating);
        self.observer.notify(&WorkflowEvent::GenerationStarted);
        tracing::info!(session_id = %self.session.id, "generation requested");

        let result = match self.generator.generate(&self.session.user_name).await {
            Ok(response) => document_from_response(response),
            Err(err) => Err(GenerationError::from(err)),
        };

        match &result {
            Ok(document) => {
                self.session.generated = Some(document.clone());
                tracing::info!(filename = %document.filename, bytes = document.content.len(), "document generated");
                self.observer.notify(&WorkflowEvent::GenerationSucceeded {
                    filename: document.filename.clone(),
                });
            }
            Err(err) => {
                tracing::warn!(error = %err, "generation failed");
                self.observer.notify(&WorkflowEvent::GenerationFailed {
                    message: err.to_string(),
                });
            }
        }

        self.set_activity(Activity::Idle);
        result
    }

    fn set_activity(&mut self, activity: Activity) {
        tracing::debug!(session_id = %self.session.id, ?activity, "activity changed");
        self.activity = activity;
    }
}

/// Enabled generate trigger of a [`WorkflowController`].
///
/// Obtained from [`WorkflowController::generate_trigger`]; holding it keeps
/// the controller borrowed until the request resolves.
pub struct GenerateTrigger<'a> {
    controller: &'a mut WorkflowController,
}

impl GenerateTrigger<'_> {
    /// Clears any stored document and calls the generation gateway exactly
    /// once with the session's user name.
    ///
    /// # Errors
    ///
    /// Connectivity failures, non-success statuses and unreadable responses
    /// are returned as distinct [`GenerationError`] variants. The stored
    /// document stays empty in every error case.
    pub async fn fire(self) -> Result<GeneratedDocument, GenerationError> {
        self.controller.run_generation().await
    }
}

fn document_from_response(
    response: GenerationResponse,
) -> Result<GeneratedDocument, GenerationError> {
    if !response.is_success() {
        return Err(GenerationError::Rejected {
            status: response.status,
            body: response.body,
        });
    }

    let filename = resolve_filename(response.content_disposition.as_deref(), Local::now());
    Ok(GeneratedDocument {
        content: response.body,
        filename,
    })
}

#[cfg(test)]
#[path = "workflow_controller_test.rs"]
mod tests;
