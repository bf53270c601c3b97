//! Per-user session registry.
//!
//! Each session gets its own [`WorkflowController`] behind its own mutex, so
//! concurrent users never share selections, flags or generated documents,
//! and one user's flow in flight cannot be re-entered.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use storydoc_core::{GenerationGateway, Session, UploadGateway, WorkflowObserver};

use crate::workflow_controller::WorkflowController;

/// Shared handle to one session's controller.
pub type SessionHandle = Arc<Mutex<WorkflowController>>;

/// Creates and tracks isolated workflow sessions.
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
    uploads: Arc<dyn UploadGateway>,
    generator: Arc<dyn GenerationGateway>,
    observer: Option<Arc<dyn WorkflowObserver>>,
}

impl SessionRegistry {
    /// Creates an empty registry whose sessions share the given gateways.
    ///
    /// Gateways are stateless from the workflow's point of view; only the
    /// per-session controller state is isolated.
    pub fn new(uploads: Arc<dyn UploadGateway>, generator: Arc<dyn GenerationGateway>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            uploads,
            generator,
            observer: None,
        }
    }

    /// Sets the observer attached to every session created afterwards.
    pub fn with_observer(mut self, observer: Arc<dyn WorkflowObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Starts a new session and returns its handle.
    pub async fn create_session(&self) -> SessionHandle {
        let session = Session::new();
        let session_id = session.id.clone();

        let mut controller =
            WorkflowController::new(session, self.uploads.clone(), self.generator.clone());
        if let Some(observer) = &self.observer {
            controller = controller.with_observer(observer.clone());
        }
        let handle = Arc::new(Mutex::new(controller));

        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.clone(), handle.clone());
        tracing::info!(%session_id, "session started");

        handle
    }

    /// Gets a session by ID.
    pub async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// Ends a session, dropping its state.
    pub async fn end_session(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(session_id).is_some();
        if removed {
            tracing::info!(%session_id, "session ended");
        }
        removed
    }

    pub async fn session_ids(&self) -> Vec<String> {
        let sessions = self.sessions.read().await;
        sessions.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
