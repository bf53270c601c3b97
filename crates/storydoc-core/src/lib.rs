//! Domain layer for StoryDoc.
//!
//! Holds the per-session workflow state, the gateway interfaces the workflow
//! controller drives, and the small pure helpers (endpoint derivation,
//! download filename resolution) shared by the other crates.

pub mod disposition;
pub mod endpoints;
pub mod error;
pub mod event;
pub mod file;
pub mod gateway;
pub mod session;
pub mod upload;

pub use endpoints::ServiceEndpoints;
pub use error::{GatewayError, GenerationError, Result, StorydocError};
pub use event::{NoopObserver, WorkflowEvent, WorkflowObserver};
pub use file::{FileRef, UploadChannel};
pub use gateway::{GenerationGateway, GenerationResponse, UploadGateway};
pub use session::{Activity, GeneratedDocument, Session, SessionView, UploadStatus};
pub use upload::{UploadOutcome, UploadReport};
