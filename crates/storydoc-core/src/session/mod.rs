//! Session domain module.
//!
//! - `model`: the per-user workflow state (`Session`, `GeneratedDocument`)
//! - `view`: read-only snapshot handed to the presentation layer

mod model;
mod view;

pub use model::{GENERATED_CONTENT_TYPE, GUEST_NAME, GeneratedDocument, Session};
pub use view::{Activity, SessionView, UploadStatus};
