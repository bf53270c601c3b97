//! Infrastructure layer for StoryDoc.
//!
//! Configuration resolution and the local filesystem side of the workflow:
//! reading selected files into `FileRef`s and writing downloads.

pub mod config;
pub mod download;
pub mod file_loader;
pub mod paths;

pub use config::{AppConfig, ConfigLoader, ConfigOverrides};
pub use download::save_document;
pub use file_loader::{load_file, load_selection};
pub use paths::StorydocPaths;
