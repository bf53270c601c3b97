//! Download action: writes a generated document to disk.

use std::path::{Path, PathBuf};

use storydoc_core::{GeneratedDocument, Result, StorydocError};

/// Writes `document` into `dir` under its stored filename.
///
/// Only the final path component of the filename is used, so a
/// service-suggested name cannot escape `dir`.
pub async fn save_document(document: &GeneratedDocument, dir: &Path) -> Result<PathBuf> {
    let file_name = Path::new(&document.filename)
        .file_name()
        .ok_or_else(|| {
            StorydocError::validation(format!(
                "'{}' is not a usable file name",
                document.filename
            ))
        })?
        .to_owned();

    tokio::fs::create_dir_all(dir).await?;
    let target = dir.join(file_name);
    tokio::fs::write(&target, document.content.as_bytes()).await?;

    tracing::info!(path = %target.display(), bytes = document.content.len(), "saved generated document");
    Ok(target)
}
