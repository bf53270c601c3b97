//! Turns local paths into `FileRef` selections.

use std::path::Path;

use storydoc_core::{FileRef, Result, StorydocError, UploadChannel};

/// Reads one file for `channel`, rejecting extensions outside its allow-list.
///
/// The content-type hint is guessed from the extension.
pub async fn load_file(channel: UploadChannel, path: &Path) -> Result<FileRef> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            StorydocError::validation(format!("'{}' has no usable file name", path.display()))
        })?
        .to_string();
    channel.check(&name)?;

    let data = tokio::fs::read(path).await.map_err(|err| {
        StorydocError::io(format!("Failed to read {}: {}", path.display(), err))
    })?;
    let content_type = mime_guess::from_path(path).first_or_octet_stream();

    tracing::debug!(file = %name, bytes = data.len(), %content_type, "loaded selection file");
    Ok(FileRef::new(name, content_type.essence_str(), data))
}

/// Reads a whole selection in the given order.
pub async fn load_selection<P: AsRef<Path>>(
    channel: UploadChannel,
    paths: &[P],
) -> Result<Vec<FileRef>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(load_file(channel, path.as_ref()).await?);
    }
    Ok(files)
}
