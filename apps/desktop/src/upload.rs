use std::path::Path;

use anyhow::{Context, Result};
use shared::domain::{DocumentPayload, DocumentUpload};

/// Reads a document from disk; its file name becomes the admission key.
pub async fn load_upload(path: &Path) -> Result<DocumentUpload> {
    let display_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .with_context(|| format!("'{}' does not name a file", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let mime_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string());

    Ok(DocumentUpload::new(
        display_name,
        DocumentPayload::new(bytes, mime_type),
    ))
}
