use std::path::PathBuf;

use actix_multipart::form::tempfile::TempFile;
use tracing::info;
use uuid::Uuid;

use super::models::{extension_for, mime_for, parse_stored_name, UploadKind, MAX_UPLOAD_BYTES};
use crate::api::error::ApiError;

/// A stored upload
#[derive(Debug)]
pub struct StoredFile {
    pub kind: UploadKind,
    pub name: String,
}

/// Documents kept on local disk under `UPLOAD_DIR/{kind}s/`
#[derive(Clone)]
pub struct UploadService {
    root: PathBuf,
}

impl UploadService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn store(&self, file: &TempFile, kind: UploadKind) -> Result<StoredFile, ApiError> {
        let mime = file.content_type.as_ref().map(|m| m.essence_str()).unwrap_or_default();
        let ext = check_upload(mime, file.size)?;

        let folder = self.root.join(kind.folder());
        tokio::fs::create_dir_all(&folder)
            .await
            .map_err(|e| ApiError::Internal(format!("cannot create {}: {}", folder.display(), e)))?;

        let name = format!("{}.{}", Uuid::new_v4(), ext);
        let dest = folder.join(&name);
        tokio::fs::copy(file.file.path(), &dest)
            .await
            .map_err(|e| ApiError::Internal(format!("cannot store {}: {}", dest.display(), e)))?;

        info!("Stored {} upload {} ({} bytes)", kind.as_str(), name, file.size);
        Ok(StoredFile { kind, name })
    }

    /// File contents and mime type of a stored upload
    pub async fn read(&self, kind: &str, name: &str) -> Result<(Vec<u8>, &'static str), ApiError> {
        let kind: UploadKind = kind.parse().map_err(|_| ApiError::NotFound("File"))?;
        let (_, ext) = parse_stored_name(name).ok_or(ApiError::NotFound("File"))?;
        let mime = mime_for(ext).ok_or(ApiError::NotFound("File"))?;

        let path = self.root.join(kind.folder()).join(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok((bytes, mime)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ApiError::NotFound("File")),
            Err(e) => Err(ApiError::Internal(format!("cannot read {}: {}", path.display(), e))),
        }
    }
}

/// Extension to store the file under, if its type and size are acceptable
fn check_upload(mime: &str, size: usize) -> Result<&'static str, ApiError> {
    let ext = extension_for(mime).ok_or_else(|| {
        ApiError::bad_request("Invalid file type. Only PDF, DOC, and DOCX files are allowed.")
    })?;
    if size > MAX_UPLOAD_BYTES {
        return Err(ApiError::bad_request("File size too large. Maximum size is 10MB."));
    }
    Ok(ext)
}
