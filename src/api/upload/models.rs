use std::str::FromStr;

use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use serde::Serialize;
use uuid::Uuid;

/// Largest accepted upload, in bytes
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Multipart body ceiling: one maximal file plus headroom for the other
/// parts, so oversized files still reach the size check
pub const MULTIPART_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    // Above MAX_UPLOAD_BYTES so the service reports oversized files itself
    #[multipart(limit = "11MiB")]
    pub file: TempFile,
    #[multipart(rename = "type")]
    pub kind: Option<Text<String>>,
}

/// What an uploaded document is for; decides its storage folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Resume,
    Document,
}

impl UploadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            UploadKind::Resume => "resume",
            UploadKind::Document => "document",
        }
    }

    /// Folder under the upload root
    pub fn folder(self) -> &'static str {
        match self {
            UploadKind::Resume => "resumes",
            UploadKind::Document => "documents",
        }
    }
}

impl FromStr for UploadKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "resume" => Ok(UploadKind::Resume),
            "document" => Ok(UploadKind::Document),
            _ => Err(()),
        }
    }
}

/// Accepted document formats as (mime type, extension)
const DOCUMENT_TYPES: [(&str, &str); 3] = [
    ("application/pdf", "pdf"),
    ("application/msword", "doc"),
    ("application/vnd.openxmlformats-officedocument.wordprocessingml.document", "docx"),
];

/// Extension to store a file of `mime` under, if the type is accepted
pub fn extension_for(mime: &str) -> Option<&'static str> {
    DOCUMENT_TYPES
        .iter()
        .find(|(m, _)| m.eq_ignore_ascii_case(mime))
        .map(|(_, ext)| *ext)
}

pub fn mime_for(extension: &str) -> Option<&'static str> {
    DOCUMENT_TYPES
        .iter()
        .find(|(_, ext)| *ext == extension)
        .map(|(m, _)| *m)
}

/// Accept only names this service generated: `{uuid}.{ext}`
pub fn parse_stored_name(name: &str) -> Option<(Uuid, &'static str)> {
    let (stem, ext) = name.rsplit_once('.')?;
    let id = Uuid::parse_str(stem).ok()?;
    let ext = DOCUMENT_TYPES.iter().find(|(_, e)| *e == ext)?.1;
    Some((id, ext))
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub public_id: String,
    pub file_name: Option<String>,
    pub size: usize,
}
