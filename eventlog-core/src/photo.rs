//! Photo upload intent and the constraints checked before any upload.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EventLogError, EventLogResult};
use crate::validation::{Checker, FieldPath};

/// 30 MB
pub const MAX_UPLOAD_SIZE: u64 = 30 * 1024 * 1024;

pub const ACCEPTED_FILE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

pub const FILE_TOO_LARGE: &str = "ファイルサイズを30MB以内にしてください";
pub const FILE_TYPE_NOT_ALLOWED: &str = "画像ファイルのみアップロードできます";

/// A file the user picked for upload. Lives only for one submission.
#[derive(Clone, PartialEq)]
pub struct PhotoCandidate {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoCandidate {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        PhotoCandidate {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing the MIME type from its extension.
    ///
    /// At most `max_bytes + 1` bytes are read: enough for [`PhotoRules::check`]
    /// to flag an oversized file without loading all of it.
    pub fn from_path(path: &Path, max_bytes: u64) -> EventLogResult<Self> {
        let mut bytes = Vec::new();
        File::open(path)?
            .take(max_bytes.saturating_add(1))
            .read_to_end(&mut bytes)?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                EventLogError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("Not a file path: {}", path.display()),
                ))
            })?
            .to_string();

        let mime_type = path
            .extension()
            .and_then(|e| e.to_str())
            .map(mime_from_extension)
            .unwrap_or("application/octet-stream");

        Ok(PhotoCandidate::new(file_name, mime_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

// Bytes omitted, photos run to megabytes.
impl fmt::Debug for PhotoCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoCandidate")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size())
            .finish()
    }
}

fn mime_from_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Size limit and MIME allow-list for photo uploads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoRules {
    pub max_upload_bytes: u64,
    pub accepted_file_types: Vec<String>,
}

impl Default for PhotoRules {
    fn default() -> Self {
        PhotoRules {
            max_upload_bytes: MAX_UPLOAD_SIZE,
            accepted_file_types: ACCEPTED_FILE_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl PhotoRules {
    /// Size and type are checked independently; a file can fail both.
    pub fn check(&self, checker: &mut Checker, path: &FieldPath, photo: &PhotoCandidate) {
        checker.ensure(photo.size() <= self.max_upload_bytes, path, FILE_TOO_LARGE);
        checker.ensure(
            self.accepted_file_types.iter().any(|t| *t == photo.mime_type),
            path,
            FILE_TYPE_NOT_ALLOWED,
        );
    }
}
