//! Wire types for the remote storage service.

use serde::Deserialize;

/// A file or folder as reported by the storage service's listing.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEntry {
    /// Entry name (no path component).
    pub name: String,
    /// Whether the entry is a folder.
    pub is_folder: bool,
    /// Size in bytes; meaningful for files only.
    #[serde(default)]
    pub size: u64,
    /// Opaque download handle; present for files.
    #[serde(default)]
    pub handle: Option<String>,
}

impl RemoteEntry {
    /// Construct a folder entry.
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: true,
            size: 0,
            handle: None,
        }
    }

    /// Construct a file entry with a download handle.
    pub fn file(name: impl Into<String>, size: u64, handle: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: false,
            size,
            handle: Some(handle.into()),
        }
    }
}

/// Response of `GET /list`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub files: Vec<RemoteEntry>,
}

/// Response of `POST /mkdir`, `POST /move`, `POST /copy`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ActionResponse {
    /// Error text to show the user when `success` is false.
    pub fn error_text(&self) -> &str {
        self.error.as_deref().unwrap_or("unknown error")
    }
}

/// Response of `POST /upload-book`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
