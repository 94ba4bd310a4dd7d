use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file stored inline in the media library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    /// Folder id, None for the library root
    #[serde(default)]
    pub folder: Option<String>,
    /// `data:` URL with the base64-encoded contents
    pub url: String,
    pub checksum: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFolder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied details for an upload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetadata {
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}
