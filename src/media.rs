use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use image::GenericImageView;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::{read_json, write_json, KeyValueStore, StorageError};
use crate::models::{MediaFile, MediaFolder, UploadMetadata};

pub const MEDIA_FILES_KEY: &str = "media_library_files";
pub const MEDIA_FOLDERS_KEY: &str = "media_library_folders";

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("File is {size} bytes, larger than the {max} byte limit")]
    TooLarge { size: u64, max: u64 },
    #[error("File name cannot be empty")]
    EmptyName,
    #[error("Folder {0} not found")]
    FolderNotFound(String),
    #[error("Folder {0} still contains files")]
    FolderNotEmpty(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

// Convert MediaError to CmsError
impl From<MediaError> for crate::CmsError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Storage(e) => e.into(),
            MediaError::FolderNotFound(id) => {
                crate::CmsError::NotFound(format!("Folder {} not found", id))
            }
            other => crate::CmsError::InvalidArgument(other.to_string()),
        }
    }
}

/// Media library with file contents embedded as base64 data URLs
pub struct MediaLibrary<'a> {
    store: &'a dyn KeyValueStore,
    max_file_size: u64,
}

impl<'a> MediaLibrary<'a> {
    pub fn new(store: &'a dyn KeyValueStore, max_file_size: u64) -> Self {
        Self {
            store,
            max_file_size,
        }
    }

    /// Stores a file in `folder` (None for the root)
    ///
    /// Uploading identical bytes into the same folder returns the existing record.
    pub fn upload(
        &self,
        name: &str,
        bytes: &[u8],
        folder: Option<&str>,
        metadata: UploadMetadata,
    ) -> Result<MediaFile, MediaError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MediaError::EmptyName);
        }

        let size = bytes.len() as u64;
        if size > self.max_file_size {
            return Err(MediaError::TooLarge {
                size,
                max: self.max_file_size,
            });
        }

        if let Some(folder_id) = folder {
            if !self.list_folders()?.iter().any(|f| f.id == folder_id) {
                return Err(MediaError::FolderNotFound(folder_id.to_string()));
            }
        }

        let checksum = format!("{:x}", Sha256::digest(bytes));
        let mut files = self.list(None)?;
        if let Some(existing) = files
            .iter()
            .find(|f| f.checksum == checksum && f.folder.as_deref() == folder)
        {
            info!(id = %existing.id, "Upload matches an existing file");
            return Ok(existing.clone());
        }

        let mime_type = metadata
            .mime_type
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                mime_guess::from_path(name)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });
        let (width, height) = image_dimensions(&mime_type, bytes);

        let file = MediaFile {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            url: format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes)),
            mime_type,
            size,
            folder: folder.map(str::to_string),
            checksum,
            width,
            height,
            alt_text: metadata.alt_text,
            tags: metadata.tags,
            uploaded_at: Utc::now(),
        };

        files.push(file.clone());
        write_json(self.store, MEDIA_FILES_KEY, &files)?;

        info!(id = %file.id, name = %file.name, size, "Uploaded media file");
        Ok(file)
    }

    /// Lists files, optionally restricted to one folder
    ///
    /// `Some("")` selects files at the library root.
    pub fn list(&self, folder: Option<&str>) -> Result<Vec<MediaFile>, MediaError> {
        let files: Vec<MediaFile> = read_json(self.store, MEDIA_FILES_KEY)?.unwrap_or_default();
        Ok(match folder {
            None => files,
            Some("") => files.into_iter().filter(|f| f.folder.is_none()).collect(),
            Some(id) => files
                .into_iter()
                .filter(|f| f.folder.as_deref() == Some(id))
                .collect(),
        })
    }

    pub fn get(&self, id: &str) -> Result<Option<MediaFile>, MediaError> {
        Ok(self.list(None)?.into_iter().find(|f| f.id == id))
    }

    /// Removes a file; returns false if no file had that id
    pub fn delete(&self, id: &str) -> Result<bool, MediaError> {
        let mut files = self.list(None)?;
        let before = files.len();
        files.retain(|f| f.id != id);

        if files.len() == before {
            return Ok(false);
        }

        write_json(self.store, MEDIA_FILES_KEY, &files)?;
        info!(id, "Deleted media file");
        Ok(true)
    }

    /// Decodes a stored file back into raw bytes
    pub fn read_bytes(&self, id: &str) -> Result<Option<Vec<u8>>, MediaError> {
        Ok(self.get(id)?.and_then(|file| decode_data_url(&file.url)))
    }

    pub fn create_folder(
        &self,
        name: &str,
        parent: Option<&str>,
    ) -> Result<MediaFolder, MediaError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MediaError::EmptyName);
        }

        let mut folders = self.list_folders()?;
        if let Some(parent_id) = parent {
            if !folders.iter().any(|f| f.id == parent_id) {
                return Err(MediaError::FolderNotFound(parent_id.to_string()));
            }
        }

        let folder = MediaFolder {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            parent: parent.map(str::to_string),
            created_at: Utc::now(),
        };
        folders.push(folder.clone());
        write_json(self.store, MEDIA_FOLDERS_KEY, &folders)?;

        info!(id = %folder.id, name = %folder.name, "Created media folder");
        Ok(folder)
    }

    pub fn list_folders(&self) -> Result<Vec<MediaFolder>, MediaError> {
        Ok(read_json(self.store, MEDIA_FOLDERS_KEY)?.unwrap_or_default())
    }

    /// Deletes an empty folder
    pub fn delete_folder(&self, id: &str) -> Result<(), MediaError> {
        let mut folders = self.list_folders()?;
        if !folders.iter().any(|f| f.id == id) {
            return Err(MediaError::FolderNotFound(id.to_string()));
        }

        let has_children = folders.iter().any(|f| f.parent.as_deref() == Some(id));
        if has_children || !self.list(Some(id))?.is_empty() {
            return Err(MediaError::FolderNotEmpty(id.to_string()));
        }

        folders.retain(|f| f.id != id);
        write_json(self.store, MEDIA_FOLDERS_KEY, &folders)?;
        info!(id, "Deleted media folder");
        Ok(())
    }
}

fn image_dimensions(mime_type: &str, bytes: &[u8]) -> (Option<u32>, Option<u32>) {
    if !mime_type.starts_with("image/") {
        return (None, None);
    }

    match image::load_from_memory(bytes) {
        Ok(img) => {
            let (width, height) = img.dimensions();
            (Some(width), Some(height))
        }
        Err(e) => {
            warn!("Could not read image dimensions: {}", e);
            (None, None)
        }
    }
}

fn decode_data_url(url: &str) -> Option<Vec<u8>> {
    let (_, payload) = url.split_once(";base64,")?;
    STANDARD.decode(payload).ok()
}
