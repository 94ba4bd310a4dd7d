use crate::commands::AppContext;
use crate::error::{CmsError, Result};
use crate::media::MediaLibrary;
use crate::models::{MediaFile, MediaFolder, UploadMetadata};
use std::fs;
use std::path::Path;

fn library(ctx: &AppContext) -> MediaLibrary<'_> {
    MediaLibrary::new(&ctx.store, ctx.config.media.max_file_size)
}

/// Reads a file from disk into the media library
pub fn upload_media(
    ctx: &AppContext,
    file_path: &Path,
    folder: Option<&str>,
    metadata: UploadMetadata,
) -> Result<MediaFile> {
    let name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            CmsError::InvalidArgument(format!("Invalid file path: {}", file_path.display()))
        })?;
    let bytes = fs::read(file_path)?;

    Ok(library(ctx).upload(name, &bytes, folder, metadata)?)
}

pub fn list_media(ctx: &AppContext, folder: Option<&str>) -> Result<Vec<MediaFile>> {
    Ok(library(ctx).list(folder)?)
}

/// Writes a stored file's contents to `output`
pub fn export_media(ctx: &AppContext, id: &str, output: &Path) -> Result<MediaFile> {
    let media = library(ctx);
    let file = media
        .get(id)?
        .ok_or_else(|| CmsError::NotFound(format!("Media file {} not found", id)))?;
    let bytes = media.read_bytes(id)?.ok_or_else(|| {
        CmsError::Storage(format!("Media file {} has unreadable contents", id))
    })?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, bytes)?;
    Ok(file)
}

pub fn delete_media(ctx: &AppContext, id: &str) -> Result<bool> {
    Ok(library(ctx).delete(id)?)
}

pub fn create_media_folder(
    ctx: &AppContext,
    name: &str,
    parent: Option<&str>,
) -> Result<MediaFolder> {
    Ok(library(ctx).create_folder(name, parent)?)
}

pub fn list_media_folders(ctx: &AppContext) -> Result<Vec<MediaFolder>> {
    Ok(library(ctx).list_folders()?)
}

pub fn delete_media_folder(ctx: &AppContext, id: &str) -> Result<()> {
    Ok(library(ctx).delete_folder(id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_upload_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("brochure.pdf");
        fs::write(&path, b"%PDF-1.4").unwrap();

        let ctx = AppContext::in_memory().unwrap();
        let folder = create_media_folder(&ctx, "Docs", None).unwrap();
        let file = upload_media(&ctx, &path, Some(&folder.id), UploadMetadata::default()).unwrap();

        assert_eq!(file.name, "brochure.pdf");
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(list_media(&ctx, Some(&folder.id)).unwrap(), vec![file.clone()]);

        assert!(matches!(
            delete_media_folder(&ctx, &folder.id),
            Err(CmsError::InvalidArgument(_))
        ));
        assert!(delete_media(&ctx, &file.id).unwrap());
        delete_media_folder(&ctx, &folder.id).unwrap();
    }

    #[test]
    fn test_upload_missing_file() {
        let ctx = AppContext::in_memory().unwrap();
        let result = upload_media(
            &ctx,
            Path::new("/definitely/not/here.png"),
            None,
            UploadMetadata::default(),
        );
        assert!(matches!(result, Err(CmsError::Io(_))));
    }

    #[test]
    fn test_export_writes_original_bytes() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("notes.txt");
        fs::write(&source, b"launch checklist").unwrap();

        let ctx = AppContext::in_memory().unwrap();
        let file = upload_media(&ctx, &source, None, UploadMetadata::default()).unwrap();

        let output = dir.path().join("out").join("copy.txt");
        let exported = export_media(&ctx, &file.id, &output).unwrap();
        assert_eq!(exported, file);
        assert_eq!(fs::read(&output).unwrap(), b"launch checklist");

        assert!(matches!(
            export_media(&ctx, "missing", &output),
            Err(CmsError::NotFound(_))
        ));
    }
}
