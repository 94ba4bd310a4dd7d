use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::content::FixedContentStore;
use crate::database::{read_json, write_json, KeyValueStore};
use crate::error::Result;
use crate::media::{MEDIA_FILES_KEY, MEDIA_FOLDERS_KEY};
use crate::models::{DynamicSection, FixedContent, MediaFile, MediaFolder};
use crate::sections::SectionStore;
use crate::CmsError;

pub const MIGRATION_COMPLETED_KEY: &str = "cms-migration-completed";
pub const MIGRATION_DATE_KEY: &str = "cms-migration-date";

/// Every piece of persisted CMS data at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsSnapshot {
    pub exported_at: DateTime<Utc>,
    pub sections: Vec<DynamicSection>,
    pub content: FixedContent,
    #[serde(default)]
    pub media_files: Vec<MediaFile>,
    #[serde(default)]
    pub media_folders: Vec<MediaFolder>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationStatus {
    pub completed: bool,
    pub migrated_at: Option<DateTime<Utc>>,
}

/// Destination that receives the exported snapshot
pub trait MigrationTarget {
    fn name(&self) -> &str;
    fn push(&self, snapshot: &CmsSnapshot) -> Result<()>;
}

/// Writes the snapshot as pretty-printed JSON to a file
pub struct JsonFileTarget {
    path: PathBuf,
}

impl JsonFileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MigrationTarget for JsonFileTarget {
    fn name(&self) -> &str {
        "json-file"
    }

    fn push(&self, snapshot: &CmsSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(snapshot)?)?;
        Ok(())
    }
}

pub fn export_snapshot(store: &dyn KeyValueStore) -> Result<CmsSnapshot> {
    Ok(CmsSnapshot {
        exported_at: Utc::now(),
        sections: SectionStore::new(store).get_all()?,
        content: FixedContentStore::new(store).load_all()?,
        media_files: read_json(store, MEDIA_FILES_KEY)?.unwrap_or_default(),
        media_folders: read_json(store, MEDIA_FOLDERS_KEY)?.unwrap_or_default(),
    })
}

/// Replaces all stored CMS data with the snapshot's contents
pub fn restore_snapshot(store: &dyn KeyValueStore, snapshot: &CmsSnapshot) -> Result<()> {
    SectionStore::new(store).save_all(snapshot.sections.clone())?;
    FixedContentStore::new(store).save_all(&snapshot.content)?;
    write_json(store, MEDIA_FILES_KEY, &snapshot.media_files)?;
    write_json(store, MEDIA_FOLDERS_KEY, &snapshot.media_folders)?;
    info!(sections = snapshot.sections.len(), "Restored CMS snapshot");
    Ok(())
}

pub fn read_snapshot_file(path: &std::path::Path) -> Result<CmsSnapshot> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| CmsError::InvalidArgument(format!("Invalid snapshot file: {}", e)))
}

pub fn migration_status(store: &dyn KeyValueStore) -> Result<MigrationStatus> {
    let completed: Option<bool> = read_json(store, MIGRATION_COMPLETED_KEY)?;
    let migrated_at: Option<DateTime<Utc>> = read_json(store, MIGRATION_DATE_KEY)?;
    Ok(MigrationStatus {
        completed: completed.unwrap_or(false),
        migrated_at,
    })
}

/// Pushes a snapshot to `target` unless a migration already ran
///
/// `force` re-runs a completed migration.
pub fn run_migration(
    store: &dyn KeyValueStore,
    target: &dyn MigrationTarget,
    force: bool,
) -> Result<MigrationStatus> {
    let status = migration_status(store)?;
    if status.completed && !force {
        info!("Migration already completed, skipping");
        return Ok(status);
    }

    let snapshot = export_snapshot(store)?;
    target.push(&snapshot)?;

    let now = Utc::now();
    write_json(store, MIGRATION_COMPLETED_KEY, &true)?;
    write_json(store, MIGRATION_DATE_KEY, &now)?;

    info!(
        target = target.name(),
        sections = snapshot.sections.len(),
        media = snapshot.media_files.len(),
        "Migration completed"
    );
    Ok(MigrationStatus {
        completed: true,
        migrated_at: Some(now),
    })
}

pub fn reset_migration(store: &dyn KeyValueStore) -> Result<()> {
    store.remove(MIGRATION_COMPLETED_KEY)?;
    store.remove(MIGRATION_DATE_KEY)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SqliteStore;
    use crate::media::MediaLibrary;
    use crate::models::{HeroContent, LayoutType, UploadMetadata};
    use crate::sections::{create_section, find_template};
    use std::cell::RefCell;
    use tempfile::tempdir;

    #[derive(Default)]
    struct MemoryTarget {
        pushed: RefCell<Vec<CmsSnapshot>>,
    }

    impl MigrationTarget for MemoryTarget {
        fn name(&self) -> &str {
            "memory"
        }

        fn push(&self, snapshot: &CmsSnapshot) -> Result<()> {
            self.pushed.borrow_mut().push(snapshot.clone());
            Ok(())
        }
    }

    fn seeded_store() -> SqliteStore {
        let kv = SqliteStore::open_in_memory().unwrap();
        let sections = SectionStore::new(&kv);
        sections
            .add(create_section(&find_template(LayoutType::Hero), "Intro"))
            .unwrap();
        sections
            .add(create_section(&find_template(LayoutType::Grid), "Services"))
            .unwrap();

        let mut hero = HeroContent {
            title: "Migrated".to_string(),
            ..HeroContent::default()
        };
        FixedContentStore::new(&kv).save(&mut hero).unwrap();

        MediaLibrary::new(&kv, 1024)
            .upload("a.txt", b"a", None, UploadMetadata::default())
            .unwrap();
        kv
    }

    #[test]
    fn test_migration_runs_once() {
        let kv = seeded_store();
        let target = MemoryTarget::default();

        assert!(!migration_status(&kv).unwrap().completed);

        let status = run_migration(&kv, &target, false).unwrap();
        assert!(status.completed);
        assert!(status.migrated_at.is_some());
        assert_eq!(migration_status(&kv).unwrap(), status);

        run_migration(&kv, &target, false).unwrap();
        assert_eq!(target.pushed.borrow().len(), 1);

        let pushed = target.pushed.borrow();
        assert_eq!(pushed[0].sections.len(), 2);
        assert_eq!(pushed[0].content.hero.title, "Migrated");
        assert_eq!(pushed[0].media_files.len(), 1);
    }

    #[test]
    fn test_force_and_reset() {
        let kv = seeded_store();
        let target = MemoryTarget::default();

        run_migration(&kv, &target, false).unwrap();
        run_migration(&kv, &target, true).unwrap();
        assert_eq!(target.pushed.borrow().len(), 2);

        reset_migration(&kv).unwrap();
        assert_eq!(
            migration_status(&kv).unwrap(),
            MigrationStatus {
                completed: false,
                migrated_at: None
            }
        );
    }

    #[test]
    fn test_file_snapshot_restores_into_fresh_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("export").join("cms.json");

        let source = seeded_store();
        run_migration(&source, &JsonFileTarget::new(&path), false).unwrap();

        let snapshot = read_snapshot_file(&path).unwrap();
        let fresh = SqliteStore::open_in_memory().unwrap();
        restore_snapshot(&fresh, &snapshot).unwrap();

        let restored = export_snapshot(&fresh).unwrap();
        assert_eq!(restored.sections, snapshot.sections);
        assert_eq!(restored.content, snapshot.content);
        assert_eq!(restored.media_files, snapshot.media_files);
    }
}
