mod config;
mod content;
mod integrations;
mod media;
mod migration;
mod sections;

pub use config::{get_config, update_config};
pub use content::{get_fixed_section, reset_fixed_section, update_fixed_section};
pub use integrations::{
    fetch_chart_data, submit_contact_form, submit_demo_request, subscribe_newsletter,
};
pub use media::{
    create_media_folder, delete_media, delete_media_folder, export_media, list_media,
    list_media_folders, upload_media,
};
pub use migration::{migrate, migration_status, reset_migration, restore};
pub use sections::{
    create_section, delete_section, get_navigation, get_page, get_section, list_sections,
    list_templates, reorder_sections, reset_sections, update_section, validate_section,
};

use crate::config::{get_db_path, Config};
use crate::database::SqliteStore;
use crate::error::Result;
use tracing::info;

/// Everything a command needs: the content store and loaded configuration
pub struct AppContext {
    pub store: SqliteStore,
    pub config: Config,
}

impl AppContext {
    /// Opens the store at the configured (or default) database path
    pub fn open(config: Config) -> Result<Self> {
        let db_path = get_db_path(&config)?;
        let store = SqliteStore::open(&db_path)?;
        info!("Content store ready at {:?}", db_path);
        Ok(Self { store, config })
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            store: SqliteStore::open_in_memory()?,
            config: Config::default(),
        })
    }
}
