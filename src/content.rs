use chrono::Utc;
use tracing::info;

use crate::database::{read_json, write_json, KeyValueStore, StorageError};
use crate::models::{
    AboutContent, ContactContent, FeaturesContent, FixedContent, FixedRecord, HeroContent,
    SolutionsContent,
};

/// Persistence for the five hard-coded page sections
pub struct FixedContentStore<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> FixedContentStore<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Loads one record, falling back to its defaults if it was never saved
    pub fn load<T: FixedRecord>(&self) -> Result<T, StorageError> {
        Ok(read_json(self.store, T::KIND.storage_key())?.unwrap_or_default())
    }

    /// Saves a record, stamping its last-updated time
    pub fn save<T: FixedRecord>(&self, record: &mut T) -> Result<(), StorageError> {
        record.set_last_updated(Utc::now());
        write_json(self.store, T::KIND.storage_key(), &*record)?;
        info!(section = T::KIND.as_str(), "Saved fixed section");
        Ok(())
    }

    pub fn reset<T: FixedRecord>(&self) -> Result<(), StorageError> {
        self.store.remove(T::KIND.storage_key())?;
        info!(section = T::KIND.as_str(), "Reset fixed section to defaults");
        Ok(())
    }

    pub fn load_all(&self) -> Result<FixedContent, StorageError> {
        Ok(FixedContent {
            hero: self.load::<HeroContent>()?,
            about: self.load::<AboutContent>()?,
            features: self.load::<FeaturesContent>()?,
            solutions: self.load::<SolutionsContent>()?,
            contact: self.load::<ContactContent>()?,
        })
    }

    /// Writes every record as given, without touching timestamps
    pub fn save_all(&self, content: &FixedContent) -> Result<(), StorageError> {
        write_json(self.store, HeroContent::KIND.storage_key(), &content.hero)?;
        write_json(self.store, AboutContent::KIND.storage_key(), &content.about)?;
        write_json(self.store, FeaturesContent::KIND.storage_key(), &content.features)?;
        write_json(self.store, SolutionsContent::KIND.storage_key(), &content.solutions)?;
        write_json(self.store, ContactContent::KIND.storage_key(), &content.contact)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SqliteStore;
    use crate::models::FixedSectionKind;

    #[test]
    fn test_unsaved_records_use_defaults() {
        let kv = SqliteStore::open_in_memory().unwrap();
        let content = FixedContentStore::new(&kv).load_all().unwrap();
        assert_eq!(content, FixedContent::default());
        assert!(content.hero.last_updated.is_none());
    }

    #[test]
    fn test_save_stamps_and_persists_under_own_key() {
        let kv = SqliteStore::open_in_memory().unwrap();
        let store = FixedContentStore::new(&kv);

        let mut hero = HeroContent {
            title: "Build with Reign".to_string(),
            ..HeroContent::default()
        };
        store.save(&mut hero).unwrap();
        assert!(hero.last_updated.is_some());

        let loaded: HeroContent = store.load().unwrap();
        assert_eq!(loaded, hero);
        assert!(kv.get("reign-cms-data-hero").unwrap().is_some());
        assert!(kv.get("reign-cms-data-about").unwrap().is_none());
    }

    #[test]
    fn test_partial_stored_record_fills_defaults() {
        let kv = SqliteStore::open_in_memory().unwrap();
        kv.set(
            FixedSectionKind::Contact.storage_key(),
            r#"{"email":"sales@example.com"}"#,
        )
        .unwrap();

        let contact: ContactContent = FixedContentStore::new(&kv).load().unwrap();
        assert_eq!(contact.email, "sales@example.com");
        assert_eq!(contact.title, ContactContent::default().title);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let kv = SqliteStore::open_in_memory().unwrap();
        let store = FixedContentStore::new(&kv);

        let mut about = AboutContent {
            mission: "Changed".to_string(),
            ..AboutContent::default()
        };
        store.save(&mut about).unwrap();
        store.reset::<AboutContent>().unwrap();

        assert_eq!(store.load::<AboutContent>().unwrap(), AboutContent::default());
    }
}
