use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

use crate::database::{read_json, write_json, KeyValueStore, StorageError};
use crate::models::{DynamicSection, SectionUpdate};

pub const SECTIONS_KEY: &str = "cms-dynamic-sections";
pub const SECTIONS_UPDATED_KEY: &str = "cms-dynamic-sections-updated";

/// Orders at or above this value belong to sections pinned to the end of the page
pub const TRAILING_ORDER_BOUNDARY: i64 = 1000;

#[derive(Error, Debug)]
pub enum SectionError {
    #[error("Section {0} not found")]
    NotFound(String),
    #[error("Section id {0} already exists")]
    DuplicateId(String),
    #[error("Field '{field}' is not part of the schema of section {section}")]
    UnknownField { section: String, field: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// CRUD and ordering over the dynamic section collection
///
/// Every section lives in a single JSON array under [`SECTIONS_KEY`].
pub struct SectionStore<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> SectionStore<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Returns the stored sections, or an empty list if nothing was saved yet
    pub fn get_all(&self) -> Result<Vec<DynamicSection>, SectionError> {
        Ok(read_json(self.store, SECTIONS_KEY)?.unwrap_or_default())
    }

    pub fn get(&self, id: &str) -> Result<Option<DynamicSection>, SectionError> {
        Ok(self.get_all()?.into_iter().find(|s| s.id == id))
    }

    /// Persists the collection sorted by `order`
    ///
    /// The sort is stable, so sections sharing an order keep their relative position.
    pub fn save_all(&self, mut sections: Vec<DynamicSection>) -> Result<(), SectionError> {
        sections.sort_by_key(|s| s.order);
        write_json(self.store, SECTIONS_KEY, &sections)?;
        write_json(self.store, SECTIONS_UPDATED_KEY, &Utc::now().to_rfc3339())?;
        debug!(count = sections.len(), "Saved dynamic sections");
        Ok(())
    }

    pub fn last_updated(&self) -> Result<Option<DateTime<Utc>>, SectionError> {
        let raw: Option<String> = read_json(self.store, SECTIONS_UPDATED_KEY)?;
        Ok(raw
            .and_then(|value| DateTime::parse_from_rfc3339(&value).ok())
            .map(|value| value.with_timezone(&Utc)))
    }

    /// Appends a section after every non-trailing section
    ///
    /// The new order is one past the highest order below [`TRAILING_ORDER_BOUNDARY`],
    /// or 0 when there is none.
    pub fn add(&self, mut section: DynamicSection) -> Result<DynamicSection, SectionError> {
        let mut sections = self.get_all()?;
        if sections.iter().any(|s| s.id == section.id) {
            return Err(SectionError::DuplicateId(section.id));
        }

        section.order = next_order(&sections);
        sections.push(section.clone());
        self.save_all(sections)?;

        info!(id = %section.id, layout = %section.layout, order = section.order, "Added section");
        Ok(section)
    }

    /// Applies a partial update and stamps `updated_at`
    ///
    /// Field names must exist in the section's schema; nothing is written otherwise.
    pub fn update(&self, id: &str, update: SectionUpdate) -> Result<DynamicSection, SectionError> {
        let mut sections = self.get_all()?;
        let section = sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| SectionError::NotFound(id.to_string()))?;

        if let Some(field) = update
            .fields
            .keys()
            .find(|name| section.field_definition(name).is_none())
        {
            return Err(SectionError::UnknownField {
                section: id.to_string(),
                field: field.clone(),
            });
        }

        if let Some(name) = update.name {
            section.name = name;
        }
        if let Some(is_visible) = update.is_visible {
            section.is_visible = is_visible;
        }
        if let Some(show) = update.show_in_navigation {
            section.show_in_navigation = show;
        }
        if let Some(label) = update.navigation_label {
            section.navigation_label = label;
        }
        if let Some(order) = update.order {
            section.order = order;
        }
        section.fields.extend(update.fields);
        section.updated_at = next_timestamp(section.updated_at);

        let updated = section.clone();
        self.save_all(sections)?;
        debug!(id, "Updated section");
        Ok(updated)
    }

    /// Removes a section and renumbers the rest to 0..n-1
    pub fn delete(&self, id: &str) -> Result<(), SectionError> {
        let mut sections = self.get_all()?;
        let before = sections.len();
        sections.retain(|s| s.id != id);

        if sections.len() == before {
            return Err(SectionError::NotFound(id.to_string()));
        }

        for (index, section) in sections.iter_mut().enumerate() {
            section.order = index as i64;
        }
        self.save_all(sections)?;

        info!(id, "Deleted section");
        Ok(())
    }

    /// Rewrites every order from its position in `ids`
    ///
    /// Unknown ids are skipped. Stored sections missing from `ids` follow the
    /// listed ones, keeping their previous relative order.
    pub fn reorder(&self, ids: &[String]) -> Result<Vec<DynamicSection>, SectionError> {
        let mut remaining = self.get_all()?;
        let mut seen = HashSet::new();
        let mut ordered = Vec::with_capacity(remaining.len());

        for id in ids {
            if !seen.insert(id.as_str()) {
                continue;
            }
            if let Some(pos) = remaining.iter().position(|s| &s.id == id) {
                ordered.push(remaining.remove(pos));
            }
        }
        ordered.append(&mut remaining);

        for (index, section) in ordered.iter_mut().enumerate() {
            section.order = index as i64;
        }
        self.save_all(ordered.clone())?;

        info!(count = ordered.len(), "Reordered sections");
        Ok(ordered)
    }

    /// Drops all dynamic sections and the update marker
    pub fn reset(&self) -> Result<(), SectionError> {
        self.store.remove(SECTIONS_KEY)?;
        self.store.remove(SECTIONS_UPDATED_KEY)?;
        info!("Reset dynamic sections");
        Ok(())
    }
}

fn next_order(sections: &[DynamicSection]) -> i64 {
    sections
        .iter()
        .map(|s| s.order)
        .filter(|order| *order < TRAILING_ORDER_BOUNDARY)
        .max()
        .map(|max| max + 1)
        .unwrap_or(0)
}

fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}
