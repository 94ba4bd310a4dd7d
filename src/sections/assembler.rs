use serde::Serialize;

use super::store::{SectionError, SectionStore};
use crate::content::FixedContentStore;
use crate::database::KeyValueStore;
use crate::models::{DynamicSection, FixedContent, FixedSection, SectionGroup};

/// One entry of the rendered page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum PageSection {
    Fixed(FixedSection),
    Dynamic(DynamicSection),
}

impl PageSection {
    pub fn group(&self) -> SectionGroup {
        match self {
            PageSection::Fixed(section) => section.kind().group(),
            PageSection::Dynamic(_) => SectionGroup::Body,
        }
    }

    /// Position inside the group
    pub fn rank(&self) -> i64 {
        match self {
            PageSection::Fixed(section) => section.kind().rank(),
            PageSection::Dynamic(section) => section.order,
        }
    }

    /// Single flat order as older page data expressed it
    pub fn legacy_order(&self) -> i64 {
        match self {
            PageSection::Fixed(section) => section.kind().legacy_order(),
            PageSection::Dynamic(section) => section.order,
        }
    }

    pub fn key(&self) -> String {
        match self {
            PageSection::Fixed(section) => section.kind().to_string(),
            PageSection::Dynamic(section) => section.id.clone(),
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            PageSection::Fixed(_) => true,
            PageSection::Dynamic(section) => section.is_visible,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationEntry {
    pub label: String,
    pub anchor: String,
}

/// Merges fixed and dynamic sections into render order
///
/// Sorted by group, then rank; equal ranks keep their input order.
pub fn assemble(fixed: FixedContent, dynamic: Vec<DynamicSection>) -> Vec<PageSection> {
    let mut page: Vec<PageSection> = fixed
        .into_sections()
        .into_iter()
        .map(PageSection::Fixed)
        .chain(dynamic.into_iter().map(PageSection::Dynamic))
        .collect();

    page.sort_by_key(|section| (section.group(), section.rank()));
    page
}

/// Loads everything from the store and assembles the page
pub fn get_all_sections(store: &dyn KeyValueStore) -> Result<Vec<PageSection>, SectionError> {
    let fixed = FixedContentStore::new(store).load_all()?;
    let dynamic = SectionStore::new(store).get_all()?;
    Ok(assemble(fixed, dynamic))
}

/// Visible dynamic sections flagged for the site navigation, in page order
pub fn navigation_entries(page: &[PageSection]) -> Vec<NavigationEntry> {
    page.iter()
        .filter_map(|entry| match entry {
            PageSection::Dynamic(section) if section.is_visible && section.show_in_navigation => {
                Some(NavigationEntry {
                    label: section.navigation_title().to_string(),
                    anchor: format!("#{}", section.id),
                })
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SqliteStore;
    use crate::models::{FixedSectionKind, LayoutType, SectionUpdate};
    use crate::sections::factory::create_section;
    use crate::sections::registry::find_template;
    use serde_json::json;

    fn fixed_kinds(page: &[PageSection]) -> Vec<String> {
        page.iter().map(PageSection::key).collect()
    }

    #[test]
    fn test_fixed_only_page_order() {
        let page = assemble(FixedContent::default(), Vec::new());
        assert_eq!(
            fixed_kinds(&page),
            vec!["hero", "features", "solutions", "about", "contact"]
        );
        let legacy: Vec<i64> = page.iter().map(PageSection::legacy_order).collect();
        assert_eq!(legacy, vec![-5, -4, -3, 1000, 1001]);
    }

    #[test]
    fn test_grid_section_lands_between_solutions_and_about() {
        let kv = SqliteStore::open_in_memory().unwrap();
        let store = SectionStore::new(&kv);

        let mut section = create_section(&find_template(LayoutType::Grid), "Features");
        section.fields.insert(
            "items".to_string(),
            json!([
                { "title": "Consulting", "description": "Advice" },
                { "title": "Delivery", "description": "Execution" }
            ]),
        );
        let added = store.add(section).unwrap();

        let page = get_all_sections(&kv).unwrap();
        let position = |key: &str| page.iter().position(|s| s.key() == key).unwrap();

        let dynamic = position(&added.id);
        assert!(dynamic > position(FixedSectionKind::Solutions.as_str()));
        assert!(dynamic < position(FixedSectionKind::About.as_str()));
        assert_eq!(page.len(), 6);
    }

    #[test]
    fn test_dynamic_sections_sorted_by_order() {
        let template = find_template(LayoutType::Bento);
        let mut late = create_section(&template, "Late");
        late.order = 7;
        let mut early = create_section(&template, "Early");
        early.order = 2;
        let mut pinned = create_section(&template, "Pinned");
        pinned.order = 1500;

        let page = assemble(
            FixedContent::default(),
            vec![pinned.clone(), late.clone(), early.clone()],
        );
        let keys = fixed_kinds(&page);
        assert_eq!(
            keys,
            vec![
                "hero".to_string(),
                "features".to_string(),
                "solutions".to_string(),
                early.id,
                late.id,
                pinned.id,
                "about".to_string(),
                "contact".to_string(),
            ]
        );
    }

    #[test]
    fn test_deleting_keeps_fixed_sections_in_place() {
        let kv = SqliteStore::open_in_memory().unwrap();
        let store = SectionStore::new(&kv);
        let template = find_template(LayoutType::Columns);

        let first = store.add(create_section(&template, "First")).unwrap();
        store.add(create_section(&template, "Second")).unwrap();
        store.delete(&first.id).unwrap();

        let page = get_all_sections(&kv).unwrap();
        let keys = fixed_kinds(&page);
        assert_eq!(&keys[..3], &["hero", "features", "solutions"]);
        assert_eq!(&keys[4..], &["about", "contact"]);
    }

    #[test]
    fn test_serialized_shape() {
        let page = assemble(FixedContent::default(), Vec::new());
        let value = serde_json::to_value(&page[0]).unwrap();
        assert_eq!(value["type"], json!("fixed"));
        assert_eq!(value["data"]["section"], json!("hero"));
        assert_eq!(value["data"]["title"], json!("Transform Your Business"));
    }

    #[test]
    fn test_navigation_entries() {
        let kv = SqliteStore::open_in_memory().unwrap();
        let store = SectionStore::new(&kv);
        let template = find_template(LayoutType::Grid);

        let shown = store.add(create_section(&template, "Services")).unwrap();
        store
            .update(
                &shown.id,
                SectionUpdate {
                    show_in_navigation: Some(true),
                    ..SectionUpdate::default()
                },
            )
            .unwrap();

        let hidden = store.add(create_section(&template, "Hidden")).unwrap();
        store
            .update(
                &hidden.id,
                SectionUpdate {
                    show_in_navigation: Some(true),
                    is_visible: Some(false),
                    ..SectionUpdate::default()
                },
            )
            .unwrap();
        store.add(create_section(&template, "Plain")).unwrap();

        let nav = navigation_entries(&get_all_sections(&kv).unwrap());
        assert_eq!(
            nav,
            vec![NavigationEntry {
                label: "Services".to_string(),
                anchor: format!("#{}", shown.id),
            }]
        );
    }
}
