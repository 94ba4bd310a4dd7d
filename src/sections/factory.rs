use chrono::Utc;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::{DynamicSection, SectionTemplate};

/// Builds a new, unsaved section from a template
///
/// Fields start at each definition's default (empty string when none).
/// The order is left at 0; the store assigns the real position on insert.
pub fn create_section(template: &SectionTemplate, name: &str) -> DynamicSection {
    let now = Utc::now();
    let fields: BTreeMap<_, _> = template
        .fields
        .iter()
        .map(|def| (def.name.clone(), def.initial_value()))
        .collect();

    DynamicSection {
        id: generate_id(),
        name: name.to_string(),
        layout: template.layout,
        order: 0,
        is_visible: true,
        show_in_navigation: false,
        navigation_label: None,
        fields,
        schema: template.fields.clone(),
        created_at: now,
        updated_at: now,
    }
}

fn generate_id() -> String {
    format!(
        "section-{}-{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LayoutType;
    use crate::sections::registry::find_template;
    use serde_json::json;

    #[test]
    fn test_fields_initialized_from_defaults() {
        let template = find_template(LayoutType::Hero);
        let section = create_section(&template, "Landing");

        assert_eq!(section.name, "Landing");
        assert_eq!(section.layout, LayoutType::Hero);
        assert_eq!(section.fields["title"], json!("Your Headline Here"));
        assert_eq!(section.fields["subtitle"], json!(""));
        assert_eq!(section.fields["alignment"], json!("center"));
        assert_eq!(section.fields.len(), template.fields.len());
        assert_eq!(section.schema, template.fields);
    }

    #[test]
    fn test_new_section_defaults() {
        let section = create_section(&find_template(LayoutType::Grid), "");
        assert_eq!(section.order, 0);
        assert!(section.is_visible);
        assert!(!section.show_in_navigation);
        assert_eq!(section.created_at, section.updated_at);
        assert!(section.id.starts_with("section-"));
    }

    #[test]
    fn test_ids_are_distinct() {
        let template = find_template(LayoutType::Bento);
        let a = create_section(&template, "A");
        let b = create_section(&template, "B");
        assert_ne!(a.id, b.id);
    }
}
