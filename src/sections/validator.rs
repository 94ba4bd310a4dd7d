use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

use crate::models::{DynamicSection, FieldKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Checks a section's field values against its schema
///
/// Required fields must be non-empty. Link fields must hold an absolute URL
/// or a relative reference starting with `/` or `#`.
pub fn validate(section: &DynamicSection) -> ValidationReport {
    let mut errors = Vec::new();

    for def in &section.schema {
        let value = section.fields.get(&def.name);

        if is_blank(value) {
            if def.required {
                errors.push(format!("{} is required", def.label));
            }
            continue;
        }

        if def.kind == FieldKind::Link {
            let valid = value.and_then(Value::as_str).map(is_valid_link).unwrap_or(false);
            if !valid {
                errors.push(format!("{} must be a valid URL", def.label));
            }
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

pub fn is_valid_link(value: &str) -> bool {
    let value = value.trim();
    value.starts_with('/') || value.starts_with('#') || Url::parse(value).is_ok()
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LayoutType;
    use crate::sections::factory::create_section;
    use crate::sections::registry::find_template;
    use serde_json::json;

    #[test]
    fn test_defaults_of_hero_are_valid() {
        let section = create_section(&find_template(LayoutType::Hero), "Hero");
        let report = validate(&section);
        assert!(report.is_valid, "{:?}", report.errors);
    }

    #[test]
    fn test_missing_required_field_names_label() {
        let mut section = create_section(&find_template(LayoutType::Columns), "About");
        section.fields.insert("title".to_string(), json!("   "));

        let report = validate(&section);
        assert!(!report.is_valid);
        assert!(report.errors.iter().any(|e| e.contains("Title")));
        assert!(report.errors.iter().any(|e| e.contains("Content")));
    }

    #[test]
    fn test_absent_required_field() {
        let mut section = create_section(&find_template(LayoutType::Video), "Demo");
        section.fields.remove("videoUrl");

        let report = validate(&section);
        assert_eq!(report.errors, vec!["Video URL is required".to_string()]);
    }

    #[test]
    fn test_link_forms() {
        assert!(is_valid_link("https://example.com/page"));
        assert!(is_valid_link("mailto:sales@example.com"));
        assert!(is_valid_link("/pricing"));
        assert!(is_valid_link("#contact"));
        assert!(!is_valid_link("example.com"));
        assert!(!is_valid_link("not a url"));
    }

    #[test]
    fn test_invalid_link_reported() {
        let mut section = create_section(&find_template(LayoutType::Hero), "Hero");
        section
            .fields
            .insert("buttonLink".to_string(), json!("www.example.com"));

        let report = validate(&section);
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["Button Link must be a valid URL".to_string()]);
    }

    #[test]
    fn test_non_string_link_is_invalid() {
        let mut section = create_section(&find_template(LayoutType::Hero), "Hero");
        section.fields.insert("buttonLink".to_string(), json!(42));
        assert!(!validate(&section).is_valid);
    }

    #[test]
    fn test_populated_section_is_valid() {
        let mut section = create_section(&find_template(LayoutType::Columns), "Why us");
        section
            .fields
            .insert("content".to_string(), json!("We ship on time."));
        section.fields.insert("ctaLink".to_string(), json!("/contact"));

        let report = validate(&section);
        assert!(report.is_valid, "{:?}", report.errors);
        assert!(report.errors.is_empty());
    }
}
