use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::template::{FieldDefinition, LayoutType};

/// A user-authored page section described by its own schema copy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicSection {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub layout: LayoutType,
    pub order: i64,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub show_in_navigation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_label: Option<String>,
    pub fields: BTreeMap<String, Value>,
    pub schema: Vec<FieldDefinition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DynamicSection {
    pub fn field_definition(&self, name: &str) -> Option<&FieldDefinition> {
        self.schema.iter().find(|def| def.name == name)
    }

    /// Label used in site navigation, falling back to the section name
    pub fn navigation_title(&self) -> &str {
        self.navigation_label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .unwrap_or(self.name.as_str())
    }
}

fn default_visible() -> bool {
    true
}

// Only called when the key is present, so `null` becomes `Some(None)`.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Partial update applied by the section store
///
/// `fields` entries are merged into the existing map; other members replace
/// the current value when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_visible: Option<bool>,
    #[serde(default)]
    pub show_in_navigation: Option<bool>,
    /// `Some(None)` clears the label; in JSON that is an explicit `null`
    #[serde(default, deserialize_with = "present_or_null")]
    pub navigation_label: Option<Option<String>>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl SectionUpdate {
    pub fn visibility(is_visible: bool) -> Self {
        Self {
            is_visible: Some(is_visible),
            ..Self::default()
        }
    }

    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_distinguishes_null_from_absent_label() {
        let absent: SectionUpdate = serde_json::from_value(json!({ "name": "Team" })).unwrap();
        assert_eq!(absent.navigation_label, None);

        let cleared: SectionUpdate =
            serde_json::from_value(json!({ "navigationLabel": null })).unwrap();
        assert_eq!(cleared.navigation_label, Some(None));

        let set: SectionUpdate =
            serde_json::from_value(json!({ "navigationLabel": "Ours" })).unwrap();
        assert_eq!(set.navigation_label, Some(Some("Ours".to_string())));
    }

    #[test]
    fn test_missing_visibility_defaults_to_shown() {
        let section: DynamicSection = serde_json::from_value(json!({
            "id": "section-1",
            "name": "Legacy",
            "type": "grid",
            "order": 0,
            "fields": {},
            "schema": [],
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(section.is_visible);
        assert!(!section.show_in_navigation);
    }
}
