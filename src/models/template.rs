use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Layout a dynamic section renders with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutType {
    Hero,
    Bento,
    Grid,
    Columns,
    Gallery,
    Video,
    SocialFeed,
    Chart,
}

impl LayoutType {
    pub const ALL: [LayoutType; 8] = [
        LayoutType::Hero,
        LayoutType::Bento,
        LayoutType::Grid,
        LayoutType::Columns,
        LayoutType::Gallery,
        LayoutType::Video,
        LayoutType::SocialFeed,
        LayoutType::Chart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutType::Hero => "hero",
            LayoutType::Bento => "bento",
            LayoutType::Grid => "grid",
            LayoutType::Columns => "columns",
            LayoutType::Gallery => "gallery",
            LayoutType::Video => "video",
            LayoutType::SocialFeed => "social-feed",
            LayoutType::Chart => "chart",
        }
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        LayoutType::ALL
            .iter()
            .copied()
            .find(|layout| layout.as_str() == wanted)
            .ok_or_else(|| format!("Unknown layout type: {}", s))
    }
}

/// Kind of value a field holds; drives the editor widget and validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Image,
    Link,
    Color,
    Select,
    Number,
    Boolean,
    List,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldDefinition {
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            default_value: None,
            required: false,
            options: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn options(mut self, options: &[&str]) -> Self {
        self.options = Some(options.iter().map(|o| o.to_string()).collect());
        self
    }

    /// Value a freshly created section starts with for this field
    pub fn initial_value(&self) -> Value {
        self.default_value
            .clone()
            .unwrap_or_else(|| Value::String(String::new()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionTemplate {
    #[serde(rename = "type")]
    pub layout: LayoutType,
    pub name: String,
    pub description: String,
    pub fields: Vec<FieldDefinition>,
}
