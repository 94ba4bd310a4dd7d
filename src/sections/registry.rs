use serde_json::json;

use crate::models::{FieldDefinition, FieldKind, LayoutType, SectionTemplate};

/// Catalog of layouts a new dynamic section can start from
pub fn templates() -> Vec<SectionTemplate> {
    LayoutType::ALL.iter().map(|layout| template_for(*layout)).collect()
}

pub fn find_template(layout: LayoutType) -> SectionTemplate {
    template_for(layout)
}

fn template_for(layout: LayoutType) -> SectionTemplate {
    match layout {
        LayoutType::Hero => SectionTemplate {
            layout,
            name: "Hero Banner".to_string(),
            description: "Full-width banner with headline, background image and call to action"
                .to_string(),
            fields: vec![
                FieldDefinition::new("title", "Title", FieldKind::Text)
                    .required()
                    .default_value("Your Headline Here"),
                FieldDefinition::new("subtitle", "Subtitle", FieldKind::Textarea),
                FieldDefinition::new("backgroundImage", "Background Image", FieldKind::Image),
                FieldDefinition::new("buttonText", "Button Text", FieldKind::Text)
                    .default_value("Learn More"),
                FieldDefinition::new("buttonLink", "Button Link", FieldKind::Link)
                    .default_value("#"),
                FieldDefinition::new("alignment", "Text Alignment", FieldKind::Select)
                    .options(&["left", "center", "right"])
                    .default_value("center"),
            ],
        },
        LayoutType::Bento => SectionTemplate {
            layout,
            name: "Bento Grid".to_string(),
            description: "Asymmetric tile layout mixing large and small cards".to_string(),
            fields: vec![
                FieldDefinition::new("title", "Section Title", FieldKind::Text)
                    .required()
                    .default_value("Highlights"),
                FieldDefinition::new("subtitle", "Subtitle", FieldKind::Textarea),
                FieldDefinition::new("items", "Tiles", FieldKind::List).default_value(json!([])),
                FieldDefinition::new("backgroundColor", "Background Color", FieldKind::Color)
                    .default_value("#ffffff"),
            ],
        },
        LayoutType::Grid => SectionTemplate {
            layout,
            name: "Card Grid".to_string(),
            description: "Evenly spaced cards with icon, title and description".to_string(),
            fields: vec![
                FieldDefinition::new("title", "Section Title", FieldKind::Text)
                    .required()
                    .default_value("Our Services"),
                FieldDefinition::new("subtitle", "Subtitle", FieldKind::Textarea),
                FieldDefinition::new("columns", "Columns", FieldKind::Select)
                    .options(&["2", "3", "4"])
                    .default_value("3"),
                FieldDefinition::new("items", "Cards", FieldKind::List).default_value(json!([])),
            ],
        },
        LayoutType::Columns => SectionTemplate {
            layout,
            name: "Two Columns".to_string(),
            description: "Text beside an image with an optional call to action".to_string(),
            fields: vec![
                FieldDefinition::new("title", "Title", FieldKind::Text)
                    .required()
                    .default_value("Why Choose Us"),
                FieldDefinition::new("content", "Content", FieldKind::Textarea).required(),
                FieldDefinition::new("image", "Image", FieldKind::Image),
                FieldDefinition::new("imagePosition", "Image Position", FieldKind::Select)
                    .options(&["left", "right"])
                    .default_value("right"),
                FieldDefinition::new("ctaText", "Button Text", FieldKind::Text),
                FieldDefinition::new("ctaLink", "Button Link", FieldKind::Link),
            ],
        },
        LayoutType::Gallery => SectionTemplate {
            layout,
            name: "Image Gallery".to_string(),
            description: "Collection of images shown as a grid, masonry wall or carousel"
                .to_string(),
            fields: vec![
                FieldDefinition::new("title", "Title", FieldKind::Text).default_value("Gallery"),
                FieldDefinition::new("images", "Images", FieldKind::List).default_value(json!([])),
                FieldDefinition::new("style", "Display Style", FieldKind::Select)
                    .options(&["grid", "masonry", "carousel"])
                    .default_value("grid"),
            ],
        },
        LayoutType::Video => SectionTemplate {
            layout,
            name: "Video".to_string(),
            description: "Embedded video with optional poster image".to_string(),
            fields: vec![
                FieldDefinition::new("title", "Title", FieldKind::Text),
                FieldDefinition::new("videoUrl", "Video URL", FieldKind::Link).required(),
                FieldDefinition::new("posterImage", "Poster Image", FieldKind::Image),
                FieldDefinition::new("autoplay", "Autoplay", FieldKind::Boolean)
                    .default_value(false),
            ],
        },
        LayoutType::SocialFeed => SectionTemplate {
            layout,
            name: "Social Feed".to_string(),
            description: "Recent posts pulled from a social media account".to_string(),
            fields: vec![
                FieldDefinition::new("title", "Title", FieldKind::Text)
                    .default_value("Follow Us"),
                FieldDefinition::new("platform", "Platform", FieldKind::Select)
                    .options(&["instagram", "twitter", "linkedin", "facebook"])
                    .required()
                    .default_value("instagram"),
                FieldDefinition::new("handle", "Account Handle", FieldKind::Text).required(),
                FieldDefinition::new("profileUrl", "Profile URL", FieldKind::Link),
                FieldDefinition::new("postCount", "Posts to Show", FieldKind::Number)
                    .default_value(6),
            ],
        },
        LayoutType::Chart => SectionTemplate {
            layout,
            name: "Data Chart".to_string(),
            description: "Chart rendered from a Google Sheets range".to_string(),
            fields: vec![
                FieldDefinition::new("title", "Title", FieldKind::Text)
                    .required()
                    .default_value("Key Metrics"),
                FieldDefinition::new("chartType", "Chart Type", FieldKind::Select)
                    .options(&["bar", "line", "pie", "doughnut"])
                    .default_value("bar"),
                FieldDefinition::new("spreadsheetId", "Spreadsheet ID", FieldKind::Text)
                    .required(),
                FieldDefinition::new("range", "Range", FieldKind::Text)
                    .default_value("Sheet1!A1:D10"),
                FieldDefinition::new("sheetGid", "Sheet GID", FieldKind::Text)
                    .default_value("0"),
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_covers_every_layout_once() {
        let catalog = templates();
        assert_eq!(catalog.len(), LayoutType::ALL.len());

        let layouts: HashSet<_> = catalog.iter().map(|t| t.layout).collect();
        assert_eq!(layouts.len(), LayoutType::ALL.len());
        for layout in [LayoutType::Hero, LayoutType::Bento, LayoutType::Grid, LayoutType::Columns] {
            assert!(layouts.contains(&layout));
        }
    }

    #[test]
    fn test_field_names_unique_per_template() {
        for template in templates() {
            let names: HashSet<_> = template.fields.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(names.len(), template.fields.len(), "{}", template.name);
        }
    }

    #[test]
    fn test_select_defaults_are_valid_options() {
        for template in templates() {
            for field in template.fields.iter().filter(|f| f.kind == FieldKind::Select) {
                let options = field.options.as_ref().expect("select field without options");
                if let Some(default) = field.default_value.as_ref().and_then(|v| v.as_str()) {
                    assert!(options.iter().any(|o| o == default), "{}", field.name);
                }
            }
        }
    }

    #[test]
    fn test_find_template_matches_layout() {
        let grid = find_template(LayoutType::Grid);
        assert_eq!(grid.layout, LayoutType::Grid);
        assert!(grid.fields.iter().any(|f| f.name == "items"));
    }
}
