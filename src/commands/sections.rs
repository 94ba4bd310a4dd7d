use crate::commands::AppContext;
use crate::error::{CmsError, Result};
use crate::models::{DynamicSection, LayoutType, SectionTemplate, SectionUpdate};
use crate::sections::{
    self, get_all_sections, navigation_entries, validate, NavigationEntry, PageSection,
    SectionStore, ValidationReport,
};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{info, warn};

pub fn list_templates() -> Vec<SectionTemplate> {
    sections::templates()
}

pub fn list_sections(ctx: &AppContext) -> Result<Vec<DynamicSection>> {
    Ok(SectionStore::new(&ctx.store).get_all()?)
}

pub fn get_section(ctx: &AppContext, id: &str) -> Result<DynamicSection> {
    SectionStore::new(&ctx.store)
        .get(id)?
        .ok_or_else(|| CmsError::NotFound(format!("Section {} not found", id)))
}

/// Creates a section from a layout template and appends it to the page
///
/// `fields` overrides template defaults. The section is only saved if it validates.
pub fn create_section(
    ctx: &AppContext,
    layout: &str,
    name: &str,
    fields: BTreeMap<String, Value>,
) -> Result<DynamicSection> {
    let layout: LayoutType = layout.parse().map_err(CmsError::InvalidArgument)?;
    let mut section = sections::create_section(&sections::find_template(layout), name);

    for (field, value) in fields {
        if section.field_definition(&field).is_none() {
            return Err(CmsError::InvalidArgument(format!(
                "Field '{}' does not exist on {} sections",
                field, layout
            )));
        }
        section.fields.insert(field, value);
    }

    ensure_valid(&section)?;
    let added = SectionStore::new(&ctx.store).add(section)?;
    info!("Created {} section {}", added.layout, added.id);
    Ok(added)
}

/// Applies a partial update unless it introduces validation errors
///
/// Problems the section already had do not block the update, so an invalid
/// section can still be hidden, renamed or moved.
pub fn update_section(
    ctx: &AppContext,
    id: &str,
    update: SectionUpdate,
) -> Result<DynamicSection> {
    let current = get_section(ctx, id)?;
    let existing = validate(&current).errors;

    let mut preview = current;
    preview.fields.extend(update.fields.clone());
    let introduced: Vec<String> = validate(&preview)
        .errors
        .into_iter()
        .filter(|e| !existing.contains(e))
        .collect();
    if !introduced.is_empty() {
        warn!("Update to section {} rejected: {:?}", id, introduced);
        return Err(CmsError::Validation(introduced));
    }

    Ok(SectionStore::new(&ctx.store).update(id, update)?)
}

pub fn delete_section(ctx: &AppContext, id: &str) -> Result<()> {
    SectionStore::new(&ctx.store).delete(id)?;
    Ok(())
}

pub fn reorder_sections(ctx: &AppContext, ids: &[String]) -> Result<Vec<DynamicSection>> {
    Ok(SectionStore::new(&ctx.store).reorder(ids)?)
}

pub fn reset_sections(ctx: &AppContext) -> Result<()> {
    SectionStore::new(&ctx.store).reset()?;
    Ok(())
}

pub fn validate_section(ctx: &AppContext, id: &str) -> Result<ValidationReport> {
    Ok(validate(&get_section(ctx, id)?))
}

/// The assembled page in render order
///
/// Hidden sections are left out unless `include_hidden` is set.
pub fn get_page(ctx: &AppContext, include_hidden: bool) -> Result<Vec<PageSection>> {
    let mut page = get_all_sections(&ctx.store)?;
    if !include_hidden {
        page.retain(PageSection::is_visible);
    }
    Ok(page)
}

pub fn get_navigation(ctx: &AppContext) -> Result<Vec<NavigationEntry>> {
    Ok(navigation_entries(&get_all_sections(&ctx.store)?))
}

fn ensure_valid(section: &DynamicSection) -> Result<()> {
    let report = validate(section);
    if report.is_valid {
        return Ok(());
    }

    warn!("Section {} failed validation: {:?}", section.id, report.errors);
    Err(CmsError::Validation(report.errors))
}
