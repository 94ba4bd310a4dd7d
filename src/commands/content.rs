use crate::commands::AppContext;
use crate::content::FixedContentStore;
use crate::error::{CmsError, Result};
use crate::models::{
    AboutContent, ContactContent, FeaturesContent, FixedRecord, FixedSection, FixedSectionKind,
    HeroContent, SolutionsContent,
};
use serde_json::Value;

pub fn get_fixed_section(ctx: &AppContext, kind: FixedSectionKind) -> Result<FixedSection> {
    let store = FixedContentStore::new(&ctx.store);
    Ok(match kind {
        FixedSectionKind::Hero => FixedSection::Hero(store.load()?),
        FixedSectionKind::About => FixedSection::About(store.load()?),
        FixedSectionKind::Features => FixedSection::Features(store.load()?),
        FixedSectionKind::Solutions => FixedSection::Solutions(store.load()?),
        FixedSectionKind::Contact => FixedSection::Contact(store.load()?),
    })
}

/// Replaces a fixed section's data with `data`
///
/// Members missing from `data` take their default values.
pub fn update_fixed_section(
    ctx: &AppContext,
    kind: FixedSectionKind,
    data: Value,
) -> Result<FixedSection> {
    let store = FixedContentStore::new(&ctx.store);
    Ok(match kind {
        FixedSectionKind::Hero => FixedSection::Hero(save_from_value::<HeroContent>(&store, data)?),
        FixedSectionKind::About => FixedSection::About(save_from_value::<AboutContent>(&store, data)?),
        FixedSectionKind::Features => {
            FixedSection::Features(save_from_value::<FeaturesContent>(&store, data)?)
        }
        FixedSectionKind::Solutions => {
            FixedSection::Solutions(save_from_value::<SolutionsContent>(&store, data)?)
        }
        FixedSectionKind::Contact => {
            FixedSection::Contact(save_from_value::<ContactContent>(&store, data)?)
        }
    })
}

pub fn reset_fixed_section(ctx: &AppContext, kind: FixedSectionKind) -> Result<FixedSection> {
    let store = FixedContentStore::new(&ctx.store);
    match kind {
        FixedSectionKind::Hero => store.reset::<HeroContent>()?,
        FixedSectionKind::About => store.reset::<AboutContent>()?,
        FixedSectionKind::Features => store.reset::<FeaturesContent>()?,
        FixedSectionKind::Solutions => store.reset::<SolutionsContent>()?,
        FixedSectionKind::Contact => store.reset::<ContactContent>()?,
    }
    get_fixed_section(ctx, kind)
}

fn save_from_value<T: FixedRecord>(store: &FixedContentStore<'_>, data: Value) -> Result<T> {
    let mut record: T = serde_json::from_value(data).map_err(|e| {
        CmsError::InvalidArgument(format!("Invalid {} section data: {}", T::KIND, e))
    })?;
    store.save(&mut record)?;
    Ok(record)
}
