mod content;
mod media;
mod section;
mod template;

pub use content::{
    AboutContent, ContactContent, FeatureItem, FeaturesContent, FixedContent, FixedRecord,
    FixedSection, FixedSectionKind, HeroContent, SectionGroup, SolutionItem, SolutionsContent,
    Stat,
};
pub use media::{MediaFile, MediaFolder, UploadMetadata};
pub use section::{DynamicSection, SectionUpdate};
pub use template::{FieldDefinition, FieldKind, LayoutType, SectionTemplate};
