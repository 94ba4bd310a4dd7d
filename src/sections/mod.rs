pub mod assembler;
pub mod factory;
pub mod registry;
pub mod store;
pub mod validator;

pub use assembler::{assemble, get_all_sections, navigation_entries, NavigationEntry, PageSection};
pub use factory::create_section;
pub use registry::{find_template, templates};
pub use store::{SectionError, SectionStore, TRAILING_ORDER_BOUNDARY};
pub use validator::{validate, ValidationReport};

// Convert SectionError to CmsError
impl From<SectionError> for crate::CmsError {
    fn from(err: SectionError) -> Self {
        match err {
            SectionError::NotFound(id) => crate::CmsError::NotFound(format!("Section {} not found", id)),
            SectionError::Storage(e) => e.into(),
            other => crate::CmsError::InvalidArgument(other.to_string()),
        }
    }
}
