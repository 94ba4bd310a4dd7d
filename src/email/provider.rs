use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Merge field carrying a contact-form message
pub const FIELD_MESSAGE: &str = "MESSAGE";
/// Merge field carrying the date asked for in a demo request
pub const FIELD_DEMO_DATE: &str = "DEMODATE";

/// A person being added to an email-marketing audience
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub tags: Vec<String>,
    /// Page or form the submission came from
    pub source: String,
    /// Extra submitted values keyed by merge field, e.g. [`FIELD_MESSAGE`]
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn add_contact(&self, contact: &Contact) -> Result<()>;
}
