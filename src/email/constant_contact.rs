use crate::email::provider::{Contact, EmailProvider};
use crate::error::Result;
use crate::CmsError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.cc.email/v3";

#[derive(Debug, Serialize)]
struct SignUpRequest<'a> {
    email_address: &'a str,
    list_memberships: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    company_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    custom_fields: Vec<CustomFieldValue<'a>>,
}

#[derive(Debug, Serialize)]
struct CustomFieldValue<'a> {
    custom_field_id: &'a str,
    value: &'a str,
}

pub struct ConstantContactClient {
    client: Client,
    base_url: String,
    access_token: String,
    list_id: String,
    /// Merge field name to Constant Contact custom field id
    custom_fields: BTreeMap<String, String>,
}

impl ConstantContactClient {
    pub fn new(
        access_token: String,
        list_id: String,
        custom_fields: BTreeMap<String, String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CmsError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(ConstantContactClient {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token,
            list_id,
            custom_fields,
        })
    }

    fn sign_up_request<'a>(&'a self, contact: &'a Contact) -> SignUpRequest<'a> {
        let custom_fields = contact
            .fields
            .iter()
            .filter_map(|(key, value)| match self.custom_fields.get(key) {
                Some(id) => Some(CustomFieldValue {
                    custom_field_id: id.as_str(),
                    value: value.as_str(),
                }),
                None => {
                    debug!(field = %key, "No Constant Contact custom field mapped, skipping");
                    None
                }
            })
            .collect();

        SignUpRequest {
            email_address: &contact.email,
            list_memberships: vec![self.list_id.as_str()],
            first_name: contact.first_name.as_deref(),
            last_name: contact.last_name.as_deref(),
            company_name: contact.company.as_deref(),
            phone_number: contact.phone.as_deref(),
            custom_fields,
        }
    }
}

#[async_trait]
impl EmailProvider for ConstantContactClient {
    fn name(&self) -> &str {
        "constant_contact"
    }

    async fn add_contact(&self, contact: &Contact) -> Result<()> {
        let url = format!("{}/contacts/sign_up_form", self.base_url);

        let request = self.sign_up_request(contact);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| CmsError::Integration(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CmsError::Integration(format!(
                "Constant Contact API error ({}): {}",
                status, error_text
            )));
        }

        Ok(())
    }
}
