use crate::email::provider::{Contact, EmailProvider};
use crate::error::Result;
use crate::CmsError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct MemberRequest<'a> {
    email_address: &'a str,
    status: &'static str,
    merge_fields: BTreeMap<&'a str, &'a str>,
    tags: &'a [String],
}

pub struct MailchimpClient {
    client: Client,
    base_url: String,
    api_key: String,
    list_id: String,
}

impl MailchimpClient {
    pub fn new(
        api_key: String,
        server_prefix: Option<String>,
        list_id: String,
        timeout: Duration,
    ) -> Result<Self> {
        let prefix = server_prefix
            .filter(|p| !p.trim().is_empty())
            .or_else(|| server_prefix_from_key(&api_key))
            .ok_or_else(|| {
                CmsError::InvalidArgument(
                    "Mailchimp server prefix is not configured and cannot be derived from the API key"
                        .to_string(),
                )
            })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CmsError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(MailchimpClient {
            client,
            base_url: format!("https://{}.api.mailchimp.com/3.0", prefix),
            api_key,
            list_id,
        })
    }
}

/// Mailchimp keys end in `-<datacenter>`, e.g. `abc123-us21`
pub fn server_prefix_from_key(api_key: &str) -> Option<String> {
    api_key
        .rsplit_once('-')
        .map(|(_, dc)| dc.trim().to_string())
        .filter(|dc| !dc.is_empty())
}

fn member_request(contact: &Contact) -> MemberRequest<'_> {
    let mut merge_fields: BTreeMap<&str, &str> = contact
        .fields
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    if let Some(first) = contact.first_name.as_deref() {
        merge_fields.insert("FNAME", first);
    }
    if let Some(last) = contact.last_name.as_deref() {
        merge_fields.insert("LNAME", last);
    }
    if let Some(company) = contact.company.as_deref() {
        merge_fields.insert("COMPANY", company);
    }
    if let Some(phone) = contact.phone.as_deref() {
        merge_fields.insert("PHONE", phone);
    }

    MemberRequest {
        email_address: &contact.email,
        status: "subscribed",
        merge_fields,
        tags: &contact.tags,
    }
}

#[async_trait]
impl EmailProvider for MailchimpClient {
    fn name(&self) -> &str {
        "mailchimp"
    }

    async fn add_contact(&self, contact: &Contact) -> Result<()> {
        let url = format!("{}/lists/{}/members", self.base_url, self.list_id);
        let request = member_request(contact);

        let response = self
            .client
            .post(&url)
            .basic_auth("site-cms", Some(&self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| CmsError::Integration(format!("Failed to send request: {}", e)))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        // Re-subscribing an existing member is not a failure for the visitor
        if status.as_u16() == 400 && error_text.contains("Member Exists") {
            return Ok(());
        }

        Err(CmsError::Integration(format!(
            "Mailchimp API error ({}): {}",
            status, error_text
        )))
    }
}
