use crate::email::provider::{Contact, EmailProvider, FIELD_DEMO_DATE, FIELD_MESSAGE};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

const TAG_NEWSLETTER: &str = "newsletter";
const TAG_CONTACT_FORM: &str = "contact-form";
const TAG_DEMO_REQUEST: &str = "demo-request";

/// Outcome shown to the visitor who submitted a form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionResult {
    pub success: bool,
    pub message: String,
    pub provider: Option<String>,
}

impl SubmissionResult {
    fn failed(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            provider: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemoRequest {
    pub name: String,
    pub email: String,
    pub company: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub preferred_date: Option<String>,
}

/// Sends form submissions to the configured email-marketing provider
///
/// When the primary provider fails and automatic fallback is on, the
/// submission is retried once against the fallback provider.
pub struct EmailService {
    primary: Arc<dyn EmailProvider>,
    fallback: Option<Arc<dyn EmailProvider>>,
    auto_fallback: bool,
}

impl EmailService {
    pub fn new(
        primary: Arc<dyn EmailProvider>,
        fallback: Option<Arc<dyn EmailProvider>>,
        auto_fallback: bool,
    ) -> Self {
        Self {
            primary,
            fallback,
            auto_fallback,
        }
    }

    pub async fn subscribe_newsletter(&self, email: &str, source: &str) -> SubmissionResult {
        let email = email.trim();
        if !is_valid_email(email) {
            return SubmissionResult::failed("Please enter a valid email address.");
        }

        let contact = Contact {
            email: email.to_string(),
            tags: vec![TAG_NEWSLETTER.to_string()],
            source: source.to_string(),
            ..Contact::default()
        };
        self.submit(contact, "Thanks for subscribing! Please check your inbox.")
            .await
    }

    pub async fn submit_contact_form(&self, form: &ContactForm) -> SubmissionResult {
        let email = form.email.trim();
        if !is_valid_email(email) {
            return SubmissionResult::failed("Please enter a valid email address.");
        }
        if form.name.trim().is_empty() {
            return SubmissionResult::failed("Please enter your name.");
        }

        let (first_name, last_name) = split_name(&form.name);
        let contact = Contact {
            email: email.to_string(),
            first_name,
            last_name,
            company: non_empty(form.company.as_deref()),
            phone: non_empty(form.phone.as_deref()),
            tags: vec![TAG_CONTACT_FORM.to_string()],
            source: "contact-form".to_string(),
            fields: extra_fields(&[(FIELD_MESSAGE, Some(form.message.as_str()))]),
        };
        self.submit(contact, "Thanks for reaching out! We'll get back to you shortly.")
            .await
    }

    pub async fn submit_demo_request(&self, request: &DemoRequest) -> SubmissionResult {
        let email = request.email.trim();
        if !is_valid_email(email) {
            return SubmissionResult::failed("Please enter a valid email address.");
        }
        if request.name.trim().is_empty() || request.company.trim().is_empty() {
            return SubmissionResult::failed("Please enter your name and company.");
        }

        let (first_name, last_name) = split_name(&request.name);
        let contact = Contact {
            email: email.to_string(),
            first_name,
            last_name,
            company: non_empty(Some(&request.company)),
            phone: non_empty(request.phone.as_deref()),
            tags: vec![TAG_DEMO_REQUEST.to_string()],
            source: "demo-request".to_string(),
            fields: extra_fields(&[(FIELD_DEMO_DATE, request.preferred_date.as_deref())]),
        };
        self.submit(contact, "Demo requested! Our team will contact you to schedule it.")
            .await
    }

    async fn submit(&self, contact: Contact, success_message: &str) -> SubmissionResult {
        let primary_error = match self.primary.add_contact(&contact).await {
            Ok(()) => {
                info!(provider = self.primary.name(), source = %contact.source, "Submission accepted");
                return self.succeeded(self.primary.as_ref(), success_message);
            }
            Err(e) => e,
        };
        warn!(provider = self.primary.name(), "Submission failed: {}", primary_error);

        if let (true, Some(fallback)) = (self.auto_fallback, self.fallback.as_ref()) {
            match fallback.add_contact(&contact).await {
                Ok(()) => {
                    info!(provider = fallback.name(), "Submission accepted by fallback provider");
                    return self.succeeded(fallback.as_ref(), success_message);
                }
                Err(e) => warn!(provider = fallback.name(), "Fallback submission failed: {}", e),
            }
        }

        SubmissionResult::failed("Something went wrong. Please try again later.")
    }

    fn succeeded(&self, provider: &dyn EmailProvider, message: &str) -> SubmissionResult {
        SubmissionResult {
            success: true,
            message: message.to_string(),
            provider: Some(provider.name().to_string()),
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
        .is_match(email)
}

fn split_name(name: &str) -> (Option<String>, Option<String>) {
    let mut parts = name.split_whitespace();
    let first = parts.next().map(str::to_string);
    let rest = parts.collect::<Vec<_>>().join(" ");
    (first, if rest.is_empty() { None } else { Some(rest) })
}

fn extra_fields(values: &[(&str, Option<&str>)]) -> BTreeMap<String, String> {
    values
        .iter()
        .filter_map(|(key, value)| non_empty(*value).map(|v| (key.to_string(), v)))
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
