use crate::config::{EmailConfig, EmailProviderKind};
use crate::email::{ConstantContactClient, EmailProvider, EmailService, MailchimpClient};
use crate::error::Result;
use crate::CmsError;
use std::sync::Arc;
use std::time::Duration;

pub fn create_provider(
    kind: EmailProviderKind,
    config: &EmailConfig,
) -> Result<Arc<dyn EmailProvider>> {
    let timeout = Duration::from_secs(config.timeout_secs);

    match kind {
        EmailProviderKind::Mailchimp => {
            let api_key = config.mailchimp_api_key.as_ref().ok_or_else(|| {
                CmsError::InvalidArgument("Mailchimp API key is not configured".to_string())
            })?;
            let list_id = config.mailchimp_list_id.as_ref().ok_or_else(|| {
                CmsError::InvalidArgument("Mailchimp list id is not configured".to_string())
            })?;

            let client = MailchimpClient::new(
                api_key.clone(),
                config.mailchimp_server_prefix.clone(),
                list_id.clone(),
                timeout,
            )?;
            Ok(Arc::new(client))
        }
        EmailProviderKind::ConstantContact => {
            let token = config.constant_contact_access_token.as_ref().ok_or_else(|| {
                CmsError::InvalidArgument(
                    "Constant Contact access token is not configured".to_string(),
                )
            })?;
            let list_id = config.constant_contact_list_id.as_ref().ok_or_else(|| {
                CmsError::InvalidArgument("Constant Contact list id is not configured".to_string())
            })?;

            let client = ConstantContactClient::new(
                token.clone(),
                list_id.clone(),
                config.constant_contact_custom_fields.clone(),
                timeout,
            )?;
            Ok(Arc::new(client))
        }
    }
}

/// Builds the email service from config
///
/// The primary provider must be fully configured. A fallback that is missing
/// credentials is skipped with a warning.
pub fn create_service(config: &EmailConfig) -> Result<EmailService> {
    let primary = create_provider(config.primary, config)?;

    let fallback = match config.fallback.filter(|kind| *kind != config.primary) {
        Some(kind) => match create_provider(kind, config) {
            Ok(provider) => Some(provider),
            Err(e) => {
                tracing::warn!("Fallback email provider unavailable: {}", e);
                None
            }
        },
        None => None,
    };

    Ok(EmailService::new(primary, fallback, config.auto_fallback))
}
