use crate::commands::AppContext;
use crate::email::{create_service, ContactForm, DemoRequest, EmailService, SubmissionResult};
use crate::error::Result;
use crate::sheets::{fetch_sheet_data, to_chart_data, ChartData, SheetConfig};
use std::time::Duration;
use tracing::error;

const UNAVAILABLE_MESSAGE: &str = "This form is temporarily unavailable. Please try again later.";

fn email_service(ctx: &AppContext) -> Option<EmailService> {
    match create_service(&ctx.config.email) {
        Ok(service) => Some(service),
        Err(e) => {
            error!("Email service is not configured: {}", e);
            None
        }
    }
}

fn unavailable() -> SubmissionResult {
    SubmissionResult {
        success: false,
        message: UNAVAILABLE_MESSAGE.to_string(),
        provider: None,
    }
}

pub async fn subscribe_newsletter(ctx: &AppContext, email: &str, source: &str) -> SubmissionResult {
    match email_service(ctx) {
        Some(service) => service.subscribe_newsletter(email, source).await,
        None => unavailable(),
    }
}

pub async fn submit_contact_form(ctx: &AppContext, form: &ContactForm) -> SubmissionResult {
    match email_service(ctx) {
        Some(service) => service.submit_contact_form(form).await,
        None => unavailable(),
    }
}

pub async fn submit_demo_request(ctx: &AppContext, request: &DemoRequest) -> SubmissionResult {
    match email_service(ctx) {
        Some(service) => service.submit_demo_request(request).await,
        None => unavailable(),
    }
}

/// Fetches a sheet range and converts it to chart data
///
/// The configured Sheets API key is used when the request does not carry one.
pub async fn fetch_chart_data(ctx: &AppContext, mut sheet: SheetConfig) -> Result<ChartData> {
    if sheet.api_key.is_none() {
        sheet.api_key = ctx.config.sheets.api_key.clone();
    }

    let rows = fetch_sheet_data(&sheet, Duration::from_secs(ctx.config.sheets.timeout_secs)).await?;
    to_chart_data(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_email_reports_unavailable() {
        let ctx = AppContext::in_memory().unwrap();
        let result = subscribe_newsletter(&ctx, "jane@example.com", "footer").await;

        assert!(!result.success);
        assert_eq!(result.message, UNAVAILABLE_MESSAGE);
    }
}
