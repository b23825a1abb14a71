//! Email provider implementations
//!
//! | Provider | Config value | Endpoint |
//! |----------|--------------|----------|
//! | [`ResendProvider`] | `resend` | `POST /emails` |
//! | [`SendGridProvider`] | `sendgrid` | `POST /v3/mail/send` |
//!
//! Both are selected at startup by [`build_provider`]; the rest of the crate
//! only sees `Arc<dyn EmailProvider>`.

use async_trait::async_trait;
use lettre::message::Mailbox;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, EmailProviderKind};
use crate::errors::AppError;

pub mod resend;
pub mod sendgrid;

pub use resend::ResendProvider;
pub use sendgrid::SendGridProvider;

/// A single HTML email ready to hand to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub html: String,
    pub reply_to: Option<Mailbox>,
}

/// Trait for email providers
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send an email
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError>;

    /// Get provider name
    fn name(&self) -> &'static str;
}

/// Builds the configured provider, or `None` when no API key is set.
pub fn build_provider(config: &Config) -> Result<Option<Arc<dyn EmailProvider>>, AppError> {
    let Some(api_key) = config.email_api_key.clone() else {
        return Ok(None);
    };
    let base_url = config.email_api_base_url.clone();
    let timeout = Duration::from_secs(config.http_timeout_secs);

    let provider: Arc<dyn EmailProvider> = match config.email_provider {
        EmailProviderKind::Resend => Arc::new(ResendProvider::new(base_url, api_key, timeout)?),
        EmailProviderKind::SendGrid => {
            Arc::new(SendGridProvider::new(base_url, api_key, timeout)?)
        }
    };

    Ok(Some(provider))
}

/// Shared non-2xx handling for provider responses.
pub(crate) async fn ensure_success(
    provider: &str,
    response: reqwest::Response,
) -> Result<(), AppError> {
    if response.status().is_success() {
        return Ok(());
    }
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(AppError::ExternalApiError(format!(
        "{} returned {}: {}",
        provider, status, error_text
    )))
}
