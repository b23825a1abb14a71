use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{ensure_success, EmailMessage, EmailProvider};
use crate::errors::AppError;

/// Resend takes RFC 5322 mailbox strings, e.g. `Gold Wash Plants <leads@goldwashplants.com>`.
#[derive(Serialize)]
struct ResendEmail<'a> {
    from: String,
    to: [String; 1],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<String>,
}

impl<'a> From<&'a EmailMessage> for ResendEmail<'a> {
    fn from(message: &'a EmailMessage) -> Self {
        Self {
            from: message.from.to_string(),
            to: [message.to.to_string()],
            subject: &message.subject,
            html: &message.html,
            reply_to: message.reply_to.as_ref().map(ToString::to_string),
        }
    }
}

/// Resend (`https://api.resend.com`) provider.
#[derive(Clone)]
pub struct ResendProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ResendProvider {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            AppError::InternalError(format!("Failed to create Resend client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError> {
        let url = format!("{}/emails", self.base_url);

        tracing::info!("Sending email via Resend to {}", message.to.email);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&ResendEmail::from(message))
            .send()
            .await?;

        ensure_success(self.name(), response).await
    }

    fn name(&self) -> &'static str {
        "Resend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message() -> EmailMessage {
        EmailMessage {
            from: "Gold Wash Plants <leads@goldwashplants.com>".parse().unwrap(),
            to: "sales@example.com".parse().unwrap(),
            subject: "New Lead".to_string(),
            html: "<p>hi</p>".to_string(),
            reply_to: Some("jane@example.com".parse().unwrap()),
        }
    }

    #[tokio::test]
    async fn test_send_posts_expected_body() {
        let mock_server = MockServer::start().await;
        let message = message();

        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("Authorization", "Bearer re_test"))
            .and(body_json(serde_json::json!({
                "from": message.from.to_string(),
                "to": ["sales@example.com"],
                "subject": "New Lead",
                "html": "<p>hi</p>",
                "reply_to": "jane@example.com"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "em_1"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider =
            ResendProvider::new(mock_server.uri(), "re_test".to_string(), Duration::from_secs(5))
                .unwrap();
        provider.send(&message).await.unwrap();
    }

    #[test]
    fn test_from_keeps_display_name() {
        let msg = message();
        let body = ResendEmail::from(&msg);
        assert!(body.from.contains("Gold Wash Plants"));
        assert!(body.from.ends_with("<leads@goldwashplants.com>"));
    }

    #[tokio::test]
    async fn test_send_maps_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid from address"))
            .mount(&mock_server)
            .await;

        let provider =
            ResendProvider::new(mock_server.uri(), "re_test".to_string(), Duration::from_secs(5))
                .unwrap();
        let err = provider.send(&message()).await.unwrap_err();
        assert!(err.to_string().contains("invalid from address"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_external_api_error() {
        // Nothing listens on port 9 (discard) in the test environment
        let provider = ResendProvider::new(
            "http://127.0.0.1:9".to_string(),
            "re_test".to_string(),
            Duration::from_secs(2),
        )
        .unwrap();

        let result = provider.send(&message()).await;
        assert!(matches!(result, Err(AppError::ExternalApiError(_))));
    }
}
