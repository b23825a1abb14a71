use async_trait::async_trait;
use lettre::message::Mailbox;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{ensure_success, EmailMessage, EmailProvider};
use crate::errors::AppError;

#[derive(Serialize)]
struct Address {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl From<&Mailbox> for Address {
    fn from(mailbox: &Mailbox) -> Self {
        Self {
            email: mailbox.email.to_string(),
            name: mailbox
                .name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        }
    }
}

#[derive(Serialize)]
struct Personalization {
    to: Vec<Address>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

#[derive(Serialize)]
struct MailSend<'a> {
    personalizations: Vec<Personalization>,
    from: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<Address>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

impl<'a> From<&'a EmailMessage> for MailSend<'a> {
    fn from(message: &'a EmailMessage) -> Self {
        Self {
            personalizations: vec![Personalization {
                to: vec![Address::from(&message.to)],
            }],
            from: Address::from(&message.from),
            reply_to: message.reply_to.as_ref().map(Address::from),
            subject: &message.subject,
            content: vec![Content {
                kind: "text/html",
                value: &message.html,
            }],
        }
    }
}

/// SendGrid v3 Mail Send provider.
#[derive(Clone)]
pub struct SendGridProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SendGridProvider {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            AppError::InternalError(format!("Failed to create SendGrid client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl EmailProvider for SendGridProvider {
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError> {
        let url = format!("{}/v3/mail/send", self.base_url);

        tracing::info!("Sending email via SendGrid to {}", message.to.email);

        // SendGrid answers 202 Accepted with an empty body
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&MailSend::from(message))
            .send()
            .await?;

        ensure_success(self.name(), response).await
    }

    fn name(&self) -> &'static str {
        "SendGrid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_send_uses_v3_mail_send_shape() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/mail/send"))
            .and(header("Authorization", "Bearer SG.test"))
            .and(body_json(serde_json::json!({
                "personalizations": [{"to": [{"email": "sales@example.com"}]}],
                "from": {"email": "leads@goldwashplants.com", "name": "Gold Wash Plants"},
                "reply_to": {"email": "jane@example.com"},
                "subject": "New Lead",
                "content": [{"type": "text/html", "value": "<p>hi</p>"}]
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider =
            SendGridProvider::new(mock_server.uri(), "SG.test".to_string(), Duration::from_secs(5))
                .unwrap();
        provider
            .send(&EmailMessage {
                from: "Gold Wash Plants <leads@goldwashplants.com>".parse().unwrap(),
                to: "sales@example.com".parse().unwrap(),
                subject: "New Lead".to_string(),
                html: "<p>hi</p>".to_string(),
                reply_to: Some("jane@example.com".parse().unwrap()),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_maps_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/mail/send"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&mock_server)
            .await;

        let provider =
            SendGridProvider::new(mock_server.uri(), "SG.test".to_string(), Duration::from_secs(5))
                .unwrap();
        let result = provider
            .send(&EmailMessage {
                from: "leads@goldwashplants.com".parse().unwrap(),
                to: "sales@example.com".parse().unwrap(),
                subject: "s".to_string(),
                html: "h".to_string(),
                reply_to: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::ExternalApiError(_))));
    }
}
