//! Lead intake pipeline: validate → persist → notify → mark.
//!
//! The store and email provider are injected, so the Resend/SendGrid and
//! with/without-confirmation deployments differ only in configuration.
//!
//! Flow:
//! 1. Validate and normalize the submission (400 on failure).
//! 2. Insert the row. Any store failure aborts with 500 and nothing is emailed.
//! 3. If a provider is configured, email sales. Failures are logged only.
//! 4. If the sales email went out and the row has an id, flip `email_sent`.
//! 5. Optionally email a confirmation to the submitter. Failures are logged only.

use chrono::Utc;
use lettre::message::Mailbox;
use lettre::Address;
use std::sync::Arc;

use crate::config::Config;
use crate::email::{EmailMessage, EmailProvider};
use crate::errors::{AppError, ResultExt};
use crate::models::{LeadId, LeadResponse, LeadSubmission, NewLead, NotificationOutcome};
use crate::store::LeadStore;
use crate::templates;
use crate::validation::validate_submission;

/// Addresses and toggles used when notifying about a lead.
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    pub from: Mailbox,
    pub sales_email: Mailbox,
    pub send_confirmation: bool,
    /// Name shown in the confirmation email.
    pub brand: String,
}

impl NotificationSettings {
    pub fn from_config(config: &Config) -> Self {
        let brand = config
            .from_email
            .name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| config.lead_source.clone());

        Self {
            from: config.from_email.clone(),
            sales_email: config.sales_email.clone(),
            send_confirmation: config.send_confirmation,
            brand,
        }
    }
}

#[derive(Clone)]
pub struct LeadIntake {
    store: Arc<dyn LeadStore>,
    notifier: Option<Arc<dyn EmailProvider>>,
    settings: NotificationSettings,
    source: String,
}

impl LeadIntake {
    pub fn new(
        store: Arc<dyn LeadStore>,
        notifier: Option<Arc<dyn EmailProvider>>,
        settings: NotificationSettings,
        source: String,
    ) -> Self {
        Self {
            store,
            notifier,
            settings,
            source,
        }
    }

    /// Runs the whole pipeline for one submission.
    pub async fn submit(&self, submission: &LeadSubmission) -> Result<LeadResponse, AppError> {
        let lead = validate_submission(submission, &self.source, Utc::now())?;

        tracing::info!(
            "📨 Lead submission: email={}, interest={}",
            lead.email,
            lead.interest.as_deref().unwrap_or("-")
        );

        let saved = self
            .store
            .insert_lead(&lead)
            .await
            .context("Failed to save lead")?;
        let lead_id = saved.and_then(|row| row.id);

        let outcome = self.notify(&lead, lead_id.as_ref()).await;
        tracing::info!(
            "✅ Lead accepted: id={}, sales_sent={}, confirmation_sent={}, marked={}",
            lead_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "none".to_string()),
            outcome.sales_sent,
            outcome.confirmation_sent,
            outcome.marked_email_sent
        );

        Ok(LeadResponse::accepted(lead_id))
    }

    /// Best-effort notifications. Never fails; every error is logged and dropped.
    pub async fn notify(&self, lead: &NewLead, lead_id: Option<&LeadId>) -> NotificationOutcome {
        let mut outcome = NotificationOutcome::default();
        let Some(notifier) = &self.notifier else {
            tracing::debug!("No email provider configured, skipping notifications");
            return outcome;
        };

        // The form's regex is looser than RFC 5322; such leads get no reply-to or confirmation
        let submitter = match lead.email.parse::<Address>() {
            Ok(address) => Some(Mailbox::new(None, address)),
            Err(e) => {
                tracing::warn!("⚠️  Submitter address {} not mailable: {}", lead.email, e);
                None
            }
        };

        let sales = EmailMessage {
            from: self.settings.from.clone(),
            to: self.settings.sales_email.clone(),
            subject: templates::sales_subject(lead),
            html: templates::sales_html(lead),
            reply_to: submitter.clone(),
        };

        match notifier.send(&sales).await {
            Ok(()) => {
                outcome.sales_sent = true;
                tracing::info!("✓ Sales notification sent via {}", notifier.name());
            }
            Err(e) => {
                tracing::error!("Email notification failed ({}): {}", notifier.name(), e);
            }
        }

        if outcome.sales_sent {
            if let Some(id) = lead_id {
                match self.store.mark_email_sent(id).await {
                    Ok(()) => outcome.marked_email_sent = true,
                    Err(e) => tracing::warn!("⚠️  Failed to mark lead {} email_sent: {}", id, e),
                }
            }
        }

        if let (true, Some(submitter)) = (self.settings.send_confirmation, submitter) {
            let confirmation = EmailMessage {
                from: self.settings.from.clone(),
                to: submitter,
                subject: templates::confirmation_subject(&self.settings.brand),
                html: templates::confirmation_html(lead, &self.settings.brand),
                reply_to: Some(self.settings.sales_email.clone()),
            };

            match notifier.send(&confirmation).await {
                Ok(()) => {
                    outcome.confirmation_sent = true;
                    tracing::info!("✓ Confirmation sent to submitter");
                }
                Err(e) => tracing::error!("Confirmation email failed: {}", e),
            }
        }

        outcome
    }
}
