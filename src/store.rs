use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{LeadId, NewLead, SavedLead};

/// Persistence seam for leads.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Inserts a lead and returns the first created row, if the store echoed one.
    async fn insert_lead(&self, lead: &NewLead) -> Result<Option<SavedLead>, AppError>;

    /// Flips `email_sent` to true on an existing row.
    async fn mark_email_sent(&self, id: &LeadId) -> Result<(), AppError>;
}

/// Client for the Supabase (PostgREST) REST interface.
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    service_key: String,
    table: String,
}

impl SupabaseStore {
    /// Creates a new `SupabaseStore`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Project URL, e.g. `https://xyz.supabase.co` (no trailing slash).
    /// * `service_key` - Service-role key sent as both `apikey` and bearer token.
    /// * `table` - Table receiving the leads.
    /// * `timeout` - Per-request timeout.
    pub fn new(
        base_url: String,
        service_key: String,
        table: String,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            AppError::InternalError(format!("Failed to create Supabase client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url,
            service_key,
            table,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.supabase_url.clone(),
            config.supabase_service_key.clone(),
            config.leads_table.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("Content-Type", "application/json")
    }
}

#[async_trait]
impl LeadStore for SupabaseStore {
    async fn insert_lead(&self, lead: &NewLead) -> Result<Option<SavedLead>, AppError> {
        let url = self.table_url();
        tracing::info!("Inserting lead into Supabase table '{}'", self.table);

        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "return=representation")
            .json(lead)
            .send()
            .await
            .map_err(|e| AppError::StoreError(format!("Supabase insert request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::StoreError(format!(
                "Supabase insert returned {}: {}",
                status, error_text
            )));
        }

        let rows: Vec<SavedLead> = response.json().await.map_err(|e| {
            AppError::StoreError(format!("Failed to parse Supabase insert response: {}", e))
        })?;

        let saved = rows.into_iter().next();
        match saved.as_ref().and_then(|row| row.id.as_ref()) {
            Some(id) => tracing::info!("✓ Lead stored: {}", id),
            None => tracing::warn!("⚠️  Supabase insert succeeded but returned no row id"),
        }

        Ok(saved)
    }

    async fn mark_email_sent(&self, id: &LeadId) -> Result<(), AppError> {
        let filter = format!("eq.{}", id);
        let url = reqwest::Url::parse_with_params(&self.table_url(), &[("id", filter.as_str())])
            .map_err(|e| AppError::InternalError(format!("Failed to build URL: {}", e)))?;

        let response = self
            .authorized(self.client.patch(url))
            .json(&json!({ "email_sent": true }))
            .send()
            .await
            .map_err(|e| AppError::StoreError(format!("Supabase update request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::StoreError(format!(
                "Supabase update returned {}: {}",
                status, error_text
            )));
        }

        tracing::debug!("✓ Lead {} marked email_sent", id);
        Ok(())
    }
}
