use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Acknowledgment returned for every accepted submission.
pub const SUCCESS_MESSAGE: &str = "Thank you! We'll be in touch within 24 hours.";

/// Raw lead form payload as posted by the website.
///
/// Every field is optional at this layer; required-field checks happen in
/// [`crate::validation::validate_submission`] so that the caller gets the
/// documented error message instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub interest: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Lifecycle status of a lead row. Leads are always created as `new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
}

/// Normalized lead record, serialized as the row inserted into the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub interest: Option<String>,
    pub location: Option<String>,
    pub message: Option<String>,
    pub source: String,
    pub status: LeadStatus,
    pub email_sent: bool,
    #[serde(serialize_with = "serialize_rfc3339")]
    pub created_at: DateTime<Utc>,
}

fn serialize_rfc3339<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Identifier assigned by the store. Supabase tables use either a bigint
/// identity column or a uuid, so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeadId {
    Number(i64),
    Text(String),
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadId::Number(n) => write!(f, "{}", n),
            LeadId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Row returned by the store after an insert. Only `id` is interpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct SavedLead {
    #[serde(default)]
    pub id: Option<LeadId>,
}

/// Body of a successful submission response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "leadId", skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<LeadId>,
}

impl LeadResponse {
    pub fn accepted(lead_id: Option<LeadId>) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            lead_id,
        }
    }
}

/// What happened to the notifications of one submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationOutcome {
    pub sales_sent: bool,
    pub confirmation_sent: bool,
    pub marked_email_sent: bool,
}
