//! Required-field checks and normalization of inbound lead submissions.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::errors::AppError;
use crate::models::{LeadStatus, LeadSubmission, NewLead};

pub const MISSING_FIELDS_MESSAGE: &str = "Name and email are required";
pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email format";

// local@domain.tld with no whitespace and exactly one '@'
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// Simple `local@domain.tld` shape check. Deliberately permissive: anything a
/// browser `type="email"` input lets through should pass.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Trims a value and maps blank strings to `None`.
pub fn clean_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validates a submission and produces the row to insert.
///
/// Name and email must be non-blank after trimming, and the trimmed email must
/// pass [`is_valid_email`]. No other field is checked. The email is lowercased
/// and every optional field that is absent or blank becomes `None`.
pub fn validate_submission(
    submission: &LeadSubmission,
    source: &str,
    now: DateTime<Utc>,
) -> Result<NewLead, AppError> {
    let name = clean_optional(submission.name.as_deref());
    let email = clean_optional(submission.email.as_deref());

    let (Some(name), Some(email)) = (name, email) else {
        return Err(AppError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()));
    };

    if !is_valid_email(&email) {
        tracing::warn!("❌ Rejected lead with invalid email: {}", email);
        return Err(AppError::BadRequest(INVALID_EMAIL_MESSAGE.to_string()));
    }

    Ok(NewLead {
        name,
        email: email.to_lowercase(),
        phone: clean_optional(submission.phone.as_deref()),
        interest: clean_optional(submission.interest.as_deref()),
        location: clean_optional(submission.location.as_deref()),
        message: clean_optional(submission.message.as_deref()),
        source: source.to_string(),
        status: LeadStatus::New,
        email_sent: false,
        created_at: now,
    })
}
