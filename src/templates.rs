//! Subjects and HTML bodies for lead notifications.

use crate::models::NewLead;

const CELL: &str = "padding:8px;border:1px solid #ddd;";
const LABEL_CELL: &str = "padding:8px;border:1px solid #ddd;font-weight:bold;";

/// Escapes text for interpolation into HTML element content or attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn or_placeholder<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    value.as_deref().unwrap_or(placeholder)
}

pub fn sales_subject(lead: &NewLead) -> String {
    format!(
        "🔔 New Lead: {} - {}",
        lead.name,
        or_placeholder(&lead.interest, "General Inquiry")
    )
}

fn row(label: &str, value_html: &str) -> String {
    format!(
        r#"<tr><td style="{LABEL_CELL}">{label}</td><td style="{CELL}">{value_html}</td></tr>"#
    )
}

/// Internal notification for the sales inbox.
pub fn sales_html(lead: &NewLead) -> String {
    let email = escape_html(&lead.email);
    let rows = [
        row("Name", &escape_html(&lead.name)),
        row(
            "Email",
            &format!(r#"<a href="mailto:{email}">{email}</a>"#),
        ),
        row("Phone", &escape_html(or_placeholder(&lead.phone, "Not provided"))),
        row(
            "Interest",
            &escape_html(or_placeholder(&lead.interest, "Not specified")),
        ),
        row(
            "Location",
            &escape_html(or_placeholder(&lead.location, "Not provided")),
        ),
        row("Message", &escape_html(or_placeholder(&lead.message, "None"))),
    ]
    .join("\n");

    format!(
        r#"<h2>New Quote Request from {source}</h2>
<table style="border-collapse:collapse;width:100%;max-width:600px;">
{rows}
</table>
<p style="margin-top:20px;color:#666;">Submitted: {submitted} UTC</p>
"#,
        source = escape_html(&lead.source),
        submitted = lead.created_at.format("%B %-d, %Y %-I:%M %p"),
    )
}

pub fn confirmation_subject(brand: &str) -> String {
    format!("Thanks for contacting {}", brand)
}

/// Acknowledgment sent to the person who filled in the form.
pub fn confirmation_html(lead: &NewLead, brand: &str) -> String {
    let interest = match &lead.interest {
        Some(interest) => format!(
            "<p>We received your inquiry about <strong>{}</strong>.</p>",
            escape_html(interest)
        ),
        None => "<p>We received your inquiry.</p>".to_string(),
    };

    format!(
        r#"<h2>Thank you, {name}!</h2>
{interest}
<p>A member of our team will be in touch within 24 hours.</p>
<p style="margin-top:20px;color:#666;">{brand}</p>
"#,
        name = escape_html(&lead.name),
        brand = escape_html(brand),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeadStatus;
    use chrono::{TimeZone, Utc};

    fn lead() -> NewLead {
        NewLead {
            name: "Jane <b>Doe</b>".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            interest: None,
            location: Some("Nome, AK".to_string()),
            message: Some("Need \"500 tph\" & fast".to_string()),
            source: "goldwashplants.com".to_string(),
            status: LeadStatus::New,
            email_sent: false,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 15, 5, 0).unwrap(),
        }
    }

    #[test]
    fn test_sales_subject_defaults_interest() {
        assert_eq!(
            sales_subject(&lead()),
            "🔔 New Lead: Jane <b>Doe</b> - General Inquiry"
        );
    }

    #[test]
    fn test_sales_html_escapes_and_fills_placeholders() {
        let html = sales_html(&lead());

        assert!(html.contains("New Quote Request from goldwashplants.com"));
        assert!(html.contains("Jane &lt;b&gt;Doe&lt;/b&gt;"));
        assert!(!html.contains("<b>Doe</b>"));
        assert!(html.contains("Need &quot;500 tph&quot; &amp; fast"));
        assert!(html.contains(r#"<a href="mailto:jane@example.com">jane@example.com</a>"#));
        assert!(html.contains("Not provided"));
        assert!(html.contains("Not specified"));
        assert!(html.contains("Submitted: March 1, 2026 3:05 PM UTC"));
    }

    #[test]
    fn test_confirmation_mentions_interest_when_present() {
        let mut lead = lead();
        assert!(confirmation_html(&lead, "Gold Wash Plants").contains("We received your inquiry."));

        lead.interest = Some("Trommels".to_string());
        let html = confirmation_html(&lead, "Gold Wash Plants");
        assert!(html.contains("<strong>Trommels</strong>"));
        assert!(html.contains("within 24 hours"));
        assert_eq!(
            confirmation_subject("Gold Wash Plants"),
            "Thanks for contacting Gold Wash Plants"
        );
    }
}
