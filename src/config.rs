use lettre::message::Mailbox;

pub const DEFAULT_SALES_EMAIL: &str = "sales@goldwatchproject.com";
pub const DEFAULT_FROM_EMAIL: &str = "Gold Wash Plants <leads@goldwashplants.com>";
pub const DEFAULT_LEAD_SOURCE: &str = "goldwashplants.com";

/// Which transactional email service delivers notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailProviderKind {
    Resend,
    SendGrid,
}

impl EmailProviderKind {
    /// Parses the `EMAIL_PROVIDER` value (case-insensitive).
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "resend" => Ok(Self::Resend),
            "sendgrid" => Ok(Self::SendGrid),
            other => anyhow::bail!("EMAIL_PROVIDER must be 'resend' or 'sendgrid', got '{}'", other),
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Self::Resend => "RESEND_API_KEY",
            Self::SendGrid => "SENDGRID_API_KEY",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Resend => "https://api.resend.com",
            Self::SendGrid => "https://api.sendgrid.com",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub leads_table: String,
    pub email_provider: EmailProviderKind,
    /// Notifications are disabled when no key is configured.
    pub email_api_key: Option<String>,
    pub email_api_base_url: String,
    pub sales_email: Mailbox,
    pub from_email: Mailbox,
    pub lead_source: String,
    pub send_confirmation: bool,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let email_provider = match optional_var("EMAIL_PROVIDER") {
            Some(raw) => EmailProviderKind::parse(&raw)?,
            None => EmailProviderKind::Resend,
        };

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            supabase_url: std::env::var("SUPABASE_URL")
                .map_err(|_| anyhow::anyhow!("SUPABASE_URL environment variable required"))
                .and_then(|url| validate_http_url("SUPABASE_URL", &url))?,
            supabase_service_key: std::env::var("SUPABASE_SERVICE_KEY")
                .map_err(|_| anyhow::anyhow!("SUPABASE_SERVICE_KEY environment variable required"))
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("SUPABASE_SERVICE_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            leads_table: optional_var("LEADS_TABLE").unwrap_or_else(|| "leads".to_string()),
            email_provider,
            email_api_key: optional_var(email_provider.api_key_var()),
            email_api_base_url: match optional_var("EMAIL_API_BASE_URL") {
                Some(url) => validate_http_url("EMAIL_API_BASE_URL", &url)?,
                None => email_provider.default_base_url().to_string(),
            },
            sales_email: parse_mailbox_var(
                "SALES_EMAIL",
                &optional_var("SALES_EMAIL").unwrap_or_else(|| DEFAULT_SALES_EMAIL.to_string()),
            )?,
            from_email: parse_mailbox_var(
                "FROM_EMAIL",
                &optional_var("FROM_EMAIL").unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string()),
            )?,
            lead_source: optional_var("LEAD_SOURCE")
                .unwrap_or_else(|| DEFAULT_LEAD_SOURCE.to_string()),
            send_confirmation: optional_var("SEND_CONFIRMATION_EMAIL")
                .map(|raw| parse_bool("SEND_CONFIRMATION_EMAIL", &raw))
                .transpose()?
                .unwrap_or(false),
            http_timeout_secs: optional_var("HTTP_TIMEOUT_SECS")
                .map(|raw| {
                    raw.parse::<u64>().map_err(|_| {
                        anyhow::anyhow!("HTTP_TIMEOUT_SECS must be a positive number of seconds")
                    })
                })
                .transpose()?
                .unwrap_or(30),
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Supabase URL: {}", config.supabase_url);
        tracing::debug!("Leads table: {}", config.leads_table);
        if config.email_api_key.is_some() {
            tracing::info!(
                "Email notifications enabled via {:?} (confirmation: {})",
                config.email_provider,
                config.send_confirmation
            );
        } else {
            tracing::warn!(
                "{} not set, email notifications disabled",
                config.email_provider.api_key_var()
            );
        }
        tracing::debug!("Sales recipient: {}", config.sales_email);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Checks that `raw` is an absolute http(s) URL and strips any trailing slash.
pub fn validate_http_url(name: &str, raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("{} cannot be empty", name);
    }
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", name, e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("{} must start with http:// or https://", name);
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Parses `addr@host` or `Display Name <addr@host>`, failing startup on anything else.
pub fn parse_mailbox_var(name: &str, raw: &str) -> anyhow::Result<Mailbox> {
    raw.trim()
        .parse::<Mailbox>()
        .map_err(|e| anyhow::anyhow!("{} must be a valid email address ('{}'): {}", name, raw, e))
}

fn parse_bool(name: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{} must be a boolean (true/false)", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_http_url_strips_trailing_slash() {
        let url = validate_http_url("SUPABASE_URL", "https://abc.supabase.co/").unwrap();
        assert_eq!(url, "https://abc.supabase.co");
    }

    #[test]
    fn test_validate_http_url_rejects_other_schemes() {
        assert!(validate_http_url("SUPABASE_URL", "postgres://localhost/db").is_err());
        assert!(validate_http_url("SUPABASE_URL", "not a url").is_err());
        assert!(validate_http_url("SUPABASE_URL", "   ").is_err());
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!(EmailProviderKind::parse("Resend").unwrap(), EmailProviderKind::Resend);
        assert_eq!(EmailProviderKind::parse(" sendgrid ").unwrap(), EmailProviderKind::SendGrid);
        assert!(EmailProviderKind::parse("mailgun").is_err());
    }

    #[test]
    fn test_parse_mailbox_var_accepts_named_and_bare() {
        let from = parse_mailbox_var("FROM_EMAIL", DEFAULT_FROM_EMAIL).unwrap();
        assert_eq!(from.name.as_deref(), Some("Gold Wash Plants"));
        assert_eq!(from.email.to_string(), "leads@goldwashplants.com");

        let sales = parse_mailbox_var("SALES_EMAIL", " sales@example.com ").unwrap();
        assert_eq!(sales.name, None);
        assert_eq!(sales.email.to_string(), "sales@example.com");
    }

    #[test]
    fn test_parse_mailbox_var_rejects_malformed() {
        assert!(parse_mailbox_var("SALES_EMAIL", "Sales <sales@example.com").is_err());
        assert!(parse_mailbox_var("FROM_EMAIL", "Gold Wash Plants <leads@goldwashplants.com").is_err());
        assert!(parse_mailbox_var("SALES_EMAIL", "not an address").is_err());
        assert!(parse_mailbox_var("SALES_EMAIL", "<>").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(parse_bool("X", "1").unwrap());
        assert!(!parse_bool("X", "off").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }
}
