use anyhow::{bail, Context, Result};

use crate::llm_client::prompts::DEFAULT_SYSTEM_PROMPT;

const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_AI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// How a finished report reaches the test giver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Email a link to the web app, which reads the stored `FinalReport`.
    Link,
    /// Render a PDF, archive it to S3 and email it as an attachment.
    Pdf,
}

impl DeliveryMode {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "link" => Ok(DeliveryMode::Link),
            "pdf" => Ok(DeliveryMode::Pdf),
            other => bail!("REPORT_DELIVERY must be 'link' or 'pdf', got '{other}'"),
        }
    }
}

/// Settings for the text-generation provider.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub system_prompt: String,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub ai: AiConfig,
    pub smtp: SmtpConfig,
    pub delivery: DeliveryMode,
    pub webapp_domain: String,
    pub report_path: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let smtp_username = require_env("SMTP_USERNAME")?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            ai: AiConfig {
                api_key: require_env("API_KEY")?,
                api_url: optional_env("AI_API_URL", DEFAULT_AI_API_URL),
                model: optional_env("AI_MODEL", DEFAULT_AI_MODEL),
                system_prompt: optional_env("SYSTEM_PROMPT", DEFAULT_SYSTEM_PROMPT),
            },
            smtp: SmtpConfig {
                host: require_env("SMTP_HOST")?,
                port: optional_env("SMTP_PORT", "587")
                    .parse::<u16>()
                    .context("SMTP_PORT must be a valid port number")?,
                from: optional_env("MAIL_FROM", &smtp_username),
                username: smtp_username,
                password: require_env("SMTP_PASSWORD")?,
            },
            delivery: DeliveryMode::parse(&optional_env("REPORT_DELIVERY", "link"))?,
            webapp_domain: optional_env("WEBAPP_DOMAIN", ""),
            report_path: optional_env("REPORT_PATH", "/report/"),
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }

    /// Shareable link to the web view of a test's report.
    pub fn report_link(&self, test_id: &uuid::Uuid) -> String {
        format!("{}{}{}", self.webapp_domain, self.report_path, test_id)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and empty values both fall back to the default.
fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
