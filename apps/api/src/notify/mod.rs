// Report delivery by email.
// The pipeline only sees the Notifier trait; SMTP lives in notify::smtp.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

pub mod retry;
pub mod smtp;
pub mod templates;

pub use smtp::SmtpNotifier;

/// What the email carries.
#[derive(Debug, Clone, Copy)]
pub enum ReportDelivery<'a> {
    /// PDF on disk, attached to the email.
    Attachment(&'a Path),
    /// Shareable link to the web report.
    Link(&'a str),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build message: {0}")]
    Message(String),

    #[error("failed to read attachment {path}: {source}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SMTP transport setup failed: {0}")]
    Setup(#[source] lettre::transport::smtp::Error),

    #[error("email not sent after {attempts} attempt(s): {source}")]
    Send {
        attempts: u32,
        #[source]
        source: lettre::transport::smtp::Error,
    },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_report(
        &self,
        to: &str,
        name: &str,
        delivery: ReportDelivery<'_>,
    ) -> Result<(), NotifyError>;
}
