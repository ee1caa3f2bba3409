//! SMTP delivery over a STARTTLS relay (lettre, tokio executor).

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::SmtpConfig;
use crate::notify::retry::{retry, FailureKind, RetryPolicy};
use crate::notify::templates::{attachment_body, link_body, REPORT_SUBJECT};
use crate::notify::{Notifier, NotifyError, ReportDelivery};

const ATTACHMENT_NAME: &str = "Big5_Report.pdf";

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    policy: RetryPolicy,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(NotifyError::Setup)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: parse_mailbox(&config.from)?,
            policy: RetryPolicy::default(),
        })
    }

    async fn build_message(
        &self,
        to: &str,
        name: &str,
        delivery: ReportDelivery<'_>,
    ) -> Result<Message, NotifyError> {
        let builder = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(to)?)
            .subject(REPORT_SUBJECT);

        let message = match delivery {
            ReportDelivery::Link(link) => builder
                .header(ContentType::TEXT_HTML)
                .body(link_body(name, link)),
            ReportDelivery::Attachment(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|source| NotifyError::Attachment {
                        path: path.to_path_buf(),
                        source,
                    })?;
                let pdf = ContentType::parse("application/pdf")
                    .map_err(|e| NotifyError::Message(e.to_string()))?;
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::html(attachment_body(name)))
                        .singlepart(Attachment::new(ATTACHMENT_NAME.to_string()).body(bytes, pdf)),
                )
            }
        };

        message.map_err(|e| NotifyError::Message(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|source| NotifyError::Address {
        address: address.to_string(),
        source,
    })
}

fn classify(error: &lettre::transport::smtp::Error) -> FailureKind {
    if error.is_permanent() {
        FailureKind::Permanent
    } else if error.is_transient() {
        FailureKind::Transient
    } else {
        FailureKind::Network
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_report(
        &self,
        to: &str,
        name: &str,
        delivery: ReportDelivery<'_>,
    ) -> Result<(), NotifyError> {
        let message = self.build_message(to, name, delivery).await?;

        retry(&self.policy, classify, || self.transport.send(message.clone()))
            .await
            .map_err(|failure| NotifyError::Send {
                attempts: failure.attempts,
                source: failure.error,
            })?;

        info!("Report email sent to {to}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "reports@example.com".to_string(),
            password: "secret".to_string(),
            from: "Reports <reports@example.com>".to_string(),
        }
    }

    fn headers(message: &Message) -> String {
        String::from_utf8_lossy(&message.formatted()).into_owned()
    }

    #[tokio::test]
    async fn test_invalid_sender_is_rejected_at_construction() {
        let mut config = config();
        config.from = "not an address".to_string();
        assert!(matches!(
            SmtpNotifier::new(&config),
            Err(NotifyError::Address { .. })
        ));
    }

    #[tokio::test]
    async fn test_link_message_is_html() {
        let notifier = SmtpNotifier::new(&config()).unwrap();
        let message = notifier
            .build_message("ada@example.com", "Ada", ReportDelivery::Link("https://x.test/r/1"))
            .await
            .unwrap();

        let raw = headers(&message);
        assert!(raw.contains("To: ada@example.com"));
        assert!(raw.contains("Content-Type: text/html"));
        assert!(raw.contains("Subject: Insights Unlocked"));
    }

    #[tokio::test]
    async fn test_attachment_message_carries_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.3 test").unwrap();

        let notifier = SmtpNotifier::new(&config()).unwrap();
        let message = notifier
            .build_message("ada@example.com", "Ada", ReportDelivery::Attachment(&path))
            .await
            .unwrap();

        let raw = headers(&message);
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("application/pdf"));
        assert!(raw.contains(ATTACHMENT_NAME));
    }

    #[tokio::test]
    async fn test_missing_attachment_fails_before_sending() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = SmtpNotifier::new(&config()).unwrap();
        let err = notifier
            .build_message(
                "ada@example.com",
                "Ada",
                ReportDelivery::Attachment(&dir.path().join("absent.pdf")),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Attachment { .. }));
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_address_error() {
        let notifier = SmtpNotifier::new(&config()).unwrap();
        let err = notifier
            .build_message("nobody", "Ada", ReportDelivery::Link("https://x.test"))
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Address { .. }));
    }
}
