//! Email delivery via SMTP.
//!
//! [`SmtpEmailTransport`] wraps the `lettre` async SMTP transport to send
//! call sheets as plain-text emails with an optional attachment (typically
//! the rendered PDF). Configuration is loaded from environment variables; if
//! `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns `None` and no
//! mailer should be constructed.
//!
//! Email is fire-and-forget: there is no delivery confirmation channel, so
//! recipients dispatched this way stay at "sent".

use async_trait::async_trait;
use prodrunner_core::call_sheet::DocumentAttachment;

use crate::error::TransportError;

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@prodrunner.local";

/// Configuration for the SMTP email transport.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                    |
    /// |-----------------|----------|----------------------------|
    /// | `SMTP_HOST`     | yes      | —                          |
    /// | `SMTP_PORT`     | no       | `587`                      |
    /// | `SMTP_FROM`     | no       | `noreply@prodrunner.local` |
    /// | `SMTP_USER`     | no       | —                          |
    /// | `SMTP_PASSWORD` | no       | —                          |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailTransport trait
// ---------------------------------------------------------------------------

/// Object-safe seam over email dispatch, implemented by
/// [`SmtpEmailTransport`] and by fakes in orchestrator tests.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Send a document email. Fire-and-forget — success means the relay
    /// accepted the message, nothing more.
    async fn send_document(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachment: Option<&DocumentAttachment>,
    ) -> Result<(), TransportError>;
}

// ---------------------------------------------------------------------------
// SmtpEmailTransport
// ---------------------------------------------------------------------------

/// Sends call-sheet emails via SMTP.
pub struct SmtpEmailTransport {
    config: EmailConfig,
}

impl SmtpEmailTransport {
    /// Create a new email transport with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl EmailTransport for SmtpEmailTransport {
    async fn send_document(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachment: Option<&DocumentAttachment>,
    ) -> Result<(), TransportError> {
        use lettre::{
            message::{header::ContentType, Attachment, MultiPart, SinglePart},
            transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let builder = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to.parse()?)
            .subject(subject);

        let email = match attachment {
            Some(att) => {
                let content_type = ContentType::parse(&att.content_type)
                    .map_err(|e| TransportError::Build(e.to_string()))?;
                builder
                    .multipart(
                        MultiPart::mixed()
                            .singlepart(SinglePart::plain(body.to_string()))
                            .singlepart(
                                Attachment::new(att.filename.clone())
                                    .body(att.data.clone(), content_type),
                            ),
                    )
                    .map_err(|e| TransportError::Build(e.to_string()))?
            }
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(body.to_string())
                .map_err(|e| TransportError::Build(e.to_string()))?,
        };

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to, subject = subject, "Call sheet email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
