//! Email delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send
//! plain-text emails. Configuration is loaded from environment variables; if
//! `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns `None` and no
//! mailer should be constructed.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use wedsite_core::email_template::RenderedEmail;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@wedsite.local";

/// Configuration for the SMTP email delivery service.
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
    /// | Variable        | Required | Default                  |
    /// |-----------------|----------|--------------------------|
    /// | `SMTP_HOST`     | yes      | none                     |
    /// | `SMTP_PORT`     | no       | `587`                    |
    /// | `SMTP_FROM`     | no       | `noreply@wedsite.local`  |
    /// | `SMTP_USER`     | no       | none                     |
    /// | `SMTP_PASSWORD` | no       | none                     |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok().filter(|h| !h.trim().is_empty())?;
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
// Message builders
// ---------------------------------------------------------------------------

/// Email asking a new account holder to confirm their address.
pub fn verification_email(to: &str, link: &str) -> RenderedEmail {
    RenderedEmail {
        to: vec![to.to_string()],
        subject: "Confirm your email address".to_string(),
        body: format!(
            "Welcome!\n\nPlease confirm your email address by opening the link below:\n\n{link}\n\n\
             If you did not create an account you can ignore this message."
        ),
    }
}

/// Email carrying a one-hour password reset link.
pub fn password_reset_email(to: &str, link: &str) -> RenderedEmail {
    RenderedEmail {
        to: vec![to.to_string()],
        subject: "Reset your password".to_string(),
        body: format!(
            "A password reset was requested for your account.\n\n\
             Open the link below within one hour to choose a new password:\n\n{link}\n\n\
             If you did not request this, no action is needed."
        ),
    }
}

/// Assemble a plain-text MIME message addressed to every recipient of `email`.
fn build_message(from: &str, email: &RenderedEmail) -> Result<Message, EmailError> {
    if email.to.is_empty() {
        return Err(EmailError::Build("no recipients".to_string()));
    }

    let mut builder = Message::builder().from(from.parse::<Mailbox>()?);
    for recipient in &email.to {
        builder = builder.to(recipient.parse::<Mailbox>()?);
    }

    builder
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())
        .map_err(|e| EmailError::Build(e.to_string()))
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends plain-text emails via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailDelivery {
    /// Create a delivery service. The transport connects lazily on first send.
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: transport_builder.build(),
            config,
        })
    }

    /// Send a rendered email.
    pub async fn send(&self, email: &RenderedEmail) -> Result<(), EmailError> {
        let message = build_message(&self.config.from_address, email)?;
        self.transport.send(message).await?;

        tracing::info!(recipients = email.to.len(), subject = %email.subject, "Email sent");
        Ok(())
    }

    /// Send without surfacing failures; errors are logged.
    pub async fn send_best_effort(&self, email: &RenderedEmail) {
        if let Err(e) = self.send(email).await {
            tracing::warn!(error = %e, subject = %email.subject, "Email delivery failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
