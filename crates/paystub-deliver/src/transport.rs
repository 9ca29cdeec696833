//! The SMTP transport seam.
//!
//! The pipeline talks to [`MailTransport`] ("send a message, tell me if it
//! worked") so tests can substitute a stub and the dispatcher never sees
//! connection details. [`SmtpMailer`] is the production implementation.

use std::env;
use std::time::Duration;

use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("message build: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("invalid mailbox '{address}': {source}")]
    Mailbox {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("attachment content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),
    #[error("smtp: {0}")]
    Smtp(String),
}

/// Capability to submit one message to the outside world.
///
/// Implementations must release any connection on every exit path; a failed
/// send leaves nothing held.
pub trait MailTransport: Send + Sync {
    fn send(&self, message: &Message) -> Result<(), DeliveryError>;
}

/// SMTP settings, sourced from the environment. Secrets never live in code.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub sender: String,
    /// Per-attempt ceiling; a timed-out send is a per-row failure.
    pub timeout: Duration,
}

pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum SmtpConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

impl SmtpConfig {
    /// Read `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`,
    /// `SMTP_SENDER`, and `SMTP_TIMEOUT_SECS` from the environment.
    pub fn from_env() -> Result<Self, SmtpConfigError> {
        let required = |name: &'static str| {
            env::var(name).map_err(|_| SmtpConfigError::Missing(name))
        };
        let port = match env::var("SMTP_PORT") {
            Ok(value) => value.parse().map_err(|_| SmtpConfigError::Invalid {
                name: "SMTP_PORT",
                value,
            })?,
            Err(_) => DEFAULT_SMTP_PORT,
        };
        let timeout_secs = match env::var("SMTP_TIMEOUT_SECS") {
            Ok(value) => value.parse().map_err(|_| SmtpConfigError::Invalid {
                name: "SMTP_TIMEOUT_SECS",
                value,
            })?,
            Err(_) => DEFAULT_SMTP_TIMEOUT_SECS,
        };
        Ok(Self {
            host: required("SMTP_HOST")?,
            port,
            username: required("SMTP_USERNAME")?,
            password: required("SMTP_PASSWORD")?,
            sender: required("SMTP_SENDER")?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Production transport: STARTTLS submission with authentication and a
/// per-attempt timeout.
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, DeliveryError> {
        let transport = SmtpTransport::starttls_relay(&config.host)
            .map_err(|error| DeliveryError::Smtp(error.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(config.timeout))
            .build();
        Ok(Self { transport })
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        self.transport
            .send(message)
            .map(drop)
            .map_err(|error| DeliveryError::Smtp(error.to_string()))
    }
}
