//! Environment-driven configuration.
//!
//! Secrets (credentials, SMTP settings) come from the environment (a
//! `.env` file is honored at startup) and are never literal in source.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use paystub_deliver::{SmtpConfig, SmtpConfigError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error(transparent)]
    Smtp(#[from] SmtpConfigError),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub auth_username: String,
    pub auth_password: String,
    pub smtp: SmtpConfig,
    /// Directory of per-company logo assets (`<company>.png`).
    pub assets_dir: Option<PathBuf>,
    /// Fallback logo used when a company has no asset of its own.
    pub default_logo: Option<PathBuf>,
}

impl ServerConfig {
    /// Read `AUTH_USERNAME`, `AUTH_PASSWORD`, the `SMTP_*` variables, and
    /// the optional `ASSETS_DIR`/`DEFAULT_LOGO` paths.
    pub fn from_env() -> Result<Self, ConfigError> {
        let required =
            |name: &'static str| env::var(name).map_err(|_| ConfigError::Missing(name));
        Ok(Self {
            auth_username: required("AUTH_USERNAME")?,
            auth_password: required("AUTH_PASSWORD")?,
            smtp: SmtpConfig::from_env()?,
            assets_dir: env::var("ASSETS_DIR").ok().map(PathBuf::from),
            default_logo: env::var("DEFAULT_LOGO").ok().map(PathBuf::from),
        })
    }
}
