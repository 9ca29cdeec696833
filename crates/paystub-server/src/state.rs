use std::sync::Arc;

use anyhow::Context;

use paystub_deliver::{MailTransport, SmtpMailer};
use paystub_render::Renderer;

use crate::auth::Credentials;
use crate::config::ServerConfig;

/// Shared per-process state: verification capability, renderer settings,
/// and the mail transport. No per-batch state lives here; every upload is
/// independent.
pub struct AppState {
    pub credentials: Credentials,
    pub renderer: Renderer,
    pub transport: Arc<dyn MailTransport>,
    pub sender: String,
}

impl AppState {
    pub fn new(
        credentials: Credentials,
        renderer: Renderer,
        transport: Arc<dyn MailTransport>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            renderer,
            transport,
            sender: sender.into(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let credentials = Credentials::new(&config.auth_username, &config.auth_password)
            .context("hash credentials")?;
        let mut renderer = Renderer::new();
        if let Some(dir) = &config.assets_dir {
            renderer = renderer.with_assets_dir(dir);
        }
        if let Some(logo) = &config.default_logo {
            renderer = renderer.with_default_logo(logo);
        }
        let mailer = SmtpMailer::new(&config.smtp).context("initialize smtp transport")?;
        Ok(Self::new(
            credentials,
            renderer,
            Arc::new(mailer),
            config.smtp.sender.clone(),
        ))
    }
}
