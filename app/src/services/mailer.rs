// app/src/services/mailer.rs

//! Outgoing mail transports for owner outreach.

use anyhow::Context;
use async_trait::async_trait;
use estate::{Mailer, OutboundEmail};
use lettre::{
  message::{header::ContentType, Mailbox},
  transport::smtp::authentication::Credentials,
  AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::ExposeSecret;
use tracing::{info, instrument};

use crate::config::SmtpConfig;
use crate::errors::{AppError, Result};

/// Sends plain-text mail through an SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  from: Mailbox,
}

impl SmtpMailer {
  pub fn new(config: &SmtpConfig) -> Result<Self> {
    let credentials = Credentials::new(config.username.clone(), config.password.expose_secret().to_string());
    let builder = if config.secure {
      AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
    } else {
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
    }
    .map_err(|e| AppError::Config(format!("Invalid SMTP relay '{}': {e}", config.host)))?;

    let from = config
      .from_address
      .parse::<Mailbox>()
      .map_err(|e| AppError::Config(format!("Invalid SMTP_FROM address: {e}")))?;

    Ok(Self {
      transport: builder.port(config.port).credentials(credentials).build(),
      from,
    })
  }
}

#[async_trait]
impl Mailer for SmtpMailer {
  #[instrument(name = "smtp_mailer::send", skip_all, fields(subject = %email.subject))]
  async fn send(&self, email: OutboundEmail) -> anyhow::Result<()> {
    let message = Message::builder()
      .from(self.from.clone())
      .to(email.to.parse::<Mailbox>().context("owner address")?)
      .reply_to(email.reply_to.parse::<Mailbox>().context("reply-to address")?)
      .subject(email.subject)
      .header(ContentType::TEXT_PLAIN)
      .body(email.text)
      .context("building message")?;

    let response = self.transport.send(message).await.context("SMTP delivery")?;
    info!(code = %response.code(), "Email accepted by relay.");
    Ok(())
  }
}

/// Logs outgoing mail instead of sending it. Used in development.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
  async fn send(&self, email: OutboundEmail) -> anyhow::Result<()> {
    let preview = email.text.chars().take(50).collect::<String>();
    info!(
      to = %email.to,
      reply_to = %email.reply_to,
      subject = %email.subject,
      %preview,
      "Mail transport is 'log'; not sending."
    );
    Ok(())
  }
}
