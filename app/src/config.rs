// app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use secrecy::SecretString;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailTransport {
  /// Deliver through an SMTP relay.
  Smtp,
  /// Write outgoing mail to the log instead of sending it.
  Log,
}

impl FromStr for MailTransport {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "smtp" => Ok(MailTransport::Smtp),
      "log" => Ok(MailTransport::Log),
      other => Err(AppError::Config(format!(
        "Invalid MAIL_TRANSPORT '{other}', expected 'smtp' or 'log'"
      ))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
  pub host: String,
  pub port: u16,
  pub username: String,
  pub password: SecretString,
  pub from_address: String,
  /// Implicit TLS when true, STARTTLS otherwise.
  pub secure: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Absent means the server runs on in-memory stores.
  pub database_url: Option<String>,
  pub run_migrations: bool,
  pub jwt_secret: SecretString,
  pub jwt_ttl_hours: i64,
  pub jwt_issuer: String,
  pub mail_transport: MailTransport,
  pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    let config = Self::from_lookup(|name| env::var(name).ok())?;
    tracing::info!(
      host = %config.server_host,
      port = config.server_port,
      database = config.database_url.is_some(),
      mail = ?config.mail_transport,
      "Application configuration loaded successfully."
    );
    Ok(config)
  }

  /// Builds the configuration from any variable source.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let require = |name: &str| get(name).ok_or_else(|| AppError::Config(format!("Missing environment variable '{name}'")));

    let server_host = get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_or(get("SERVER_PORT"), "SERVER_PORT", 5000u16)?;
    let database_url = get("DATABASE_URL");
    let run_migrations = parse_or(get("RUN_MIGRATIONS"), "RUN_MIGRATIONS", true)?;

    let jwt_secret = SecretString::from(require("JWT_SECRET")?);
    let jwt_ttl_hours = parse_or(get("JWT_TTL_HOURS"), "JWT_TTL_HOURS", 24i64)?;
    if jwt_ttl_hours <= 0 {
      return Err(AppError::Config("JWT_TTL_HOURS must be positive".to_string()));
    }
    let jwt_issuer = get("JWT_ISSUER").unwrap_or_else(|| "estate".to_string());

    let mail_transport = match get("MAIL_TRANSPORT") {
      Some(raw) => raw.parse()?,
      None => MailTransport::Log,
    };
    let smtp = match mail_transport {
      MailTransport::Log => None,
      MailTransport::Smtp => {
        let username = require("SMTP_USER")?;
        Some(SmtpConfig {
          host: require("SMTP_HOST")?,
          port: parse_or(get("SMTP_PORT"), "SMTP_PORT", 587u16)?,
          password: SecretString::from(require("SMTP_PASS")?),
          from_address: get("SMTP_FROM").unwrap_or_else(|| username.clone()),
          secure: parse_or(get("SMTP_SECURE"), "SMTP_SECURE", false)?,
          username,
        })
      }
    };

    Ok(Self {
      server_host,
      server_port,
      database_url,
      run_migrations,
      jwt_secret,
      jwt_ttl_hours,
      jwt_issuer,
      mail_transport,
      smtp,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_or<T>(raw: Option<String>, name: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match raw {
    Some(value) => value
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {name} value '{value}': {e}"))),
    None => Ok(default),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use secrecy::ExposeSecret;
  use serial_test::serial;
  use std::collections::HashMap;

  fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| map.get(name).cloned()
  }

  #[test]
  fn defaults_apply_with_only_secret() {
    let config = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();
    assert_eq!(config.bind_address(), "127.0.0.1:5000");
    assert!(config.database_url.is_none());
    assert!(config.run_migrations);
    assert_eq!(config.jwt_ttl_hours, 24);
    assert_eq!(config.jwt_issuer, "estate");
    assert_eq!(config.mail_transport, MailTransport::Log);
    assert!(config.smtp.is_none());
    assert_eq!(config.jwt_secret.expose_secret(), "s3cret");
  }

  #[test]
  fn missing_secret_is_config_error() {
    let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
    assert!(matches!(err, AppError::Config(ref m) if m.contains("JWT_SECRET")));
  }

  #[test]
  fn invalid_numbers_are_rejected() {
    for (key, value) in [("SERVER_PORT", "http"), ("JWT_TTL_HOURS", "0"), ("RUN_MIGRATIONS", "maybe")] {
      let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "x"), (key, value)])).unwrap_err();
      assert!(matches!(err, AppError::Config(_)), "{key}={value}");
    }
  }

  #[test]
  fn smtp_settings_fall_back_to_user_as_sender() {
    let config = AppConfig::from_lookup(lookup(&[
      ("JWT_SECRET", "x"),
      ("MAIL_TRANSPORT", "SMTP"),
      ("SMTP_HOST", "smtp.example.com"),
      ("SMTP_USER", "listings@example.com"),
      ("SMTP_PASS", "app-password"),
      ("SMTP_SECURE", "true"),
    ]))
    .unwrap();
    let smtp = config.smtp.unwrap();
    assert_eq!(smtp.port, 587);
    assert_eq!(smtp.from_address, "listings@example.com");
    assert!(smtp.secure);
    assert_eq!(smtp.password.expose_secret(), "app-password");
  }

  #[test]
  fn smtp_transport_requires_credentials() {
    let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "x"), ("MAIL_TRANSPORT", "smtp")])).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
  }

  #[test]
  #[serial]
  fn reads_process_environment() {
    env::set_var("JWT_SECRET", "from-env");
    env::set_var("SERVER_PORT", "7070");
    let config = AppConfig::from_env().unwrap();
    env::remove_var("SERVER_PORT");
    env::remove_var("JWT_SECRET");
    assert_eq!(config.server_port, 7070);
    assert_eq!(config.jwt_secret.expose_secret(), "from-env");
  }
}
