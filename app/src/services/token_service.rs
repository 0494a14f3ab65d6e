// app/src/services/token_service.rs

//! HS256 bearer tokens carrying the user id as `sub`.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  pub sub: String,
  pub exp: i64,
  pub iat: i64,
  pub iss: String,
  pub jti: String,
}

#[derive(Clone)]
pub struct JwtService {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  issuer: String,
  ttl: Duration,
}

impl JwtService {
  pub fn new(secret: &str, issuer: impl Into<String>, ttl_hours: i64) -> Self {
    Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      issuer: issuer.into(),
      ttl: Duration::hours(ttl_hours),
    }
  }

  pub fn create_token(&self, user_id: Uuid) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
      sub: user_id.to_string(),
      exp: (now + self.ttl).timestamp(),
      iat: now.timestamp(),
      iss: self.issuer.clone(),
      jti: Uuid::new_v4().to_string(),
    };
    encode(&Header::default(), &claims, &self.encoding_key)
      .map_err(|e| AppError::Internal(format!("Token signing failed: {e}")))
  }

  /// Returns the user id of a valid, unexpired token.
  pub fn verify_token(&self, token: &str) -> Result<Uuid> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&self.issuer]);

    let claims = decode::<Claims>(token, &self.decoding_key, &validation)
      .map(|data| data.claims)
      .map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token.");
        AppError::Auth("Invalid or expired token".to_string())
      })?;
    Uuid::parse_str(&claims.sub).map_err(|_| AppError::Auth("Invalid or expired token".to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn create_and_verify() {
    let service = JwtService::new("test_secret_key", "estate", 24);
    let user_id = Uuid::new_v4();
    let token = service.create_token(user_id).unwrap();
    assert_eq!(service.verify_token(&token).unwrap(), user_id);
  }

  #[test]
  fn garbage_is_rejected() {
    let service = JwtService::new("test_secret_key", "estate", 24);
    assert!(matches!(service.verify_token("invalid_token"), Err(AppError::Auth(_))));
  }

  #[test]
  fn wrong_secret_or_issuer_is_rejected() {
    let signer = JwtService::new("secret1", "estate", 24);
    let token = signer.create_token(Uuid::new_v4()).unwrap();

    assert!(JwtService::new("secret2", "estate", 24).verify_token(&token).is_err());
    assert!(JwtService::new("secret1", "someone-else", 24).verify_token(&token).is_err());
  }

  #[test]
  fn expired_token_is_rejected() {
    // Well past the default 60 s leeway.
    let service = JwtService::new("test_secret_key", "estate", -1);
    let token = service.create_token(Uuid::new_v4()).unwrap();
    assert!(service.verify_token(&token).is_err());
  }
}
