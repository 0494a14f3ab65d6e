// app/src/services/auth_service.rs

//! Account registration and login on top of the user store.

use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use estate::{model::NewUser, model::User, UserStore};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::{AppError, Result};
use crate::services::token_service::JwtService;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
  pub name: Option<String>,
  pub email: Option<String>,
  pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
  pub email: Option<String>,
  pub password: Option<String>,
}

/// A freshly issued token and the account it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
  pub token: String,
  pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
  users: Arc<dyn UserStore>,
  tokens: JwtService,
}

impl AuthService {
  pub fn new(users: Arc<dyn UserStore>, tokens: JwtService) -> Self {
    Self { users, tokens }
  }

  pub fn tokens(&self) -> &JwtService {
    &self.tokens
  }

  /// Creates the account. No token is issued; the client logs in afterwards.
  #[instrument(name = "auth_service::register", skip(self, request), err(Display))]
  pub async fn register(&self, request: RegisterRequest) -> Result<User> {
    let (Some(name), Some(email), Some(password)) = (
      filled(request.name),
      filled(request.email),
      request.password.filter(|p| !p.is_empty()),
    ) else {
      return Err(AppError::Validation("Name, email, and password are required.".to_string()));
    };

    if self.users.find_by_email(&email).await?.is_some() {
      warn!("Registration rejected: email already in use.");
      return Err(AppError::Validation("User already exists".to_string()));
    }

    let password_hash = hash_password(&password)?;
    let user = self.users.insert(NewUser { name, email, password_hash }).await?;
    info!(user_id = %user.id, "User registered.");
    Ok(user)
  }

  #[instrument(name = "auth_service::login", skip(self, request), err(Display))]
  pub async fn login(&self, request: LoginRequest) -> Result<Session> {
    let (Some(email), Some(password)) = (
      filled(request.email),
      request.password.filter(|p| !p.is_empty()),
    ) else {
      return Err(AppError::Validation("Email and password are required.".to_string()));
    };

    let Some(user) = self.users.find_by_email(&email).await? else {
      debug!("Login failed: no such user.");
      return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
    };
    if !verify_password(&user.password_hash, &password)? {
      debug!(user_id = %user.id, "Login failed: wrong password.");
      return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
    }

    let token = self.tokens.create_token(user.id)?;
    info!(user_id = %user.id, "User logged in.");
    Ok(Session { token, user })
  }
}

fn filled(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Hashes a plain-text password with Argon2 and a random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| {
      error!(error = %e, "Argon2 password hashing failed.");
      AppError::Internal(format!("Password hashing process failed: {e}"))
    })
}

/// `Ok(false)` on a mismatch; errors only when the stored hash itself is unusable.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(stored_hash: &str, provided_password: &str) -> Result<bool> {
  let parsed = PasswordHash::new(stored_hash).map_err(|e| {
    error!(error = %e, "Failed to parse stored password hash.");
    AppError::Internal(format!("Invalid stored password hash format: {e}"))
  })?;
  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(e) => {
      error!(error = %e, "Argon2 password verification encountered an error.");
      Err(AppError::Internal(format!("Password verification process failed: {e}")))
    }
  }
}
