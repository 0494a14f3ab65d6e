// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EstateError {
  /// A required field was missing or malformed. Raised before any write.
  #[error("Validation failed: {0}")]
  Validation(String),

  #[error("{entity} not found: {id}")]
  NotFound { entity: &'static str, id: String },

  /// The caller is authenticated but does not own the resource.
  #[error("Caller {caller} does not own {entity} {id}")]
  Forbidden {
    entity: &'static str,
    id: String,
    caller: String,
  },

  #[error("Store operation '{operation}' failed. Source: {source}")]
  Store {
    operation: &'static str,
    #[source]
    source: AnyhowError,
  },

  #[error("Mail delivery failed. Source: {source}")]
  Mail {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal estate error: {0}")]
  Internal(String),
}

impl EstateError {
  pub fn validation(msg: impl Into<String>) -> Self {
    EstateError::Validation(msg.into())
  }

  pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
    EstateError::NotFound {
      entity,
      id: id.to_string(),
    }
  }

  /// Wraps any store-side failure. Used by store implementations that live outside this crate.
  pub fn store(operation: &'static str, source: impl Into<AnyhowError>) -> Self {
    EstateError::Store {
      operation,
      source: source.into(),
    }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, EstateError::NotFound { .. })
  }

  pub fn is_forbidden(&self) -> bool {
    matches!(self, EstateError::Forbidden { .. })
  }
}

impl From<AnyhowError> for EstateError {
  fn from(err: AnyhowError) -> Self {
    // Unwrap an EstateError that was boxed into anyhow further down the stack.
    match err.downcast::<EstateError>() {
      Ok(estate_err) => estate_err,
      Err(other) => EstateError::Internal(format!("{other:#}")),
    }
  }
}

pub type EstateResult<T, E = EstateError> = std::result::Result<T, E>;
