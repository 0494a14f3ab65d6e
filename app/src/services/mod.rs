// app/src/services/mod.rs

pub mod auth_service;
pub mod mailer;
pub mod token_service;
