// app/src/web/handlers/mod.rs

pub mod auth_handlers;
pub mod listing_handlers;
pub mod notification_handlers;
pub mod outreach_handlers;
