//! Request extractors shared by all handlers.

pub mod auth;

pub use auth::AuthUser;
