//! HTTP request handlers, one module per resource.

pub mod admin;
pub mod after_event;
pub mod auth;
pub mod clubs;
pub mod events;
pub mod poc;
pub mod sub_events;
pub mod uploads;
pub mod users;
