//! Row structs and creation DTOs, one module per table.

pub mod club;
pub mod event;
pub mod sub_event;
pub mod user;
