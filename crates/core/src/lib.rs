//! Domain logic for the Odyssey campus event approval workflow.
//!
//! Everything in this crate is pure: budget validation, the approval state
//! machines, capability checks, and after-event reconciliation rules. I/O
//! (database, HTTP) lives in the `odyssey-db` and `odyssey-api` crates.

pub mod after_event;
pub mod budget;
pub mod capability;
pub mod error;
pub mod poc;
pub mod review;
pub mod roles;
pub mod stage;
pub mod types;
