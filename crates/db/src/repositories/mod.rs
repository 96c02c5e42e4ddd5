//! Repository structs, one per table. All functions are stateless and take
//! any [`sqlx::PgExecutor`], so the same query runs against the pool or
//! inside a transaction holding the per-event row lock.

mod club_repo;
mod event_repo;
mod sub_event_repo;
mod user_repo;

pub use club_repo::ClubRepo;
pub use event_repo::EventRepo;
pub use sub_event_repo::SubEventRepo;
pub use user_repo::UserRepo;
