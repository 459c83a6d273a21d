//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module; the rest of the crate only sees the
//! [`InteractionRepository`](crate::domain::ports::InteractionRepository)
//! port. Connections come from a `bb8` pool driven by `diesel-async`.
//!
//! ```ignore
//! use callback_desk::outbound::persistence::{DbPool, DieselInteractionRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/callbacks")).await?;
//! let repo = DieselInteractionRepository::new(pool);
//! ```

mod diesel_interaction_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_interaction_repository::DieselInteractionRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_SIZE, DEFAULT_MIN_IDLE, DbPool, PoolConfig, PoolError,
};
