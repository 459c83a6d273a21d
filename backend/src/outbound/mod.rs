//! Outbound adapters implementing the interaction store port.
//!
//! - **persistence**: PostgreSQL via Diesel, used whenever a database URL is
//!   configured.
//! - **memory**: process-local store for development runs and HTTP tests.
//!
//! Adapters translate between domain types and storage representations and
//! contain no lifecycle rules.

pub mod memory;
pub mod persistence;
