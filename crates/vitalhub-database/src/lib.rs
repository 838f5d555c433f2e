//! # vitalhub-database
//!
//! PostgreSQL connection management, the filtered list query builder,
//! and concrete repository implementations for all VitalHub entities.

pub mod connection;
pub mod migration;
pub mod query;
pub mod repositories;

pub use connection::DatabasePool;
