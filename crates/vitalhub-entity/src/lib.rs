//! # vitalhub-entity
//!
//! Domain entity models for VitalHub. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! `sqlx::FromRow`.

pub mod audit;
pub mod user;
