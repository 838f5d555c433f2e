//! # vitalhub-core
//!
//! Core crate for VitalHub. Contains configuration schemas, pagination
//! types, the unified error system, and the HTTP error envelope.
//!
//! This crate has **no** internal dependencies on other VitalHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
