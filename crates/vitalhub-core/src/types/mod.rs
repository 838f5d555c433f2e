//! Shared type definitions.

pub mod pagination;
pub mod response;
