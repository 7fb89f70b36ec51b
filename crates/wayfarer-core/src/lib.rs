//! Wayfarer Core — domain models, identifiers, error types and the
//! repository traits shared across all crates.

pub mod error;
pub mod ids;
pub mod models;
pub mod repository;
