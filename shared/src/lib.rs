//! Shared types and models for the Bar Stock Tracker
//!
//! This crate contains the domain model, numeric helpers, and the validation
//! boundary used by the backend server.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
