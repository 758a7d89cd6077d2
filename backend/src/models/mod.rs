//! Database models for the Bar Stock Tracker
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
