//! Shared domain types for Cubby.
//!
//! This crate contains the core domain types used across the Cubby backend:
//! kid profiles, chat turns, quota state, the emotion taxonomy, the safety
//! category table, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod emotion;
pub mod error;
pub mod model;
pub mod quota;
pub mod safety;
pub mod session;
pub mod speech;
