//! Safety and privacy guardrails applied around every model call.
//!
//! Three independent pieces compose into the pipeline:
//! - [`redact`] scrubs PII from free text *before* it crosses the
//!   network boundary
//! - [`bucket`] enforces the per-session daily token quota
//! - [`emotion`] maps replies into the closed emotion taxonomy

pub mod bucket;
pub mod emotion;
pub mod redact;
