//! Infrastructure implementations for Cubby.
//!
//! Concrete collaborator clients over HTTP (Gemini generation, Cloud
//! TTS/STT, Natural Language sentiment), deterministic development
//! stubs, environment configuration, and the encrypted local
//! transcript ring buffer.

pub mod config;
pub mod dev;
pub mod model;
pub mod sentiment;
pub mod speech;
pub mod translog;
