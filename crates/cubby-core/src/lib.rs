//! Business logic for Cubby: the guardrail pipeline and orchestrator.
//!
//! Everything in this crate is network-free and storage-free. External
//! collaborators (language model, speech synthesis, speech-to-text,
//! sentiment) are traits defined in [`collab`]; concrete HTTP clients
//! live in cubby-infra.

pub mod canned;
pub mod collab;
pub mod guardrail;
pub mod orchestrator;
pub mod preamble;
pub mod reply;
pub mod session;
