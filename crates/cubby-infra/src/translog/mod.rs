//! Encrypted local transcript log.
//!
//! Parents can review what their kid talked about; nobody else can.
//! Turns are encrypted with AES-256-GCM before they touch disk, and
//! rows older than the retention window are purged on every write.

mod crypto;
mod store;

pub use crypto::LogCrypto;
pub use store::TurnLog;
