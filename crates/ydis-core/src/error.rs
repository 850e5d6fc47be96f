//! Error types for ydis-core.

use thiserror::Error;

/// Core error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Register nibble that does not name a program register.
    #[error("invalid register id {0:#x}")]
    InvalidRegister(u8),
}
