//! Configuration errors for the parser tables and ABI decoder.
//!
//! Parsing a transaction failure never fails; only building the parser's
//! lookup tables from caller input can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid selector '{selector}': expected 0x followed by 8 hex digits")]
    InvalidSelector { selector: String },

    #[error("Invalid error signature '{signature}'")]
    InvalidSignature { signature: String },

    #[error("Invalid revert pattern: {reason}")]
    InvalidPattern { reason: String },

    #[error("Invalid ABI: {reason}")]
    InvalidAbi { reason: String },

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
