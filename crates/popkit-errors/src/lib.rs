//! popkit-errors — turn raw wallet/RPC transaction failures into
//! categorized, user-presentable messages.
//!
//! # Quick Start
//!
//! ```rust
//! use popkit_errors::{ErrorCategory, ErrorParser};
//! use serde_json::json;
//!
//! let parser = ErrorParser::new();
//! let parsed = parser.parse(
//!     &json!({ "code": "CALL_EXCEPTION", "reason": "execution reverted: AlreadyVoted" }),
//!     None,
//! );
//! assert_eq!(parsed.category, ErrorCategory::ContractRevert);
//! assert_eq!(parsed.user_message, "You have already voted on this proposal.");
//! ```
//!
//! This crate defines:
//! - [`ErrorCategory`] — the closed failure taxonomy
//! - [`ParsedError`] — the parser's output value
//! - [`RevertPatternTable`] — ordered reason → message dictionary
//! - [`SelectorTable`] — 4-byte custom-error selector → name
//! - [`AbiDecoder`] — optional ABI-based custom error decoding

pub mod abi;
pub mod classify;
pub mod error;
pub mod extract;
pub mod parser;
pub mod patterns;
pub mod revert;
pub mod selectors;
pub mod types;

pub use abi::{AbiDecoder, DecodedCustomError, JsonAbiDecoder};
pub use classify::detect_category;
pub use error::ConfigError;
pub use extract::extract_reason;
pub use parser::{ErrorParser, ErrorParserBuilder};
pub use patterns::{RevertPattern, RevertPatternTable};
pub use selectors::{selector_of, SelectorTable};
pub use types::{ErrorCategory, ParsedError};
