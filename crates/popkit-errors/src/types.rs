//! Core types for the transaction-failure taxonomy.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::abi::DecodedCustomError;

/// Upper bound on the length of a user-facing message, in characters.
pub const MAX_USER_MESSAGE_CHARS: usize = 200;

// ─── ErrorCategory ────────────────────────────────────────────────────────────

/// The closed set of failure categories a raw wallet/RPC error can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// The user dismissed the signature/confirmation prompt.
    UserRejected,
    /// The account cannot cover gas + value.
    InsufficientFunds,
    /// Transport-level failure talking to the node.
    NetworkError,
    /// The node refused to estimate gas, usually because the call would revert.
    GasEstimationFailed,
    /// The contract reverted the call.
    ContractRevert,
    /// Anything that matched none of the above.
    Unknown,
}

impl ErrorCategory {
    /// Every category, in detection priority order.
    pub const ALL: [ErrorCategory; 6] = [
        Self::UserRejected,
        Self::InsufficientFunds,
        Self::NetworkError,
        Self::GasEstimationFailed,
        Self::ContractRevert,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserRejected => "USER_REJECTED",
            Self::InsufficientFunds => "INSUFFICIENT_FUNDS",
            Self::NetworkError => "NETWORK_ERROR",
            Self::GasEstimationFailed => "GAS_ESTIMATION_FAILED",
            Self::ContractRevert => "CONTRACT_REVERT",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether retrying the same action may succeed without changing inputs.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UserRejected | Self::NetworkError | Self::GasEstimationFailed
        )
    }

    /// Fallback user message used when nothing more specific is known.
    pub fn default_user_message(&self) -> &'static str {
        match self {
            Self::UserRejected => "Transaction cancelled.",
            Self::InsufficientFunds => "Insufficient funds for this transaction.",
            Self::NetworkError => "Network error. Please check your connection and try again.",
            Self::GasEstimationFailed => "Transaction would fail. Please check your inputs.",
            Self::ContractRevert => "Transaction rejected by the contract.",
            Self::Unknown => "An unexpected error occurred. Please try again.",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── ParsedError ──────────────────────────────────────────────────────────────

/// A categorized, user-presentable view of a failed transaction.
///
/// Built by [`crate::ErrorParser`]; construction never fails. The original
/// input is kept untouched in `original_error` for logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedError {
    pub category: ErrorCategory,
    /// One plain-English sentence, safe to show to an end user.
    pub user_message: String,
    /// Diagnostic detail for logs. May contain the raw revert reason.
    pub technical_message: String,
    /// The revert reason extracted from the error, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// The custom error decoded through a caller-supplied ABI, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoded: Option<DecodedCustomError>,
    pub original_error: Value,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ParsedError {
    /// Build a parsed error stamped with the current time.
    ///
    /// An empty `user_message` is replaced with the category default and
    /// overlong messages are clamped to [`MAX_USER_MESSAGE_CHARS`].
    pub fn new(
        category: ErrorCategory,
        user_message: impl Into<String>,
        technical_message: impl Into<String>,
        original_error: Value,
    ) -> Self {
        let user_message = user_message.into();
        let user_message = if user_message.trim().is_empty() {
            category.default_user_message().to_string()
        } else {
            clamp_message(&user_message)
        };
        Self {
            category,
            user_message,
            technical_message: technical_message.into(),
            reason: None,
            decoded: None,
            original_error,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub(crate) fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }

    pub(crate) fn with_decoded(mut self, decoded: Option<DecodedCustomError>) -> Self {
        self.decoded = decoded;
        self
    }

    pub fn is_user_rejection(&self) -> bool {
        self.category == ErrorCategory::UserRejected
    }

    pub fn is_recoverable(&self) -> bool {
        self.category.is_recoverable()
    }
}

impl fmt::Display for ParsedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message)
    }
}

impl std::error::Error for ParsedError {}

/// Truncate `message` to [`MAX_USER_MESSAGE_CHARS`] on a char boundary.
pub(crate) fn clamp_message(message: &str) -> String {
    if message.chars().count() <= MAX_USER_MESSAGE_CHARS {
        return message.to_string();
    }
    let mut out: String = message.chars().take(MAX_USER_MESSAGE_CHARS - 1).collect();
    out.push('…');
    out
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recoverable_categories() {
        let recoverable: Vec<_> = ErrorCategory::ALL
            .iter()
            .filter(|c| c.is_recoverable())
            .copied()
            .collect();
        assert_eq!(
            recoverable,
            vec![
                ErrorCategory::UserRejected,
                ErrorCategory::NetworkError,
                ErrorCategory::GasEstimationFailed,
            ]
        );
    }

    #[test]
    fn category_serializes_screaming_snake() {
        let s = serde_json::to_string(&ErrorCategory::GasEstimationFailed).unwrap();
        assert_eq!(s, "\"GAS_ESTIMATION_FAILED\"");
        assert_eq!(ErrorCategory::ContractRevert.to_string(), "CONTRACT_REVERT");
    }

    #[test]
    fn empty_user_message_falls_back_to_category_default() {
        let p = ParsedError::new(ErrorCategory::Unknown, "   ", "", json!(null));
        assert_eq!(p.user_message, "An unexpected error occurred. Please try again.");
    }

    #[test]
    fn long_user_message_is_clamped() {
        let long = "x".repeat(500);
        let p = ParsedError::new(ErrorCategory::ContractRevert, long, "t", json!({}));
        assert_eq!(p.user_message.chars().count(), MAX_USER_MESSAGE_CHARS);
        assert!(p.user_message.ends_with('…'));
    }

    #[test]
    fn parsed_error_serde_roundtrip() {
        let p = ParsedError::new(
            ErrorCategory::UserRejected,
            "Transaction cancelled.",
            "User rejected the transaction",
            json!({ "code": 4001 }),
        );
        let text = serde_json::to_string(&p).unwrap();
        assert!(text.contains("\"userMessage\""));
        let back: ParsedError = serde_json::from_str(&text).unwrap();
        assert!(back.is_user_rejection());
        assert_eq!(back.original_error, json!({ "code": 4001 }));
    }
}
