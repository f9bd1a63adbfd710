//! Category detection over opaque error records.
//!
//! Only `code`, `message` and `data` on the top-level record are inspected.
//! Checks run in priority order and the first hit wins:
//! 1. user rejection
//! 2. insufficient funds
//! 3. network / transport
//! 4. gas estimation
//! 5. contract revert
//! 6. fallback → `Unknown`

use serde_json::Value;
use tracing::trace;

use crate::types::ErrorCategory;

/// EIP-1193 "user rejected request" provider error code.
pub const USER_REJECTED_RPC_CODE: i64 = 4001;

const USER_REJECTED_CODES: &[&str] = &["ACTION_REJECTED"];
const USER_REJECTED_PHRASES: &[&str] = &["user rejected", "user denied", "rejected by user"];

const INSUFFICIENT_FUNDS_CODES: &[&str] = &["INSUFFICIENT_FUNDS"];
const INSUFFICIENT_FUNDS_PHRASES: &[&str] = &["insufficient funds"];

const NETWORK_CODES: &[&str] = &["NETWORK_ERROR", "TIMEOUT", "SERVER_ERROR"];
const NETWORK_PHRASES: &[&str] = &["network", "timeout", "connection"];

const GAS_CODES: &[&str] = &["UNPREDICTABLE_GAS_LIMIT"];
const GAS_PHRASES: &[&str] = &["gas required exceeds", "cannot estimate gas"];

const REVERT_CODES: &[&str] = &["CALL_EXCEPTION"];
const REVERT_PHRASES: &[&str] = &["execution reverted"];

/// The `code` field of an error record, which providers emit either as a
/// JSON-RPC number or as a library-specific string constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode<'a> {
    Numeric(i64),
    Named(&'a str),
}

impl<'a> ErrorCode<'a> {
    pub fn of(error: &'a Value) -> Option<Self> {
        match error.get("code")? {
            Value::Number(n) => n.as_i64().map(Self::Numeric),
            Value::String(s) => Some(Self::Named(s.as_str())),
            _ => None,
        }
    }

    fn is_named_any(&self, names: &[&str]) -> bool {
        matches!(self, Self::Named(s) if names.contains(s))
    }
}

/// The top-level `message` string, or `""` when absent.
pub fn message_of(error: &Value) -> &str {
    error.get("message").and_then(Value::as_str).unwrap_or_default()
}

/// `s` without a leading `0x` / `0X`, or `s` unchanged.
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

/// Returns `true` if `s` is `0x` followed by one or more hex digits.
pub fn looks_like_hex_data(s: &str) -> bool {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Detect the failure category of an opaque error record.
pub fn detect_category(error: &Value) -> ErrorCategory {
    let code = ErrorCode::of(error);
    let message = message_of(error).to_lowercase();
    let mentions = |phrases: &[&str]| phrases.iter().any(|p| message.contains(p));
    let code_in = |names: &[&str]| code.as_ref().is_some_and(|c| c.is_named_any(names));

    let category = if code == Some(ErrorCode::Numeric(USER_REJECTED_RPC_CODE))
        || code_in(USER_REJECTED_CODES)
        || mentions(USER_REJECTED_PHRASES)
    {
        ErrorCategory::UserRejected
    } else if code_in(INSUFFICIENT_FUNDS_CODES) || mentions(INSUFFICIENT_FUNDS_PHRASES) {
        ErrorCategory::InsufficientFunds
    } else if code_in(NETWORK_CODES) || mentions(NETWORK_PHRASES) {
        ErrorCategory::NetworkError
    } else if code_in(GAS_CODES) || mentions(GAS_PHRASES) {
        ErrorCategory::GasEstimationFailed
    } else if code_in(REVERT_CODES) || mentions(REVERT_PHRASES) || has_hex_data(error) {
        ErrorCategory::ContractRevert
    } else {
        ErrorCategory::Unknown
    };

    trace!(category = %category, ?code, "classified error");
    category
}

fn has_hex_data(error: &Value) -> bool {
    error
        .get("data")
        .and_then(Value::as_str)
        .is_some_and(looks_like_hex_data)
}
