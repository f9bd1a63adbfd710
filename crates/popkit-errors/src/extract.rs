//! Pull a plain revert reason out of nested provider error shapes.
//!
//! Wallet libraries wrap the node's answer in several layers; the same reason
//! can appear as a field, inside a nested `error`, or only inside the message
//! text. Sources are tried in a fixed order and the first non-empty one wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::trace;

use crate::classify::{looks_like_hex_data, message_of};

static REASON_STRING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"reverted with reason string '([^']+)'").expect("valid regex"));

static EXECUTION_REVERTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"execution reverted: (.+)").expect("valid regex"));

const EXECUTION_REVERTED_PREFIX: &str = "execution reverted:";

/// Where a reason string was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonSource {
    /// `error.reason`
    Reason,
    /// `error.error.reason`
    NestedReason,
    /// `error.error.data.message`
    NestedDataMessage,
    /// `reverted with reason string '…'` inside `error.message`
    HardhatMessage,
    /// `execution reverted: …` inside `error.message`
    RevertedMessage,
}

const FIELD_SOURCES: &[(&str, ReasonSource)] = &[
    ("/reason", ReasonSource::Reason),
    ("/error/reason", ReasonSource::NestedReason),
    ("/error/data/message", ReasonSource::NestedDataMessage),
];

/// Extract the revert reason from an error record, or `None` if no source
/// yields a non-empty string.
pub fn extract_reason(error: &Value) -> Option<String> {
    extract_reason_with_source(error).map(|(reason, _)| reason)
}

/// Like [`extract_reason`] but also reports which source matched.
pub fn extract_reason_with_source(error: &Value) -> Option<(String, ReasonSource)> {
    for (pointer, source) in FIELD_SOURCES {
        let found = error
            .pointer(pointer)
            .and_then(Value::as_str)
            .and_then(clean_reason);
        if let Some(reason) = found {
            trace!(?source, %reason, "revert reason extracted");
            return Some((reason, *source));
        }
    }

    let message = message_of(error);
    let patterns = [
        (&*REASON_STRING_RE, ReasonSource::HardhatMessage),
        (&*EXECUTION_REVERTED_RE, ReasonSource::RevertedMessage),
    ];
    for (re, source) in patterns {
        let found = re
            .captures(message)
            .and_then(|c| c.get(1))
            .and_then(|m| clean_reason(m.as_str()));
        if let Some(reason) = found {
            trace!(?source, %reason, "revert reason extracted from message");
            return Some((reason, source));
        }
    }
    None
}

/// Raw revert data carried by the error: `error.data` or `error.error.data.data`.
pub fn raw_revert_data(error: &Value) -> Option<&str> {
    ["/data", "/error/data/data"]
        .iter()
        .filter_map(|p| error.pointer(p).and_then(Value::as_str))
        .find(|s| looks_like_hex_data(s))
}

/// Trim, drop a leading `execution reverted:` marker, and reject empties.
fn clean_reason(raw: &str) -> Option<String> {
    let mut reason = raw.trim();
    if let Some(head) = reason.get(..EXECUTION_REVERTED_PREFIX.len()) {
        if head.eq_ignore_ascii_case(EXECUTION_REVERTED_PREFIX) {
            reason = reason[EXECUTION_REVERTED_PREFIX.len()..].trim();
        }
    }
    // a bare "execution reverted" carries no reason
    if reason.is_empty() || reason.eq_ignore_ascii_case("execution reverted") {
        None
    } else {
        Some(reason.to_string())
    }
}
