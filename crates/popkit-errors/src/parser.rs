//! `ErrorParser` — turns any wallet/RPC failure into a [`ParsedError`].
//!
//! Pipeline:
//! 1. category detection            → [`detect_category`]
//! 2. reason extraction             → [`extract_reason`]
//! 3. `Error(string)` / `Panic` data → [`decode_standard_revert`]
//! 4. pattern match on the reason   → [`RevertPatternTable`]
//! 5. selector lookup on raw data   → [`SelectorTable`], fed back into 4
//! 6. optional ABI decode           → [`AbiDecoder`]
//!
//! Steps 2–6 only run for gas-estimation failures and contract reverts.

use serde_json::{json, Value};
use tracing::debug;

use crate::abi::{AbiDecoder, DecodedCustomError};
use crate::classify::{detect_category, message_of};
use crate::error::ConfigError;
use crate::extract::{extract_reason, raw_revert_data};
use crate::patterns::{RevertPattern, RevertPatternTable};
use crate::revert::decode_standard_revert;
use crate::selectors::SelectorTable;
use crate::types::{ErrorCategory, ParsedError};

const USER_REJECTED_TECHNICAL: &str = "User rejected the transaction";
const INSUFFICIENT_FUNDS_TECHNICAL: &str = "Account balance too low for gas + value";

/// Stateless error parser holding its lookup tables.
///
/// # Usage
/// ```rust
/// use popkit_errors::ErrorParser;
/// use serde_json::json;
///
/// let parser = ErrorParser::new();
/// let parsed = parser.parse(&json!({ "code": 4001 }), None);
/// assert_eq!(parsed.user_message, "Transaction cancelled.");
/// ```
#[derive(Debug, Clone)]
pub struct ErrorParser {
    patterns: RevertPatternTable,
    selectors: SelectorTable,
}

impl ErrorParser {
    /// A parser with the bundled revert patterns and selectors.
    pub fn new() -> Self {
        Self::with_tables(RevertPatternTable::with_defaults(), SelectorTable::with_defaults())
    }

    /// A parser with caller-supplied tables.
    pub fn with_tables(patterns: RevertPatternTable, selectors: SelectorTable) -> Self {
        Self { patterns, selectors }
    }

    pub fn builder() -> ErrorParserBuilder {
        ErrorParserBuilder::default()
    }

    pub fn patterns(&self) -> &RevertPatternTable {
        &self.patterns
    }

    pub fn selectors(&self) -> &SelectorTable {
        &self.selectors
    }

    /// Parse an opaque error record. Never fails; anything unexpected ends
    /// up as [`ErrorCategory::Unknown`].
    pub fn parse(&self, error: &Value, abi: Option<&dyn AbiDecoder>) -> ParsedError {
        self.parse_record(error, error.clone(), abi)
    }

    /// Parse an error record or a bare message string.
    ///
    /// A JSON string is treated as `{ "message": <string> }`; the original
    /// value is still the one preserved on the result.
    pub fn from_any(&self, error: &Value) -> ParsedError {
        match error {
            Value::String(s) => self.parse_record(&json!({ "message": s }), error.clone(), None),
            other => self.parse(other, None),
        }
    }

    /// Parse a plain error message.
    pub fn from_message(&self, message: &str) -> ParsedError {
        self.from_any(&Value::String(message.to_string()))
    }

    fn parse_record(
        &self,
        record: &Value,
        original: Value,
        abi: Option<&dyn AbiDecoder>,
    ) -> ParsedError {
        let category = detect_category(record);
        let raw_message = message_of(record);
        debug!(%category, "parsing transaction error");

        match category {
            ErrorCategory::UserRejected => ParsedError::new(
                category,
                category.default_user_message(),
                USER_REJECTED_TECHNICAL,
                original,
            ),
            ErrorCategory::InsufficientFunds => ParsedError::new(
                category,
                category.default_user_message(),
                INSUFFICIENT_FUNDS_TECHNICAL,
                original,
            ),
            ErrorCategory::NetworkError => ParsedError::new(
                category,
                category.default_user_message(),
                non_empty_or(raw_message, "Network request failed"),
                original,
            ),
            ErrorCategory::GasEstimationFailed | ErrorCategory::ContractRevert => {
                self.explain_revert(category, record, original, abi)
            }
            ErrorCategory::Unknown => {
                let technical = if raw_message.is_empty() {
                    record.to_string()
                } else {
                    raw_message.to_string()
                };
                ParsedError::new(category, category.default_user_message(), technical, original)
            }
        }
    }

    fn explain_revert(
        &self,
        category: ErrorCategory,
        record: &Value,
        original: Value,
        abi: Option<&dyn AbiDecoder>,
    ) -> ParsedError {
        let data = raw_revert_data(record);

        let mut reason = extract_reason(record);
        let mut standard_technical = None;
        if reason.is_none() {
            if let Some(standard) = data.and_then(decode_standard_revert) {
                debug!(?standard, "decoded built-in revert payload");
                reason = Some(standard.reason());
                standard_technical = Some(standard.technical());
            }
        }

        let mut matched = reason.as_deref().and_then(|r| self.patterns.match_reason(r));

        let mut selector_name = None;
        if matched.is_none() {
            if let Some(name) = data.and_then(|d| self.selectors.lookup_data(d)) {
                selector_name = Some(name);
                matched = self.patterns.match_reason(name);
            }
        }

        let decoded: Option<DecodedCustomError> = match (abi, data) {
            (Some(abi), Some(d)) => {
                let decoded = abi.decode_error_hex(d);
                debug!(decoded = ?decoded.as_ref().map(|d| &d.name), "ABI decode attempted");
                decoded
            }
            _ => None,
        };
        if matched.is_none() {
            matched = decoded.as_ref().and_then(|d| self.patterns.match_reason(&d.name));
        }

        let user_message = match category {
            ErrorCategory::GasEstimationFailed => match (matched, selector_name, &decoded) {
                (Some(m), _, _) => m.to_string(),
                (None, Some(name), _) => format!("Transaction would fail: {name}."),
                (None, None, Some(d)) => format!("Transaction would fail: {}.", d.name),
                (None, None, None) => category.default_user_message().to_string(),
            },
            _ => match (matched, &decoded, selector_name, &reason) {
                (Some(m), _, _, _) => m.to_string(),
                (None, Some(d), _, _) => format!("Contract error: {}", d.name),
                (None, None, _, Some(r)) => format!("Transaction failed: {r}"),
                (None, None, Some(name), None) => format!("Contract error: {name}"),
                (None, None, None, None) => category.default_user_message().to_string(),
            },
        };

        let technical = standard_technical
            .or_else(|| reason.clone())
            .or_else(|| selector_name.map(str::to_string))
            .or_else(|| decoded.as_ref().map(|d| d.to_string()))
            .or_else(|| data.map(|d| format!("Unrecognized revert data {d}")))
            .unwrap_or_else(|| {
                non_empty_or(message_of(record), match category {
                    ErrorCategory::GasEstimationFailed => "Gas estimation failed",
                    _ => "Transaction reverted without a reason",
                })
                .to_string()
            });

        ParsedError::new(category, user_message, technical, original)
            .with_reason(reason)
            .with_decoded(decoded)
    }
}

impl Default for ErrorParser {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty_or<'a>(s: &'a str, fallback: &'a str) -> &'a str {
    if s.trim().is_empty() {
        fallback
    } else {
        s
    }
}

// ─── Builder ──────────────────────────────────────────────────────────────────

/// Collects table extensions before building an [`ErrorParser`].
///
/// Extra patterns are placed ahead of the defaults in the order they were
/// added; extra selectors extend or override the default selectors.
#[derive(Debug, Default)]
pub struct ErrorParserBuilder {
    patterns: Vec<RevertPattern>,
    selectors: Vec<(String, String)>,
    signatures: Vec<String>,
    without_defaults: bool,
}

impl ErrorParserBuilder {
    pub fn pattern(mut self, pattern: impl Into<String>, message: impl Into<String>) -> Self {
        self.patterns.push(RevertPattern::new(pattern, message));
        self
    }

    pub fn selector(mut self, selector: impl Into<String>, name: impl Into<String>) -> Self {
        self.selectors.push((selector.into(), name.into()));
        self
    }

    /// Register a custom error by signature, e.g. `"NotMember(address)"`.
    pub fn signature(mut self, signature: impl Into<String>) -> Self {
        self.signatures.push(signature.into());
        self
    }

    /// Start from empty tables instead of the bundled defaults.
    pub fn without_defaults(mut self) -> Self {
        self.without_defaults = true;
        self
    }

    pub fn build(self) -> Result<ErrorParser, ConfigError> {
        let (mut patterns, mut selectors) = if self.without_defaults {
            (RevertPatternTable::new(), SelectorTable::new())
        } else {
            (RevertPatternTable::with_defaults(), SelectorTable::with_defaults())
        };
        patterns.prepend_all(self.patterns);
        for (selector, name) in self.selectors {
            selectors.insert(&selector, name)?;
        }
        for signature in &self.signatures {
            selectors.insert_signature(signature)?;
        }
        Ok(ErrorParser::with_tables(patterns, selectors))
    }
}
