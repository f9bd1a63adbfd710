//! Custom-error selector table — maps 4-byte selectors to error names.
//!
//! A selector is `keccak256("ErrorName(type1,type2,...)")[..4]`, written here
//! as a lowercase `0x` + 8 hex digit string.

use std::collections::HashMap;

use tiny_keccak::{Hasher, Keccak};
use tracing::trace;

use crate::error::ConfigError;

/// Selectors raised by the organization's governance and task contracts.
pub const DEFAULT_SELECTORS: &[(&str, &str)] = &[
    ("0x48cbf26d", "TargetNotAllowed"),
    ("0xb7c6d77a", "TargetSelf"),
    ("0x82b42900", "Unauthorized"),
    ("0x8a0fcb60", "AlreadyVoted"),
    ("0x47031d84", "VotingExpired"),
    ("0x59120e37", "VotingOpen"),
    ("0x89a89086", "InvalidQuorum"),
    ("0xd4e6f304", "RoleNotAllowed"),
    ("0x9996b315", "BadStatus"),
    ("0xb6c3e8f0", "NotClaimer"),
    ("0x82d5d76a", "InvalidTarget"),
];

/// Compute the 4-byte selector of a Solidity signature.
pub fn selector_of(signature: &str) -> [u8; 4] {
    let mut k = Keccak::v256();
    k.update(signature.as_bytes());
    let mut out = [0u8; 32];
    k.finalize(&mut out);
    [out[0], out[1], out[2], out[3]]
}

/// Format a selector as `0x` + 8 lowercase hex digits.
pub fn format_selector(selector: [u8; 4]) -> String {
    format!("0x{}", hex::encode(selector))
}

/// Normalize a selector string to the table key form, or `None` if it is not
/// exactly `0x` + 8 hex digits.
pub fn normalize_selector(selector: &str) -> Option<String> {
    let s = selector.to_ascii_lowercase();
    let digits = s.strip_prefix("0x")?;
    (digits.len() == 8 && digits.chars().all(|c| c.is_ascii_hexdigit())).then_some(s)
}

/// Lookup table from selector to custom-error name.
#[derive(Debug, Clone, Default)]
pub struct SelectorTable {
    by_selector: HashMap<String, String>,
}

impl SelectorTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table preloaded with [`DEFAULT_SELECTORS`].
    pub fn with_defaults() -> Self {
        Self {
            by_selector: DEFAULT_SELECTORS
                .iter()
                .map(|(sel, name)| (sel.to_string(), name.to_string()))
                .collect(),
        }
    }

    /// Register `name` under `selector`, replacing any previous name.
    pub fn insert(&mut self, selector: &str, name: impl Into<String>) -> Result<(), ConfigError> {
        let key = normalize_selector(selector).ok_or_else(|| ConfigError::InvalidSelector {
            selector: selector.to_string(),
        })?;
        self.by_selector.insert(key, name.into());
        Ok(())
    }

    /// Register an error by its Solidity signature, e.g. `"NotClaimer()"`.
    ///
    /// Returns the computed selector.
    pub fn insert_signature(&mut self, signature: &str) -> Result<String, ConfigError> {
        let signature = signature.trim();
        let name = signature
            .split_once('(')
            .map(|(name, _)| name.trim())
            .filter(|name| !name.is_empty() && signature.ends_with(')'))
            .ok_or_else(|| ConfigError::InvalidSignature {
                signature: signature.to_string(),
            })?;
        let key = format_selector(selector_of(signature));
        self.by_selector.insert(key.clone(), name.to_string());
        Ok(key)
    }

    /// Load `{"0x12345678": "Name", ...}` into the table.
    ///
    /// Returns the number of entries loaded.
    pub fn load_json(&mut self, json: &str) -> Result<usize, ConfigError> {
        let loaded: HashMap<String, String> = serde_json::from_str(json)?;
        let entries = loaded
            .into_iter()
            .map(|(selector, name)| match normalize_selector(&selector) {
                Some(key) => Ok((key, name)),
                None => Err(ConfigError::InvalidSelector { selector }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let count = entries.len();
        self.by_selector.extend(entries);
        Ok(count)
    }

    /// Look up a selector string (any case).
    pub fn lookup(&self, selector: &str) -> Option<&str> {
        let key = normalize_selector(selector)?;
        self.by_selector.get(&key).map(String::as_str)
    }

    /// Look up the selector prefix (first 10 characters) of raw revert data.
    pub fn lookup_data(&self, data: &str) -> Option<&str> {
        let prefix = data.get(..10)?;
        let hit = self.lookup(prefix);
        if let Some(name) = hit {
            trace!(selector = %prefix.to_ascii_lowercase(), %name, "selector matched");
        }
        hit
    }

    pub fn len(&self) -> usize {
        self.by_selector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_selector.is_empty()
    }
}
