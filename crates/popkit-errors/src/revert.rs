//! Decode the two built-in Solidity revert payloads.
//!
//! - `require(cond, "message")` → `0x08c379a0` ++ ABI-encode(string)
//! - `assert` / checked arithmetic → `0x4e487b71` ++ ABI-encode(uint256)

use alloy_core::dyn_abi::{DynSolType, DynSolValue};

use crate::classify::strip_hex_prefix;

/// `keccak256("Error(string)")[..4]`
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// `keccak256("Panic(uint256)")[..4]`
pub const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// A built-in revert payload decoded from raw data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StandardRevert {
    /// `Error(string)` with its message.
    Reason(String),
    /// `Panic(uint256)` with its code and description.
    Panic { code: u64, meaning: &'static str },
}

impl StandardRevert {
    /// A plain-English reason suitable for the user message.
    pub fn reason(&self) -> String {
        match self {
            Self::Reason(message) => message.clone(),
            Self::Panic { meaning, .. } => meaning.to_string(),
        }
    }

    /// Diagnostic form for the technical message.
    pub fn technical(&self) -> String {
        match self {
            Self::Reason(message) => message.clone(),
            Self::Panic { code, meaning } => format!("Panic(0x{code:02x}): {meaning}"),
        }
    }
}

/// Decode `0x`-prefixed hex revert data as `Error(string)` or `Panic(uint256)`.
pub fn decode_standard_revert(data_hex: &str) -> Option<StandardRevert> {
    let data = hex::decode(strip_hex_prefix(data_hex)).ok()?;
    if data.len() < 4 {
        return None;
    }
    let (selector, payload) = data.split_at(4);
    if selector == ERROR_STRING_SELECTOR {
        match DynSolType::String.abi_decode(payload) {
            Ok(DynSolValue::String(s)) => {
                // Some contracts declare a length that covers NUL padding.
                let message = s.trim_matches(|c: char| c == '\0' || c.is_whitespace());
                (!message.is_empty()).then(|| StandardRevert::Reason(message.to_string()))
            }
            _ => None,
        }
    } else if selector == PANIC_SELECTOR {
        match DynSolType::Uint(256).abi_decode(payload) {
            Ok(DynSolValue::Uint(v, _)) => {
                let code = v.saturating_to::<u64>();
                Some(StandardRevert::Panic {
                    code,
                    meaning: panic_meaning(code),
                })
            }
            _ => None,
        }
    } else {
        None
    }
}

/// Map a Solidity panic code to a human-readable description.
pub fn panic_meaning(code: u64) -> &'static str {
    match code {
        0x00 => "generic compiler-inserted panic",
        0x01 => "assertion failed",
        0x11 => "arithmetic overflow or underflow",
        0x12 => "division or modulo by zero",
        0x21 => "invalid enum value",
        0x22 => "corrupted storage byte array",
        0x31 => "pop on an empty array",
        0x32 => "array index out of bounds",
        0x41 => "out of memory",
        0x51 => "call to an uninitialized function",
        _ => "unknown panic code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `require(false, "Not enough tokens to transfer")`
    const REVERT_HEX: &str = "0x08c379a00000000000000000000000000000000000000000000000000000000000000020000000000000000000000000000000000000000000000000000000000000001e4e6f7420656e6f75676820746f6b656e7320746f207472616e73666572000000";

    #[test]
    fn decodes_error_string() {
        assert_eq!(
            decode_standard_revert(REVERT_HEX),
            Some(StandardRevert::Reason("Not enough tokens to transfer".into()))
        );
    }

    #[test]
    fn strips_nul_padding_counted_in_length() {
        let decoded = decode_standard_revert(REVERT_HEX).unwrap();
        assert!(!decoded.reason().contains('\0'));
    }

    #[test]
    fn accepts_uppercase_prefix() {
        let upper = REVERT_HEX.replacen("0x", "0X", 1);
        assert_eq!(
            decode_standard_revert(&upper),
            Some(StandardRevert::Reason("Not enough tokens to transfer".into()))
        );
    }

    #[test]
    fn decodes_panic() {
        let got = decode_standard_revert(
            "0x4e487b710000000000000000000000000000000000000000000000000000000000000011",
        )
        .unwrap();
        assert_eq!(got.technical(), "Panic(0x11): arithmetic overflow or underflow");
        assert_eq!(got.reason(), "arithmetic overflow or underflow");
    }

    #[test]
    fn ignores_other_selectors_and_garbage() {
        assert_eq!(decode_standard_revert("0x48cbf26d"), None);
        assert_eq!(decode_standard_revert("0x08c3"), None);
        assert_eq!(decode_standard_revert("0x08c379a0"), None);
        assert_eq!(decode_standard_revert("0xnothex!"), None);
    }

    #[test]
    fn panic_meaning_known_codes() {
        assert_eq!(panic_meaning(0x01), "assertion failed");
        assert_eq!(panic_meaning(0x32), "array index out of bounds");
        assert_eq!(panic_meaning(0x99), "unknown panic code");
    }
}
