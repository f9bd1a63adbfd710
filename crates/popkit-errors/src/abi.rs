//! Optional ABI-based decoding of Solidity custom errors.
//!
//! The parser only depends on the [`AbiDecoder`] capability; callers that
//! hold a contract ABI can pass [`JsonAbiDecoder`] or their own decoder.

use std::fmt;

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_dyn_abi::Specifier;
use alloy_json_abi::JsonAbi;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::strip_hex_prefix;
use crate::error::ConfigError;

/// A custom error decoded against an ABI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedCustomError {
    /// Error name, e.g. `"VotingExpired"`.
    pub name: String,
    /// Decoded arguments as `(param_name, display_value)`.
    pub args: Vec<(String, String)>,
    /// Canonical signature, e.g. `"VotingExpired(uint256)"`.
    pub signature: String,
}

impl fmt::Display for DecodedCustomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<_> = self
            .args
            .iter()
            .map(|(k, v)| if k.is_empty() { v.clone() } else { format!("{k}={v}") })
            .collect();
        write!(f, "{}({})", self.name, args.join(", "))
    }
}

/// Capability to decode raw revert bytes into a named custom error.
///
/// Implementations must be synchronous and side-effect-free.
pub trait AbiDecoder: Send + Sync {
    /// Decode `data` (selector ++ arguments). Returns `None` when the selector
    /// is unknown or the payload does not match the declared inputs.
    fn decode_error(&self, data: &[u8]) -> Option<DecodedCustomError>;

    /// Convenience: decode from a hex string (with or without `0x` prefix).
    fn decode_error_hex(&self, hex_str: &str) -> Option<DecodedCustomError> {
        let bytes = hex::decode(strip_hex_prefix(hex_str)).ok()?;
        self.decode_error(&bytes)
    }
}

/// [`AbiDecoder`] backed by the `error` entries of a standard JSON ABI.
#[derive(Debug, Clone)]
pub struct JsonAbiDecoder {
    errors: Vec<alloy_json_abi::Error>,
}

impl JsonAbiDecoder {
    pub fn new(abi: &JsonAbi) -> Self {
        Self {
            errors: abi.errors().cloned().collect(),
        }
    }

    /// Build a decoder from a standard Ethereum ABI JSON string.
    pub fn from_abi_json(abi_json: &str) -> Result<Self, ConfigError> {
        let abi: JsonAbi = serde_json::from_str(abi_json).map_err(|e| ConfigError::InvalidAbi {
            reason: format!("invalid ABI JSON: {e}"),
        })?;
        Ok(Self::new(&abi))
    }

    /// Number of custom errors known to this decoder.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl AbiDecoder for JsonAbiDecoder {
    fn decode_error(&self, data: &[u8]) -> Option<DecodedCustomError> {
        if data.len() < 4 {
            return None;
        }
        let (selector, payload) = data.split_at(4);
        self.errors
            .iter()
            .filter(|e| e.selector().as_slice() == selector)
            .find_map(|e| try_decode(e, payload))
    }
}

fn try_decode(error: &alloy_json_abi::Error, payload: &[u8]) -> Option<DecodedCustomError> {
    let signature = error.signature();
    if error.inputs.is_empty() {
        return Some(DecodedCustomError {
            name: error.name.clone(),
            args: vec![],
            signature,
        });
    }

    let types: Vec<DynSolType> = error
        .inputs
        .iter()
        .map(|p| p.resolve().ok())
        .collect::<Option<Vec<_>>>()?;

    let values = match DynSolType::Tuple(types).abi_decode_params(payload) {
        Ok(DynSolValue::Tuple(vals)) => vals,
        Ok(single) => vec![single],
        Err(e) => {
            debug!(%signature, error = %e, "custom error payload did not decode");
            return None;
        }
    };

    let args = error
        .inputs
        .iter()
        .zip(values.iter())
        .map(|(param, val)| (param.name.clone(), display_value(val)))
        .collect();

    Some(DecodedCustomError {
        name: error.name.clone(),
        args,
        signature,
    })
}

fn display_value(val: &DynSolValue) -> String {
    match val {
        DynSolValue::Uint(v, _) => v.to_string(),
        DynSolValue::Int(v, _) => v.to_string(),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Address(a) => format!("{a:#x}"),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Bytes(b) => format!("0x{}", hex::encode(b)),
        DynSolValue::FixedBytes(fb, size) => format!("0x{}", hex::encode(&fb[..*size])),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            let parts: Vec<_> = items.iter().map(display_value).collect();
            format!("[{}]", parts.join(", "))
        }
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selectors::selector_of;

    const VOTING_ABI: &str = r#"[
        {"type": "error", "name": "VotingExpired", "inputs": []},
        {"type": "error", "name": "InvalidProposal", "inputs": [
            {"name": "id", "type": "uint256"}
        ]},
        {"type": "error", "name": "RoleNotAllowed", "inputs": [
            {"name": "account", "type": "address"},
            {"name": "hatId", "type": "uint256"}
        ]},
        {"type": "function", "name": "pause", "inputs": [], "outputs": [],
         "stateMutability": "nonpayable"}
    ]"#;

    fn decoder() -> JsonAbiDecoder {
        JsonAbiDecoder::from_abi_json(VOTING_ABI).unwrap()
    }

    #[test]
    fn loads_only_errors() {
        assert_eq!(decoder().len(), 3);
    }

    #[test]
    fn decodes_zero_arg_error() {
        let sel = selector_of("VotingExpired()");
        let d = decoder().decode_error(&sel).unwrap();
        assert_eq!(d.name, "VotingExpired");
        assert_eq!(d.signature, "VotingExpired()");
        assert!(d.args.is_empty());
        assert_eq!(d.to_string(), "VotingExpired()");
    }

    #[test]
    fn decodes_error_arguments() {
        let mut data = selector_of("RoleNotAllowed(address,uint256)").to_vec();
        data.extend_from_slice(&[0u8; 12]);
        data.extend_from_slice(&[0x11u8; 20]);
        let mut id = [0u8; 32];
        id[31] = 7;
        data.extend_from_slice(&id);

        let d = decoder().decode_error(&data).unwrap();
        assert_eq!(d.name, "RoleNotAllowed");
        assert_eq!(d.args.len(), 2);
        assert_eq!(d.args[0].0, "account");
        assert_eq!(d.args[0].1, format!("0x{}", "11".repeat(20)));
        assert_eq!(d.args[1], ("hatId".to_string(), "7".to_string()));
    }

    #[test]
    fn truncated_payload_does_not_decode() {
        let mut data = selector_of("InvalidProposal(uint256)").to_vec();
        data.extend_from_slice(&[0u8; 5]);
        assert!(decoder().decode_error(&data).is_none());
    }

    #[test]
    fn unknown_selector_and_hex_helper() {
        assert!(decoder().decode_error_hex("0xdeadbeef").is_none());
        let hex_sel = hex::encode(selector_of("VotingExpired()"));
        assert!(decoder().decode_error_hex(&hex_sel).is_some());
    }

    #[test]
    fn invalid_abi_is_reported() {
        let err = JsonAbiDecoder::from_abi_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAbi { .. }));
    }
}
