//! Raw (advanced) function catalog.
//!
//! Lists each governance contract's setter functions with a human signature
//! and typed parameters, for callers that bypass templates. The catalog can
//! also turn an [`EncodedCall`] into full calldata:
//! `selector ++ abi_encode_params(args...)`.

use std::str::FromStr;

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{keccak256, Address, FixedBytes, U256};
use serde::Serialize;
use tracing::trace;

use crate::error::SetterError;
use crate::types::{CallArg, ContractKey, EncodedCall};

/// One parameter of a raw function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawParam {
    pub name: String,
    /// Solidity type string, e.g. `"uint256"`.
    pub ty: String,
    pub label: String,
}

/// A contract function as shown in the advanced view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawFunction {
    pub contract: ContractKey,
    pub name: String,
    /// Human form, e.g. `"setConfig(uint8 key, bytes value)"`.
    pub signature: String,
    pub params: Vec<RawParam>,
    pub description: String,
}

impl RawFunction {
    fn new(
        contract: ContractKey,
        name: &str,
        params: &[(&str, &str, &str)],
        description: &str,
    ) -> Self {
        let params: Vec<RawParam> = params
            .iter()
            .map(|(name, ty, label)| RawParam {
                name: name.to_string(),
                ty: ty.to_string(),
                label: label.to_string(),
            })
            .collect();
        let human = params
            .iter()
            .map(|p| format!("{} {}", p.ty, p.name))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            contract,
            name: name.to_string(),
            signature: format!("{name}({human})"),
            params,
            description: description.to_string(),
        }
    }

    /// Canonical signature used for the selector, e.g. `"setConfig(uint8,bytes)"`.
    pub fn canonical_signature(&self) -> String {
        let types: Vec<&str> = self.params.iter().map(|p| p.ty.as_str()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    pub fn selector(&self) -> [u8; 4] {
        let hash = keccak256(self.canonical_signature().as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    /// Encode positional arguments into calldata for this function.
    pub fn encode_calldata(&self, args: &[CallArg]) -> Result<Vec<u8>, SetterError> {
        if args.len() != self.params.len() {
            return Err(SetterError::AbiEncodeFailed {
                reason: format!(
                    "argument count mismatch for {}: expected {}, got {}",
                    self.signature,
                    self.params.len(),
                    args.len()
                ),
            });
        }

        let mut values = Vec::with_capacity(args.len());
        for (param, arg) in self.params.iter().zip(args) {
            let ty = DynSolType::parse(&param.ty).map_err(|e| SetterError::AbiEncodeFailed {
                reason: format!("type parse '{}': {e}", param.ty),
            })?;
            let value = call_arg_to_dyn_value(arg, &ty).map_err(|e| SetterError::AbiEncodeFailed {
                reason: format!("param '{}': {e}", param.name),
            })?;
            values.push(value);
        }

        let mut calldata = self.selector().to_vec();
        calldata.extend_from_slice(&DynSolValue::Tuple(values).abi_encode_params());
        trace!(function = %self.name, len = calldata.len(), "built calldata");
        Ok(calldata)
    }
}

/// Convert a [`CallArg`] to the alloy value for the parameter's declared type.
///
/// Role and project identifiers are opaque until this point; here they are
/// parsed as the declared type (decimal/hex uint, exact-width hex bytes,
/// address, or string).
pub fn call_arg_to_dyn_value(arg: &CallArg, expected: &DynSolType) -> Result<DynSolValue, String> {
    match (arg, expected) {
        (CallArg::Bool(b), DynSolType::Bool) => Ok(DynSolValue::Bool(*b)),
        (CallArg::Uint(u), DynSolType::Uint(bits)) => Ok(DynSolValue::Uint(U256::from(*u), *bits)),
        (CallArg::Bytes(b), DynSolType::Bytes) => Ok(DynSolValue::Bytes(b.clone())),

        (CallArg::Id(s), DynSolType::Uint(bits)) => {
            let u = U256::from_str(s.trim()).map_err(|e| format!("'{s}' is not an unsigned integer: {e}"))?;
            Ok(DynSolValue::Uint(u, *bits))
        }
        (CallArg::Id(s), DynSolType::FixedBytes(n)) => {
            let stripped = s.trim().strip_prefix("0x").unwrap_or(s.trim());
            let bytes = hex::decode(stripped).map_err(|e| format!("'{s}' is not hex: {e}"))?;
            if bytes.len() != *n {
                return Err(format!("bytes{n}: '{s}' is {} bytes", bytes.len()));
            }
            let mut word = [0u8; 32];
            word[..*n].copy_from_slice(&bytes);
            Ok(DynSolValue::FixedBytes(FixedBytes::from(word), *n))
        }
        (CallArg::Id(s), DynSolType::Address) => {
            let addr = Address::from_str(s.trim()).map_err(|e| format!("address parse: {e}"))?;
            Ok(DynSolValue::Address(addr))
        }
        (CallArg::Id(s), DynSolType::String) => Ok(DynSolValue::String(s.clone())),

        _ => Err(format!("cannot convert {arg:?} to {expected:?}")),
    }
}

/// The per-contract raw function listing.
#[derive(Debug, Clone, Serialize)]
pub struct RawFunctionCatalog {
    functions: Vec<RawFunction>,
}

impl RawFunctionCatalog {
    /// Setter functions of the governance and task contracts.
    pub fn with_defaults() -> Self {
        use ContractKey::*;

        let config = [
            ("key", "uint8", "Config key"),
            ("value", "bytes", "ABI-encoded value"),
        ];
        let functions = vec![
            RawFunction::new(HybridVoting, "setConfig", &config, "Update a hybrid voting parameter by config key"),
            RawFunction::new(
                HybridVoting,
                "setCreatorHatAllowed",
                &[("hatId", "uint256", "Role"), ("allowed", "bool", "Allowed")],
                "Allow or disallow a role to create proposals",
            ),
            RawFunction::new(HybridVoting, "pause", &[], "Stop all voting"),
            RawFunction::new(HybridVoting, "unpause", &[], "Resume voting"),
            RawFunction::new(
                DirectDemocracyVoting,
                "setConfig",
                &config,
                "Update a direct democracy parameter by config key",
            ),
            RawFunction::new(DirectDemocracyVoting, "pause", &[], "Stop all voting"),
            RawFunction::new(DirectDemocracyVoting, "unpause", &[], "Resume voting"),
            RawFunction::new(TaskManager, "setConfig", &config, "Update a task manager parameter by config key"),
            RawFunction::new(
                TaskManager,
                "setProjectRolePerm",
                &[
                    ("projectId", "bytes32", "Project"),
                    ("hatId", "uint256", "Role"),
                    ("mask", "uint8", "Permission mask"),
                ],
                "Set what a role may do with tasks in a project",
            ),
        ];
        Self { functions }
    }

    pub fn from_functions(functions: Vec<RawFunction>) -> Self {
        Self { functions }
    }

    pub fn functions(&self) -> &[RawFunction] {
        &self.functions
    }

    pub fn for_contract(&self, contract: ContractKey) -> Vec<&RawFunction> {
        self.functions.iter().filter(|f| f.contract == contract).collect()
    }

    pub fn find(&self, contract: ContractKey, name: &str) -> Option<&RawFunction> {
        self.functions.iter().find(|f| f.contract == contract && f.name == name)
    }

    /// Full calldata for a template-encoded call.
    pub fn encode_calldata(&self, call: &EncodedCall) -> Result<Vec<u8>, SetterError> {
        let function = self.find(call.contract, &call.function_name).ok_or_else(|| {
            SetterError::usage(format!(
                "{} has no function '{}' in the raw catalog",
                call.contract, call.function_name
            ))
        })?;
        function.encode_calldata(&call.args)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for RawFunctionCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}
