//! popkit-setters — catalog-driven encoder for governance setter calls.
//!
//! # Quick Start
//!
//! ```rust
//! use popkit_setters::{CallArg, ContractKey, PreviewLookup, SetterRegistry};
//! use serde_json::json;
//!
//! let registry = SetterRegistry::new();
//! let values = json!({ "quorum": 51 });
//! let call = registry.encode_by_id("change-quorum-hybrid", &values).unwrap();
//! assert_eq!(call.contract, ContractKey::HybridVoting);
//! assert_eq!(call.args[0], CallArg::Uint(0));
//!
//! let template = registry.template("change-quorum-hybrid").unwrap();
//! let text = registry.preview(template, &values, &PreviewLookup::new());
//! assert_eq!(text, "Change hybrid voting quorum to 51%");
//! ```
//!
//! This crate defines:
//! - [`SetterRegistry`] — categories and templates, validate/encode/preview
//! - [`SetterTemplate`] — one form-backed setter recipe
//! - [`EncodedCall`] — contract slot, function name, positional arguments
//! - [`RawFunctionCatalog`] — raw function listing and calldata builder

pub mod config;
pub mod error;
pub mod inputs;
pub mod raw;
pub mod registry;
pub mod templates;
pub mod types;

pub use config::{DirectDemocracyConfigKey, HatType, HybridConfigKey, TaskManagerConfigKey, TaskPermission};
pub use error::{IssueKind, SetterError, ValidationIssue};
pub use inputs::{InputSpec, MaskOption, SelectOption, TemplateInput};
pub use raw::{RawFunction, RawFunctionCatalog, RawParam};
pub use registry::{is_contract_available, SetterRegistry};
pub use templates::{SetterAction, SetterTemplate};
pub use types::{
    AddressTable, CallArg, CategoryId, CategoryInfo, ContractKey, DangerLevel, EncodedCall, PreviewLookup,
};
