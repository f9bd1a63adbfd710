//! Shared value types for the setter catalog.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ─── Catalog keys ─────────────────────────────────────────────────────────────

/// Template grouping shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryId {
    Voting,
    Permissions,
    Emergency,
    Tasks,
}

impl CategoryId {
    pub const ALL: [CategoryId; 4] = [Self::Voting, Self::Permissions, Self::Emergency, Self::Tasks];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Voting => "voting",
            Self::Permissions => "permissions",
            Self::Emergency => "emergency",
            Self::Tasks => "tasks",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical contract slot a template targets. The caller resolves it to an
/// address at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContractKey {
    HybridVoting,
    DirectDemocracyVoting,
    TaskManager,
}

impl ContractKey {
    pub const ALL: [ContractKey; 3] = [Self::HybridVoting, Self::DirectDemocracyVoting, Self::TaskManager];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HybridVoting => "hybridVoting",
            Self::DirectDemocracyVoting => "directDemocracyVoting",
            Self::TaskManager => "taskManager",
        }
    }

    /// Lower-case phrase used in preview sentences.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HybridVoting => "hybrid voting",
            Self::DirectDemocracyVoting => "direct democracy",
            Self::TaskManager => "task manager",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for ContractKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marks templates whose effect is hard to undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DangerLevel {
    Critical,
}

/// A category as listed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
}

// ─── Encoded output ───────────────────────────────────────────────────────────

/// One positional argument of a governance call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CallArg {
    /// Small unsigned integer (config keys, masks).
    Uint(u128),
    Bool(bool),
    /// Opaque role / project identifier, passed through as given.
    Id(String),
    /// ABI-encoded byte string.
    Bytes(Vec<u8>),
}

impl fmt::Display for CallArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Id(s) => write!(f, "{s}"),
            Self::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
        }
    }
}

/// A ready-to-send governance call produced from a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedCall {
    pub template_id: String,
    pub contract: ContractKey,
    pub function_name: String,
    pub args: Vec<CallArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub danger_level: Option<DangerLevel>,
}

// ─── Caller-supplied lookups ──────────────────────────────────────────────────

/// Resolved contract addresses by slot. Empty strings count as absent.
pub type AddressTable = HashMap<ContractKey, String>;

/// Display names for role and project identifiers used in previews.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewLookup {
    #[serde(default)]
    pub role_names: HashMap<String, String>,
    #[serde(default)]
    pub project_names: HashMap<String, String>,
}

impl PreviewLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.role_names.insert(id.into(), name.into());
        self
    }

    pub fn project(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.project_names.insert(id.into(), name.into());
        self
    }

    /// Display name for a role, falling back to the raw id.
    pub fn role_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.role_names.get(id).map(String::as_str).unwrap_or(id)
    }

    /// Display name for a project, falling back to the raw id.
    pub fn project_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.project_names.get(id).map(String::as_str).unwrap_or(id)
    }
}
