//! Per-contract `setConfig` keys and task-manager permission bits.

use serde::{Deserialize, Serialize};

/// Config keys understood by `HybridVoting.setConfig(uint8, bytes)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum HybridConfigKey {
    Quorum = 0,
}

/// Config keys understood by `DirectDemocracyVoting.setConfig(uint8, bytes)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum DirectDemocracyConfigKey {
    Quorum = 0,
    HatAllowed = 3,
}

/// Config keys understood by `TaskManager.setConfig(uint8, bytes)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TaskManagerConfigKey {
    CreatorHatAllowed = 1,
}

macro_rules! impl_key {
    ($($ty:ty),*) => {$(
        impl $ty {
            pub const fn key(self) -> u8 {
                self as u8
            }
        }
    )*};
}

impl_key!(HybridConfigKey, DirectDemocracyConfigKey, TaskManagerConfigKey);

/// Which direct-democracy hat list a `HAT_ALLOWED` update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum HatType {
    Voting = 0,
    Creator = 1,
}

impl HatType {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Voting),
            1 => Some(Self::Creator),
            _ => None,
        }
    }
}

// ─── Task permissions ─────────────────────────────────────────────────────────

/// A single task-manager permission bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TaskPermission {
    Create = 1,
    Claim = 2,
    Review = 4,
    Assign = 8,
}

impl TaskPermission {
    pub const ALL: [TaskPermission; 4] = [Self::Create, Self::Claim, Self::Review, Self::Assign];

    pub const fn bit(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Claim => "CLAIM",
            Self::Review => "REVIEW",
            Self::Assign => "ASSIGN",
        }
    }

    pub fn from_bit(bit: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.bit() == bit)
    }

    /// Bitwise OR of the given permissions. Duplicates are harmless.
    pub fn mask_of(perms: impl IntoIterator<Item = TaskPermission>) -> u8 {
        perms.into_iter().fold(0, |mask, p| mask | p.bit())
    }

    /// The permissions set in `mask`, in bit order. Unknown bits are ignored.
    pub fn from_mask(mask: u8) -> Vec<TaskPermission> {
        Self::ALL.into_iter().filter(|p| mask & p.bit() != 0).collect()
    }
}
