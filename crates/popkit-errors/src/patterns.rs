//! Ordered revert-reason → user-message dictionary.
//!
//! Matching is a case-insensitive substring test of each pattern against the
//! reason, in table order; the first hit wins. Callers may put their own
//! entries ahead of the defaults but the defaults keep their relative order.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::ConfigError;

/// One `pattern → message` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevertPattern {
    pub pattern: String,
    pub message: String,
}

impl RevertPattern {
    pub fn new(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

/// Built-in vocabulary, grouped by the contract family that raises it.
pub const DEFAULT_REVERT_PATTERNS: &[(&str, &str)] = &[
    // ─── Registration ─────────────────────────────────────────────────────
    ("Already registered", "This account is already registered."),
    ("Username taken", "That username is already taken. Please choose another one."),
    ("Username too long", "That username is too long. Please choose a shorter one."),
    ("Empty username", "Please enter a username."),
    // ─── Membership ───────────────────────────────────────────────────────
    ("Not a member", "You need to be a member of this organization to do that."),
    ("Already a member", "You are already a member of this organization."),
    ("Unauthorized", "You don't have permission to perform this action."),
    ("NotAuthorized", "You don't have permission to perform this action."),
    ("RoleNotAllowed", "Your role is not allowed to perform this action."),
    // ─── Voting ───────────────────────────────────────────────────────────
    ("Already voted", "You have already voted on this proposal."),
    ("AlreadyVoted", "You have already voted on this proposal."),
    ("VotingExpired", "Voting on this proposal has ended."),
    ("VotingOpen", "Voting on this proposal is still open."),
    ("InvalidQuorum", "Quorum must be a percentage between 1 and 100."),
    (
        "TargetNotAllowed",
        "The target contract is not in the allowed targets list. It must be allowed by governance first.",
    ),
    ("TargetSelf", "A proposal cannot call the voting contract itself."),
    ("InvalidTarget", "The proposal targets an invalid contract address."),
    ("InvalidProposal", "This proposal does not exist."),
    ("WeightSumNot100", "Vote weights must add up to 100."),
    ("InvalidWeight", "One of the vote weights is invalid."),
    ("DuplicateIndex", "The same option was selected more than once."),
    // ─── Task manager ─────────────────────────────────────────────────────
    ("BadStatus", "This task is not in the right state for that action."),
    ("NotClaimer", "Only the member who claimed this task can do that."),
    ("AlreadyClaimed", "This task has already been claimed."),
    ("NotFound", "The requested item could not be found."),
    ("BudgetExceeded", "This would exceed the project's budget."),
    ("NotCreator", "Only the task creator can do that."),
    // ─── Token ────────────────────────────────────────────────────────────
    ("Insufficient balance", "Your token balance is too low for this action."),
    ("ERC20InsufficientBalance", "Your token balance is too low for this action."),
    ("ERC20InsufficientAllowance", "The token allowance is too low. Approve a higher amount first."),
    ("TransferFailed", "The token transfer failed."),
    // ─── General ──────────────────────────────────────────────────────────
    ("Paused", "This contract is currently paused."),
    ("EnforcedPause", "This contract is currently paused."),
    ("ZeroAddress", "An address field was left empty."),
    ("InvalidInput", "One of the inputs is invalid. Please check and try again."),
];

/// An ordered table of revert patterns.
#[derive(Debug, Clone, Default)]
pub struct RevertPatternTable {
    entries: Vec<RevertPattern>,
}

impl RevertPatternTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding [`DEFAULT_REVERT_PATTERNS`] in declaration order.
    pub fn with_defaults() -> Self {
        Self {
            entries: DEFAULT_REVERT_PATTERNS
                .iter()
                .map(|(p, m)| RevertPattern::new(*p, *m))
                .collect(),
        }
    }

    /// Insert an entry ahead of every existing entry.
    pub fn prepend(&mut self, pattern: impl Into<String>, message: impl Into<String>) {
        self.entries.insert(0, RevertPattern::new(pattern, message));
    }

    /// Insert a group of entries ahead of the existing ones, keeping the
    /// group's own order.
    pub fn prepend_all(&mut self, patterns: impl IntoIterator<Item = RevertPattern>) {
        self.entries.splice(0..0, patterns);
    }

    /// Append an entry after every existing entry.
    pub fn push(&mut self, pattern: impl Into<String>, message: impl Into<String>) {
        self.entries.push(RevertPattern::new(pattern, message));
    }

    /// Load `[{"pattern": "...", "message": "..."}]` and prepend it.
    ///
    /// Returns the number of entries loaded.
    pub fn load_json(&mut self, json: &str) -> Result<usize, ConfigError> {
        let loaded: Vec<RevertPattern> = serde_json::from_str(json)?;
        if let Some(bad) = loaded
            .iter()
            .find(|p| p.pattern.trim().is_empty() || p.message.trim().is_empty())
        {
            return Err(ConfigError::InvalidPattern {
                reason: format!("empty pattern or message in entry {bad:?}"),
            });
        }
        let count = loaded.len();
        self.prepend_all(loaded);
        Ok(count)
    }

    /// The first entry whose pattern occurs in `reason`, ignoring case.
    pub fn find(&self, reason: &str) -> Option<&RevertPattern> {
        let reason = reason.to_lowercase();
        let hit = self
            .entries
            .iter()
            .filter(|e| !e.pattern.is_empty())
            .find(|e| reason.contains(&e.pattern.to_lowercase()));
        if let Some(entry) = hit {
            trace!(pattern = %entry.pattern, "revert pattern matched");
        }
        hit
    }

    /// The user message for `reason`, if any pattern matches.
    pub fn match_reason(&self, reason: &str) -> Option<&str> {
        self.find(reason).map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RevertPattern> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
