//! Error types for template validation and encoding.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// What went wrong with a single form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Missing,
    OutOfRange,
    InvalidOption,
    NotInteger,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::OutOfRange => "out_of_range",
            Self::InvalidOption => "invalid_option",
            Self::NotInteger => "not_integer",
        }
    }
}

/// A validation problem to show inline next to the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub input_name: String,
    pub detail: String,
}

impl ValidationIssue {
    pub fn new(kind: IssueKind, input_name: &str, detail: impl Into<String>) -> Self {
        Self {
            kind,
            input_name: input_name.to_string(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.input_name, self.kind.as_str(), self.detail)
    }
}

/// Errors from the setter encoder.
#[derive(Debug, Error)]
pub enum SetterError {
    /// Caller bug: unknown template, absent contract slot, malformed catalog.
    #[error("Invalid template usage: {reason}")]
    InvalidTemplateUsage { reason: String },

    /// Form values failed validation; nothing was encoded.
    #[error("Validation failed: {}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),

    /// Raw calldata could not be built from the encoded arguments.
    #[error("ABI encode failed: {reason}")]
    AbiEncodeFailed { reason: String },
}

impl SetterError {
    pub(crate) fn usage(reason: impl Into<String>) -> Self {
        Self::InvalidTemplateUsage {
            reason: reason.into(),
        }
    }

    /// The validation issues, if this is a validation failure.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::Validation(issues) => issues,
            _ => &[],
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues.iter().map(|i| i.to_string()).collect::<Vec<_>>().join("; ")
}
