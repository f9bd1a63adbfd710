//! Form input specifications and their validation.
//!
//! Form values arrive as a JSON object keyed by input name. Validation turns
//! them into [`InputValue`]s; encoding only ever sees validated values.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{IssueKind, ValidationIssue};

/// One `{value, label}` choice of a `select` input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// One bit of a `permissionMask` input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskOption {
    /// A power of two.
    pub value: u8,
    pub label: String,
}

/// The shape of a single form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InputSpec {
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(default, rename = "helpText", skip_serializing_if = "Option::is_none")]
        help_text: Option<String>,
    },
    RoleSelect,
    ProjectSelect,
    Toggle {
        options: [String; 2],
        default: String,
    },
    Select {
        options: Vec<SelectOption>,
    },
    PermissionMask {
        options: Vec<MaskOption>,
    },
}

/// A named input in a template's form, in positional order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInput {
    pub name: String,
    pub label: String,
    pub spec: InputSpec,
}

impl TemplateInput {
    pub fn new(name: &str, label: &str, spec: InputSpec) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            spec,
        }
    }
}

/// A validated input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputValue {
    Number(i64),
    /// Role or project identifier.
    Id(String),
    /// The chosen toggle label.
    Toggle(String),
    /// The chosen select option value.
    Choice(String),
    /// Selected mask bits, deduplicated and sorted.
    Mask(Vec<u8>),
}

/// Validated values of one template, keyed by input name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedValues {
    values: HashMap<String, InputValue>,
}

impl ResolvedValues {
    pub fn get(&self, name: &str) -> Option<&InputValue> {
        self.values.get(name)
    }

    pub fn number(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            InputValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            InputValue::Id(s) | InputValue::Toggle(s) | InputValue::Choice(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn mask(&self, name: &str) -> Option<&[u8]> {
        match self.get(name)? {
            InputValue::Mask(bits) => Some(bits.as_slice()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Validate every input of a form. On success returns the typed values;
/// otherwise every issue found, in input order.
pub fn resolve_inputs(
    inputs: &[TemplateInput],
    values: &Value,
) -> Result<ResolvedValues, Vec<ValidationIssue>> {
    let mut resolved = ResolvedValues::default();
    let mut issues = Vec::new();
    for input in inputs {
        let raw = values.get(&input.name).filter(|v| !v.is_null());
        match resolve_one(input, raw) {
            Ok(v) => {
                resolved.values.insert(input.name.clone(), v);
            }
            Err(issue) => issues.push(issue),
        }
    }
    if issues.is_empty() {
        Ok(resolved)
    } else {
        Err(issues)
    }
}

fn resolve_one(input: &TemplateInput, raw: Option<&Value>) -> Result<InputValue, ValidationIssue> {
    let name = input.name.as_str();
    let missing = || ValidationIssue::new(IssueKind::Missing, name, format!("{} is required", input.label));

    match &input.spec {
        InputSpec::Number { min, max, .. } => {
            let raw = raw.ok_or_else(missing)?;
            let n = coerce_integer(raw).ok_or_else(|| {
                ValidationIssue::new(IssueKind::NotInteger, name, format!("expected a whole number, got {raw}"))
            })?;
            let below = min.is_some_and(|m| n < m);
            let above = max.is_some_and(|m| n > m);
            if below || above {
                return Err(ValidationIssue::new(
                    IssueKind::OutOfRange,
                    name,
                    range_detail(n, *min, *max),
                ));
            }
            Ok(InputValue::Number(n))
        }
        InputSpec::RoleSelect | InputSpec::ProjectSelect => {
            let id = raw.and_then(identifier_of).ok_or_else(missing)?;
            Ok(InputValue::Id(id))
        }
        InputSpec::Toggle { options, default } => {
            let chosen = match raw {
                None => default.clone(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            };
            if options.contains(&chosen) {
                Ok(InputValue::Toggle(chosen))
            } else {
                Err(ValidationIssue::new(
                    IssueKind::InvalidOption,
                    name,
                    format!("'{chosen}' is not one of {}", options.join(", ")),
                ))
            }
        }
        InputSpec::Select { options } => {
            let raw = raw.ok_or_else(missing)?;
            let chosen = scalar_text(raw);
            match chosen.filter(|c| options.iter().any(|o| &o.value == c)) {
                Some(c) => Ok(InputValue::Choice(c)),
                None => Err(ValidationIssue::new(
                    IssueKind::InvalidOption,
                    name,
                    format!("{raw} is not a valid choice"),
                )),
            }
        }
        InputSpec::PermissionMask { options } => {
            let items = match raw {
                None => return Ok(InputValue::Mask(vec![])),
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(ValidationIssue::new(
                        IssueKind::InvalidOption,
                        name,
                        format!("expected a list of permission bits, got {other}"),
                    ))
                }
            };
            let mut bits = BTreeSet::new();
            for item in items {
                let bit = coerce_integer(item).ok_or_else(|| {
                    ValidationIssue::new(IssueKind::NotInteger, name, format!("permission bit {item} is not an integer"))
                })?;
                let allowed = options.iter().find(|o| i64::from(o.value) == bit).ok_or_else(|| {
                    ValidationIssue::new(IssueKind::InvalidOption, name, format!("{bit} is not a permission bit"))
                })?;
                bits.insert(allowed.value);
            }
            Ok(InputValue::Mask(bits.into_iter().collect()))
        }
    }
}

/// JSON integers, and floats with no fractional part. Strings never coerce.
pub fn coerce_integer(v: &Value) -> Option<i64> {
    let n = v.as_number()?;
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    (f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64)
        .then_some(f as i64)
}

/// A non-empty identifier from a string or integer value.
pub(crate) fn identifier_of(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        _ => None,
    }
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(_) => coerce_integer(v).map(|i| i.to_string()),
        _ => None,
    }
}

fn range_detail(n: i64, min: Option<i64>, max: Option<i64>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("{n} must be between {lo} and {hi}"),
        (Some(lo), None) => format!("{n} must be at least {lo}"),
        (None, Some(hi)) => format!("{n} must be at most {hi}"),
        (None, None) => format!("{n} is out of range"),
    }
}
