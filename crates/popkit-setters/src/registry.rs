//! Setter template registry — categories, templates by id, and the
//! encode/preview entry points.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::error::{SetterError, ValidationIssue};
use crate::templates::{default_templates, SetterTemplate};
use crate::types::{AddressTable, CategoryId, CategoryInfo, ContractKey, EncodedCall, PreviewLookup};

/// The built-in categories, in display order.
pub fn default_categories() -> Vec<CategoryInfo> {
    [
        (CategoryId::Voting, "Voting Settings", "Quorum and other voting parameters"),
        (CategoryId::Permissions, "Permissions", "Which roles may create proposals or vote"),
        (CategoryId::Emergency, "Emergency Controls", "Pause or resume voting contracts"),
        (CategoryId::Tasks, "Task Management", "Project role permissions and task creators"),
    ]
    .into_iter()
    .map(|(id, name, description)| CategoryInfo {
        id,
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect()
}

/// Immutable catalog of setter templates. Build once, pass by reference.
#[derive(Debug, Clone)]
pub struct SetterRegistry {
    categories: Vec<CategoryInfo>,
    templates: Vec<SetterTemplate>,
    by_id: HashMap<String, usize>,
}

impl SetterRegistry {
    /// The built-in catalog.
    pub fn new() -> Self {
        let templates = default_templates();
        let by_id = templates.iter().enumerate().map(|(i, t)| (t.id.clone(), i)).collect();
        Self {
            categories: default_categories(),
            templates,
            by_id,
        }
    }

    /// A registry over caller-supplied templates. Duplicate ids are rejected.
    pub fn from_templates(
        categories: Vec<CategoryInfo>,
        templates: Vec<SetterTemplate>,
    ) -> Result<Self, SetterError> {
        let mut by_id = HashMap::with_capacity(templates.len());
        for (i, t) in templates.iter().enumerate() {
            if by_id.insert(t.id.clone(), i).is_some() {
                return Err(SetterError::usage(format!("duplicate template id '{}'", t.id)));
            }
        }
        Ok(Self {
            categories,
            templates,
            by_id,
        })
    }

    pub fn categories(&self) -> &[CategoryInfo] {
        &self.categories
    }

    /// All templates, or those of one category, in catalog order.
    pub fn templates(&self, category: Option<CategoryId>) -> Vec<&SetterTemplate> {
        self.templates
            .iter()
            .filter(|t| category.map_or(true, |c| t.category == c))
            .collect()
    }

    pub fn template(&self, id: &str) -> Option<&SetterTemplate> {
        self.by_id.get(id).map(|&i| &self.templates[i])
    }

    fn require(&self, id: &str) -> Result<&SetterTemplate, SetterError> {
        self.template(id).ok_or_else(|| {
            debug!(%id, "unknown template id");
            SetterError::usage(format!("unknown template id '{id}'"))
        })
    }

    pub fn validate(&self, template: &SetterTemplate, values: &Value) -> Vec<ValidationIssue> {
        template.validate(values)
    }

    pub fn encode(&self, template: &SetterTemplate, values: &Value) -> Result<EncodedCall, SetterError> {
        template.encode(values)
    }

    /// Look up a template by id and encode it.
    pub fn encode_by_id(&self, id: &str, values: &Value) -> Result<EncodedCall, SetterError> {
        self.require(id)?.encode(values)
    }

    pub fn preview(&self, template: &SetterTemplate, values: &Value, lookup: &PreviewLookup) -> String {
        template.preview(values, lookup)
    }

    /// Look up a template by id and preview it.
    pub fn preview_by_id(&self, id: &str, values: &Value, lookup: &PreviewLookup) -> Result<String, SetterError> {
        Ok(self.require(id)?.preview(values, lookup))
    }

    /// True iff the caller has a non-empty address for `contract`.
    pub fn is_contract_available(&self, contract: ContractKey, addresses: &AddressTable) -> bool {
        is_contract_available(contract, addresses)
    }

    /// The address a template's call must be sent to.
    pub fn resolve_target<'a>(
        &self,
        template: &SetterTemplate,
        addresses: &'a AddressTable,
    ) -> Result<&'a str, SetterError> {
        addresses
            .get(&template.contract)
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .ok_or_else(|| {
                SetterError::usage(format!(
                    "template '{}' targets {} but no address is configured",
                    template.id, template.contract
                ))
            })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for SetterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// True iff `addresses` holds a non-empty entry for `contract`.
pub fn is_contract_available(contract: ContractKey, addresses: &AddressTable) -> bool {
    addresses.get(&contract).is_some_and(|a| !a.trim().is_empty())
}
