//! Setter templates: form-backed recipes for one governance setter call.
//!
//! Every template pairs a declarative form (`inputs`) with a [`SetterAction`]
//! that knows how to turn validated values into positional call arguments and
//! a one-sentence preview.

use alloy_core::dyn_abi::DynSolValue;
use alloy_primitives::U256;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::{DirectDemocracyConfigKey, HatType, HybridConfigKey, TaskManagerConfigKey, TaskPermission};
use crate::error::{IssueKind, SetterError, ValidationIssue};
use crate::inputs::{
    coerce_integer, identifier_of, resolve_inputs, InputSpec, MaskOption, ResolvedValues, SelectOption,
    TemplateInput,
};
use crate::types::{CallArg, CategoryId, ContractKey, DangerLevel, EncodedCall, PreviewLookup};

pub const GRANT: &str = "Grant";
pub const REVOKE: &str = "Revoke";

const QUORUM: &str = "quorum";
const ROLE: &str = "role";
const ACTION: &str = "action";
const HAT_TYPE: &str = "hatType";
const PROJECT: &str = "project";
const PERMISSIONS: &str = "permissions";

/// How a template turns its form into call arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetterAction {
    /// `setConfig(QUORUM, uint256 percent)`.
    Quorum,
    /// Hybrid voting `setCreatorHatAllowed(hatId, allowed)`.
    CreatorHatAllowed,
    /// Direct democracy `setConfig(HAT_ALLOWED, (uint8 hatType, uint256 hatId, bool))`.
    /// A fixed `hat_type` hides the hat-type select from the form.
    HatAllowed { hat_type: Option<HatType> },
    Pause,
    Unpause,
    /// Task manager `setProjectRolePerm(projectId, hatId, mask)`.
    ProjectRolePermission,
    /// Task manager `setConfig(CREATOR_HAT_ALLOWED, (uint256 hatId, bool))`.
    TaskCreatorAllowed,
}

impl SetterAction {
    /// Actions that ABI-encode the role id as a `uint256` inside config bytes.
    fn encodes_role_as_uint(&self) -> bool {
        matches!(self, Self::HatAllowed { .. } | Self::TaskCreatorAllowed)
    }
}

/// A named, form-backed recipe for one governance setter call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetterTemplate {
    pub id: String,
    pub category: CategoryId,
    pub name: String,
    pub description: String,
    pub contract: ContractKey,
    pub function_name: String,
    pub inputs: Vec<TemplateInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danger_level: Option<DangerLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip)]
    pub action: SetterAction,
}

impl SetterTemplate {
    /// Every problem with `values`, in input order. Empty means valid.
    pub fn validate(&self, values: &Value) -> Vec<ValidationIssue> {
        match self.resolve(values) {
            Ok(_) => vec![],
            Err(issues) => issues,
        }
    }

    fn resolve(&self, values: &Value) -> Result<ResolvedValues, Vec<ValidationIssue>> {
        let resolved = resolve_inputs(&self.inputs, values)?;
        if self.action.encodes_role_as_uint() {
            if let Some(role) = resolved.text(ROLE) {
                if parse_hat_id(role).is_none() {
                    return Err(vec![ValidationIssue::new(
                        IssueKind::NotInteger,
                        ROLE,
                        format!("role id '{role}' is not an unsigned integer"),
                    )]);
                }
            }
        }
        Ok(resolved)
    }

    /// Validate `values` and build the call. Validation issues come back as
    /// [`SetterError::Validation`]; nothing is encoded in that case.
    pub fn encode(&self, values: &Value) -> Result<EncodedCall, SetterError> {
        let resolved = self.resolve(values).map_err(|issues| {
            debug!(template = %self.id, issues = issues.len(), "template validation failed");
            SetterError::Validation(issues)
        })?;
        let args = self.encode_args(&resolved)?;
        trace!(template = %self.id, args = args.len(), "encoded setter call");
        Ok(EncodedCall {
            template_id: self.id.clone(),
            contract: self.contract,
            function_name: self.function_name.clone(),
            args,
            warning: self.warning.clone(),
            danger_level: self.danger_level,
        })
    }

    /// Positional arguments for already-validated values.
    pub fn encode_args(&self, values: &ResolvedValues) -> Result<Vec<CallArg>, SetterError> {
        let args = match self.action {
            SetterAction::Quorum => {
                let quorum = self.required_number(values, QUORUM)?;
                let quorum = u64::try_from(quorum)
                    .map_err(|_| SetterError::usage(format!("{}: negative quorum {quorum}", self.id)))?;
                let key = match self.contract {
                    ContractKey::DirectDemocracyVoting => DirectDemocracyConfigKey::Quorum.key(),
                    _ => HybridConfigKey::Quorum.key(),
                };
                vec![
                    CallArg::Uint(key.into()),
                    CallArg::Bytes(DynSolValue::Uint(U256::from(quorum), 256).abi_encode()),
                ]
            }
            SetterAction::CreatorHatAllowed => vec![
                CallArg::Id(self.required_text(values, ROLE)?.to_string()),
                CallArg::Bool(self.granted(values)?),
            ],
            SetterAction::HatAllowed { hat_type } => {
                let hat_type = match hat_type {
                    Some(t) => t,
                    None => self.selected_hat_type(values)?,
                };
                let value = DynSolValue::Tuple(vec![
                    DynSolValue::Uint(U256::from(hat_type.code()), 8),
                    DynSolValue::Uint(self.hat_id(values)?, 256),
                    DynSolValue::Bool(self.granted(values)?),
                ]);
                vec![
                    CallArg::Uint(DirectDemocracyConfigKey::HatAllowed.key().into()),
                    CallArg::Bytes(value.abi_encode_params()),
                ]
            }
            SetterAction::Pause | SetterAction::Unpause => vec![],
            SetterAction::ProjectRolePermission => {
                let bits = values.mask(PERMISSIONS).unwrap_or_default();
                let mask = TaskPermission::mask_of(bits.iter().filter_map(|b| TaskPermission::from_bit(*b)));
                vec![
                    CallArg::Id(self.required_text(values, PROJECT)?.to_string()),
                    CallArg::Id(self.required_text(values, ROLE)?.to_string()),
                    CallArg::Uint(mask.into()),
                ]
            }
            SetterAction::TaskCreatorAllowed => {
                let value = DynSolValue::Tuple(vec![
                    DynSolValue::Uint(self.hat_id(values)?, 256),
                    DynSolValue::Bool(self.granted(values)?),
                ]);
                vec![
                    CallArg::Uint(TaskManagerConfigKey::CreatorHatAllowed.key().into()),
                    CallArg::Bytes(value.abi_encode_params()),
                ]
            }
        };
        Ok(args)
    }

    /// One-sentence summary of what the call will do. Never fails: missing
    /// values render as `?` and unknown ids render as themselves.
    pub fn preview(&self, values: &Value, lookup: &PreviewLookup) -> String {
        let target = self.contract.display_name();
        let action = values
            .get(ACTION)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| self.toggle_default());
        let role = || {
            let id = preview_text(values, ROLE);
            lookup.role_name(&id).to_string()
        };

        match self.action {
            SetterAction::Quorum => {
                format!("Change {target} quorum to {}%", preview_text(values, QUORUM))
            }
            SetterAction::CreatorHatAllowed => {
                format!("{action} \"{}\" permission to create {target} proposals", role())
            }
            SetterAction::HatAllowed { hat_type } => {
                let hat_type = hat_type.or_else(|| {
                    values
                        .get(HAT_TYPE)
                        .and_then(|v| coerce_integer(v).or_else(|| v.as_str()?.parse().ok()))
                        .and_then(|c| u8::try_from(c).ok())
                        .and_then(HatType::from_code)
                });
                match hat_type {
                    Some(HatType::Voting) => format!("{action} \"{}\" voting rights in {target}", role()),
                    Some(HatType::Creator) if self.hides_hat_type() => {
                        format!("{action} \"{}\" permission to create {target} proposals", role())
                    }
                    Some(HatType::Creator) => {
                        format!("{action} \"{}\" proposal creation rights in {target}", role())
                    }
                    None => format!("{action} \"{}\" rights in {target}", role()),
                }
            }
            SetterAction::Pause => format!("Pause {target}"),
            SetterAction::Unpause => format!("Unpause {target}"),
            SetterAction::ProjectRolePermission => {
                let project = preview_text(values, PROJECT);
                let labels = preview_mask_labels(values.get(PERMISSIONS));
                let labels = if labels.is_empty() { "none".to_string() } else { labels.join(", ") };
                format!(
                    "Set \"{}\" permissions for {}: {labels}",
                    role(),
                    lookup.project_name(&project)
                )
            }
            SetterAction::TaskCreatorAllowed => {
                format!("{action} \"{}\" global task creator permission", role())
            }
        }
    }

    fn hides_hat_type(&self) -> bool {
        !self.inputs.iter().any(|i| i.name == HAT_TYPE)
    }

    fn toggle_default(&self) -> String {
        self.inputs
            .iter()
            .find_map(|i| match &i.spec {
                InputSpec::Toggle { default, .. } if i.name == ACTION => Some(default.clone()),
                _ => None,
            })
            .unwrap_or_else(|| GRANT.to_string())
    }

    fn required_number(&self, values: &ResolvedValues, name: &str) -> Result<i64, SetterError> {
        values
            .number(name)
            .ok_or_else(|| SetterError::usage(format!("{}: no number input '{name}'", self.id)))
    }

    fn required_text<'v>(&self, values: &'v ResolvedValues, name: &str) -> Result<&'v str, SetterError> {
        values
            .text(name)
            .ok_or_else(|| SetterError::usage(format!("{}: no input '{name}'", self.id)))
    }

    fn granted(&self, values: &ResolvedValues) -> Result<bool, SetterError> {
        Ok(self.required_text(values, ACTION)? == GRANT)
    }

    fn hat_id(&self, values: &ResolvedValues) -> Result<U256, SetterError> {
        let role = self.required_text(values, ROLE)?;
        parse_hat_id(role).ok_or_else(|| SetterError::usage(format!("{}: role id '{role}' is not numeric", self.id)))
    }

    fn selected_hat_type(&self, values: &ResolvedValues) -> Result<HatType, SetterError> {
        let code = self.required_text(values, HAT_TYPE)?;
        code.parse::<u8>()
            .ok()
            .and_then(HatType::from_code)
            .ok_or_else(|| SetterError::usage(format!("{}: unknown hat type '{code}'", self.id)))
    }
}

/// Parse a role (hat) id as decimal or `0x` hex.
pub fn parse_hat_id(id: &str) -> Option<U256> {
    id.trim().parse::<U256>().ok()
}

fn preview_text(values: &Value, name: &str) -> String {
    values
        .get(name)
        .and_then(identifier_of)
        .or_else(|| values.get(name).and_then(coerce_integer).map(|n| n.to_string()))
        .unwrap_or_else(|| "?".to_string())
}

fn preview_mask_labels(raw: Option<&Value>) -> Vec<&'static str> {
    let Some(Value::Array(items)) = raw else {
        return vec![];
    };
    let bits = items
        .iter()
        .filter_map(coerce_integer)
        .filter_map(|b| u8::try_from(b).ok())
        .filter_map(TaskPermission::from_bit);
    TaskPermission::from_mask(TaskPermission::mask_of(bits))
        .into_iter()
        .map(TaskPermission::label)
        .collect()
}

// ─── Default catalog ──────────────────────────────────────────────────────────

fn quorum_input() -> TemplateInput {
    TemplateInput::new(
        QUORUM,
        "Quorum (%)",
        InputSpec::Number {
            min: Some(1),
            max: Some(100),
            placeholder: Some("51".into()),
            help_text: Some("Percentage of votes required for a proposal to pass".into()),
        },
    )
}

fn role_input() -> TemplateInput {
    TemplateInput::new(ROLE, "Role", InputSpec::RoleSelect)
}

fn action_input() -> TemplateInput {
    TemplateInput::new(
        ACTION,
        "Action",
        InputSpec::Toggle {
            options: [GRANT.to_string(), REVOKE.to_string()],
            default: GRANT.to_string(),
        },
    )
}

fn hat_type_input() -> TemplateInput {
    TemplateInput::new(
        HAT_TYPE,
        "Permission",
        InputSpec::Select {
            options: vec![
                SelectOption { value: HatType::Voting.code().to_string(), label: "Voting".into() },
                SelectOption { value: HatType::Creator.code().to_string(), label: "Proposal creation".into() },
            ],
        },
    )
}

fn permissions_input() -> TemplateInput {
    TemplateInput::new(
        PERMISSIONS,
        "Permissions",
        InputSpec::PermissionMask {
            options: TaskPermission::ALL
                .into_iter()
                .map(|p| MaskOption { value: p.bit(), label: p.label().to_string() })
                .collect(),
        },
    )
}

struct Draft {
    id: &'static str,
    category: CategoryId,
    name: &'static str,
    description: &'static str,
    contract: ContractKey,
    function_name: &'static str,
    inputs: Vec<TemplateInput>,
    action: SetterAction,
}

impl Draft {
    fn build(self) -> SetterTemplate {
        SetterTemplate {
            id: self.id.to_string(),
            category: self.category,
            name: self.name.to_string(),
            description: self.description.to_string(),
            contract: self.contract,
            function_name: self.function_name.to_string(),
            inputs: self.inputs,
            danger_level: None,
            warning: None,
            action: self.action,
        }
    }

    fn critical(self, warning: &str) -> SetterTemplate {
        SetterTemplate {
            danger_level: Some(DangerLevel::Critical),
            warning: Some(warning.to_string()),
            ..self.build()
        }
    }
}

/// The built-in template catalog, in display order.
pub fn default_templates() -> Vec<SetterTemplate> {
    use CategoryId::*;
    use ContractKey::*;

    let pause = |id, contract: ContractKey| Draft {
        id,
        category: Emergency,
        name: if contract == HybridVoting { "Pause Hybrid Voting" } else { "Pause Direct Democracy" },
        description: "Stop all voting on this contract until it is unpaused",
        contract,
        function_name: "pause",
        inputs: vec![],
        action: SetterAction::Pause,
    };
    let unpause = |id, contract: ContractKey| Draft {
        id,
        category: Emergency,
        name: if contract == HybridVoting { "Unpause Hybrid Voting" } else { "Unpause Direct Democracy" },
        description: "Resume voting on a paused contract",
        contract,
        function_name: "unpause",
        inputs: vec![],
        action: SetterAction::Unpause,
    };

    vec![
        Draft {
            id: "change-quorum-hybrid",
            category: Voting,
            name: "Change Hybrid Voting Quorum",
            description: "Set the percentage of votes required for hybrid proposals to pass",
            contract: HybridVoting,
            function_name: "setConfig",
            inputs: vec![quorum_input()],
            action: SetterAction::Quorum,
        }
        .build(),
        Draft {
            id: "change-quorum-dd",
            category: Voting,
            name: "Change Direct Democracy Quorum",
            description: "Set the percentage of votes required for direct democracy proposals to pass",
            contract: DirectDemocracyVoting,
            function_name: "setConfig",
            inputs: vec![quorum_input()],
            action: SetterAction::Quorum,
        }
        .build(),
        Draft {
            id: "set-proposal-creator-hybrid",
            category: Permissions,
            name: "Hybrid Proposal Creators",
            description: "Allow or disallow a role to create hybrid voting proposals",
            contract: HybridVoting,
            function_name: "setCreatorHatAllowed",
            inputs: vec![role_input(), action_input()],
            action: SetterAction::CreatorHatAllowed,
        }
        .build(),
        Draft {
            id: "set-proposal-creator-dd",
            category: Permissions,
            name: "Direct Democracy Proposal Creators",
            description: "Allow or disallow a role to create direct democracy proposals",
            contract: DirectDemocracyVoting,
            function_name: "setConfig",
            inputs: vec![role_input(), action_input()],
            action: SetterAction::HatAllowed { hat_type: Some(HatType::Creator) },
        }
        .build(),
        Draft {
            id: "set-dd-hat-allowed",
            category: Permissions,
            name: "Direct Democracy Role Rights",
            description: "Grant or revoke a role's voting or proposal creation rights in direct democracy",
            contract: DirectDemocracyVoting,
            function_name: "setConfig",
            inputs: vec![role_input(), hat_type_input(), action_input()],
            action: SetterAction::HatAllowed { hat_type: None },
        }
        .build(),
        pause("pause-hybrid", HybridVoting)
            .critical("Pausing blocks every hybrid vote and proposal until governance unpauses the contract."),
        unpause("unpause-hybrid", HybridVoting)
            .critical("Unpausing reopens hybrid voting immediately for all members."),
        pause("pause-dd", DirectDemocracyVoting)
            .critical("Pausing blocks every direct democracy vote and proposal until governance unpauses the contract."),
        unpause("unpause-dd", DirectDemocracyVoting)
            .critical("Unpausing reopens direct democracy voting immediately for all members."),
        Draft {
            id: "set-project-permissions",
            category: Tasks,
            name: "Project Role Permissions",
            description: "Choose what a role may do with tasks in a project",
            contract: TaskManager,
            function_name: "setProjectRolePerm",
            inputs: vec![
                TemplateInput::new(PROJECT, "Project", InputSpec::ProjectSelect),
                role_input(),
                permissions_input(),
            ],
            action: SetterAction::ProjectRolePermission,
        }
        .build(),
        Draft {
            id: "set-task-creator",
            category: Tasks,
            name: "Global Task Creators",
            description: "Allow or disallow a role to create tasks in any project",
            contract: TaskManager,
            function_name: "setConfig",
            inputs: vec![role_input(), action_input()],
            action: SetterAction::TaskCreatorAllowed,
        }
        .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template(id: &str) -> SetterTemplate {
        default_templates().into_iter().find(|t| t.id == id).unwrap()
    }

    fn bytes(arg: &CallArg) -> &[u8] {
        match arg {
            CallArg::Bytes(b) => b,
            other => panic!("expected bytes, got {other:?}"),
        }
    }

    #[test]
    fn catalog_has_unique_ids() {
        let templates = default_templates();
        assert_eq!(templates.len(), 11);
        let mut ids: Vec<_> = templates.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 11);
    }

    #[test]
    fn quorum_encodes_32_byte_big_endian() {
        let call = template("change-quorum-hybrid").encode(&json!({ "quorum": 51 })).unwrap();
        assert_eq!(call.contract, ContractKey::HybridVoting);
        assert_eq!(call.function_name, "setConfig");
        assert_eq!(call.args[0], CallArg::Uint(0));
        let value = bytes(&call.args[1]);
        assert_eq!(value.len(), 32);
        assert_eq!(value[31], 0x33);
        assert!(value[..31].iter().all(|b| *b == 0));
        assert_eq!(U256::from_be_slice(value), U256::from(51));
    }

    #[test]
    fn quorum_rejects_out_of_range() {
        let err = template("change-quorum-dd").encode(&json!({ "quorum": 101 })).unwrap_err();
        assert_eq!(err.issues()[0].kind, IssueKind::OutOfRange);
    }

    #[test]
    fn creator_hat_allowed_follows_toggle() {
        let t = template("set-proposal-creator-hybrid");
        let grant = t.encode(&json!({ "role": "7" })).unwrap();
        assert_eq!(grant.args, vec![CallArg::Id("7".into()), CallArg::Bool(true)]);
        let revoke = t.encode(&json!({ "role": "7", "action": "Revoke" })).unwrap();
        assert_eq!(revoke.args[1], CallArg::Bool(false));
    }

    #[test]
    fn dd_hat_allowed_encodes_tuple() {
        let call = template("set-dd-hat-allowed")
            .encode(&json!({ "role": "42", "hatType": "0", "action": "Grant" }))
            .unwrap();
        assert_eq!(call.args[0], CallArg::Uint(3));
        let value = bytes(&call.args[1]);
        assert_eq!(value.len(), 96);
        assert_eq!(value[31], 0);
        assert_eq!(U256::from_be_slice(&value[32..64]), U256::from(42));
        assert_eq!(value[95], 1);
    }

    #[test]
    fn dd_proposal_creator_uses_creator_hat_type() {
        let call = template("set-proposal-creator-dd").encode(&json!({ "role": "0x2a" })).unwrap();
        let value = bytes(&call.args[1]);
        assert_eq!(value[31], 1);
        assert_eq!(U256::from_be_slice(&value[32..64]), U256::from(42));
    }

    #[test]
    fn non_numeric_role_in_config_bytes_is_rejected() {
        let issues = template("set-task-creator").validate(&json!({ "role": "admins" }));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::NotInteger);
        assert_eq!(issues[0].input_name, "role");
    }

    #[test]
    fn task_creator_encodes_pair() {
        let call = template("set-task-creator")
            .encode(&json!({ "role": "9", "action": "Revoke" }))
            .unwrap();
        assert_eq!(call.args[0], CallArg::Uint(1));
        let value = bytes(&call.args[1]);
        assert_eq!(value.len(), 64);
        assert_eq!(value[31], 9);
        assert_eq!(value[63], 0);
    }

    #[test]
    fn pause_has_no_args_and_is_critical() {
        let call = template("pause-dd").encode(&Value::Null).unwrap();
        assert!(call.args.is_empty());
        assert_eq!(call.danger_level, Some(DangerLevel::Critical));
        assert!(call.warning.is_some());
    }

    #[test]
    fn project_permissions_mask() {
        let t = template("set-project-permissions");
        let call = t
            .encode(&json!({ "project": "P1", "role": "R1", "permissions": [1, 4] }))
            .unwrap();
        assert_eq!(
            call.args,
            vec![CallArg::Id("P1".into()), CallArg::Id("R1".into()), CallArg::Uint(5)]
        );
        let empty = t.encode(&json!({ "project": "P1", "role": "R1", "permissions": [] })).unwrap();
        assert_eq!(empty.args[2], CallArg::Uint(0));
    }

    #[test]
    fn previews() {
        let lookup = PreviewLookup::new().role("R1", "Reviewers").project("P1", "Alpha");
        assert_eq!(
            template("change-quorum-hybrid").preview(&json!({ "quorum": 51 }), &lookup),
            "Change hybrid voting quorum to 51%"
        );
        assert_eq!(
            template("set-project-permissions")
                .preview(&json!({ "project": "P1", "role": "R1", "permissions": [4, 1] }), &lookup),
            "Set \"Reviewers\" permissions for Alpha: CREATE, REVIEW"
        );
        assert_eq!(
            template("set-project-permissions").preview(&json!({ "project": "P2", "role": "R1" }), &lookup),
            "Set \"Reviewers\" permissions for P2: none"
        );
        assert_eq!(
            template("set-dd-hat-allowed")
                .preview(&json!({ "role": "R1", "hatType": 0, "action": "Revoke" }), &lookup),
            "Revoke \"Reviewers\" voting rights in direct democracy"
        );
        assert_eq!(template("unpause-hybrid").preview(&json!({}), &lookup), "Unpause hybrid voting");
    }

    #[test]
    fn preview_never_fails_on_garbage() {
        let lookup = PreviewLookup::new();
        for t in default_templates() {
            let text = t.preview(&json!("not an object"), &lookup);
            assert!(!text.is_empty(), "{}", t.id);
        }
        assert_eq!(
            template("change-quorum-dd").preview(&json!({}), &lookup),
            "Change direct democracy quorum to ?%"
        );
    }
}
