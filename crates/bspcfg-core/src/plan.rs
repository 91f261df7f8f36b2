//! Action plans produced by an external planner
//!
//! A planner (typically a language model) turns a free-text request into a
//! JSON document such as
//!
//! ```json
//! { "actions": [ { "type": "set_bspwm_option", "option": "border_width", "value": 3 } ] }
//! ```
//!
//! Nothing in the document is trusted: each action is checked field by field
//! before it reaches [`ConfigTools`]. A bad or unknown action is reported and
//! skipped; the remaining actions still run, and every file edit is
//! independent of the others.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::catalog::FileCatalog;
use crate::error::{ConfigError, ConfigResult};
use crate::ops::EditResult;
use crate::tools::{BspwmOptions, ConfigTools, EditableItems, IniOptions};

/// One validated action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ListFiles,
    ShowBspwmOptions,
    ShowIniOptions {
        file: String,
    },
    ShowItems {
        file: String,
    },
    SetBspwmOption {
        option: String,
        value: String,
    },
    SetIniKey {
        file: String,
        key: String,
        value: String,
    },
    ReplaceText {
        file: String,
        search: String,
        replace: String,
        limit: Option<usize>,
    },
    /// Type the executor does not know; skipped
    Unknown {
        action_type: String,
    },
}

impl Action {
    /// Validate one raw action object
    ///
    /// # Errors
    /// Returns `InvalidPlan` if the action is not an object, or
    /// `MissingParameter` naming the first absent or empty field
    pub fn from_value(value: &Value) -> ConfigResult<Self> {
        let Some(obj) = value.as_object() else {
            return Err(ConfigError::InvalidPlan("action is not an object".into()));
        };

        let action_type = obj.get("type").and_then(Value::as_str).unwrap_or_default();

        let action = match action_type {
            "list_files" => Self::ListFiles,
            "show_bspwm_options" => Self::ShowBspwmOptions,
            "show_ini_options" => Self::ShowIniOptions {
                file: required_str(obj, "file")?,
            },
            "show_items" => Self::ShowItems {
                file: required_str(obj, "file")?,
            },
            "set_bspwm_option" => Self::SetBspwmOption {
                option: required_str(obj, "option")?,
                value: required_value(obj, "value")?,
            },
            "set_ini_key" => Self::SetIniKey {
                file: required_str(obj, "file")?,
                key: required_str(obj, "key")?,
                value: required_value(obj, "value")?,
            },
            "replace_text" => Self::ReplaceText {
                file: required_str(obj, "file")?,
                search: required_str(obj, "search")?,
                replace: required_value(obj, "replace")?,
                limit: optional_limit(obj)?,
            },
            "" => return Err(ConfigError::MissingParameter("type".into())),
            other => Self::Unknown {
                action_type: other.to_string(),
            },
        };

        Ok(action)
    }

    /// Planner-facing name of the action
    #[must_use]
    pub fn action_type(&self) -> &str {
        match self {
            Self::ListFiles => "list_files",
            Self::ShowBspwmOptions => "show_bspwm_options",
            Self::ShowIniOptions { .. } => "show_ini_options",
            Self::ShowItems { .. } => "show_items",
            Self::SetBspwmOption { .. } => "set_bspwm_option",
            Self::SetIniKey { .. } => "set_ini_key",
            Self::ReplaceText { .. } => "replace_text",
            Self::Unknown { action_type } => action_type.as_str(),
        }
    }
}

fn required_str(obj: &Map<String, Value>, field: &str) -> ConfigResult<String> {
    match obj.get(field).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(ConfigError::MissingParameter(field.to_string())),
    }
}

/// Values may come back from the planner as numbers or booleans. Booleans
/// keep their JSON spelling (`true`), the form `bspc config` accepts.
fn required_value(obj: &Map<String, Value>, field: &str) -> ConfigResult<String> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(v.to_string()),
        Some(Value::Array(_) | Value::Object(_)) => Err(ConfigError::InvalidPlan(format!(
            "'{field}' must be a string, number or boolean"
        ))),
        Some(Value::Null) | None => Err(ConfigError::MissingParameter(field.to_string())),
    }
}

fn optional_limit(obj: &Map<String, Value>) -> ConfigResult<Option<usize>> {
    let Some(raw) = obj.get("limit").or_else(|| obj.get("count")) else {
        return Ok(None);
    };
    if raw.is_null() {
        return Ok(None);
    }
    raw.as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .map(Some)
        .ok_or_else(|| ConfigError::InvalidPlan("'limit' must be a non-negative integer".into()))
}

/// A planner document: raw actions, validated one at a time during execution
#[derive(Debug, Clone, Default)]
pub struct Plan {
    actions: Vec<Value>,
}

impl Plan {
    /// Parse a plan document. A missing or null `actions` field is an empty plan.
    ///
    /// # Errors
    /// Returns `InvalidPlan` if the text is not JSON, not an object, or
    /// `actions` is not a list
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let doc: Value = serde_json::from_str(text)?;
        Self::from_value(doc)
    }

    /// # Errors
    /// See [`Plan::from_json`]
    pub fn from_value(doc: Value) -> ConfigResult<Self> {
        let Value::Object(mut obj) = doc else {
            return Err(ConfigError::InvalidPlan("plan is not a JSON object".into()));
        };

        match obj.remove("actions") {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::Array(actions)) => Ok(Self { actions }),
            Some(_) => Err(ConfigError::InvalidPlan("'actions' is not a list".into())),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Output of a successful action
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ActionOutput {
    Files(FileCatalog),
    BspwmOptions(BspwmOptions),
    IniOptions(IniOptions),
    Items(EditableItems),
    Edit(EditResult),
}

/// What happened to one action
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Done { result: ActionOutput },
    Failed { code: String, message: String },
    Skipped { reason: String },
}

/// Report line for one action
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// 1-based position in the plan
    pub index: usize,
    pub action: String,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// Report for a whole plan
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanReport {
    pub steps: Vec<StepReport>,
}

impl PlanReport {
    /// Number of actions that failed
    #[must_use]
    pub fn failures(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Failed { .. }))
            .count()
    }
}

fn failed(err: &ConfigError) -> StepOutcome {
    StepOutcome::Failed {
        code: err.code().to_string(),
        message: err.to_string(),
    }
}

impl ConfigTools {
    /// Run one validated action
    ///
    /// # Errors
    /// Returns the underlying tool error; `Unknown` actions are an `InvalidPlan` error
    pub fn run_action(&self, action: &Action, dry_run: bool) -> ConfigResult<ActionOutput> {
        let output = match action {
            Action::ListFiles => ActionOutput::Files(self.list_files().clone()),
            Action::ShowBspwmOptions => ActionOutput::BspwmOptions(self.get_bspwm_options()?),
            Action::ShowIniOptions { file } => ActionOutput::IniOptions(self.get_ini_options(file)?),
            Action::ShowItems { file } => ActionOutput::Items(self.list_editable_items(file)?),
            Action::SetBspwmOption { option, value } => {
                ActionOutput::Edit(self.set_bspc_config(option, value, dry_run)?)
            }
            Action::SetIniKey { file, key, value } => {
                ActionOutput::Edit(self.set_ini_key(file, key, value, dry_run)?)
            }
            Action::ReplaceText {
                file,
                search,
                replace,
                limit,
            } => ActionOutput::Edit(self.replace_in_file(file, search, replace, *limit, dry_run)?),
            Action::Unknown { action_type } => {
                return Err(ConfigError::InvalidPlan(format!(
                    "unknown action type '{action_type}'"
                )))
            }
        };
        Ok(output)
    }

    /// Validate and run every action of a plan in order, continuing past failures
    #[must_use]
    pub fn execute_plan(&self, plan: &Plan, dry_run: bool) -> PlanReport {
        let mut report = PlanReport::default();

        for (idx, raw) in plan.actions.iter().enumerate() {
            let index = idx + 1;
            let raw_type = raw
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("<none>")
                .to_string();

            let (action, outcome) = match Action::from_value(raw) {
                Err(err) => {
                    warn!(index, action = %raw_type, error = %err, "rejected plan action");
                    (raw_type, failed(&err))
                }
                Ok(Action::Unknown { action_type }) => {
                    warn!(index, action = %action_type, "skipping unknown plan action");
                    let reason = format!("unknown action type '{action_type}'");
                    (action_type, StepOutcome::Skipped { reason })
                }
                Ok(action) => {
                    info!(index, total = plan.len(), action = action.action_type(), "running plan action");
                    let outcome = match self.run_action(&action, dry_run) {
                        Ok(result) => StepOutcome::Done { result },
                        Err(err) => failed(&err),
                    };
                    (action.action_type().to_string(), outcome)
                }
            };

            report.steps.push(StepReport {
                index,
                action,
                outcome,
            });
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_from_value_stringifies_values() {
        let action = Action::from_value(&json!({
            "type": "set_bspwm_option",
            "option": "border_width",
            "value": 3
        }))
        .unwrap();
        assert_eq!(
            action,
            Action::SetBspwmOption {
                option: "border_width".into(),
                value: "3".into()
            }
        );
    }

    #[test]
    fn test_action_from_value_keeps_lowercase_booleans() {
        let action = Action::from_value(&json!({
            "type": "set_bspwm_option",
            "option": "focus_follows_pointer",
            "value": true
        }))
        .unwrap();
        assert_eq!(
            action,
            Action::SetBspwmOption {
                option: "focus_follows_pointer".into(),
                value: "true".into()
            }
        );
    }

    #[test]
    fn test_action_from_value_missing_fields() {
        let err = Action::from_value(&json!({"type": "set_ini_key", "file": "kitty/kitty.conf", "value": "x"}))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingParameter(ref f) if f == "key"));

        let err = Action::from_value(&json!({"type": "set_bspwm_option", "option": "gap", "value": null}))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingParameter(ref f) if f == "value"));

        let err = Action::from_value(&json!({"type": "show_ini_options", "file": ""})).unwrap_err();
        assert!(matches!(err, ConfigError::MissingParameter(ref f) if f == "file"));

        let err = Action::from_value(&json!({"option": "gap"})).unwrap_err();
        assert!(matches!(err, ConfigError::MissingParameter(ref f) if f == "type"));
    }

    #[test]
    fn test_action_from_value_empty_value_allowed() {
        let action = Action::from_value(&json!({
            "type": "set_ini_key", "file": "picom/picom.conf", "key": "shadow", "value": ""
        }))
        .unwrap();
        assert!(matches!(action, Action::SetIniKey { ref value, .. } if value.is_empty()));
    }

    #[test]
    fn test_action_from_value_replace_limit() {
        let action = Action::from_value(&json!({
            "type": "replace_text", "file": "polybar/config",
            "search": "2px", "replace": "4px", "count": 1
        }))
        .unwrap();
        assert!(matches!(action, Action::ReplaceText { limit: Some(1), .. }));

        let err = Action::from_value(&json!({
            "type": "replace_text", "file": "polybar/config",
            "search": "2px", "replace": "4px", "limit": -1
        }))
        .unwrap_err();
        assert_eq!(err.code(), "INVALID_PLAN");
    }

    #[test]
    fn test_action_unknown_type() {
        let action = Action::from_value(&json!({"type": "reboot"})).unwrap();
        assert_eq!(action.action_type(), "reboot");
    }

    #[test]
    fn test_plan_from_json() {
        assert!(Plan::from_json("{}").unwrap().is_empty());
        assert!(Plan::from_json(r#"{"actions": null}"#).unwrap().is_empty());
        assert_eq!(
            Plan::from_json(r#"{"actions": [{"type": "list_files"}]}"#)
                .unwrap()
                .len(),
            1
        );
        assert!(Plan::from_json(r#"{"actions": "all"}"#).is_err());
        assert!(Plan::from_json("[1, 2]").is_err());
        assert!(Plan::from_json("not json").is_err());
    }
}
