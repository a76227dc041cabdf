use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which loaded files a caller wants back.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "mode", content = "action", rename_all = "snake_case")]
pub enum Selection {
    /// Every parsed file, whether or not it declares actions.
    Libraries,
    /// Files declaring at least one action.
    #[default]
    Policies,
    /// Files declaring this exact action.
    Action(String),
}

impl Selection {
    /// Selection for an optional requested action. An empty action means "any action".
    pub fn for_action(action: Option<&str>) -> Self {
        match action {
            Some(a) if !a.is_empty() => Selection::Action(a.to_string()),
            _ => Selection::Policies,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Libraries => f.write_str("libraries"),
            Selection::Policies => f.write_str("policies"),
            Selection::Action(a) => write!(f, "policies with action '{a}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_action_means_policies() {
        assert_eq!(Selection::for_action(Some("")), Selection::Policies);
        assert_eq!(Selection::for_action(None), Selection::Policies);
        assert_eq!(
            Selection::for_action(Some("deny")),
            Selection::Action("deny".to_string())
        );
    }

    #[test]
    fn serde_shape_is_tagged() {
        let json = serde_json::to_value(Selection::Action("warn".to_string())).expect("ser");
        assert_eq!(json, serde_json::json!({"mode": "action", "action": "warn"}));

        let json = serde_json::to_value(Selection::Libraries).expect("ser");
        assert_eq!(json, serde_json::json!({"mode": "libraries"}));
    }
}
