use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_id_lax;

/// Constraint fed into headline generation (`custom_rules`, and embedded in materials).
///
/// `type` is free-form (`tone`, `formatting`, `keyword`, `length`, ...); the prompts only
/// echo it back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRule {
    #[serde(
        default,
        deserialize_with = "deserialize_id_lax",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(rename = "type")]
    pub rule_type: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ContentRule {
    pub fn new(
        rule_type: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            user_id: None,
            rule_type: rule_type.into(),
            name: name.into(),
            description: description.into(),
            value: value.into(),
            created_at: None,
        }
    }

    /// One prompt line, e.g. `- [tone] Friendly: Keep it warm (value: casual)`.
    pub fn prompt_line(&self) -> String {
        let mut line = format!("- [{}] {}", self.rule_type, self.name);
        if !self.description.is_empty() {
            line.push_str(": ");
            line.push_str(&self.description);
        }
        if !self.value.is_empty() {
            line.push_str(&format!(" (value: {})", self.value));
        }
        line
    }
}

/// Partial update for `PATCH /api/rules/{id}`; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentRulePatch {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ContentRulePatch {
    pub fn is_empty(&self) -> bool {
        self.rule_type.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.value.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rule_reads_numeric_ids_and_renders_prompt_line() {
        let rule: ContentRule = serde_json::from_value(json!({
            "id": 17,
            "type": "tone",
            "name": "Friendly",
            "description": "Keep it warm",
            "value": "casual"
        }))
        .expect("rule json must parse");

        assert_eq!(rule.id.as_deref(), Some("17"));
        assert_eq!(
            rule.prompt_line(),
            "- [tone] Friendly: Keep it warm (value: casual)"
        );
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = ContentRulePatch {
            value: Some("bold".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        assert_eq!(
            serde_json::to_value(&patch).expect("serialize"),
            json!({"value": "bold"})
        );
    }
}
