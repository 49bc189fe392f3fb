use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::deserialize_id_lax;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutomationStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Completed,
}

/// Saved automation definition (`automations`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Automation {
    #[serde(
        default,
        deserialize_with = "deserialize_id_lax",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default = "default_automation_type")]
    pub automation_type: String,

    /// Automation-specific settings, e.g. `{"variant_count": 3, "rule_ids": [...]}`.
    #[serde(default)]
    pub config: Value,

    #[serde(default)]
    pub status: AutomationStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_automation_type() -> String {
    "headline_variants".to_string()
}
