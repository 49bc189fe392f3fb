use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::deserialize_id_lax;

/// Ad library item (`ads`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRecord {
    #[serde(default, deserialize_with = "deserialize_id_lax")]
    pub id: Option<String>,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub advertiser_name: Option<String>,

    #[serde(default)]
    pub advertiser_url: Option<String>,

    #[serde(default)]
    pub image_description: Option<String>,

    #[serde(default)]
    pub last_shown: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Columns this service does not interpret are passed through untouched.
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}
