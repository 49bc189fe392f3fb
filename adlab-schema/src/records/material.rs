use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_id_lax;
use super::rule::ContentRule;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    #[default]
    Strategy,
    Branding,
    Guidelines,
}

impl MaterialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strategy => "strategy",
            Self::Branding => "branding",
            Self::Guidelines => "guidelines",
        }
    }
}

/// Crawled and summarized brand document (`brand_materials`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandMaterial {
    #[serde(
        default,
        deserialize_with = "deserialize_id_lax",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub url: String,

    #[serde(default)]
    pub material_type: MaterialType,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub content_rules: Vec<ContentRule>,

    #[serde(default)]
    pub crawled_urls: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
