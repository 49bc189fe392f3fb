//! Knowledge backend payloads (`/knowledge/query`, `/knowledge/query/stream`,
//! `/market/insight`, `/variants/generate`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeQuery {
    pub query: String,

    #[serde(default)]
    pub deep_research: bool,

    /// 0..=100; the backend picks a larger model and more context above 50.
    #[serde(default = "default_detail_level")]
    pub detail_level: u8,

    #[serde(default)]
    pub attribution_analysis: bool,
}

fn default_detail_level() -> u8 {
    50
}

/// One SSE event of the streaming endpoint. `response` is cumulative, not incremental.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    #[serde(default)]
    pub response: String,

    #[serde(default)]
    pub citations: Vec<Value>,

    #[serde(default)]
    pub sources: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_tasks: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Buffered answer with the chain of thought separated from the final text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeAnswer {
    pub thinking: String,
    pub response: String,
    pub citations: Vec<Value>,
    pub sources: Vec<Value>,
}

/// `POST /market/insight`. The backend answers with a free-form report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketInsightRequest {
    pub user_id: String,

    #[serde(default)]
    pub filters: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordData {
    pub term: String,

    /// Monthly search volume.
    #[serde(default)]
    pub volume: u64,

    #[serde(default)]
    pub intent: String,

    #[serde(default)]
    pub difficulty: f64,
}

/// One editable element of an ad template (headline, body, CTA).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdElement {
    #[serde(rename = "type")]
    pub element_type: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub code: String,

    pub text: String,
}

/// `POST /variants/generate`: one variant per keyword, element and market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantInput {
    pub keywords: Vec<KeywordData>,
    pub elements: Vec<AdElement>,

    #[serde(default)]
    pub target_markets: Vec<String>,
}
