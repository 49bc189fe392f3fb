use super::extract::ApiJson;
use crate::error::AdlabError;
use crate::server::router::AdlabState;
use adlab_schema::knowledge::{KnowledgeAnswer, KnowledgeQuery, MarketInsightRequest, VariantInput};
use axum::{Json, extract::State, response::Response};
use serde_json::Value;
use tracing::debug;

pub mod respond;

fn validate(query: &KnowledgeQuery) -> Result<(), AdlabError> {
    if query.query.trim().is_empty() {
        return Err(AdlabError::bad_request("query is required"));
    }
    Ok(())
}

/// POST /api/knowledge/query: JSON in, backend JSON out.
pub async fn query(
    State(state): State<AdlabState>,
    ApiJson(query): ApiJson<KnowledgeQuery>,
) -> Result<Json<Value>, AdlabError> {
    validate(&query)?;
    debug!(
        deep_research = query.deep_research,
        detail_level = query.detail_level,
        "Incoming knowledge query"
    );
    Ok(Json(state.knowledge.query(&query).await?))
}

/// POST /api/knowledge/stream: the backend's event stream, byte for byte.
pub async fn stream(
    State(state): State<AdlabState>,
    ApiJson(query): ApiJson<KnowledgeQuery>,
) -> Result<Response, AdlabError> {
    validate(&query)?;
    let upstream = state.knowledge.open_stream(&query).await?;
    Ok(respond::passthrough(upstream))
}

/// POST /api/knowledge/answer: the stream buffered with reasoning split from the answer.
pub async fn answer(
    State(state): State<AdlabState>,
    ApiJson(query): ApiJson<KnowledgeQuery>,
) -> Result<Json<KnowledgeAnswer>, AdlabError> {
    validate(&query)?;
    let upstream = state.knowledge.open_stream(&query).await?;
    let answer = respond::collect_answer(upstream.bytes_stream()).await?;
    Ok(Json(answer))
}

/// POST /api/knowledge/market-insight
pub async fn market_insight(
    State(state): State<AdlabState>,
    ApiJson(req): ApiJson<MarketInsightRequest>,
) -> Result<Json<Value>, AdlabError> {
    if req.user_id.trim().is_empty() {
        return Err(AdlabError::bad_request("user_id is required"));
    }
    Ok(Json(state.knowledge.market_insight(&req).await?))
}

/// POST /api/knowledge/variants: keyword and market targeted rewrites of template elements.
pub async fn generate_variants(
    State(state): State<AdlabState>,
    ApiJson(input): ApiJson<VariantInput>,
) -> Result<Json<Value>, AdlabError> {
    if input.keywords.is_empty() || input.elements.is_empty() {
        return Err(AdlabError::bad_request("keywords and elements are required"));
    }
    debug!(
        keywords = input.keywords.len(),
        elements = input.elements.len(),
        markets = input.target_markets.len(),
        "Incoming variant generation"
    );
    Ok(Json(state.knowledge.generate_variants(&input).await?))
}

/// GET /api/knowledge/health: the backend's report, unmodified.
pub async fn health(State(state): State<AdlabState>) -> Result<Json<Value>, AdlabError> {
    Ok(Json(state.knowledge.health().await?))
}
