use super::extract::{ApiJson, ApiQuery, OwnerFilter, require_id};
use crate::error::AdlabError;
use crate::server::router::AdlabState;
use crate::upstream::supabase::tables;
use adlab_schema::records::{ContentRule, ContentRulePatch};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// GET /api/rules
pub async fn list_rules(
    State(state): State<AdlabState>,
    ApiQuery(owner): ApiQuery<OwnerFilter>,
) -> Result<Json<Vec<ContentRule>>, AdlabError> {
    let rows = state
        .supabase
        .select(tables::CUSTOM_RULES, &owner.filters())
        .await?;
    Ok(Json(rows))
}

/// POST /api/rules
pub async fn create_rule(
    State(state): State<AdlabState>,
    ApiJson(rule): ApiJson<ContentRule>,
) -> Result<(StatusCode, Json<ContentRule>), AdlabError> {
    if rule.rule_type.trim().is_empty() || rule.name.trim().is_empty() {
        return Err(AdlabError::bad_request("type and name are required"));
    }
    let stored: Vec<ContentRule> = state.supabase.insert(tables::CUSTOM_RULES, &rule).await?;
    let row = stored.into_iter().next().unwrap_or(rule);
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/rules/{id}
pub async fn update_rule(
    State(state): State<AdlabState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ContentRulePatch>,
) -> Result<Json<ContentRule>, AdlabError> {
    let id = require_id(&id)?;
    if patch.is_empty() {
        return Err(AdlabError::bad_request("no fields to update"));
    }
    let updated: Vec<ContentRule> = state
        .supabase
        .update(tables::CUSTOM_RULES, id, &patch)
        .await?;
    updated
        .into_iter()
        .next()
        .map(Json)
        .ok_or_else(|| AdlabError::NotFound("Rule".to_string()))
}

/// DELETE /api/rules/{id}
pub async fn delete_rule(
    State(state): State<AdlabState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AdlabError> {
    let id = require_id(&id)?;
    match state.supabase.delete(tables::CUSTOM_RULES, id).await? {
        0 => Err(AdlabError::NotFound("Rule".to_string())),
        _ => Ok(StatusCode::NO_CONTENT),
    }
}
