use super::extract::{ApiJson, ApiQuery, OwnerFilter, require_id};
use crate::automation::{HeadlineRequest, HeadlineRun};
use crate::error::AdlabError;
use crate::server::router::AdlabState;
use crate::upstream::supabase::tables;
use adlab_schema::records::Automation;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

/// POST /api/automations/headlines
pub async fn run_headlines(
    State(state): State<AdlabState>,
    ApiJson(req): ApiJson<HeadlineRequest>,
) -> Result<Json<HeadlineRun>, AdlabError> {
    debug!(
        image_url = %req.image_url,
        rules = req.content_rules.len(),
        ad_id = req.ad_id.as_deref().unwrap_or("-"),
        "Incoming headline automation"
    );
    Ok(Json(state.automation.run(req).await?))
}

/// GET /api/automations
pub async fn list_automations(
    State(state): State<AdlabState>,
    ApiQuery(owner): ApiQuery<OwnerFilter>,
) -> Result<Json<Vec<Automation>>, AdlabError> {
    let rows = state
        .supabase
        .select(tables::AUTOMATIONS, &owner.filters())
        .await?;
    Ok(Json(rows))
}

/// POST /api/automations
pub async fn create_automation(
    State(state): State<AdlabState>,
    ApiJson(automation): ApiJson<Automation>,
) -> Result<(StatusCode, Json<Automation>), AdlabError> {
    if automation.name.trim().is_empty() {
        return Err(AdlabError::bad_request("name is required"));
    }
    let stored: Vec<Automation> = state
        .supabase
        .insert(tables::AUTOMATIONS, &automation)
        .await?;
    let row = stored.into_iter().next().unwrap_or(automation);
    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /api/automations/{id}
pub async fn delete_automation(
    State(state): State<AdlabState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AdlabError> {
    let id = require_id(&id)?;
    match state.supabase.delete(tables::AUTOMATIONS, id).await? {
        0 => Err(AdlabError::NotFound("Automation".to_string())),
        _ => Ok(StatusCode::NO_CONTENT),
    }
}
