use super::extract::{ApiJson, ApiQuery, OwnerFilter, require_id};
use crate::error::AdlabError;
use crate::materials::MaterialRequest;
use crate::server::router::AdlabState;
use crate::upstream::supabase::tables;
use adlab_schema::records::BrandMaterial;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// GET /api/materials
pub async fn list_materials(
    State(state): State<AdlabState>,
    ApiQuery(owner): ApiQuery<OwnerFilter>,
) -> Result<Json<Vec<BrandMaterial>>, AdlabError> {
    let rows = state
        .supabase
        .select(tables::BRAND_MATERIALS, &owner.filters())
        .await?;
    Ok(Json(rows))
}

/// POST /api/materials: crawl, analyze and store in one request.
pub async fn create_material(
    State(state): State<AdlabState>,
    ApiJson(req): ApiJson<MaterialRequest>,
) -> Result<(StatusCode, Json<BrandMaterial>), AdlabError> {
    let material = state.materials.create(req).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

/// DELETE /api/materials/{id}
pub async fn delete_material(
    State(state): State<AdlabState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AdlabError> {
    let id = require_id(&id)?;
    match state.supabase.delete(tables::BRAND_MATERIALS, id).await? {
        0 => Err(AdlabError::NotFound("Material".to_string())),
        _ => Ok(StatusCode::NO_CONTENT),
    }
}
