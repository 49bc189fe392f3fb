use super::extract::{ApiQuery, require_id};
use crate::error::AdlabError;
use crate::library::PageKey;
use crate::server::router::AdlabState;
use crate::upstream::supabase::tables;
use adlab_schema::records::AdRecord;
use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LibraryPageBody<'a> {
    items: &'a [AdRecord],
    page: u32,
    page_size: u32,
}

/// GET /api/library?page=&pageSize=
pub async fn list_ads(
    State(state): State<AdlabState>,
    ApiQuery(params): ApiQuery<LibraryParams>,
) -> Result<Response, AdlabError> {
    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(AdlabError::bad_request("page must be 1 or greater"));
    }
    let page_size = match params.page_size {
        None => state.library_cfg.default_page_size,
        Some(0) => return Err(AdlabError::bad_request("pageSize must be 1 or greater")),
        Some(size) => size.min(state.library_cfg.max_page_size),
    };

    let key = PageKey::new(page, page_size);
    let items = state.library.page(key).await?;

    Ok(Json(LibraryPageBody {
        items: items.as_slice(),
        page: key.page,
        page_size: key.page_size,
    })
    .into_response())
}

/// GET /api/library/{id}: the ad joined with its headline variants.
pub async fn get_ad(
    State(state): State<AdlabState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AdlabError> {
    let id = require_id(&id)?;
    let joined: Value = state
        .supabase
        .rpc(tables::RPC_AD_WITH_VARIANTS, &json!({ "ad_id": id }))
        .await?;

    first_row(joined)
        .map(Json)
        .ok_or_else(|| AdlabError::NotFound("Ad".to_string()))
}

/// Set-returning functions answer with an array; scalar ones with the row or `null`.
fn first_row(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(rows) => rows.into_iter().next().filter(|row| !row.is_null()),
        row => Some(row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_row_unwraps_rpc_shapes() {
        assert_eq!(first_row(Value::Null), None);
        assert_eq!(first_row(json!([])), None);
        assert_eq!(first_row(json!([null])), None);
        assert_eq!(
            first_row(json!([{"id": 1, "variants": []}])),
            Some(json!({"id": 1, "variants": []}))
        );
        assert_eq!(first_row(json!({"id": 2})), Some(json!({"id": 2})));
    }
}
