use crate::error::AdlabError;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// JSON body whose rejections render as `{"error": ...}` with status 400.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AdlabError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state).await?;
        Ok(Self(body))
    }
}

/// Query string counterpart of [`ApiJson`].
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AdlabError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(query))
    }
}

/// `?user_id=` scoping shared by the list routes.
#[derive(Debug, Default, Deserialize)]
pub struct OwnerFilter {
    pub user_id: Option<String>,
}

impl OwnerFilter {
    pub fn filters(&self) -> Vec<(&'static str, String)> {
        let mut filters = vec![("order", "created_at.desc".to_string())];
        if let Some(user_id) = self.user_id.as_deref().filter(|id| !id.is_empty()) {
            filters.push(("user_id", format!("eq.{user_id}")));
        }
        filters
    }
}

/// Rejects blank path ids before they reach a `?id=eq.` filter.
pub fn require_id(id: &str) -> Result<&str, AdlabError> {
    let id = id.trim();
    if id.is_empty() {
        Err(AdlabError::bad_request("id is required"))
    } else {
        Ok(id)
    }
}
