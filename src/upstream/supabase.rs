use crate::config::SupabaseConfig;
use crate::error::AdlabError;
use reqwest::{Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

use super::{endpoint, ensure_success};

/// Table names used by this service.
pub mod tables {
    pub const ADS: &str = "ads";
    pub const HEADLINE_VARIANTS: &str = "headline_variants";
    pub const CUSTOM_RULES: &str = "custom_rules";
    pub const BRAND_MATERIALS: &str = "brand_materials";
    pub const AUTOMATIONS: &str = "automations";

    /// Joined ad + variants lookup.
    pub const RPC_AD_WITH_VARIANTS: &str = "get_ad_with_variants";
}

const SERVICE: &str = "supabase";

/// Thin PostgREST client: one HTTP round trip per call.
#[derive(Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    rest_url: Url,
    service_key: Arc<str>,
}

impl SupabaseClient {
    pub fn new(cfg: &SupabaseConfig, client: reqwest::Client) -> Result<Self, AdlabError> {
        Ok(Self {
            client,
            rest_url: endpoint(&cfg.url, "rest/v1")?,
            service_key: Arc::from(cfg.service_key.as_str()),
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, AdlabError> {
        let url = endpoint(&self.rest_url, path)?;
        Ok(self
            .client
            .request(method, url)
            .header("apikey", self.service_key.as_ref())
            .bearer_auth(self.service_key.as_ref()))
    }

    async fn send<T>(&self, builder: RequestBuilder) -> Result<T, AdlabError>
    where
        T: DeserializeOwned,
    {
        let resp = ensure_success(SERVICE, builder.send().await?).await?;
        Ok(resp.json().await?)
    }

    /// `GET /{table}?select=*&...filters`.
    pub async fn select<T>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, AdlabError>
    where
        T: DeserializeOwned,
    {
        let builder = self
            .request(Method::GET, table)?
            .query(&[("select", "*")])
            .query(filters);
        self.send(builder).await
    }

    /// Newest-first page of `table`.
    pub async fn select_page<T>(
        &self,
        table: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<T>, AdlabError>
    where
        T: DeserializeOwned,
    {
        self.select(
            table,
            &[
                ("order", "created_at.desc".to_string()),
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    /// Insert one row or an array of rows and return what was stored.
    pub async fn insert<B, T>(&self, table: &str, rows: &B) -> Result<Vec<T>, AdlabError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .request(Method::POST, table)?
            .header("Prefer", "return=representation")
            .json(rows);
        self.send(builder).await
    }

    pub async fn update<B, T>(&self, table: &str, id: &str, patch: &B) -> Result<Vec<T>, AdlabError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .request(Method::PATCH, table)?
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(patch);
        self.send(builder).await
    }

    /// Returns the number of deleted rows.
    pub async fn delete(&self, table: &str, id: &str) -> Result<usize, AdlabError> {
        let builder = self
            .request(Method::DELETE, table)?
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation");
        let deleted: Vec<Value> = self.send(builder).await?;
        Ok(deleted.len())
    }

    /// `POST /rpc/{function}`.
    pub async fn rpc<B, T>(&self, function: &str, args: &B) -> Result<T, AdlabError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .request(Method::POST, &format!("rpc/{function}"))?
            .json(args);
        self.send(builder).await
    }
}
