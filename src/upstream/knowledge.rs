use crate::config::KnowledgeConfig;
use crate::error::AdlabError;
use adlab_schema::knowledge::{KnowledgeQuery, MarketInsightRequest, VariantInput};
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::{endpoint, ensure_success};

const SERVICE: &str = "knowledge";

/// Proxy client for the separate knowledge backend.
#[derive(Clone)]
pub struct KnowledgeClient {
    client: reqwest::Client,
    query_url: Url,
    stream_url: Url,
    insight_url: Url,
    variants_url: Url,
    health_url: Url,
}

impl KnowledgeClient {
    pub fn new(cfg: &KnowledgeConfig, client: reqwest::Client) -> Result<Self, AdlabError> {
        Ok(Self {
            client,
            query_url: endpoint(&cfg.base_url, "knowledge/query")?,
            stream_url: endpoint(&cfg.base_url, "knowledge/query/stream")?,
            insight_url: endpoint(&cfg.base_url, "market/insight")?,
            variants_url: endpoint(&cfg.base_url, "variants/generate")?,
            health_url: endpoint(&cfg.base_url, "health")?,
        })
    }

    async fn post_json<B>(&self, url: &Url, body: &B) -> Result<Value, AdlabError>
    where
        B: Serialize + ?Sized,
    {
        let resp = self.client.post(url.clone()).json(body).send().await?;
        Ok(ensure_success(SERVICE, resp).await?.json().await?)
    }

    /// One-shot query; the backend's JSON is returned as-is.
    pub async fn query(&self, query: &KnowledgeQuery) -> Result<Value, AdlabError> {
        self.post_json(&self.query_url, query).await
    }

    /// Opens the SSE stream. The body is left unread for the caller to forward or parse.
    pub async fn open_stream(
        &self,
        query: &KnowledgeQuery,
    ) -> Result<reqwest::Response, AdlabError> {
        let resp = self
            .client
            .post(self.stream_url.clone())
            .header(ACCEPT, "text/event-stream")
            .json(query)
            .send()
            .await?;
        ensure_success(SERVICE, resp).await
    }

    pub async fn market_insight(&self, req: &MarketInsightRequest) -> Result<Value, AdlabError> {
        self.post_json(&self.insight_url, req).await
    }

    pub async fn generate_variants(&self, input: &VariantInput) -> Result<Value, AdlabError> {
        self.post_json(&self.variants_url, input).await
    }

    /// The backend's own per-service readiness report.
    pub async fn health(&self) -> Result<Value, AdlabError> {
        let resp = self.client.get(self.health_url.clone()).send().await?;
        Ok(ensure_success(SERVICE, resp).await?.json().await?)
    }
}
