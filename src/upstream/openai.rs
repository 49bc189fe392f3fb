use crate::config::OpenaiConfig;
use crate::error::AdlabError;
use crate::utils::logging::with_pretty_json_debug;
use adlab_schema::openai::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

use super::{endpoint, ensure_success};

/// Structured-output chat completions client.
#[derive(Clone)]
pub struct OpenaiClient {
    client: reqwest::Client,
    completions_url: Url,
    api_key: Arc<str>,
    model: String,
    temperature: Option<f32>,
}

impl OpenaiClient {
    pub fn new(cfg: &OpenaiConfig, client: reqwest::Client) -> Result<Self, AdlabError> {
        Ok(Self {
            client,
            completions_url: endpoint(&cfg.base_url, "chat/completions")?,
            api_key: Arc::from(cfg.api_key.as_str()),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_request(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<reqwest::Request, reqwest::Error> {
        self.client
            .post(self.completions_url.clone())
            .bearer_auth(self.api_key.as_ref())
            .json(body)
            .build()
    }

    pub async fn complete(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, AdlabError> {
        let schema = body
            .response_format
            .as_ref()
            .and_then(ResponseFormat::schema_name)
            .unwrap_or("-");

        with_pretty_json_debug(body, |pretty_body| {
            debug!(
                channel = "openai",
                req.model = %body.model,
                req.schema = schema,
                body = %pretty_body,
                "[OpenAI] Outgoing chat completion"
            );
        });

        let start = Instant::now();
        let req = self.build_request(body)?;
        let resp = ensure_success("openai", self.client.execute(req).await?).await?;
        let parsed: ChatCompletionResponse = resp.json().await?;

        info!(
            channel = "openai",
            req.model = %body.model,
            req.schema = schema,
            took_ms = start.elapsed().as_millis() as u64,
            tokens = parsed.usage.as_ref().map_or(0, |u| u.total_tokens),
            "[OpenAI] Chat completion finished"
        );

        Ok(parsed)
    }

    /// Run one schema-constrained completion and decode the reply as `T`.
    pub async fn structured<T>(
        &self,
        schema_name: &str,
        schema: Value,
        messages: Vec<ChatMessage>,
    ) -> Result<T, AdlabError>
    where
        T: DeserializeOwned,
    {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            response_format: Some(ResponseFormat::json_schema(schema_name, schema)),
            temperature: self.temperature,
            extra: Default::default(),
        };

        let resp = self.complete(&body).await?;
        parse_structured(schema_name, &resp)
    }
}

pub(crate) fn parse_structured<T>(
    schema_name: &str,
    resp: &ChatCompletionResponse,
) -> Result<T, AdlabError>
where
    T: DeserializeOwned,
{
    let Some(message) = resp.first_message() else {
        return Err(AdlabError::StructuredOutput(format!(
            "{schema_name}: response has no choices"
        )));
    };

    if let Some(refusal) = message.refusal.as_deref() {
        return Err(AdlabError::StructuredOutput(format!(
            "{schema_name}: model refused: {refusal}"
        )));
    }

    let content = resp.first_content().ok_or_else(|| {
        AdlabError::StructuredOutput(format!("{schema_name}: empty message content"))
    })?;

    serde_json::from_str(content)
        .map_err(|e| AdlabError::StructuredOutput(format!("{schema_name}: {e}")))
}
