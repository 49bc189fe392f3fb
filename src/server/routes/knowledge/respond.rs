use crate::error::AdlabError;
use adlab_core::ThinkSplitter;
use adlab_schema::knowledge::{KnowledgeAnswer, KnowledgeChunk};
use axum::{
    body::{Body, Bytes},
    http::{
        HeaderName,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use eventsource_stream::Eventsource;
use futures::Stream;
use std::time::Duration;
use tokio_stream::StreamExt;
use tracing::{debug, error};

const SSE_IDLE_TIMEOUT: Duration = Duration::from_secs(60);
const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// Forward the upstream SSE body unchanged.
pub(super) fn passthrough(upstream: reqwest::Response) -> Response {
    (
        [
            (CONTENT_TYPE, "text/event-stream"),
            (CACHE_CONTROL, "no-cache"),
            (X_ACCEL_BUFFERING, "no"),
        ],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response()
}

/// Drain a knowledge event stream through a [`ThinkSplitter`].
///
/// Events that are not JSON objects are skipped; `[DONE]` ends the stream. Citations and
/// sources come from the last event seen.
pub(super) async fn collect_answer<S, E>(stream: S) -> Result<KnowledgeAnswer, AdlabError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut splitter = ThinkSplitter::new();
    let mut last: Option<KnowledgeChunk> = None;

    let timed_stream = stream.eventsource().timeout(SSE_IDLE_TIMEOUT);
    tokio::pin!(timed_stream);

    while let Some(item) = timed_stream.next().await {
        let event = match item {
            Ok(Ok(event)) => event,
            Ok(Err(e)) => return Err(AdlabError::StreamProtocol(e.to_string())),
            Err(_) => {
                error!("Knowledge stream timed out (idle > 60s)");
                return Err(AdlabError::StreamProtocol(
                    "Stream idle timeout".to_string(),
                ));
            }
        };

        if event.data.is_empty() {
            continue;
        }
        if event.data == "[DONE]" {
            break;
        }

        let Ok(chunk) = serde_json::from_str::<KnowledgeChunk>(&event.data) else {
            continue;
        };
        if let Some(message) = chunk.error.as_deref().filter(|m| !m.is_empty()) {
            return Err(AdlabError::StreamProtocol(format!(
                "knowledge backend error: {message}"
            )));
        }

        if splitter.ingest(&chunk.response).restarted {
            debug!("Knowledge response restarted; discarding earlier text");
        }
        last = Some(chunk);
    }

    splitter.finish();
    let (thinking, response) = splitter.into_parts();
    let (citations, sources) = last
        .map(|chunk| (chunk.citations, chunk.sources))
        .unwrap_or_default();

    Ok(KnowledgeAnswer {
        thinking,
        response,
        citations,
        sources,
    })
}
