use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error as ThisError;

/// Message returned verbatim when the image yields no headline; clients match on it.
pub const NO_HEADLINES_MESSAGE: &str = "No headlines found in the image";

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, ThisError)]
pub enum AdlabError {
    /// Missing or malformed client input. The message is shown to the client.
    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream answered with a non-success status.
    #[error("Upstream {service} returned {status}: {body:.200}")]
    UpstreamStatus {
        service: &'static str,
        status: StatusCode,
        /// Raw upstream body is preserved for internal diagnostics/logging only.
        body: String,
    },

    /// Transport-level failure (DNS, connect, timeouts, etc).
    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// A model reply was empty, refused, or did not match the requested schema.
    #[error("Structured output error: {0}")]
    StructuredOutput(String),

    #[error("Crawl error: {0}")]
    Crawl(String),

    #[error("Stream protocol error: {0}")]
    StreamProtocol(String),
}

impl AdlabError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AdlabError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AdlabError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AdlabError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            // The database rejecting our credentials is an authorization failure, not an outage.
            AdlabError::UpstreamStatus {
                service: "supabase",
                status: StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN,
                ..
            } => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AdlabError::UpstreamStatus { .. }
            | AdlabError::Reqwest(_)
            | AdlabError::Json(_)
            | AdlabError::Url(_)
            | AdlabError::StructuredOutput(_)
            | AdlabError::Crawl(_)
            | AdlabError::StreamProtocol(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_MESSAGE.to_string(),
            ),
        }
    }
}

impl From<JsonRejection> for AdlabError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                AdlabError::bad_request("Expected Content-Type: application/json")
            }
            JsonRejection::JsonSyntaxError(_) => AdlabError::bad_request("Invalid JSON body"),
            _ => AdlabError::bad_request("Invalid request body"),
        }
    }
}

impl From<QueryRejection> for AdlabError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected query string");
        AdlabError::bad_request("Invalid query parameters")
    }
}

impl IntoResponse for AdlabError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "Request rejected");
        }

        (status, Json(ApiErrorBody { error: message })).into_response()
    }
}

/// Error payload shared by every route: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}
