use crate::automation::HeadlineAutomation;
use crate::config::{Config, LibraryConfig};
use crate::error::AdlabError;
use crate::library::{Library, PageCache};
use crate::materials::MaterialService;
use crate::server::guards::auth::RequireKeyAuth;
use crate::server::routes;
use crate::upstream::{
    FirecrawlClient, KnowledgeClient, OcrClient, OpenaiClient, SupabaseClient, build_client,
};

use axum::{
    Json, Router,
    extract::Request,
    http::{HeaderName, Method, Version, header::USER_AGENT},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use base64::Engine as _;
use rand::RngCore;
use reqwest::header::HeaderValue;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info, warn};

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

#[derive(Clone)]
pub struct AdlabState {
    pub supabase: SupabaseClient,
    pub knowledge: KnowledgeClient,
    pub library: Library,
    pub library_cfg: LibraryConfig,
    pub automation: HeadlineAutomation,
    pub materials: MaterialService,
    pub api_key: Arc<str>,
}

impl AdlabState {
    pub fn new(cfg: &Config) -> Result<Self, AdlabError> {
        let client = build_client(&cfg.upstream);

        let openai = OpenaiClient::new(&cfg.openai, client.clone())?;
        let ocr = OcrClient::new(&cfg.ocr, client.clone())?;
        let firecrawl = FirecrawlClient::new(&cfg.firecrawl, client.clone())?;
        let supabase = SupabaseClient::new(&cfg.supabase, client.clone())?;
        let knowledge = KnowledgeClient::new(&cfg.knowledge, client)?;

        let cache = PageCache::new(Duration::from_secs(cfg.library.cache_ttl_secs));

        Ok(Self {
            library: Library::new(supabase.clone(), cache),
            library_cfg: cfg.library.clone(),
            automation: HeadlineAutomation::new(
                openai.clone(),
                ocr,
                supabase.clone(),
                cfg.automation.clone(),
            ),
            materials: MaterialService::new(firecrawl, openai, supabase.clone()),
            supabase,
            knowledge,
            api_key: Arc::from(cfg.basic.api_key.as_str()),
        })
    }
}

async fn not_found_handler() -> AdlabError {
    AdlabError::NotFound("Route".to_string())
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn access_log(req: Request, next: Next) -> Response {
    // Capture request metadata before moving `req` into the handler stack.
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(generate_request_id);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = start.elapsed().as_millis() as u64;
    let path = uri.path();
    let protocol = format_http_version(version);

    // For SSE responses `latency_ms` is time-to-first-byte, not the stream duration.
    if status.is_server_error() {
        error!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else if status.is_client_error() {
        warn!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else {
        info!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    }

    resp
}

/// Empty `allowed_origins` allows any origin.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

pub fn adlab_router(state: AdlabState, cors: CorsLayer) -> Router {
    let auth = middleware::from_extractor_with_state::<RequireKeyAuth, _>(state.clone());
    let api = routes::router().route_layer(auth);

    Router::new()
        .route("/health", get(health_handler))
        .merge(api)
        .fallback(not_found_handler)
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(access_log))
}
