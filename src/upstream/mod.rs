//! Clients for the hosted services this backend delegates to.

pub mod firecrawl;
pub mod knowledge;
pub mod ocr;
pub mod openai;
pub mod supabase;

pub use firecrawl::FirecrawlClient;
pub use knowledge::KnowledgeClient;
pub use ocr::OcrClient;
pub use openai::OpenaiClient;
pub use supabase::SupabaseClient;

use crate::config::UpstreamDefaults;
use crate::error::AdlabError;
use crate::utils::logging::body_preview;
use reqwest::header::{CONNECTION, HeaderMap, HeaderValue};
use std::time::Duration;
use url::Url;

pub const ADLAB_USER_AGENT: &str = concat!("adlab/", env!("CARGO_PKG_VERSION"));

/// Shared reqwest client for every upstream.
pub fn build_client(defaults: &UpstreamDefaults) -> reqwest::Client {
    let mut headers = HeaderMap::new();

    let mut builder = reqwest::Client::builder()
        .user_agent(ADLAB_USER_AGENT)
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(Duration::from_secs(defaults.connect_timeout_secs))
        .timeout(Duration::from_secs(defaults.timeout_secs));

    builder = match defaults.proxy.as_ref() {
        Some(proxy_url) => {
            let proxy = reqwest::Proxy::all(proxy_url.as_str())
                .expect("invalid proxy url for reqwest client");
            builder.proxy(proxy)
        }
        // Only the configured proxy is honoured; ambient HTTP(S)_PROXY is ignored.
        None => builder.no_proxy(),
    };

    if !defaults.enable_multiplexing {
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        builder = builder
            .http1_only()
            .pool_max_idle_per_host(0)
            .pool_idle_timeout(Duration::from_secs(0));
    } else {
        builder = builder.http2_adaptive_window(true);
    }

    builder
        .default_headers(headers)
        .build()
        .expect("failed to build reqwest client")
}

/// Appends `path` to `base`, keeping any path prefix on `base` (`/v1`, `/rest/v1`, ...).
pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut joined = base.as_str().trim_end_matches('/').to_string();
    joined.push('/');
    joined.push_str(path.trim_start_matches('/'));
    Url::parse(&joined)
}

/// Passes 2xx responses through; anything else becomes [`AdlabError::UpstreamStatus`].
pub(crate) async fn ensure_success(
    service: &'static str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, AdlabError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = match resp.bytes().await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => format!("<failed to read body: {e}>"),
    };

    tracing::debug!(
        service,
        %status,
        body = %body_preview(&body),
        "[{service}] Upstream error response"
    );

    Err(AdlabError::UpstreamStatus {
        service,
        status,
        body,
    })
}
