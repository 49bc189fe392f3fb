use serde::{Deserialize, Serialize};
use url::Url;

/// HTTP client settings shared by every upstream client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamDefaults {
    /// Optional upstream HTTP proxy. If set, used for reqwest clients.
    /// TOML: `upstream.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// Allow HTTP/2 multiplexing for reqwest clients; disabled forces HTTP/1.
    /// TOML: `upstream.enable_multiplexing`. Default: `false`.
    #[serde(default)]
    pub enable_multiplexing: bool,

    /// TOML: `upstream.connect_timeout_secs`. Default: `10`.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout, streaming bodies included.
    /// TOML: `upstream.timeout_secs`. Default: `600`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamDefaults {
    fn default() -> Self {
        Self {
            proxy: None,
            enable_multiplexing: false,
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// OpenAI chat completions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenaiConfig {
    /// TOML: `openai.base_url`. Default: `https://api.openai.com/v1`.
    #[serde(default = "default_openai_base_url")]
    pub base_url: Url,

    /// TOML: `openai.api_key`. Env: `ADLAB_OPENAI__API_KEY`.
    #[serde(default)]
    pub api_key: String,

    /// Model used for every structured-output call.
    /// TOML: `openai.model`. Default: `gpt-4o-mini`.
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// TOML: `openai.temperature`. Default: unset (model default).
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for OpenaiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            api_key: String::new(),
            model: default_openai_model(),
            temperature: None,
        }
    }
}

/// OCR detection service (`POST {base_url}/ocr/detect`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OcrConfig {
    /// TOML: `ocr.base_url`. Default: `http://127.0.0.1:8000`.
    #[serde(default = "default_local_backend_url")]
    pub base_url: Url,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            base_url: default_local_backend_url(),
        }
    }
}

/// Firecrawl crawl API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FirecrawlConfig {
    /// TOML: `firecrawl.base_url`. Default: `https://api.firecrawl.dev`.
    #[serde(default = "default_firecrawl_base_url")]
    pub base_url: Url,

    /// TOML: `firecrawl.api_key`. Env: `ADLAB_FIRECRAWL__API_KEY`.
    #[serde(default)]
    pub api_key: String,

    /// Maximum pages per crawl.
    /// TOML: `firecrawl.page_limit`. Default: `10`.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Fixed delay between status polls.
    /// TOML: `firecrawl.poll_interval_ms`. Default: `2000`.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// TOML: `firecrawl.max_poll_attempts`. Default: `30`.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: usize,
}

impl Default for FirecrawlConfig {
    fn default() -> Self {
        Self {
            base_url: default_firecrawl_base_url(),
            api_key: String::new(),
            page_limit: default_page_limit(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

/// Supabase project (PostgREST under `{url}/rest/v1`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SupabaseConfig {
    /// TOML: `supabase.url`. Default: `http://127.0.0.1:54321`.
    #[serde(default = "default_supabase_url")]
    pub url: Url,

    /// Sent as both `apikey` and bearer token.
    /// TOML: `supabase.service_key`. Env: `ADLAB_SUPABASE__SERVICE_KEY`.
    #[serde(default)]
    pub service_key: String,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: default_supabase_url(),
            service_key: String::new(),
        }
    }
}

/// Knowledge backend proxied by `/api/knowledge/*`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeConfig {
    /// TOML: `knowledge.base_url`. Default: `http://127.0.0.1:8000`.
    #[serde(default = "default_local_backend_url")]
    pub base_url: Url,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_local_backend_url(),
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_timeout_secs() -> u64 {
    10 * 60
}

fn default_openai_base_url() -> Url {
    Url::parse("https://api.openai.com/v1").expect("valid OpenAI base URL")
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_local_backend_url() -> Url {
    Url::parse("http://127.0.0.1:8000").expect("valid local backend URL")
}

fn default_firecrawl_base_url() -> Url {
    Url::parse("https://api.firecrawl.dev").expect("valid Firecrawl base URL")
}

fn default_supabase_url() -> Url {
    Url::parse("http://127.0.0.1:54321").expect("valid Supabase URL")
}

fn default_page_limit() -> u32 {
    10
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_poll_attempts() -> usize {
    30
}
