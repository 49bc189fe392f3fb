mod basic;
mod pipeline;
mod upstreams;

pub use basic::BasicConfig;
pub use pipeline::{AutomationConfig, LibraryConfig, ReconcilerKind};
pub use upstreams::{
    FirecrawlConfig, KnowledgeConfig, OcrConfig, OpenaiConfig, SupabaseConfig, UpstreamDefaults,
};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Shared HTTP client settings for every upstream (see `upstream` table).
    #[serde(default)]
    pub upstream: UpstreamDefaults,

    #[serde(default)]
    pub openai: OpenaiConfig,

    #[serde(default)]
    pub ocr: OcrConfig,

    #[serde(default)]
    pub firecrawl: FirecrawlConfig,

    #[serde(default)]
    pub supabase: SupabaseConfig,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Ad library listing and its page cache.
    #[serde(default)]
    pub library: LibraryConfig,

    /// Headline automation pipeline.
    #[serde(default)]
    pub automation: AutomationConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Environment overrides: `ADLAB_OPENAI__API_KEY` sets `openai.api_key`.
const ENV_PREFIX: &str = "ADLAB_";

impl Config {
    /// Builds a Figment that merges defaults, an optional config TOML file and `ADLAB_*`
    /// environment variables, in that order of precedence.
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment.merge(Toml::file(DEFAULT_CONFIG_FILE))
        } else {
            figment
        };
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads configuration without validating required fields.
    pub fn load() -> Self {
        Self::figment()
            .extract()
            .unwrap_or_else(|err| panic!("failed to extract configuration: {err}"))
    }

    /// Loads configuration and validates the fields the server cannot run without.
    pub fn load_validated() -> Self {
        let cfg = Self::load();
        if cfg.basic.api_key.trim().is_empty() {
            panic!("basic.api_key must be set and non-empty");
        }
        if cfg.openai.api_key.trim().is_empty() {
            panic!("openai.api_key must be set and non-empty");
        }
        if cfg.supabase.service_key.trim().is_empty() {
            panic!("supabase.service_key must be set and non-empty");
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_figment() {
        let cfg: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .extract()
            .expect("defaults must extract");
        assert_eq!(cfg.basic.listen_port, 8188);
        assert_eq!(cfg.library.cache_ttl_secs, 30);
        assert_eq!(cfg.firecrawl.max_poll_attempts, 30);
        assert_eq!(cfg.automation.reconciler, ReconcilerKind::Model);
    }

    #[test]
    fn toml_overrides_nested_tables() {
        let cfg: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                r#"
                [basic]
                api_key = 12345

                [automation]
                reconciler = "local"

                [firecrawl]
                poll_interval_ms = 250
                "#,
            ))
            .extract()
            .expect("toml must extract");
        assert_eq!(cfg.basic.api_key, "12345");
        assert_eq!(cfg.automation.reconciler, ReconcilerKind::Local);
        assert_eq!(cfg.firecrawl.poll_interval_ms, 250);
        assert_eq!(cfg.firecrawl.page_limit, 10);
    }
}
