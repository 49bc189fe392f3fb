use serde::{Deserialize, Serialize};

/// Ad library listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryConfig {
    /// Lifetime of a cached page.
    /// TOML: `library.cache_ttl_secs`. Default: `30`.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// TOML: `library.default_page_size`. Default: `20`.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound for a client-supplied `pageSize`.
    /// TOML: `library.max_page_size`. Default: `100`.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// How extracted headlines are matched to OCR geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcilerKind {
    /// Ask the text model to merge both sources.
    #[default]
    Model,
    /// Deterministic fragment matching, no extra upstream call.
    Local,
}

/// Headline automation pipeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AutomationConfig {
    /// TOML: `automation.reconciler`. Default: `model`.
    #[serde(default)]
    pub reconciler: ReconcilerKind,

    /// Variants requested per headline when the client does not say.
    /// TOML: `automation.variants_per_headline`. Default: `3`.
    #[serde(default = "default_variants_per_headline")]
    pub variants_per_headline: u8,

    /// Pixel slack when checking that a merged box encloses an OCR fragment.
    /// TOML: `automation.enclosure_tolerance_px`. Default: `2.0`.
    #[serde(default = "default_enclosure_tolerance_px")]
    pub enclosure_tolerance_px: f64,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            reconciler: ReconcilerKind::default(),
            variants_per_headline: default_variants_per_headline(),
            enclosure_tolerance_px: default_enclosure_tolerance_px(),
        }
    }
}

fn default_cache_ttl_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    100
}

fn default_variants_per_headline() -> u8 {
    3
}

fn default_enclosure_tolerance_px() -> f64 {
    2.0
}
