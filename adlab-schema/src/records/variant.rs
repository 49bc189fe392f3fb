use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_id_lax;
use crate::ocr::BoundingBox;

/// Rewritten headline plus its predicted performance (`headline_variants`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineVariant {
    #[serde(
        default,
        deserialize_with = "deserialize_id_lax",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_id_lax",
        skip_serializing_if = "Option::is_none"
    )]
    pub ad_id: Option<String>,

    pub original_headline: String,

    pub new_headline: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,

    /// Where the original headline sits in the ad image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,

    #[serde(default)]
    pub metrics: VariantMetrics,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantMetrics {
    #[serde(default)]
    pub impressions: u64,

    #[serde(default)]
    pub clicks: u64,

    /// Click-through rate as a fraction, `clicks / impressions`.
    #[serde(default)]
    pub ctr: f64,

    #[serde(default)]
    pub conversions: u64,

    #[serde(default)]
    pub conversion_rate: f64,

    /// Model confidence in the prediction, `0.0..=1.0`.
    #[serde(default)]
    pub confidence: f64,
}

impl VariantMetrics {
    /// Clamp model output into a consistent shape: clicks never exceed impressions,
    /// conversions never exceed clicks, and the rates are recomputed from the counts.
    pub fn normalized(mut self) -> Self {
        self.clicks = self.clicks.min(self.impressions);
        self.conversions = self.conversions.min(self.clicks);
        self.ctr = ratio(self.clicks, self.impressions);
        self.conversion_rate = ratio(self.conversions, self.clicks);
        self.confidence = if self.confidence.is_finite() {
            self.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
