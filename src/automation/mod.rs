//! Headline automation: find headlines in an ad image, locate them, rewrite them.

pub mod extract;
pub mod prompts;
pub mod reconcile;
pub mod variants;

use crate::config::AutomationConfig;
use crate::error::{AdlabError, NO_HEADLINES_MESSAGE};
use crate::upstream::supabase::tables;
use crate::upstream::{OcrClient, OpenaiClient, SupabaseClient};
use adlab_schema::ocr::TextRegion;
use adlab_schema::records::{ContentRule, HeadlineVariant};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

const MAX_VARIANT_COUNT: u8 = 10;

/// `POST /api/automations/headlines` body.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlineRequest {
    pub image_url: String,

    #[serde(default)]
    pub content_rules: Vec<ContentRule>,

    /// When set, generated variants are stored against this ad.
    #[serde(default)]
    pub ad_id: Option<String>,

    #[serde(default)]
    pub variant_count: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadlineRun {
    pub headlines: Vec<TextRegion>,
    pub variants: Vec<HeadlineVariant>,
}

#[derive(Clone)]
pub struct HeadlineAutomation {
    openai: OpenaiClient,
    ocr: OcrClient,
    supabase: SupabaseClient,
    cfg: AutomationConfig,
}

impl HeadlineAutomation {
    pub fn new(
        openai: OpenaiClient,
        ocr: OcrClient,
        supabase: SupabaseClient,
        cfg: AutomationConfig,
    ) -> Self {
        Self {
            openai,
            ocr,
            supabase,
            cfg,
        }
    }

    pub async fn run(&self, req: HeadlineRequest) -> Result<HeadlineRun, AdlabError> {
        let image_url = req.image_url.trim();
        if image_url.is_empty() {
            return Err(AdlabError::bad_request("image_url is required"));
        }
        let count = req
            .variant_count
            .unwrap_or(self.cfg.variants_per_headline)
            .clamp(1, MAX_VARIANT_COUNT);
        let start = Instant::now();

        let (headlines, fragments) = tokio::try_join!(
            extract::extract_headlines(&self.openai, image_url, &req.content_rules),
            self.ocr.detect(image_url),
        )?;
        if headlines.is_empty() {
            return Err(AdlabError::bad_request(NO_HEADLINES_MESSAGE));
        }

        let regions = reconcile::reconcile(
            self.cfg.reconciler,
            &self.openai,
            &headlines,
            &fragments,
            self.cfg.enclosure_tolerance_px,
        )
        .await?;

        let mut variants =
            variants::variants_with_metrics(&self.openai, &regions, count, &req.content_rules)
                .await?;

        let mut persisted = false;
        if let Some(ad_id) = req.ad_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            for variant in &mut variants {
                variant.ad_id = Some(ad_id.to_string());
            }
            if !variants.is_empty() {
                variants = self
                    .supabase
                    .insert(tables::HEADLINE_VARIANTS, &variants)
                    .await?;
                persisted = true;
            }
        }

        info!(
            headlines = headlines.len(),
            ocr_fragments = fragments.len(),
            located = regions.len(),
            variants = variants.len(),
            persisted,
            took_ms = start.elapsed().as_millis() as u64,
            "Headline automation finished"
        );

        Ok(HeadlineRun {
            headlines: regions,
            variants,
        })
    }
}
