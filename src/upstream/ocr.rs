use crate::config::OcrConfig;
use crate::error::AdlabError;
use adlab_schema::ocr::{OcrDetectRequest, TextRegion};
use std::time::Instant;
use tracing::info;
use url::Url;

use super::{endpoint, ensure_success};

/// Text detector returning pixel-space regions for an image URL.
#[derive(Clone)]
pub struct OcrClient {
    client: reqwest::Client,
    detect_url: Url,
}

impl OcrClient {
    pub fn new(cfg: &OcrConfig, client: reqwest::Client) -> Result<Self, AdlabError> {
        Ok(Self {
            client,
            detect_url: endpoint(&cfg.base_url, "ocr/detect")?,
        })
    }

    pub async fn detect(&self, image_url: &str) -> Result<Vec<TextRegion>, AdlabError> {
        let start = Instant::now();
        let resp = self
            .client
            .post(self.detect_url.clone())
            .json(&OcrDetectRequest {
                image_url: image_url.to_string(),
            })
            .send()
            .await?;
        let regions: Vec<TextRegion> = ensure_success("ocr", resp).await?.json().await?;

        info!(
            channel = "ocr",
            regions = regions.len(),
            took_ms = start.elapsed().as_millis() as u64,
            "[OCR] Detected text regions"
        );
        Ok(regions)
    }
}
