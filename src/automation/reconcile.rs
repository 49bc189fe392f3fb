//! Merge vision headlines (trusted text) with OCR fragments (trusted geometry).

use super::prompts;
use crate::config::ReconcilerKind;
use crate::error::AdlabError;
use crate::upstream::OpenaiClient;
use adlab_core::{Rect, fragment_matches, outer_rect, texts_match};
use adlab_schema::ocr::{BoundingBox, TextRegion};
use adlab_schema::openai::ChatMessage;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ReconciledRegions {
    regions: Vec<TextRegion>,
}

pub fn region_rect(region: &TextRegion) -> Option<Rect> {
    Rect::from_points(region.bounding_box.corners())
}

/// Axis-aligned region for `rect` with every derived field computed from the corners.
pub fn region_from_rect(text: impl Into<String>, rect: Rect) -> TextRegion {
    TextRegion {
        text: text.into(),
        bounding_box: BoundingBox {
            top_left: [rect.left, rect.top],
            top_right: [rect.right, rect.top],
            bottom_right: [rect.right, rect.bottom],
            bottom_left: [rect.left, rect.bottom],
            center: rect.center(),
            width: rect.width(),
            height: rect.height(),
        },
        area: rect.area(),
        aspect_ratio: rect.aspect_ratio(),
    }
}

/// Run the configured reconciler, then [`enforce`] its output.
pub async fn reconcile(
    kind: ReconcilerKind,
    openai: &OpenaiClient,
    headlines: &[String],
    fragments: &[TextRegion],
    tolerance: f64,
) -> Result<Vec<TextRegion>, AdlabError> {
    let candidates = match kind {
        ReconcilerKind::Model => reconcile_with_model(openai, headlines, fragments).await?,
        ReconcilerKind::Local => reconcile_local(headlines, fragments),
    };
    let proposed = candidates.len();
    let regions = enforce(candidates, headlines, fragments, tolerance);
    debug!(
        reconciler = ?kind,
        headlines = headlines.len(),
        fragments = fragments.len(),
        proposed,
        kept = regions.len(),
        "Reconciled headline regions"
    );
    Ok(regions)
}

pub async fn reconcile_with_model(
    openai: &OpenaiClient,
    headlines: &[String],
    fragments: &[TextRegion],
) -> Result<Vec<TextRegion>, AdlabError> {
    let sources = json!({
        "source_1_headlines": headlines,
        "source_2_ocr_fragments": fragments,
    });
    let messages = vec![
        ChatMessage::system(prompts::RECONCILE_SYSTEM),
        ChatMessage::user(serde_json::to_string(&sources)?),
    ];
    let out: ReconciledRegions = openai
        .structured(
            prompts::RECONCILED_REGIONS,
            prompts::reconciled_regions_schema(),
            messages,
        )
        .await?;
    Ok(out.regions)
}

/// Union the boxes of every fragment whose text belongs to each headline.
pub fn reconcile_local(headlines: &[String], fragments: &[TextRegion]) -> Vec<TextRegion> {
    headlines
        .iter()
        .filter_map(|headline| {
            let rect = outer_rect(
                fragments
                    .iter()
                    .filter(|f| fragment_matches(&f.text, headline))
                    .filter_map(region_rect),
            )?;
            Some(region_from_rect(headline.as_str(), rect))
        })
        .collect()
}

/// Keep only candidates that name a known headline and whose box encloses an OCR fragment.
///
/// Text is rewritten to the headline's spelling, derived geometry is recomputed and each
/// headline appears at most once.
pub fn enforce(
    candidates: Vec<TextRegion>,
    headlines: &[String],
    fragments: &[TextRegion],
    tolerance: f64,
) -> Vec<TextRegion> {
    let fragment_rects: Vec<Rect> = fragments.iter().filter_map(region_rect).collect();
    let mut placed = HashSet::new();

    candidates
        .into_iter()
        .filter_map(|candidate| {
            let Some((idx, headline)) = headlines
                .iter()
                .enumerate()
                .find(|(_, h)| texts_match(&candidate.text, h))
            else {
                debug!(text = %candidate.text, "Dropping region with unknown text");
                return None;
            };
            let rect = region_rect(&candidate)?;
            if !fragment_rects.iter().any(|f| rect.encloses(f, tolerance)) {
                debug!(text = %candidate.text, "Dropping region that encloses no OCR fragment");
                return None;
            }
            placed
                .insert(idx)
                .then(|| region_from_rect(headline.as_str(), rect))
        })
        .collect()
}
