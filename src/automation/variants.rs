use super::prompts;
use crate::error::AdlabError;
use crate::upstream::OpenaiClient;
use adlab_core::texts_match;
use adlab_schema::ocr::TextRegion;
use adlab_schema::openai::ChatMessage;
use adlab_schema::records::{ContentRule, HeadlineVariant, VariantMetrics};
use futures::future::try_join_all;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct VariantList {
    variants: Vec<DraftVariant>,
}

#[derive(Debug, Deserialize)]
struct DraftVariant {
    new_headline: String,
    rationale: String,
}

/// Rewrites for one located headline, metrics still empty.
pub async fn generate_variants(
    openai: &OpenaiClient,
    region: &TextRegion,
    count: u8,
    rules: &[ContentRule],
) -> Result<Vec<HeadlineVariant>, AdlabError> {
    let messages = vec![
        ChatMessage::system(prompts::VARIANTS_SYSTEM),
        ChatMessage::user(prompts::variants_user(&region.text, count, rules)),
    ];
    let list: VariantList = openai
        .structured(
            prompts::HEADLINE_VARIANTS,
            prompts::headline_variants_schema(),
            messages,
        )
        .await?;

    Ok(drafts_into_variants(region, list.variants, count))
}

fn drafts_into_variants(
    region: &TextRegion,
    drafts: Vec<DraftVariant>,
    count: u8,
) -> Vec<HeadlineVariant> {
    drafts
        .into_iter()
        .map(|d| (d.new_headline.trim().to_string(), d.rationale))
        .filter(|(text, _)| !text.is_empty() && !texts_match(text, &region.text))
        .take(usize::from(count))
        .map(|(new_headline, rationale)| HeadlineVariant {
            id: None,
            ad_id: None,
            original_headline: region.text.clone(),
            new_headline,
            rationale: Some(rationale).filter(|r| !r.trim().is_empty()),
            bounding_box: Some(region.bounding_box.clone()),
            metrics: VariantMetrics::default(),
            created_at: None,
        })
        .collect()
}

pub async fn predict_metrics(
    openai: &OpenaiClient,
    variant: &HeadlineVariant,
) -> Result<VariantMetrics, AdlabError> {
    let messages = vec![
        ChatMessage::system(prompts::METRICS_SYSTEM),
        ChatMessage::user(prompts::metrics_user(
            &variant.original_headline,
            &variant.new_headline,
        )),
    ];
    let metrics: VariantMetrics = openai
        .structured(
            prompts::VARIANT_METRICS,
            prompts::variant_metrics_schema(),
            messages,
        )
        .await?;
    Ok(metrics.normalized())
}

/// Generate variants for every region, then predict metrics for every variant.
///
/// Both fan-outs fail as a whole on the first error.
pub async fn variants_with_metrics(
    openai: &OpenaiClient,
    regions: &[TextRegion],
    count: u8,
    rules: &[ContentRule],
) -> Result<Vec<HeadlineVariant>, AdlabError> {
    let generated = try_join_all(
        regions
            .iter()
            .map(|region| generate_variants(openai, region, count, rules)),
    )
    .await?;
    let mut variants: Vec<HeadlineVariant> = generated.into_iter().flatten().collect();

    let metrics = try_join_all(variants.iter().map(|v| predict_metrics(openai, v))).await?;
    for (variant, metrics) in variants.iter_mut().zip(metrics) {
        variant.metrics = metrics;
    }
    Ok(variants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::reconcile::region_from_rect;
    use adlab_core::Rect;

    fn draft(text: &str, rationale: &str) -> DraftVariant {
        DraftVariant {
            new_headline: text.to_string(),
            rationale: rationale.to_string(),
        }
    }

    #[test]
    fn drafts_skip_echoes_and_respect_count() {
        let region = region_from_rect("Big Summer Sale", Rect::new(0.0, 0.0, 100.0, 20.0));
        let drafts = vec![
            draft("big summer sale!", "same"),
            draft(" Summer Savings Start Now ", "urgency"),
            draft("", "blank"),
            draft("Hot Deals All Season", " "),
            draft("Save Big This Summer", "benefit"),
        ];

        let variants = drafts_into_variants(&region, drafts, 2);
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].new_headline, "Summer Savings Start Now");
        assert_eq!(variants[0].original_headline, "Big Summer Sale");
        assert_eq!(variants[0].bounding_box.as_ref(), Some(&region.bounding_box));
        assert_eq!(variants[1].rationale, None);
    }
}
