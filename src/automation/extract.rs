use super::prompts;
use crate::error::AdlabError;
use crate::upstream::OpenaiClient;
use adlab_core::normalize_text;
use adlab_schema::openai::ChatMessage;
use adlab_schema::records::ContentRule;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
struct HeadlineList {
    headlines: Vec<String>,
}

/// Vision pass: headline texts as written in the image, without coordinates.
pub async fn extract_headlines(
    openai: &OpenaiClient,
    image_url: &str,
    rules: &[ContentRule],
) -> Result<Vec<String>, AdlabError> {
    let messages = vec![
        ChatMessage::system(prompts::EXTRACT_SYSTEM),
        ChatMessage::user_with_image(prompts::extract_user(rules), image_url),
    ];
    let list: HeadlineList = openai
        .structured(
            prompts::HEADLINE_LIST,
            prompts::headline_list_schema(),
            messages,
        )
        .await?;
    Ok(dedup_headlines(list.headlines))
}

/// Trims, drops blanks and keeps the first of any normalized duplicates.
pub(crate) fn dedup_headlines(headlines: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    headlines
        .into_iter()
        .map(|h| h.trim().to_string())
        .filter(|h| {
            let key = normalize_text(h);
            !key.is_empty() && seen.insert(key)
        })
        .collect()
}
