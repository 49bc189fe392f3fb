//! Brand materials: crawl a site, have the model summarize it into content rules, store it.

use crate::automation::prompts;
use crate::error::AdlabError;
use crate::upstream::supabase::tables;
use crate::upstream::{FirecrawlClient, OpenaiClient, SupabaseClient};
use adlab_schema::firecrawl::CrawlPage;
use adlab_schema::openai::ChatMessage;
use adlab_schema::records::{BrandMaterial, ContentRule, MaterialType};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// Upper bound on markdown sent to the model, in chars.
pub const MAX_ANALYSIS_CHARS: usize = 48_000;

/// `POST /api/materials` body.
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialRequest {
    pub url: String,

    #[serde(default)]
    pub material_type: MaterialType,

    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MaterialAnalysis {
    summary: String,
    content_rules: Vec<ContentRule>,
}

/// Pages of one crawl folded into a single document.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlDigest {
    pub markdown: String,
    pub crawled_urls: Vec<String>,
}

#[derive(Clone)]
pub struct MaterialService {
    firecrawl: FirecrawlClient,
    openai: OpenaiClient,
    supabase: SupabaseClient,
}

impl MaterialService {
    pub fn new(firecrawl: FirecrawlClient, openai: OpenaiClient, supabase: SupabaseClient) -> Self {
        Self {
            firecrawl,
            openai,
            supabase,
        }
    }

    pub async fn create(&self, req: MaterialRequest) -> Result<BrandMaterial, AdlabError> {
        let url = req.url.trim();
        if url.is_empty() {
            return Err(AdlabError::bad_request("url is required"));
        }
        url::Url::parse(url).map_err(|_| AdlabError::bad_request("url is not a valid URL"))?;

        let pages = self.firecrawl.crawl(url).await?;
        let digest = digest_pages(url, &pages);
        if digest.markdown.is_empty() {
            return Err(AdlabError::Crawl(format!("crawl of {url} returned no content")));
        }

        let messages = vec![
            ChatMessage::system(prompts::MATERIAL_SYSTEM),
            ChatMessage::user(prompts::material_user(url, &digest.markdown)),
        ];
        let analysis: MaterialAnalysis = self
            .openai
            .structured(
                prompts::MATERIAL_ANALYSIS,
                prompts::material_analysis_schema(),
                messages,
            )
            .await?;
        if analysis.content_rules.is_empty() {
            warn!(url, "Material analysis produced no content rules");
        }

        let material = BrandMaterial {
            id: None,
            user_id: req.user_id,
            url: url.to_string(),
            material_type: req.material_type,
            summary: analysis.summary,
            content_rules: analysis.content_rules,
            crawled_urls: digest.crawled_urls,
            created_at: None,
        };

        let stored: Vec<BrandMaterial> = self
            .supabase
            .insert(tables::BRAND_MATERIALS, &material)
            .await?;

        info!(
            url,
            material_type = material.material_type.as_str(),
            pages = pages.len(),
            rules = material.content_rules.len(),
            "Stored brand material"
        );

        Ok(stored.into_iter().next().unwrap_or(material))
    }
}

/// Join page markdown under per-page headings and list the distinct source URLs.
///
/// Falls back to `url` when no page reports where it came from.
pub fn digest_pages(url: &str, pages: &[CrawlPage]) -> CrawlDigest {
    let mut seen = HashSet::new();
    let crawled_urls: Vec<String> = pages
        .iter()
        .filter_map(|p| p.metadata.source_url.as_deref())
        .filter(|u| seen.insert(*u))
        .map(str::to_string)
        .collect();

    let sections: Vec<String> = pages
        .iter()
        .filter_map(|page| {
            let body = page.markdown.as_deref().map(str::trim).filter(|b| !b.is_empty())?;
            let heading = page
                .metadata
                .title
                .as_deref()
                .or(page.metadata.source_url.as_deref())
                .unwrap_or(url);
            Some(format!("## {heading}\n\n{body}"))
        })
        .collect();

    CrawlDigest {
        markdown: truncate_chars(&sections.join("\n\n"), MAX_ANALYSIS_CHARS).to_string(),
        crawled_urls: if crawled_urls.is_empty() {
            vec![url.to_string()]
        } else {
            crawled_urls
        },
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(url: Option<&str>, title: Option<&str>, markdown: &str) -> CrawlPage {
        serde_json::from_value(json!({
            "markdown": markdown,
            "metadata": {"sourceURL": url, "title": title}
        }))
        .expect("crawl page json")
    }

    #[test]
    fn digest_lists_each_source_once() {
        let pages = vec![
            page(Some("https://acme.test/"), Some("Home"), "# Acme\nWe sell anvils."),
            page(Some("https://acme.test/brand"), None, "Voice: bold."),
            page(Some("https://acme.test/"), Some("Home"), "duplicate"),
            page(None, None, "   "),
        ];
        let digest = digest_pages("https://acme.test", &pages);
        assert_eq!(
            digest.crawled_urls,
            vec!["https://acme.test/", "https://acme.test/brand"]
        );
        assert!(digest.markdown.starts_with("## Home\n\n# Acme"));
        assert!(digest.markdown.contains("## https://acme.test/brand\n\nVoice: bold."));
    }

    #[test]
    fn digest_falls_back_to_requested_url() {
        let digest = digest_pages("https://acme.test", &[page(None, None, "text")]);
        assert_eq!(digest.crawled_urls, vec!["https://acme.test"]);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("ñandú", 3), "ñan");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
