//! Firecrawl v1 crawl API (`POST /v1/crawl`, `GET /v1/crawl/{id}`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlRequest {
    pub url: String,

    /// Maximum number of pages to crawl.
    pub limit: u32,

    #[serde(rename = "scrapeOptions")]
    pub scrape_options: ScrapeOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeOptions {
    pub formats: Vec<String>,

    #[serde(rename = "onlyMainContent", skip_serializing_if = "Option::is_none")]
    pub only_main_content: Option<bool>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            formats: vec!["markdown".to_string()],
            only_main_content: Some(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSubmitResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlStatus {
    Scraping,
    Completed,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlStatusResponse {
    pub status: CrawlStatus,

    #[serde(default)]
    pub total: u32,

    #[serde(default)]
    pub completed: u32,

    #[serde(default)]
    pub data: Vec<CrawlPage>,

    /// Present when the result set is paginated; fetch it for the remaining pages.
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlPage {
    #[serde(default)]
    pub markdown: Option<String>,

    #[serde(default)]
    pub metadata: PageMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMetadata {
    #[serde(default, rename = "sourceURL")]
    pub source_url: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}
