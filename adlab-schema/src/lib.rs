pub mod firecrawl;
pub mod knowledge;
pub mod ocr;
pub mod openai;
pub mod records;

pub use firecrawl::{CrawlPage, CrawlRequest, CrawlStatus, CrawlStatusResponse, CrawlSubmitResponse};
pub use knowledge::{
    AdElement, KeywordData, KnowledgeAnswer, KnowledgeChunk, KnowledgeQuery, MarketInsightRequest,
    VariantInput,
};
pub use ocr::{BoundingBox, OcrDetectRequest, TextRegion};
pub use openai::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat};
pub use records::{
    AdRecord, Automation, AutomationStatus, BrandMaterial, ContentRule, ContentRulePatch,
    HeadlineVariant, MaterialType, VariantMetrics,
};
