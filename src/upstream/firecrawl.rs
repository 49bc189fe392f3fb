use crate::config::FirecrawlConfig;
use crate::error::AdlabError;
use adlab_schema::firecrawl::{
    CrawlPage, CrawlRequest, CrawlStatus, CrawlStatusResponse, CrawlSubmitResponse, ScrapeOptions,
};
use backon::{ConstantBuilder, Retryable};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

use super::{endpoint, ensure_success};

/// Submit-then-poll crawler client.
#[derive(Clone)]
pub struct FirecrawlClient {
    client: reqwest::Client,
    crawl_url: Url,
    api_key: Arc<str>,
    page_limit: u32,
    poll_interval: Duration,
    max_poll_attempts: usize,
}

/// Outcome of one status poll that did not produce pages.
#[derive(Debug)]
enum PollError {
    Pending { completed: u32, total: u32 },
    Fatal(AdlabError),
}

impl FirecrawlClient {
    pub fn new(cfg: &FirecrawlConfig, client: reqwest::Client) -> Result<Self, AdlabError> {
        Ok(Self {
            client,
            crawl_url: endpoint(&cfg.base_url, "v1/crawl")?,
            api_key: Arc::from(cfg.api_key.as_str()),
            page_limit: cfg.page_limit.max(1),
            poll_interval: Duration::from_millis(cfg.poll_interval_ms),
            max_poll_attempts: cfg.max_poll_attempts.max(1),
        })
    }

    /// Fixed delay between polls; the first poll runs immediately.
    fn poll_policy(&self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.poll_interval)
            .with_max_times(self.max_poll_attempts - 1)
    }

    /// `POST /v1/crawl`, returning the crawl job id.
    pub async fn submit(&self, url: &str) -> Result<String, AdlabError> {
        let body = CrawlRequest {
            url: url.to_string(),
            limit: self.page_limit,
            scrape_options: ScrapeOptions::default(),
        };

        let resp = self
            .client
            .post(self.crawl_url.clone())
            .bearer_auth(self.api_key.as_ref())
            .json(&body)
            .send()
            .await?;
        let submitted: CrawlSubmitResponse = ensure_success("firecrawl", resp).await?.json().await?;

        match submitted.id {
            Some(id) if submitted.success && !id.is_empty() => Ok(id),
            _ => Err(AdlabError::Crawl(format!(
                "crawl submission for {url} rejected: {}",
                submitted.error.as_deref().unwrap_or("no crawl id returned")
            ))),
        }
    }

    async fn fetch_status(&self, url: &Url) -> Result<CrawlStatusResponse, AdlabError> {
        let resp = self
            .client
            .get(url.clone())
            .bearer_auth(self.api_key.as_ref())
            .send()
            .await?;
        Ok(ensure_success("firecrawl", resp).await?.json().await?)
    }

    /// Crawl `url` and wait for the job to finish, following paginated results.
    pub async fn crawl(&self, url: &str) -> Result<Vec<CrawlPage>, AdlabError> {
        let start = Instant::now();
        let id = self.submit(url).await?;
        let status_url = endpoint(&self.crawl_url, &id)?;

        let poll = || {
            let status_url = status_url.clone();
            async move {
                let status = self
                    .fetch_status(&status_url)
                    .await
                    .map_err(PollError::Fatal)?;
                match status.status {
                    CrawlStatus::Completed => Ok(status),
                    CrawlStatus::Failed | CrawlStatus::Cancelled => {
                        Err(PollError::Fatal(AdlabError::Crawl(format!(
                            "crawl {status_url} ended with status {:?}",
                            status.status
                        ))))
                    }
                    CrawlStatus::Scraping | CrawlStatus::Unknown => Err(PollError::Pending {
                        completed: status.completed,
                        total: status.total,
                    }),
                }
            }
        };

        let result = poll
            .retry(self.poll_policy())
            .when(|err: &PollError| matches!(err, PollError::Pending { .. }))
            .notify(|err: &PollError, dur: Duration| {
                if let PollError::Pending { completed, total } = err {
                    debug!(
                        crawl.id = %id,
                        completed,
                        total,
                        "[Firecrawl] Crawl still running, polling again in {:?}",
                        dur
                    );
                }
            })
            .await;

        let mut status = match result {
            Ok(status) => status,
            Err(PollError::Fatal(err)) => return Err(err),
            Err(PollError::Pending { completed, total }) => {
                return Err(AdlabError::Crawl(format!(
                    "crawl {id} unfinished after {} polls ({completed}/{total} pages)",
                    self.max_poll_attempts
                )));
            }
        };

        let mut pages = std::mem::take(&mut status.data);
        let mut next = status.next.take();
        let mut followed = 0;
        while let Some(next_url) = next.take() {
            if pages.len() >= self.page_limit as usize {
                break;
            }
            if followed == self.max_poll_attempts {
                return Err(AdlabError::Crawl(format!(
                    "crawl {id} still paginating after {followed} result pages"
                )));
            }
            followed += 1;

            let next_url = self.same_origin(&next_url)?;
            let mut more = self.fetch_status(&next_url).await?;
            if more.data.is_empty() {
                debug!(crawl.id = %id, "[Firecrawl] Empty result page, ignoring further links");
                break;
            }
            pages.append(&mut more.data);
            next = more.next.take();
        }

        info!(
            channel = "firecrawl",
            crawl.id = %id,
            pages = pages.len(),
            took_ms = start.elapsed().as_millis() as u64,
            "[Firecrawl] Crawl completed"
        );
        Ok(pages)
    }

    /// Pagination links carry our bearer token, so they must point back at the crawl API.
    fn same_origin(&self, next: &str) -> Result<Url, AdlabError> {
        let url = Url::parse(next)?;
        if url.origin() == self.crawl_url.origin() {
            Ok(url)
        } else {
            Err(AdlabError::Crawl(format!(
                "refusing pagination link to foreign origin: {next}"
            )))
        }
    }
}
