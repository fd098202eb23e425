use std::cmp;
use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use url::Url;

use crate::config::{CrawlerConfig, ExtractorMode};
use crate::extract::{BrowserExtractor, LinkExtractor, StaticExtractor};
use crate::frontier::Frontier;
use crate::scope::Scope;
use crate::sink::{DiagnosticSink, LogSink};

/// What a finished crawl produced.
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Every page that was fetched, in normalized absolute form.
    pub visited: HashSet<String>,
    /// Pages whose fetch or parse failed. Never retried.
    pub invalid_urls: Vec<String>,
}

/// Walks every page reachable from a root URL within a single site,
/// visiting each discovered in-scope URL exactly once.
pub struct DomainCrawler {
    frontier: Frontier,
    extractor: Arc<dyn LinkExtractor>,
    diagnostics: Arc<dyn DiagnosticSink>,
    concurrent_fetches: usize,
    invalid_urls: Vec<String>,
}

impl std::fmt::Debug for DomainCrawler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainCrawler")
            .field("concurrent_fetches", &self.concurrent_fetches)
            .field("invalid_urls", &self.invalid_urls)
            .finish_non_exhaustive()
    }
}

impl DomainCrawler {
    /// Builds a crawler for `root_url` with the extractor `conf.mode` asks
    /// for. Browser mode requires a live page handle up front; requesting it
    /// without one fails here, before anything is fetched.
    pub fn new(
        root_url: &str,
        conf: &CrawlerConfig,
        browser: Option<chromiumoxide::Page>,
    ) -> Result<Self> {
        let extractor: Arc<dyn LinkExtractor> = match conf.mode {
            ExtractorMode::Static => Arc::new(StaticExtractor::new(&conf.user_agent)),
            ExtractorMode::Browser => {
                let page = browser
                    .ok_or_else(|| anyhow!("browser mode requires a browser page handle"))?;
                Arc::new(BrowserExtractor::new(page))
            }
        };
        Self::with_extractor(root_url, conf, extractor)
    }

    /// Same as [`new`](Self::new) but with a caller-supplied extractor.
    pub fn with_extractor(
        root_url: &str,
        conf: &CrawlerConfig,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Result<Self> {
        let root =
            Url::parse(root_url).with_context(|| format!("invalid root URL `{root_url}`"))?;
        let scope = Scope::new(root_url, conf.exclusion_list.clone());
        Ok(Self {
            frontier: Frontier::new(root, scope),
            extractor,
            diagnostics: Arc::new(LogSink),
            concurrent_fetches: cmp::max(1, conf.concurrent_fetches),
            invalid_urls: Vec::new(),
        })
    }

    /// Replaces the warning sink.
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Runs the crawl to completion: the frontier is empty and no extraction
    /// is in flight. A page whose extraction fails is recorded and skipped;
    /// it never aborts the rest of the traversal.
    pub async fn run(mut self) -> Result<CrawlOutcome> {
        let mut in_flight = FuturesUnordered::new();
        loop {
            // The frontier and both sets are only touched here, so the
            // novelty check and the queue insertion cannot race.
            while in_flight.len() < self.concurrent_fetches {
                let Some(url) = self.frontier.pop_next() else {
                    break;
                };
                let extractor = self.extractor.clone();
                in_flight.push(async move {
                    let links = extractor.extract_links(&url).await;
                    (url, links)
                });
            }
            let Some((url, links)) = in_flight.next().await else {
                break;
            };
            match links {
                Ok(hrefs) => {
                    for href in hrefs {
                        if href.is_empty() {
                            continue;
                        }
                        self.frontier.consider(&href);
                    }
                }
                Err(e) => {
                    self.diagnostics
                        .warn(&format!("{url} might be an invalid URL: {e}"));
                    self.invalid_urls.push(url);
                }
            }
        }

        if self.frontier.visited().is_empty() {
            bail!("no URLs found during traversal, the domain name might be invalid");
        }

        Ok(CrawlOutcome {
            visited: self.frontier.into_visited(),
            invalid_urls: self.invalid_urls,
        })
    }
}
