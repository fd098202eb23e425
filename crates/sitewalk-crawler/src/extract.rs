use anyhow::{bail, Result};
use async_trait::async_trait;
use chromiumoxide::Page;
use lazy_static::lazy_static;
use reqwest::header::USER_AGENT;
use scraper::{Html, Selector};
use tokio::sync::Mutex;

lazy_static! {
    static ref HTTP_CLI: reqwest::Client = reqwest::ClientBuilder::new()
        .gzip(true)
        .deflate(true)
        .build()
        .unwrap();
    static ref ANCHOR: Selector = Selector::parse("a").unwrap();
}

const RESOLVED_HREFS_JS: &str = "Array.from(document.querySelectorAll('a')).map(a => a.href)";

/// Turns one page into its outbound link strings.
///
/// Returned hrefs are raw: they may be relative, absolute, empty, or carry a
/// non-HTTP scheme.
#[async_trait]
pub trait LinkExtractor: Send + Sync {
    async fn extract_links(&self, url: &str) -> Result<Vec<String>>;
}

/// Fetches a page over HTTP and collects the `href` attribute of every
/// anchor in its markup.
pub struct StaticExtractor {
    user_agent: String,
}

impl StaticExtractor {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl LinkExtractor for StaticExtractor {
    async fn extract_links(&self, url: &str) -> Result<Vec<String>> {
        let resp = HTTP_CLI
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            bail!("GET {url} returned {status}");
        }
        let page = resp.text().await?;
        Ok(anchor_hrefs(&page))
    }
}

fn anchor_hrefs(page: &str) -> Vec<String> {
    let doc = Html::parse_document(page);
    doc.select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_owned)
        .collect()
}

/// Extracts anchors from the live DOM of a browser session, so links built
/// by page scripts are seen too. Navigation is serialized: one session
/// renders one page at a time.
pub struct BrowserExtractor {
    page: Mutex<Page>,
}

impl BrowserExtractor {
    pub fn new(page: Page) -> Self {
        Self {
            page: Mutex::new(page),
        }
    }
}

#[async_trait]
impl LinkExtractor for BrowserExtractor {
    async fn extract_links(&self, url: &str) -> Result<Vec<String>> {
        let page = self.page.lock().await;
        page.goto(url).await?;
        page.wait_for_navigation().await?;
        let hrefs: Vec<String> = page.evaluate(RESOLVED_HREFS_JS).await?.into_value()?;
        Ok(hrefs)
    }
}
