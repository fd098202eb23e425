mod config;
mod crawler;
mod extract;
mod frontier;
mod scope;
mod sink;

pub use config::{CrawlerConfig, ExtractorMode};
pub use crawler::{CrawlOutcome, DomainCrawler};
pub use extract::{BrowserExtractor, LinkExtractor, StaticExtractor};
pub use sink::{DiagnosticSink, LogSink};

pub use anyhow;
