use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use chromiumoxide::browser::{Browser, BrowserConfig};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use futures::StreamExt;
use sitewalk_crawler::{CrawlOutcome, CrawlerConfig, DomainCrawler, ExtractorMode};
use tokio::runtime;

/// Single-site page discovery
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: SubCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommand {
    #[command(name = "crawl")]
    Crawl(CrawlArgs),
    #[command(hide = true)]
    Completion,
}

/// Visit every page reachable from a root URL and list them
#[derive(Debug, clap::Args)]
pub struct CrawlArgs {
    /// Root URL the crawl starts from
    pub url: String,
    /// Skip URLs containing this substring; repeatable
    #[arg(long = "exclude", short = 'x', value_name = "SUBSTRING")]
    pub exclusion_list: Vec<String>,
    /// Optional default crawler yaml configuration file
    #[arg(env = "SITEWALK_CRAWLER_CONFIG", long)]
    pub crawler_config: Option<PathBuf>,
    /// Override how links are extracted from a page
    #[arg(value_enum, long)]
    pub mode: Option<ExtractorMode>,
    /// Override crawler's user agent
    #[arg(long)]
    pub user_agent: Option<String>,
    /// Override crawler's maximum concurrent page fetches
    #[arg(long)]
    pub concurrent_fetches: Option<usize>,
    /// Path to the output file that will contain the discovered URLs
    #[arg(long, short)]
    pub output_file: Option<PathBuf>,
    /// When quiet no logs are outputted
    #[arg(long, short)]
    pub quiet: bool,
}

impl TryFrom<&CrawlArgs> for CrawlerConfig {
    type Error = anyhow::Error;

    fn try_from(args: &CrawlArgs) -> Result<Self, Self::Error> {
        let mut conf = if let Some(file) = args.crawler_config.as_ref().map(File::open) {
            serde_yaml::from_reader(file?)?
        } else {
            CrawlerConfig::default()
        };
        if !args.exclusion_list.is_empty() {
            conf.exclusion_list = args.exclusion_list.clone();
        }
        if let Some(mode) = args.mode {
            conf.mode = mode;
        }
        if let Some(user_agent) = &args.user_agent {
            conf.user_agent = user_agent.to_string();
        }
        if let Some(concurrent_fetches) = args.concurrent_fetches {
            conf.concurrent_fetches = concurrent_fetches;
        }
        Ok(conf)
    }
}

pub fn crawl(args: CrawlArgs) -> anyhow::Result<()> {
    let conf: CrawlerConfig = (&args).try_into()?;
    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;
    let outcome = rt.block_on(run_crawl(&args.url, &conf))?;
    report(&args, outcome)
}

async fn run_crawl(url: &str, conf: &CrawlerConfig) -> anyhow::Result<CrawlOutcome> {
    let mut browser = None;
    let page = match conf.mode {
        ExtractorMode::Static => None,
        ExtractorMode::Browser => {
            let (b, mut handler) =
                Browser::launch(BrowserConfig::builder().build().map_err(anyhow::Error::msg)?)
                    .await?;
            tokio::spawn(async move { while handler.next().await.is_some() {} });
            let page = b.new_page("about:blank").await?;
            browser = Some(b);
            Some(page)
        }
    };

    let crawler = DomainCrawler::new(url, conf, page)?;
    let outcome = crawler.run().await;

    if let Some(mut browser) = browser {
        browser.close().await.ok();
    }

    outcome
}

fn report(args: &CrawlArgs, outcome: CrawlOutcome) -> anyhow::Result<()> {
    let mut urls: Vec<&String> = outcome.visited.iter().collect();
    urls.sort();

    match &args.output_file {
        Some(path) => {
            let mut out = File::create(path)?;
            for url in &urls {
                writeln!(out, "{url}")?;
            }
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for url in &urls {
                writeln!(out, "{url}")?;
            }
        }
    }

    log::info!(
        "visited {} pages, {} invalid URLs",
        urls.len(),
        outcome.invalid_urls.len()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.cmd {
        SubCommand::Crawl(args) => {
            if !args.quiet {
                env::set_var("RUST_LOG", "sitewalk_crawler=warn,sitewalk=info");
                env_logger::init();
            }
            crawl(args)
        }
        SubCommand::Completion => {
            generate(Shell::Bash, &mut Args::command(), "sitewalk", &mut io::stdout());
            Ok(())
        }
    }
}
