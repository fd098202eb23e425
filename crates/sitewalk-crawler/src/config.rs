use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerConfig {
    #[serde(default)]
    pub exclusion_list: Vec<String>,

    #[serde(default)]
    pub mode: ExtractorMode,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_concurrent_fetches")]
    pub concurrent_fetches: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            exclusion_list: Vec::new(),
            mode: ExtractorMode::default(),
            user_agent: default_user_agent(),
            concurrent_fetches: default_concurrent_fetches(),
        }
    }
}

fn default_user_agent() -> String {
    String::from("sitewalk")
}

fn default_concurrent_fetches() -> usize {
    8
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ExtractorMode {
    /// Fetch the document over HTTP and parse its markup
    #[default]
    Static,
    /// Query the live DOM of a scripted page through a browser session
    Browser,
}
