// * Runtime configuration for the wiki client and orchestrators.
// * Defaults come from `constants`; the environment and CLI flags override them.

pub mod constants;

use std::env;
use std::time::Duration;

use url::Url;

use constants::{
    request_timeout, DEFAULT_API_BASE, DEFAULT_CATEGORY, DEFAULT_CATEGORY_LIMIT,
    DEFAULT_EXCLUDED_SECTIONS, DEFAULT_LANDING_PAGE, DEFAULT_USER_AGENT, DEFAULT_WIKI_ORIGIN,
    PLACEHOLDER_IMAGE_URL,
};

/// Settings shared by the API client, the page parser and the catalog builder
#[derive(Debug, Clone, PartialEq)]
pub struct WikiConfig {
    /// Full URL of the MediaWiki `api.php` endpoint
    pub api_base: String,
    /// Scheme + host used for page URLs and relative image paths
    pub origin: String,
    /// Image used when an item has none
    pub placeholder_image: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// User-Agent sent with every request
    pub user_agent: String,
    /// Section names skipped by the page parser
    pub excluded_sections: Vec<String>,
    /// Landing page for the table-driven catalog
    pub landing_page: String,
    /// Category for the category-driven catalog
    pub category: String,
    /// `cmlimit` for category listing
    pub category_limit: u32,
    /// Section HTML fetches in flight at once (results stay in listing order)
    pub section_concurrency: usize,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            origin: DEFAULT_WIKI_ORIGIN.to_string(),
            placeholder_image: PLACEHOLDER_IMAGE_URL.to_string(),
            timeout: request_timeout(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            excluded_sections: DEFAULT_EXCLUDED_SECTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            landing_page: DEFAULT_LANDING_PAGE.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            category_limit: DEFAULT_CATEGORY_LIMIT,
            section_concurrency: 1,
        }
    }
}

impl WikiConfig {
    /// Defaults overridden by `WIKELO_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(api_base) = env::var("WIKELO_API_BASE") {
            config = config.with_api_base(api_base);
        }
        if let Some(secs) = env::var("WIKELO_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        if let Ok(placeholder) = env::var("WIKELO_PLACEHOLDER_IMAGE") {
            config.placeholder_image = placeholder;
        }
        if let Ok(user_agent) = env::var("WIKELO_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(n) = env::var("WIKELO_SECTION_CONCURRENCY")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            config.section_concurrency = n.max(1);
        }

        config
    }

    /// Points the client at another wiki; the origin follows the API URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        if let Ok(url) = Url::parse(&self.api_base) {
            let origin = url.origin().ascii_serialization();
            // ? Opaque origins serialize as "null"
            if origin != "null" {
                self.origin = origin;
            }
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_placeholder_image(mut self, url: impl Into<String>) -> Self {
        self.placeholder_image = url.into();
        self
    }

    pub fn with_excluded_sections<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_sections = sections.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_section_concurrency(mut self, n: usize) -> Self {
        self.section_concurrency = n.max(1);
        self
    }

    pub fn with_category_limit(mut self, limit: u32) -> Self {
        self.category_limit = limit.max(1);
        self
    }

    /// True when the page parser must skip this section
    pub fn is_excluded_section(&self, name: &str) -> bool {
        self.excluded_sections.iter().any(|s| s == name)
    }
}
