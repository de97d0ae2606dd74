//! Environment-driven configuration

use std::time::Duration;

use anyhow::{Context, Result, bail};

const DEFAULT_BASE_URL: &str = "https://dummyjson.com";
const DEFAULT_PAGE_SIZE: u64 = 20;
const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Runtime settings for the catalog browser
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the product API
    pub api_base_url: String,
    /// Products requested per browse page
    pub page_size: u64,
    /// Quiet period before a search query is sent
    pub search_debounce: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `CATALOG_*` variables from the process environment.
    ///
    /// Unset variables keep their defaults; set but malformed ones are an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("CATALOG_API_BASE_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup("CATALOG_PAGE_SIZE") {
            let page_size: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("CATALOG_PAGE_SIZE is not a number: {raw}"))?;
            if page_size == 0 {
                bail!("CATALOG_PAGE_SIZE must be at least 1");
            }
            config.page_size = page_size;
        }

        if let Some(raw) = lookup("CATALOG_SEARCH_DEBOUNCE_MS") {
            let millis: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("CATALOG_SEARCH_DEBOUNCE_MS is not a number: {raw}"))?;
            config.search_debounce = Duration::from_millis(millis);
        }

        if let Some(agent) = lookup("CATALOG_USER_AGENT") {
            config.user_agent = agent;
        }

        Ok(config)
    }
}
