//! Traits and interfaces for backend-agnostic product fetching

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Product;

/// Configuration for a product API backend
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Display name for the backend
    pub name: String,
    /// Base URL of the API, without trailing slash
    pub base_url: String,
    /// Path of the paginated listing endpoint
    pub list_path: String,
    /// Path of the text search endpoint
    pub search_path: String,
}

/// A single request against the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductQuery {
    /// Offset pagination over the whole catalog
    Browse { skip: u64, limit: u64 },
    /// One batch of products matching a text filter
    Search { text: String },
}

impl ProductQuery {
    /// Builds the request for the given 1-based page and search text.
    ///
    /// An empty `search` selects browse mode; anything else selects search mode,
    /// where `page` has no effect.
    pub fn for_page(search: &str, page: u64, page_size: u64) -> Self {
        if search.is_empty() {
            Self::Browse {
                skip: page.saturating_sub(1) * page_size,
                limit: page_size,
            }
        } else {
            Self::Search {
                text: search.to_string(),
            }
        }
    }
}

/// Trait for product API backends
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Get the configuration for this backend
    fn config(&self) -> &SourceConfig;

    /// Fetch one batch of products
    ///
    /// # Returns
    /// * `Result<Vec<Product>>` - Products in server order, or the fetch failure
    async fn fetch_products(&self, query: &ProductQuery) -> Result<Vec<Product>>;

    /// Build the complete request URL for a query
    ///
    /// # Arguments
    /// * `query` - The query to encode
    ///
    /// # Returns
    /// * `String` - The complete URL, search text percent-encoded
    fn build_url(&self, query: &ProductQuery) -> String {
        let config = self.config();
        match query {
            ProductQuery::Browse { skip, limit } => format!(
                "{}{}?skip={skip}&limit={limit}",
                config.base_url, config.list_path
            ),
            ProductQuery::Search { text } => format!(
                "{}{}?q={}",
                config.base_url,
                config.search_path,
                urlencoding::encode(text)
            ),
        }
    }
}
