//! dummyjson-style product API client

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::AppConfig;
use crate::models::{Product, ProductsResponse};
use crate::traits::{ProductQuery, ProductSource, SourceConfig};

/// HTTP backend for APIs exposing `/products` and `/products/search`
pub struct DummyJsonSource {
    client: Client,
    config: SourceConfig,
}

impl DummyJsonSource {
    /// Create a new client pointed at the configured base URL
    pub fn new(app: &AppConfig) -> Result<Self> {
        let client = Client::builder().user_agent(&app.user_agent).build()?;

        let config = SourceConfig {
            name: "dummyjson".to_string(),
            base_url: app.api_base_url.clone(),
            list_path: "/products".to_string(),
            search_path: "/products/search".to_string(),
        };

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ProductSource for DummyJsonSource {
    fn config(&self) -> &SourceConfig {
        &self.config
    }

    async fn fetch_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let url = self.build_url(query);
        debug!("GET {} on {}", url, self.config.name);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to fetch products from {}: {}",
                self.config.name,
                response.status()
            ));
        }

        let page: ProductsResponse = response
            .json()
            .await
            .with_context(|| format!("Malformed product response from {}", self.config.name))?;

        Ok(page.products)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    /// Serves a single HTTP response and yields the request line it received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        (base, server)
    }

    fn source(base: String) -> DummyJsonSource {
        let app = AppConfig {
            api_base_url: base,
            ..AppConfig::default()
        };
        DummyJsonSource::new(&app).unwrap()
    }

    const ONE_PRODUCT: &str = r#"{"products":[{"id":7,"title":"Lamp","brand":"Lumo","category":"home","description":"Desk lamp","price":12.5,"discountPercentage":3.0,"rating":4.1,"stock":11,"thumbnail":"t.png","images":["a.png"]}],"total":1}"#;

    #[tokio::test]
    async fn browse_request_returns_products() {
        let (base, server) = serve_once("200 OK", ONE_PRODUCT).await;

        let products = source(base)
            .fetch_products(&ProductQuery::Browse { skip: 20, limit: 20 })
            .await
            .unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Lamp");
        assert_eq!(
            server.await.unwrap(),
            "GET /products?skip=20&limit=20 HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn search_request_encodes_text() {
        let (base, server) = serve_once("200 OK", r#"{"products":[]}"#).await;

        let products = source(base)
            .fetch_products(&ProductQuery::Search {
                text: "desk lamp".to_string(),
            })
            .await
            .unwrap();

        assert!(products.is_empty());
        assert_eq!(
            server.await.unwrap(),
            "GET /products/search?q=desk%20lamp HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn non_success_status_is_a_failure() {
        let (base, _server) = serve_once("503 Service Unavailable", "{}").await;

        let err = source(base)
            .fetch_products(&ProductQuery::Browse { skip: 0, limit: 20 })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_failure() {
        let (base, _server) = serve_once("200 OK", "<html>oops</html>").await;

        let err = source(base)
            .fetch_products(&ProductQuery::Browse { skip: 0, limit: 20 })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Malformed product response"));
    }
}
