use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::FetchError;
use crate::models::Product;

/// Result of a startup fetch, delivered to the UI loop.
#[derive(Debug)]
pub enum FetchOutcome {
    Categories(Result<Vec<String>, FetchError>),
    Products(Result<Vec<Product>, FetchError>),
}

/// Read-only client for the catalog API.
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http(http, base_url))
    }

    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn categories_url(&self) -> String {
        format!("{}/products/categories", self.base_url)
    }

    pub fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    pub async fn fetch_categories(&self) -> Result<Vec<String>, FetchError> {
        self.get_json(&self.categories_url()).await
    }

    pub async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        self.get_json(&self.products_url()).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Spawns both startup fetches. Neither waits for the other; each reports
/// through `tx` as soon as it finishes.
pub fn spawn_startup_fetches(rt: &Runtime, client: &CatalogClient, tx: UnboundedSender<FetchOutcome>) {
    let categories_client = client.clone();
    let categories_tx = tx.clone();
    rt.spawn(async move {
        let result = categories_client.fetch_categories().await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "error fetching categories");
        }
        let _ = categories_tx.send(FetchOutcome::Categories(result));
    });

    let products_client = client.clone();
    rt.spawn(async move {
        let result = products_client.fetch_products().await;
        match &result {
            Ok(products) => tracing::info!(count = products.len(), "products fetched"),
            Err(e) => tracing::error!(error = %e, "error fetching products"),
        }
        let _ = tx.send(FetchOutcome::Products(result));
    });
}
