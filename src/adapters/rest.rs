use crate::domain::model::{NewRating, Product, Rating};
use crate::domain::ports::{ProductSource, RatingRepository};
use crate::utils::error::{Result, StierError};
use crate::utils::validation::Validate;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

/// Client for the hosted database's REST interface (`/rest/v1/<table>`).
pub struct RestClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    products_table: String,
    ratings_table: String,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        Self::with_timeout(base_url, api_key, Duration::from_secs(30))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            products_table: "products".to_string(),
            ratings_table: "ratings".to_string(),
        })
    }

    pub fn with_tables(
        mut self,
        products_table: impl Into<String>,
        ratings_table: impl Into<String>,
    ) -> Self {
        self.products_table = products_table.into();
        self.ratings_table = ratings_table.into();
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        tracing::debug!("REST response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::warn!("REST request failed with {}: {}", status, message);
        Err(StierError::ApiError {
            status: status.as_u16(),
            message,
        })
    }

    async fn select_ratings(&self, column: &str, value: &str) -> Result<Vec<Rating>> {
        let url = self.table_url(&self.ratings_table);
        let filter = format!("eq.{}", value);
        let request = self.client.get(&url).query(&[
            ("select", "*"),
            (column, filter.as_str()),
            ("order", "created_at.asc"),
        ]);
        let ratings: Vec<Rating> = self.send(request).await?.json().await?;
        Ok(ratings)
    }
}

#[async_trait]
impl ProductSource for RestClient {
    async fn fetch_products(&self, category: Option<&str>) -> Result<Vec<Product>> {
        let url = self.table_url(&self.products_table);
        tracing::debug!("Fetching products from {} (category: {:?})", url, category);

        let mut query = vec![("select", "*".to_string())];
        if let Some(category) = category {
            query.push(("category", format!("eq.{}", category)));
        }
        query.push(("order", "created_at.desc".to_string()));

        let request = self.client.get(&url).query(&query);
        let products: Vec<Product> = self.send(request).await?.json().await?;
        tracing::info!("Fetched {} products", products.len());
        Ok(products)
    }
}

#[async_trait]
impl RatingRepository for RestClient {
    async fn submit(&self, rating: NewRating) -> Result<Rating> {
        rating.validate()?;

        let url = self.table_url(&self.ratings_table);
        let request = self
            .client
            .post(&url)
            .header("Prefer", "return=representation")
            .json(&rating);

        let mut inserted: Vec<Rating> = self.send(request).await?.json().await?;
        if inserted.is_empty() {
            return Err(StierError::ApiError {
                status: 200,
                message: "insert returned no rows".to_string(),
            });
        }
        Ok(inserted.swap_remove(0))
    }

    async fn ratings_for(&self, product_slug: &str) -> Result<Vec<Rating>> {
        self.select_ratings("product_slug", product_slug).await
    }

    async fn ratings_by(&self, reviewer: &str) -> Result<Vec<Rating>> {
        self.select_ratings("reviewer", reviewer).await
    }
}
