use crate::domain::model::{NewRating, Product, Rating};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[async_trait]
pub trait ProductSource: Send + Sync {
    /// All products, newest first; restricted to one category when given.
    async fn fetch_products(&self, category: Option<&str>) -> Result<Vec<Product>>;
}

/// Write path for reviewer ratings. Ratings are immutable once stored.
#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn submit(&self, rating: NewRating) -> Result<Rating>;
    async fn ratings_for(&self, product_slug: &str) -> Result<Vec<Rating>>;
    async fn ratings_by(&self, reviewer: &str) -> Result<Vec<Rating>>;
}
