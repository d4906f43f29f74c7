use crate::domain::model::{NewRating, Rating};
use crate::domain::ports::RatingRepository;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

/// Append-only rating store for demos and tests.
#[derive(Debug, Default)]
pub struct InMemoryRatingRepository {
    ratings: RwLock<Vec<Rating>>,
}

impl InMemoryRatingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.ratings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.ratings.read().await.is_empty()
    }
}

#[async_trait]
impl RatingRepository for InMemoryRatingRepository {
    async fn submit(&self, rating: NewRating) -> Result<Rating> {
        let stored = rating.into_rating(Utc::now())?;
        tracing::debug!(
            "Stored rating {} for {} by {}",
            stored.rating,
            stored.product_slug,
            stored.reviewer
        );
        self.ratings.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn ratings_for(&self, product_slug: &str) -> Result<Vec<Rating>> {
        let ratings = self.ratings.read().await;
        Ok(ratings
            .iter()
            .filter(|r| r.product_slug == product_slug)
            .cloned()
            .collect())
    }

    async fn ratings_by(&self, reviewer: &str) -> Result<Vec<Rating>> {
        let ratings = self.ratings.read().await;
        Ok(ratings
            .iter()
            .filter(|r| r.reviewer == reviewer)
            .cloned()
            .collect())
    }
}
