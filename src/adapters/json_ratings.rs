use crate::domain::model::{NewRating, Rating};
use crate::domain::ports::{RatingRepository, Storage};
use crate::utils::error::{Result, StierError};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

/// Ratings kept as a JSON array in a file behind [`Storage`], so they outlive the process.
/// A file that does not exist yet reads as no ratings.
pub struct JsonRatingRepository<S: Storage> {
    storage: S,
    path: String,
    // 序列化 read-modify-write，避免同一程序內的並行提交互相覆蓋
    write_lock: Mutex<()>,
}

impl<S: Storage> JsonRatingRepository<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub async fn load(&self) -> Result<Vec<Rating>> {
        match self.storage.read_file(&self.path).await {
            Ok(data) if data.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(StierError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No ratings file at {}, starting empty", self.path);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<S: Storage> RatingRepository for JsonRatingRepository<S> {
    async fn submit(&self, rating: NewRating) -> Result<Rating> {
        let stored = rating.into_rating(Utc::now())?;

        let _guard = self.write_lock.lock().await;
        let mut ratings = self.load().await?;
        ratings.push(stored.clone());
        let body = serde_json::to_vec_pretty(&ratings)?;
        let path = self.storage.write_file(&self.path, &body).await?;
        tracing::debug!(
            "Stored rating {} for {} by {} in {}",
            stored.rating,
            stored.product_slug,
            stored.reviewer,
            path
        );
        Ok(stored)
    }

    async fn ratings_for(&self, product_slug: &str) -> Result<Vec<Rating>> {
        let mut ratings = self.load().await?;
        ratings.retain(|r| r.product_slug == product_slug);
        Ok(ratings)
    }

    async fn ratings_by(&self, reviewer: &str) -> Result<Vec<Rating>> {
        let mut ratings = self.load().await?;
        ratings.retain(|r| r.reviewer == reviewer);
        Ok(ratings)
    }
}
