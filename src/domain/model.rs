use crate::domain::tier::Tier;
use crate::utils::error::{Result, StierError};
use crate::utils::validation::{validate_score_range, validate_slug, Validate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper end of the star scale a reviewer submits on.
pub const MAX_RATING: f64 = 5.0;

/// One reviewer's star rating of one product, on the 0-5 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub product_slug: String,
    pub reviewer: String,
    pub rating: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Input to the rating write path. Validated before it becomes a [`Rating`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRating {
    pub product_slug: String,
    pub reviewer: String,
    pub rating: f64,
}

/// A rating with the text and metadata shown alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub rating: f64,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub helpful: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub slug: String,
    pub category: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Only present in seed catalogs; the hosted table keeps ratings separately.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<Review>,
}

/// Aggregate of a product's ratings. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Mean rating rescaled to 0-10.
    pub average: f64,
    pub recommend_percent: u8,
    pub count: usize,
}

/// A product together with its derived consensus and tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredProduct {
    pub product: Product,
    pub consensus: ConsensusResult,
    pub tier: Tier,
}

impl ScoredProduct {
    pub fn color(&self) -> &'static str {
        self.tier.color()
    }

    pub fn has_ratings(&self) -> bool {
        self.consensus.count > 0
    }
}

/// One entry of a user's profile: the score they gave a product on the 0-10 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRating {
    pub slug: String,
    pub title: String,
    pub score: f64,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub rated_at: Option<DateTime<Utc>>,
}

impl Validate for NewRating {
    fn validate(&self) -> Result<()> {
        validate_slug(&self.product_slug)?;
        if self.reviewer.trim().is_empty() {
            return Err(StierError::validation("reviewer cannot be empty"));
        }
        validate_score_range("rating", self.rating, 0.0, MAX_RATING)
    }
}

impl NewRating {
    pub fn new(product_slug: impl Into<String>, reviewer: impl Into<String>, rating: f64) -> Self {
        Self {
            product_slug: product_slug.into(),
            reviewer: reviewer.into(),
            rating,
        }
    }

    /// Validates and stamps the rating with `created_at`.
    pub fn into_rating(self, created_at: DateTime<Utc>) -> Result<Rating> {
        self.validate()?;
        Ok(Rating {
            product_slug: self.product_slug,
            reviewer: self.reviewer,
            rating: self.rating,
            created_at: Some(created_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rating_validation() {
        let now = Utc::now();
        assert!(NewRating::new("nike-dunk-low-panda", "@DunkCollector", 5.0)
            .into_rating(now)
            .is_ok());
        assert!(NewRating::new("nike-dunk-low-panda", "@DunkCollector", 5.5)
            .into_rating(now)
            .is_err());
        assert!(NewRating::new("nike-dunk-low-panda", "  ", 3.0)
            .into_rating(now)
            .is_err());
        assert!(NewRating::new("Nike Dunk", "@DunkCollector", 3.0)
            .into_rating(now)
            .is_err());
        assert!(NewRating::new("nike-dunk-low-panda", "@DunkCollector", f64::NAN)
            .into_rating(now)
            .is_err());
    }

    #[test]
    fn test_seed_product_uses_image_alias() {
        let json = r#"{
            "id": "yeezy-350",
            "title": "Yeezy Boost 350 V2",
            "slug": "yeezy-boost-350-v2",
            "category": "Sneakers",
            "sku": "YEEZY-350",
            "image": "https://images.unsplash.com/photo-1575537302964-96cd47c06b1b",
            "price": "$220",
            "reviews": [{ "author": "@YeezyFan", "rating": 4, "verified": true, "text": "Super comfortable.", "helpful": 28 }]
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.image_url.unwrap().contains("unsplash"));
        assert_eq!(product.reviews.len(), 1);
        assert_eq!(product.reviews[0].rating, 4.0);
        assert!(product.created_at.is_none());
    }
}
