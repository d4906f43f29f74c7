use crate::core::export::export_tier_list;
use crate::domain::consensus::Rated;
use crate::domain::model::{NewRating, Product, ScoredProduct};
use crate::domain::ports::{ProductSource, RatingRepository, Storage};
use crate::domain::services::{group_by_tier, score_product, search, TierList};
use crate::domain::tier::ScorePolicy;
use crate::utils::error::{Result, StierError};

/// Loads products, folds in their ratings and produces tier lists.
pub struct TierWorld<S: ProductSource, R: RatingRepository> {
    source: S,
    ratings: R,
    policy: ScorePolicy,
}

impl<S: ProductSource, R: RatingRepository> TierWorld<S, R> {
    pub fn new(source: S, ratings: R) -> Self {
        Self {
            source,
            ratings,
            policy: ScorePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ScorePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn ratings(&self) -> &R {
        &self.ratings
    }

    async fn score(&self, product: Product) -> Result<ScoredProduct> {
        let mut values: Vec<f64> = product.reviews.iter().map(Rated::rating).collect();
        let stored = self.ratings.ratings_for(&product.slug).await?;
        values.extend(stored.iter().map(Rated::rating));
        score_product(product, &values, self.policy)
    }

    /// Embedded reviews and repository ratings both count toward the consensus.
    pub async fn scored_products(&self, category: Option<&str>) -> Result<Vec<ScoredProduct>> {
        let products = self.source.fetch_products(category).await?;
        let mut scored = Vec::with_capacity(products.len());
        for product in products {
            scored.push(self.score(product).await?);
        }
        Ok(scored)
    }

    pub async fn tier_list(&self, category: Option<&str>) -> Result<TierList> {
        let scored = self.scored_products(category).await?;
        Ok(group_by_tier(scored))
    }

    pub async fn search(&self, query: &str) -> Result<Vec<ScoredProduct>> {
        let products = self.source.fetch_products(None).await?;
        let matches: Vec<Product> = search(&products, query).into_iter().cloned().collect();
        tracing::debug!("Search '{}' matched {} products", query, matches.len());

        let mut scored = Vec::with_capacity(matches.len());
        for product in matches {
            scored.push(self.score(product).await?);
        }
        Ok(scored)
    }

    /// Stores a rating for a known product and returns the product rescored.
    pub async fn rate(&self, rating: NewRating) -> Result<ScoredProduct> {
        let product = self
            .source
            .fetch_products(None)
            .await?
            .into_iter()
            .find(|p| p.slug == rating.product_slug)
            .ok_or_else(|| StierError::NotFound {
                what: format!("product '{}'", rating.product_slug),
            })?;

        let stored = self.ratings.submit(rating).await?;
        tracing::info!(
            "⭐ {} rated {} by {}",
            stored.product_slug,
            stored.rating,
            stored.reviewer
        );
        self.score(product).await
    }

    /// Load, score, group and export in one pass. Returns the written paths.
    pub async fn run<St: Storage>(
        &self,
        category: Option<&str>,
        formats: &[String],
        storage: &St,
    ) -> Result<Vec<String>> {
        tracing::info!("Starting tier list build...");

        tracing::info!("Loading products...");
        let scored = self.scored_products(category).await?;
        tracing::info!("Scored {} products", scored.len());

        let list = group_by_tier(scored);
        for group in list.non_empty() {
            tracing::debug!("{} tier: {} products", group.tier, group.products.len());
        }

        tracing::info!("Exporting tier list...");
        export_tier_list(&list, formats, storage).await
    }
}
