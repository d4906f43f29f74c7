use crate::domain::model::Product;
use crate::domain::ports::{ProductSource, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Product catalog read from a JSON array of products with embedded reviews.
pub struct SeedCatalog<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> SeedCatalog<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    pub async fn load(&self) -> Result<Vec<Product>> {
        let data = self.storage.read_file(&self.path).await?;
        let products: Vec<Product> = serde_json::from_slice(&data)?;
        tracing::debug!("Loaded {} products from {}", products.len(), self.path);
        Ok(products)
    }
}

#[async_trait]
impl<S: Storage> ProductSource for SeedCatalog<S> {
    async fn fetch_products(&self, category: Option<&str>) -> Result<Vec<Product>> {
        let mut products = self.load().await?;
        if let Some(category) = category {
            products.retain(|p| p.category.eq_ignore_ascii_case(category));
        }
        // Entries without a timestamp keep file order after the dated ones.
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use tempfile::TempDir;

    const CATALOG: &str = r#"[
        { "title": "Nike Dunk Low Panda", "slug": "nike-dunk-low-panda", "category": "Sneakers",
          "reviews": [{ "author": "@DunkCollector", "rating": 5 }] },
        { "title": "Elden Ring", "slug": "elden-ring", "category": "Video Games",
          "created_at": "2025-01-02T00:00:00Z" },
        { "title": "Hades II", "slug": "hades-ii", "category": "Video Games",
          "created_at": "2025-03-10T00:00:00Z" }
    ]"#;

    async fn catalog(dir: &TempDir) -> SeedCatalog<LocalStorage> {
        tokio::fs::write(dir.path().join("catalog.json"), CATALOG)
            .await
            .unwrap();
        SeedCatalog::new(
            LocalStorage::new(dir.path().to_str().unwrap()),
            "catalog.json",
        )
    }

    #[tokio::test]
    async fn test_filters_category_newest_first() {
        let dir = TempDir::new().unwrap();
        let source = catalog(&dir).await;

        let games = source.fetch_products(Some("video games")).await.unwrap();
        let slugs: Vec<&str> = games.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["hades-ii", "elden-ring"]);

        let all = source.fetch_products(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].reviews.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_catalog_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(dir.path().join("bad.json"), "{not json")
            .await
            .unwrap();
        let source = SeedCatalog::new(LocalStorage::new(dir.path().to_str().unwrap()), "bad.json");
        let err = source.fetch_products(None).await.unwrap_err();
        assert!(matches!(
            err,
            crate::utils::error::StierError::SerializationError(_)
        ));
    }
}
