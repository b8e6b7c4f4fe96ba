use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::products::dtos::{ProductResponseDto, SearchQuery};
use crate::features::products::repositories::ProductRepository;
use crate::shared::constants::messages;

/// Service for catalog reads
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    default_limit: i64,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>, default_limit: i64) -> Self {
        Self {
            repository,
            default_limit,
        }
    }

    /// Search products by name or code
    ///
    /// A blank term returns no results without querying the store.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<ProductResponseDto>> {
        let Some(term) = query.term() else {
            return Ok(Vec::new());
        };
        let limit = query.limit_or(self.default_limit);

        let products = self.repository.search(term, limit).await?;
        tracing::debug!("Product search {:?} returned {} rows", term, products.len());

        Ok(products.into_iter().map(Into::into).collect())
    }

    /// Get a product by its code
    pub async fn get_by_code(&self, code: &str) -> Result<ProductResponseDto> {
        self.repository
            .find_by_code(code)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(messages::PRODUCT_NOT_FOUND.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::MAX_PAGE_SIZE;
    use crate::shared::test_helpers::InMemoryProductRepository;
    use tokio_test::{assert_err, assert_ok};

    fn query(term: &str, limit: Option<i64>) -> SearchQuery {
        SearchQuery {
            query: Some(term.to_string()),
            limit,
        }
    }

    #[tokio::test]
    async fn test_blank_term_skips_store() {
        let repository = Arc::new(InMemoryProductRepository::unavailable());
        let service = ProductService::new(repository.clone(), 10);

        let results = assert_ok!(service.search(&query("   ", None)).await);

        assert!(results.is_empty());
        assert!(repository.searches().is_empty());
    }

    #[tokio::test]
    async fn test_search_passes_trimmed_term_and_clamped_limit() {
        let repository = Arc::new(InMemoryProductRepository::with_products(&[
            ("Wool cap", "W-01"),
            ("Bucket cap", "W-02"),
        ]));
        let service = ProductService::new(repository.clone(), 7);

        let results = assert_ok!(service.search(&query("  cap ", Some(1000))).await);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Bucket cap");

        assert_ok!(service.search(&query("cap", None)).await);
        assert_ok!(service.search(&query("cap", Some(0))).await);

        assert_eq!(
            repository.searches(),
            vec![
                ("cap".to_string(), MAX_PAGE_SIZE),
                ("cap".to_string(), 7),
                ("cap".to_string(), 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let repository = Arc::new(InMemoryProductRepository::with_products(&[("Wool cap", "W-01")]));
        let service = ProductService::new(repository, 10);

        let found = assert_ok!(service.get_by_code("W-01").await);
        assert_eq!(found.name, "Wool cap");

        let err = assert_err!(service.get_by_code("W-99").await);
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == messages::PRODUCT_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let service = ProductService::new(Arc::new(InMemoryProductRepository::unavailable()), 10);

        let err = assert_err!(service.search(&query("cap", None)).await);
        assert!(err.is_infrastructure());
    }
}
