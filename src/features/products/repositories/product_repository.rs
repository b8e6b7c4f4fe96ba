use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::products::models::Product;

/// Catalog reads from the data store
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Products whose name or code contains `term` (case-insensitive), ordered by name
    async fn search(&self, term: &str, limit: i64) -> Result<Vec<Product>>;

    async fn find_by_code(&self, code: &str) -> Result<Option<Product>>;
}

/// Postgres-backed product repository
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn search(&self, term: &str, limit: i64) -> Result<Vec<Product>> {
        let pattern = format!("%{}%", escape_like(term));

        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, code, price, images
            FROM products
            WHERE name ILIKE $1 ESCAPE '\' OR code ILIKE $1 ESCAPE '\'
            ORDER BY name ASC
            LIMIT $2
            "#,
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to search products for {:?}: {:?}", term, e);
            AppError::Database(e)
        })
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, code, price, images
            FROM products
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch product by code {}: {:?}", code, e);
            AppError::Database(e)
        })
    }
}

/// Escape LIKE wildcards so the term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
