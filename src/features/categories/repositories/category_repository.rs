use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::database::unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::categories::models::{Category, CategoryField, NewCategory};

/// Result of an insert that may lose a uniqueness race
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    Inserted(Category),
    /// The store rejected the row because another category owns this value
    Duplicate(CategoryField),
}

/// Data store access for categories
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>>;

    async fn find_by_code(&self, code: &str) -> Result<Option<Category>>;

    async fn insert(&self, category: NewCategory) -> Result<InsertOutcome>;
}

/// Postgres-backed category repository
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a UNIQUE constraint name to the column it protects
fn field_for_constraint(constraint: &str) -> Option<CategoryField> {
    match constraint {
        "categories_name_key" => Some(CategoryField::Name),
        "categories_code_key" => Some(CategoryField::Code),
        _ => None,
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, code, image_url, created_at, updated_at
            FROM categories
            ORDER BY created_at, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, code, image_url, created_at, updated_at
            FROM categories
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category by name: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, code, image_url, created_at, updated_at
            FROM categories
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category by code: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn insert(&self, category: NewCategory) -> Result<InsertOutcome> {
        let result = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, code, image_url)
            VALUES ($1, $2, $3)
            RETURNING id, name, code, image_url, created_at, updated_at
            "#,
        )
        .bind(&category.name)
        .bind(&category.code)
        .bind(&category.image_url)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(InsertOutcome::Inserted(row)),
            Err(e) => {
                if let Some(field) = unique_violation(&e).as_deref().and_then(field_for_constraint) {
                    tracing::warn!(
                        "Category insert lost uniqueness race on {:?}: name={}, code={}",
                        field,
                        category.name,
                        category.code
                    );
                    return Ok(InsertOutcome::Duplicate(field));
                }
                tracing::error!("Failed to insert category: {:?}", e);
                Err(AppError::Database(e))
            }
        }
    }
}
