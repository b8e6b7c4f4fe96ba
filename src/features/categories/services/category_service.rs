use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{CategoryResponseDto, CreateCategoryDto};
use crate::features::categories::models::{CategoryField, NewCategory};
use crate::features::categories::repositories::{CategoryRepository, InsertOutcome};
use crate::modules::storage::ImageStore;
use crate::shared::constants::{messages, CATEGORY_IMAGE_FOLDER};

/// Service for category operations
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
    images: Arc<dyn ImageStore>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>, images: Arc<dyn ImageStore>) -> Self {
        Self { repository, images }
    }

    /// List all categories in creation order
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.repository.list().await?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    /// Create a category
    ///
    /// Steps run strictly in sequence: required fields, name lookup, code
    /// lookup, image upload, insert. Nothing is uploaded unless every check
    /// before it passed.
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let draft = dto.into_draft()?;

        if self.repository.find_by_name(&draft.name).await?.is_some() {
            return Err(duplicate(CategoryField::Name));
        }

        if self.repository.find_by_code(&draft.code).await?.is_some() {
            return Err(duplicate(CategoryField::Code));
        }

        let image_url = self
            .images
            .upload(&draft.image_source, CATEGORY_IMAGE_FOLDER)
            .await?;

        let new_category = NewCategory {
            name: draft.name,
            code: draft.code,
            image_url,
        };

        match self.repository.insert(new_category.clone()).await {
            Ok(InsertOutcome::Inserted(category)) => {
                tracing::info!(
                    "Category created: id={}, name={}, code={}",
                    category.id,
                    category.name,
                    category.code
                );
                Ok(category.into())
            }
            Ok(InsertOutcome::Duplicate(field)) => {
                self.discard_image(&new_category.image_url).await;
                let field = self.reported_duplicate(&new_category.name, field).await;
                Err(duplicate(field))
            }
            Err(e) => {
                self.discard_image(&new_category.image_url).await;
                Err(e)
            }
        }
    }

    /// Field to report after losing an insert race
    ///
    /// Postgres names whichever constraint it checked first; a taken name is
    /// reported over a taken code, as in the lookups before the insert.
    async fn reported_duplicate(&self, name: &str, violated: CategoryField) -> CategoryField {
        if violated == CategoryField::Name {
            return violated;
        }
        match self.repository.find_by_name(name).await {
            Ok(Some(_)) => CategoryField::Name,
            Ok(None) => violated,
            Err(e) => {
                tracing::warn!("Name re-check after lost insert race failed: {}", e);
                violated
            }
        }
    }

    /// Remove an uploaded image whose category was never persisted
    async fn discard_image(&self, url: &str) {
        match self.images.remove(url).await {
            Ok(()) => tracing::info!("Removed orphaned category image: {}", url),
            Err(e) => tracing::warn!("Failed to remove orphaned category image {}: {}", url, e),
        }
    }
}

fn duplicate(field: CategoryField) -> AppError {
    let message = match field {
        CategoryField::Name => messages::CATEGORY_NAME_TAKEN,
        CategoryField::Code => messages::CATEGORY_CODE_TAKEN,
    };
    AppError::Validation(message.to_string())
}
