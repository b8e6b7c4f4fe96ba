use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::shared::constants::messages;
use crate::shared::validation::{first_error_message, non_blank};

/// Field check order for length messages
const FIELD_ORDER: &[&str] = &["name", "code"];

/// Request DTO for creating a category
///
/// Fields are optional at the JSON level so that missing values produce the
/// field-requirement message instead of a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryDto {
    #[schema(example = "Шапки", max_length = 100)]
    #[validate(length(max = 100, message = "Името на категорията не може да бъде повече от 100 символа!"))]
    pub name: Option<String>,

    #[schema(example = "HAT", max_length = 50)]
    #[validate(length(max = 50, message = "Кодът на категорията не може да бъде повече от 50 символа!"))]
    pub code: Option<String>,

    /// Image to upload: a `data:image/...;base64,` URI or an `http(s)` URL
    pub image_url: Option<String>,
}

/// Category input that passed the required-field checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub code: String,
    pub image_source: String,
}

impl CreateCategoryDto {
    /// Check fields in order: required scalar fields, their column lengths, then the image
    pub fn into_draft(self) -> Result<CategoryDraft> {
        let (Some(name), Some(code)) = (
            non_blank(self.name.as_deref()),
            non_blank(self.code.as_deref()),
        ) else {
            return Err(AppError::Validation(
                messages::ALL_FIELDS_REQUIRED.to_string(),
            ));
        };

        let trimmed = Self {
            name: Some(name.to_string()),
            code: Some(code.to_string()),
            image_url: None,
        };
        trimmed.validate().map_err(|e| {
            AppError::Validation(
                first_error_message(&e, FIELD_ORDER).unwrap_or_else(|| e.to_string()),
            )
        })?;

        let image_source = non_blank(self.image_url.as_deref()).ok_or_else(|| {
            AppError::Validation(messages::CATEGORY_IMAGE_REQUIRED.to_string())
        })?;

        Ok(CategoryDraft {
            name: name.to_string(),
            code: code.to_string(),
            image_source: image_source.to_string(),
        })
    }
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            code: c.code,
            image_url: c.image_url,
            created_at: c.created_at,
        }
    }
}

/// Response DTO for a successful category creation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryCreatedDto {
    pub message: String,
    pub category: CategoryResponseDto,
}
