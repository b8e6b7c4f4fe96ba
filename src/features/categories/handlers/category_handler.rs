use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::categories::dtos::{
    CategoryCreatedDto, CategoryResponseDto, CreateCategoryDto,
};
use crate::features::categories::services::CategoryService;
use crate::shared::constants::messages;
use crate::shared::types::ErrorResponse;

/// List all categories
#[utoipa::path(
    get,
    path = "/api/dashboard/categories",
    responses(
        (status = 200, description = "List of categories", body = Vec<CategoryResponseDto>),
        (status = 500, description = "Data store failure", body = ErrorResponse),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<Vec<CategoryResponseDto>>> {
    let categories = service
        .list()
        .await
        .map_err(|e| e.with_public_message(messages::CATEGORIES_FETCH_FAILED))?;
    Ok(Json(categories))
}

/// Create a category
///
/// The image is uploaded to the image store and its canonical URL is saved.
#[utoipa::path(
    post,
    path = "/api/dashboard/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = CategoryCreatedDto),
        (status = 400, description = "Missing fields, missing image, or duplicate name/code", body = ErrorResponse),
        (status = 500, description = "Data store or image store failure", body = ErrorResponse),
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<CategoryCreatedDto>)> {
    let category = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(CategoryCreatedDto {
            message: messages::CATEGORY_CREATED.to_string(),
            category,
        }),
    ))
}
