use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::products::dtos::{ProductResponseDto, SearchQuery};
use crate::features::products::services::ProductService;
use crate::shared::constants::messages;
use crate::shared::types::ErrorResponse;

/// Search products by name or code
#[utoipa::path(
    get,
    path = "/api/public/products/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching products, empty for a blank query", body = Vec<ProductResponseDto>),
        (status = 400, description = "Unparseable query parameters", body = ErrorResponse),
        (status = 500, description = "Data store failure", body = ErrorResponse),
    ),
    tag = "products"
)]
pub async fn search_products(
    State(service): State<Arc<ProductService>>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<Vec<ProductResponseDto>>> {
    let products = service
        .search(&query)
        .await
        .map_err(|e| e.with_public_message(messages::PRODUCTS_FETCH_FAILED))?;
    Ok(Json(products))
}

/// Get a product by code
#[utoipa::path(
    get,
    path = "/api/public/products/{code}",
    params(
        ("code" = String, Path, description = "Product code")
    ),
    responses(
        (status = 200, description = "Product details", body = ProductResponseDto),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Data store failure", body = ErrorResponse),
    ),
    tag = "products"
)]
pub async fn get_product(
    State(service): State<Arc<ProductService>>,
    Path(code): Path<String>,
) -> Result<Json<ProductResponseDto>> {
    let product = service.get_by_code(&code).await?;
    Ok(Json(product))
}
