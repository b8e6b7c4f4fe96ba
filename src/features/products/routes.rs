use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::products::handlers;
use crate::features::products::services::ProductService;

/// Create routes for the products feature
pub fn routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route("/api/public/products/search", get(handlers::search_products))
        .route("/api/public/products/{code}", get(handlers::get_product))
        .with_state(service)
}
