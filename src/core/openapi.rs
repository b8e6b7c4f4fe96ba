use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::messages::{dtos as messages_dtos, handlers as messages_handlers};
use crate::features::products::{dtos as products_dtos, handlers as products_handlers};
use crate::shared::types::{ErrorResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories (dashboard)
        categories_handlers::list_categories,
        categories_handlers::create_category,
        // Messages
        messages_handlers::list_messages,
        messages_handlers::create_message,
        // Products (public)
        products_handlers::search_products,
        products_handlers::get_product,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            MessageResponse,
            // Categories
            categories_dtos::CreateCategoryDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryCreatedDto,
            // Messages
            messages_dtos::CreateMessageDto,
            messages_dtos::ContactMessageResponseDto,
            messages_dtos::MessageCreatedDto,
            // Products
            products_dtos::ProductResponseDto,
        )
    ),
    tags(
        (name = "categories", description = "Product categories (dashboard)"),
        (name = "messages", description = "Contact form messages"),
        (name = "products", description = "Product catalog search and detail (public)"),
    ),
    info(
        title = "LIPCI Storefront API",
        version = "0.1.0",
        description = "API documentation for the LIPCI storefront and dashboard",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
