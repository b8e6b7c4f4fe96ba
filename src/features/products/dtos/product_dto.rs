use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::products::models::Product;
use crate::shared::constants::MAX_PAGE_SIZE;
use crate::shared::validation::non_blank;

/// Query parameters for product search
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Search term, matched against name and code (case-insensitive, partial match)
    #[param(example = "шапка")]
    pub query: Option<String>,

    /// Maximum number of results (1-100)
    #[param(example = 10)]
    pub limit: Option<i64>,
}

impl SearchQuery {
    /// Trimmed search term, `None` when blank
    pub fn term(&self) -> Option<&str> {
        non_blank(self.query.as_deref())
    }

    /// Requested limit clamped to `1..=MAX_PAGE_SIZE`
    pub fn limit_or(&self, default: i64) -> i64 {
        self.limit.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
    }
}

/// Response DTO for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponseDto {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 24.90)]
    pub price: Decimal,
    pub images: Vec<String>,
}

impl From<Product> for ProductResponseDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            code: p.code,
            price: p.price,
            images: p.images,
        }
    }
}
