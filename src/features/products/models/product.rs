use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a catalog product
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub price: Decimal,
    pub images: Vec<String>,
}
