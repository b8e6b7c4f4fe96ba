use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::messages::dtos::ContactMessageResponseDto;

/// Database model for a contact message
#[derive(Debug, Clone, FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<ContactMessage> for ContactMessageResponseDto {
    fn from(m: ContactMessage) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            title: m.title,
            content: m.content,
            created_at: m.created_at,
        }
    }
}
