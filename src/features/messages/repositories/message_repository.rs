use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::messages::dtos::ValidMessage;
use crate::features::messages::models::ContactMessage;

/// Data store access for contact messages
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert(&self, message: &ValidMessage) -> Result<ContactMessage>;

    /// All messages, newest first
    async fn list(&self) -> Result<Vec<ContactMessage>>;
}

/// Postgres-backed contact message repository
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn insert(&self, message: &ValidMessage) -> Result<ContactMessage> {
        sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, title, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, title, content, created_at
            "#,
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.title)
        .bind(&message.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create contact message: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list(&self) -> Result<Vec<ContactMessage>> {
        sqlx::query_as::<_, ContactMessage>(
            r#"
            SELECT id, name, email, title, content, created_at
            FROM contact_messages
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list contact messages: {:?}", e);
            AppError::Database(e)
        })
    }
}
