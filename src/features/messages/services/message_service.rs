use std::sync::Arc;

use crate::core::error::Result;
use crate::features::messages::dtos::{ContactMessageResponseDto, CreateMessageDto};
use crate::features::messages::repositories::MessageRepository;

/// Service for contact messages
pub struct MessageService {
    repository: Arc<dyn MessageRepository>,
}

impl MessageService {
    pub fn new(repository: Arc<dyn MessageRepository>) -> Self {
        Self { repository }
    }

    /// Validate and store a contact form submission
    pub async fn create(&self, dto: CreateMessageDto) -> Result<ContactMessageResponseDto> {
        let message = dto.into_valid()?;
        let contact_message = self.repository.insert(&message).await?;

        tracing::info!(
            "Contact message created: id={}, email={}",
            contact_message.id,
            contact_message.email
        );

        Ok(contact_message.into())
    }

    /// List received messages, newest first
    pub async fn list(&self) -> Result<Vec<ContactMessageResponseDto>> {
        let rows = self.repository.list().await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
