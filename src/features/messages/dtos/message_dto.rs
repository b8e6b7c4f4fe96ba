use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::shared::constants::messages;
use crate::shared::validation::{first_error_message, non_blank};

/// Field check order for validation messages
const FIELD_ORDER: &[&str] = &["name", "email", "title", "content"];

/// Request DTO for a contact form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMessageDto {
    #[validate(length(max = 100, message = "Името не може да бъде повече от 100 символа!"))]
    pub name: Option<String>,

    #[validate(
        email(message = "Невалиден имейл адрес!"),
        length(max = 255, message = "Имейлът не може да бъде повече от 255 символа!")
    )]
    pub email: Option<String>,

    #[validate(length(max = 100, message = "Темата не може да бъде повече от 100 символа!"))]
    pub title: Option<String>,

    #[validate(length(max = 500, message = "Съобщението не може да бъде повече от 500 символа!"))]
    pub content: Option<String>,
}

/// Contact message that passed validation, with trimmed fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMessage {
    pub name: String,
    pub email: String,
    pub title: String,
    pub content: String,
}

impl CreateMessageDto {
    /// Required fields first, then length and email format
    pub fn into_valid(self) -> Result<ValidMessage> {
        let (Some(name), Some(email), Some(title), Some(content)) = (
            non_blank(self.name.as_deref()),
            non_blank(self.email.as_deref()),
            non_blank(self.title.as_deref()),
            non_blank(self.content.as_deref()),
        ) else {
            return Err(AppError::Validation(
                messages::ALL_FIELDS_REQUIRED.to_string(),
            ));
        };

        let trimmed = Self {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            title: Some(title.to_string()),
            content: Some(content.to_string()),
        };

        trimmed.validate().map_err(|e| {
            AppError::Validation(
                first_error_message(&e, FIELD_ORDER).unwrap_or_else(|| e.to_string()),
            )
        })?;

        Ok(ValidMessage {
            name: name.to_string(),
            email: email.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        })
    }
}

/// Response DTO for a contact message
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessageResponseDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Response DTO for a successful submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageCreatedDto {
    pub message: String,
    pub contact_message: ContactMessageResponseDto,
}
