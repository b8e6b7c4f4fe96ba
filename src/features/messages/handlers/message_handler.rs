use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::messages::dtos::{
    ContactMessageResponseDto, CreateMessageDto, MessageCreatedDto,
};
use crate::features::messages::services::MessageService;
use crate::shared::constants::messages;
use crate::shared::types::ErrorResponse;

/// Submit a contact message
#[utoipa::path(
    post,
    path = "/api/dashboard/messages",
    request_body = CreateMessageDto,
    responses(
        (status = 201, description = "Message stored", body = MessageCreatedDto),
        (status = 400, description = "Missing fields, invalid email or too long", body = ErrorResponse),
        (status = 500, description = "Data store failure", body = ErrorResponse),
    ),
    tag = "messages"
)]
pub async fn create_message(
    State(service): State<Arc<MessageService>>,
    AppJson(dto): AppJson<CreateMessageDto>,
) -> Result<(StatusCode, Json<MessageCreatedDto>)> {
    let contact_message = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageCreatedDto {
            message: messages::MESSAGE_SENT.to_string(),
            contact_message,
        }),
    ))
}

/// List contact messages, newest first
#[utoipa::path(
    get,
    path = "/api/dashboard/messages",
    responses(
        (status = 200, description = "List of messages", body = Vec<ContactMessageResponseDto>),
        (status = 500, description = "Data store failure", body = ErrorResponse),
    ),
    tag = "messages"
)]
pub async fn list_messages(
    State(service): State<Arc<MessageService>>,
) -> Result<Json<Vec<ContactMessageResponseDto>>> {
    let rows = service
        .list()
        .await
        .map_err(|e| e.with_public_message(messages::MESSAGES_FETCH_FAILED))?;
    Ok(Json(rows))
}
