mod message_dto;

pub use message_dto::{ContactMessageResponseDto, CreateMessageDto, MessageCreatedDto, ValidMessage};
