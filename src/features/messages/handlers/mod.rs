mod message_handler;

pub use message_handler::{__path_create_message, __path_list_messages, create_message, list_messages};
