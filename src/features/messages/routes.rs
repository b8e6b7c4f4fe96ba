use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::messages::handlers;
use crate::features::messages::services::MessageService;

/// Create routes for the messages feature
///
/// Note: POST is used by the public contact form.
pub fn routes(service: Arc<MessageService>) -> Router {
    Router::new()
        .route(
            "/api/dashboard/messages",
            get(handlers::list_messages).post(handlers::create_message),
        )
        .with_state(service)
}
