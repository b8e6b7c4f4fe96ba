use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::client::ClientError;
use crate::features::messages::dtos::CreateMessageDto;
use crate::features::products::dtos::ProductResponseDto;
use crate::shared::types::{ErrorResponse, MessageResponse};

/// Product search as used by the search widget
#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn search(&self, term: &str) -> Result<Vec<ProductResponseDto>, ClientError>;
}

/// Contact message submission as used by the contact form
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Returns the server's acknowledgement message
    async fn send(&self, message: &CreateMessageDto) -> Result<String, ClientError>;
}

/// HTTP client for the storefront API
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl StorefrontClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Decode a 2xx body as `T`, anything else as an `{ error }` rejection
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return serde_json::from_str::<T>(&body).map_err(|e| {
            tracing::error!("Failed to parse storefront response: {}", e);
            ClientError::Decode(e.to_string())
        });
    }

    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(error_response) => Err(ClientError::Rejected {
            status: status.as_u16(),
            message: error_response.error,
        }),
        Err(e) => {
            tracing::error!("Storefront API error: HTTP {} - {}", status, body);
            Err(ClientError::Decode(e.to_string()))
        }
    }
}

#[async_trait]
impl ProductLookup for StorefrontClient {
    async fn search(&self, term: &str) -> Result<Vec<ProductResponseDto>, ClientError> {
        let url = format!(
            "{}/api/public/products/search?query={}",
            self.base_url,
            urlencoding::encode(term)
        );

        tracing::debug!("Searching products: {}", term);

        let response = self.http_client.get(&url).send().await?;
        decode(response).await
    }
}

#[async_trait]
impl MessageSender for StorefrontClient {
    async fn send(&self, message: &CreateMessageDto) -> Result<String, ClientError> {
        let url = format!("{}/api/dashboard/messages", self.base_url);

        let response = self.http_client.post(&url).json(message).send().await?;
        let ack: MessageResponse = decode(response).await?;
        Ok(ack.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Query,
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    /// Serve `app` on an ephemeral port and return its base URL
    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_search_encodes_term() {
        let app = Router::new().route(
            "/api/public/products/search",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let query = params.get("query").cloned().unwrap_or_default();
                Json(json!([{
                    "id": "00000000-0000-0000-0000-000000000000",
                    "name": query,
                    "code": "HAT-01",
                    "price": 24.9,
                    "images": []
                }]))
            }),
        );
        let client = StorefrontClient::new(spawn(app).await);

        let products = client.search("шапка & шал").await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "шапка & шал");
    }

    #[tokio::test]
    async fn test_send_returns_ack_message() {
        let app = Router::new().route(
            "/api/dashboard/messages",
            post(|Json(body): Json<Value>| async move {
                (
                    StatusCode::CREATED,
                    Json(json!({ "message": "ok", "contactMessage": body })),
                )
            }),
        );
        let client = StorefrontClient::new(spawn(app).await);

        let ack = client.send(&CreateMessageDto::default()).await.unwrap();

        assert_eq!(ack, "ok");
    }

    #[tokio::test]
    async fn test_error_envelope_becomes_rejection() {
        let app = Router::new().route(
            "/api/dashboard/messages",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Невалиден имейл адрес!" })),
                )
            }),
        );
        let client = StorefrontClient::new(spawn(app).await);

        let err = client.send(&CreateMessageDto::default()).await.unwrap_err();

        match err {
            ClientError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Невалиден имейл адрес!");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_is_decode_failure() {
        let app = Router::new().route(
            "/api/dashboard/messages",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let client = StorefrontClient::new(spawn(app).await);

        let err = client.send(&CreateMessageDto::default()).await.unwrap_err();

        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let client = StorefrontClient::new("http://127.0.0.1:1");

        let err = client.search("hat").await.unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
    }
}
