use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::shared::constants::messages;

/// JSON extractor whose rejections use the `{ "error": ... }` envelope
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        match &self.0 {
            JsonRejection::JsonDataError(err) => tracing::debug!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => tracing::debug!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                tracing::debug!("Missing JSON content type: {}", err)
            }
            other => tracing::debug!("Failed to parse JSON body: {}", other),
        }

        AppError::BadRequest(messages::INVALID_REQUEST_BODY.to_string()).into_response()
    }
}

/// Query string extractor; unparseable parameters become `400 { "error": ... }`
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!("Invalid query string: {}", rejection);
                Err(AppError::BadRequest(
                    messages::INVALID_QUERY_PARAMS.to_string(),
                ))
            }
        }
    }
}
