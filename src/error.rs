use axum::{
    http::StatusCode,
    response::{ IntoResponse, Response },
};
use thiserror::Error;
use crate::llm::chat::ChatError;

/// Failures surfaced by the `/chat` endpoint. Client input errors map to 4xx,
/// completion backend failures to 500 with the backend's error text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Only POST allowed")]
    MethodNotAllowed,

    #[error("Invalid JSON")]
    InvalidJson,

    #[error("user_id and message required")]
    MissingFields,

    #[error(transparent)]
    Completion(#[from] ChatError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidJson | ApiError::MissingFields => StatusCode::BAD_REQUEST,
            ApiError::Completion(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
