use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::store::StoreError;

/// What the client sees on any internal failure. Real detail goes to the
/// server log only.
const GENERIC_ERROR_BODY: &str = "Something went sideways. Please try again.";

#[derive(Debug)]
pub enum AppError {
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_BODY).into_response()
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}
