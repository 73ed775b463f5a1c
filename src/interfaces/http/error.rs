use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::CheckoutError;

pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Any failure while proxying an order, reported as `500 {"error": message}`.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl From<CheckoutError> for HttpError {
    fn from(err: CheckoutError) -> Self {
        let message = err.to_string();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: if message.is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                message
            },
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}
