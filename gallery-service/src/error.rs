//! Failure response for the gallery endpoints.
//!
//! Generation, upload and persistence errors are not told apart: whichever
//! step fails ends the request with `500 { message, error }`.

use crate::dtos::ErrorBody;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt::Display;

pub const GENERATE_FAILED: &str = "Error generating image";
pub const LIST_FAILED: &str = "Error fetching images";

#[derive(Debug)]
pub struct StepFailed {
    message: &'static str,
    error: String,
}

impl StepFailed {
    /// Log `err` under `message` and wrap it for the response.
    pub fn new(message: &'static str, err: impl Display) -> Self {
        let error = err.to_string();
        tracing::error!("{}: {}", message, error);
        Self { message, error }
    }
}

impl IntoResponse for StepFailed {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                message: self.message.to_string(),
                error: self.error,
            }),
        )
            .into_response()
    }
}
