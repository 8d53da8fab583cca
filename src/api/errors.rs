use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::dto::DatasetDto;
use crate::datasets::DatasetError;

/// Request-level failure, mapped onto the API's fixed error shapes.
#[derive(Debug)]
pub enum ApiError {
    /// Body could not be parsed as JSON with the expected field types.
    InvalidJson,
    /// Identifier does not resolve to a stored dataset. Malformed ids land
    /// here too; they are indistinguishable from unknown ones.
    NotFound,
    /// Domain validation failed; carries the rejected entity with its
    /// `errors` map already attached.
    Validation(Box<DatasetDto>),
    /// Store failures and anything else unexpected.
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidJson => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Invalid JSON" })),
            )
                .into_response(),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "Dataset Not Found" })),
            )
                .into_response(),
            ApiError::Validation(dto) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(*dto)).into_response()
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": e.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

impl From<DatasetError> for ApiError {
    fn from(e: DatasetError) -> Self {
        match e {
            DatasetError::NotFound => Self::NotFound,
            DatasetError::Validation { dataset, errors } => {
                Self::Validation(Box::new(DatasetDto::with_errors(dataset, errors)))
            }
            DatasetError::Store(e) => Self::Internal(e.into()),
        }
    }
}
