use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] database::DbError),
    /// The request body is not JSON of the expected shape.
    #[error("Unable to decode the request body: {0}")]
    Decode(#[from] JsonRejection),
    /// A path parameter could not be coerced to its type.
    #[error("{0}")]
    Validation(#[from] core_types::CoreError),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Client mistakes are answered with 400 and the reason; backend failures are
/// logged and answered with a generic message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(db_err) if db_err.is_connection() => {
                tracing::error!(error = ?db_err, "Database connection error.");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "The database is unavailable".to_string(),
                )
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::Decode(rejection) => {
                tracing::warn!(error = %rejection, "Rejected request body.");
                (
                    StatusCode::BAD_REQUEST,
                    format!("Unable to decode the request body: {}", rejection.body_text()),
                )
            }
            AppError::Validation(err) => {
                tracing::warn!(error = %err, "Rejected path parameter.");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
