use account_store::AccountError;
use axum::Json;
use http::StatusCode;
use serde_json::{Value, json};

/// Error shape every failing endpoint produces: a status code plus a JSON
/// object with a single human-readable `error` string.
pub(crate) type ApiError = (StatusCode, Json<Value>);

pub(crate) fn error_response(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

/// Helper trait for converting errors to a standard response error format
pub(super) trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, ApiError>;
}

/// Implementation for AccountError to map variants to appropriate status codes
impl<T> IntoResponseError<T> for Result<T, AccountError> {
    fn into_response_error(self) -> Result<T, ApiError> {
        self.map_err(|e| {
            let status = match e {
                AccountError::MissingField(_) => StatusCode::BAD_REQUEST,
                AccountError::DuplicateEmail => StatusCode::BAD_REQUEST,
                AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AccountError::Hash(_) | AccountError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            error_response(status, &e.to_string())
        })
    }
}
