use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// JSON error body: `{"error": <title>, "detail": <message>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, detail: Option<String>) -> Self {
        Self { status, error, detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({"error": self.error, "detail": self.detail});
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)),
            ServiceError::Store(msg) => {
                error!(err = %msg, "store call failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Store Error", Some(msg))
            }
            ServiceError::Schema(msg) => {
                error!(err = %msg, "schema mismatch");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Schema Error", Some(msg))
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot open document: {0}")]
    Store(#[from] ServiceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status() {
        let v: JsonApiError = ServiceError::Validation("Invalid year for getRosterYear: 25".into()).into();
        assert_eq!(v.status, StatusCode::BAD_REQUEST);
        assert_eq!(v.detail.as_deref(), Some("Invalid year for getRosterYear: 25"));
        let s: JsonApiError = ServiceError::Store("disk".into()).into();
        assert_eq!(s.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(s.error, "Store Error");
    }

    #[test]
    fn startup_error_names_the_document_failure() {
        let e: StartupError = ServiceError::Store("invalid document identifier: \"a/b\"".into()).into();
        assert!(e.to_string().starts_with("cannot open document:"));
    }
}
