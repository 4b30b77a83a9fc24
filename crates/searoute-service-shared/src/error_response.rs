//! JSON failure envelope and HTTP status mapping.
//!
//! Every error body has the shape `{success: false, error, error_kind}` so
//! clients can branch on `error_kind` regardless of the status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use searoute_lib::{Error as LibError, ErrorKind};

use crate::middleware::REQUEST_ID_HEADER;

/// HTTP status for an error classification.
///
/// Partial results (unreachable, no route) are 422, an exhausted search
/// budget is 504.
pub fn status_for_kind(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidCoordinate | ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Unreachable | ErrorKind::NoRoute => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::SearchTimeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Failure envelope returned by every endpoint.
///
/// # Example
///
/// ```
/// use searoute_service_shared::ErrorResponse;
///
/// let error = ErrorResponse::bad_request("The 'origin' field is required", "req-12345");
/// assert_eq!(error.status, 400);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    pub error: String,
    pub error_kind: ErrorKind,
    /// Correlation ID of the failed request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// HTTP status; carried in the status line, not the body.
    #[serde(skip)]
    pub status: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, error_kind: ErrorKind) -> Self {
        Self {
            success: false,
            error: error.into(),
            error_kind,
            request_id: None,
            status: status_for_kind(error_kind).as_u16(),
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// 400 for malformed or out-of-range input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(detail, ErrorKind::InvalidRequest).with_request_id(request_id)
    }

    /// 500 for failures that are not the caller's fault.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(detail, ErrorKind::Internal).with_request_id(request_id)
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_kind, self.error)
    }
}

impl std::error::Error for ErrorResponse {}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let request_id = self
            .request_id
            .as_deref()
            .and_then(|id| axum::http::HeaderValue::from_str(id).ok());

        let mut response = (status, Json(&self)).into_response();
        if let Some(value) = request_id {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
}

/// Convert a library error into the failure envelope.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ErrorResponse {
    let message = match error {
        LibError::DataLoad { .. } | LibError::Io(_) | LibError::Json(_) => {
            "reference data is unavailable".to_string()
        }
        other => other.to_string(),
    };
    ErrorResponse::new(message, error.kind()).with_request_id(request_id)
}
