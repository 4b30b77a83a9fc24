//! Response wrapper pairing a JSON payload with its status and request ID.

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use searoute_lib::{ApiResponse, ErrorKind};

use crate::error_response::status_for_kind;
use crate::middleware::REQUEST_ID_HEADER;

/// A JSON payload with the status it should be sent with.
///
/// # Example
///
/// ```
/// use searoute_service_shared::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Health {
///     status: &'static str,
/// }
///
/// let response = ServiceResponse::ok(Health { status: "healthy" }).with_request_id("req-1");
/// assert_eq!(response.status.as_u16(), 200);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceResponse<T> {
    pub status: StatusCode,
    pub body: T,
    pub request_id: Option<String>,
}

impl<T> ServiceResponse<T> {
    /// 200 with `body`.
    pub fn ok(body: T) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    pub fn with_status(status: StatusCode, body: T) -> Self {
        Self {
            status,
            body,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl<T: Serialize> ServiceResponse<ApiResponse<T>> {
    /// Status follows the envelope: 200 on success, otherwise by error kind.
    pub fn from_envelope(body: ApiResponse<T>) -> Self {
        let status = body
            .error_kind()
            .map(status_for_kind)
            .unwrap_or(StatusCode::OK);
        Self::with_status(status, body)
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.body.error_kind()
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        if let Some(value) = self
            .request_id
            .as_deref()
            .and_then(|id| HeaderValue::from_str(id).ok())
        {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
}
