//! Uniform response envelope and error mapping.
//!
//! Every endpoint responds with `{success, data?, message?, errors?}`.
//! Status codes: 200/201 on success, 404 for not-found, 422 for validation
//! failures (with the per-field map), 500 for everything else (raw message,
//! no sanitization).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use mentora_error::{MentoraError, MentoraErrorKind};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

/// The uniform response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

/// 200 with data.
pub fn ok<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }),
    )
        .into_response()
}

/// 201 with data.
pub fn created<T: Serialize>(data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(Envelope {
            success: true,
            data: Some(data),
            message: Some("Created".to_string()),
            errors: None,
        }),
    )
        .into_response()
}

/// 200 with a message and no data.
pub fn message(text: impl Into<String>) -> Response {
    (
        StatusCode::OK,
        Json(Envelope::<serde_json::Value> {
            success: true,
            data: None,
            message: Some(text.into()),
            errors: None,
        }),
    )
        .into_response()
}

/// Error wrapper implementing the envelope mapping.
#[derive(Debug)]
pub struct ApiError(MentoraError);

impl<E> From<E> for ApiError
where
    E: Into<MentoraError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0.kind() {
            MentoraErrorKind::Validation(validation) => {
                let body = json!({
                    "success": false,
                    "message": "Validation failed",
                    "errors": validation.fields(),
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            MentoraErrorKind::Database(db) if db.is_not_found() => {
                let body = json!({
                    "success": false,
                    "message": "Resource not found",
                });
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            _ => {
                tracing::error!(error = %self.0, "Unhandled error in request handler");
                let body = json!({
                    "success": false,
                    "message": self.0.to_string(),
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

/// Result alias for request handlers.
pub type ApiResult = Result<Response, ApiError>;

/// 404 for references that resolve to nothing.
pub fn not_found() -> ApiError {
    ApiError(mentora_error::DatabaseError::new(mentora_error::DatabaseErrorKind::NotFound).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentora_error::ValidationError;

    #[test]
    fn validation_maps_to_422() {
        let err: ApiError = ValidationError::single("email", "email is required").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn envelope_omits_empty_fields() {
        let body = Envelope {
            success: true,
            data: Some(1),
            message: None,
            errors: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"success":true,"data":1}"#);
    }
}
