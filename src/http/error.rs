//! Mapping of gateway errors to HTTP responses.
//!
//! Every error renders as
//! `{"error": {"code": ..., "message": ..., "statusCode": ..., ...}}`.

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::resilience::BreakerError;
use crate::todo::TodoError;

pub const DEFAULT_VALIDATION_MESSAGE: &str = "Invalid request parameters";

/// One invalid input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },

    #[error(transparent)]
    Todo(#[from] TodoError),

    #[error("Rate limit exceeded")]
    RateLimited,
}

impl ApiError {
    pub fn validation(details: Vec<FieldError>) -> Self {
        ApiError::Validation {
            message: DEFAULT_VALIDATION_MESSAGE.to_string(),
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Todo(TodoError::Decode(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Todo(TodoError::Breaker(err)) => match err {
                BreakerError::CircuitOpen { .. } => StatusCode::SERVICE_UNAVAILABLE,
                BreakerError::EmptyResult { .. } => StatusCode::NOT_FOUND,
                BreakerError::RequestFailed { .. } => StatusCode::BAD_GATEWAY,
            },
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "ValidationError",
            ApiError::RateLimited => "RateLimitError",
            ApiError::Todo(TodoError::Decode(_)) => "UpstreamError",
            ApiError::Todo(TodoError::Breaker(err)) => match err {
                BreakerError::CircuitOpen { .. } => "CircuitOpenError",
                BreakerError::EmptyResult { .. } => "ApplicationError",
                BreakerError::RequestFailed { .. } => "UpstreamError",
            },
        }
    }
}

impl From<BreakerError> for ApiError {
    fn from(err: BreakerError) -> Self {
        ApiError::Todo(TodoError::Breaker(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut body = Map::new();
        body.insert("code".into(), json!(self.code()));
        body.insert("statusCode".into(), json!(status.as_u16()));

        let mut retry_after = None;
        match &self {
            ApiError::Validation { message, details } => {
                body.insert("message".into(), json!(message));
                body.insert("details".into(), json!(details));
            }
            ApiError::Todo(TodoError::Breaker(BreakerError::EmptyResult { .. })) => {
                body.insert("message".into(), json!("No data found"));
            }
            ApiError::Todo(TodoError::Breaker(BreakerError::CircuitOpen { retry_in, .. })) => {
                let secs = retry_in.as_secs() + u64::from(retry_in.subsec_nanos() > 0);
                retry_after = Some(secs);
                body.insert("message".into(), json!(self.to_string()));
                body.insert("retryAfter".into(), json!(secs));
            }
            ApiError::Todo(TodoError::Breaker(BreakerError::RequestFailed { source, .. })) => {
                body.insert("message".into(), json!(source.message));
                if let Some(upstream) = source.status {
                    body.insert("upstreamStatus".into(), json!(upstream));
                }
            }
            other => {
                body.insert("message".into(), json!(other.to_string()));
            }
        }

        let mut response = (status, Json(json!({ "error": Value::Object(body) }))).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
