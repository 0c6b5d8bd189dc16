use crate::storage::{
    NewThought, StoreError, ThoughtId, ThoughtPatch, ThoughtReplacement, ThoughtStore,
};
use crate::validation::{validate_hearts, validate_message, ValidationError};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

/// Most thoughts returned by a listing.
pub const THOUGHT_LIST_LIMIT: usize = 20;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ThoughtStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ThoughtStore>) -> Self {
        Self { store }
    }
}

/// Request to post a new thought
#[derive(Debug, Deserialize)]
pub struct CreateThoughtRequest {
    pub message: Option<String>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Default, Deserialize)]
pub struct UpdateThoughtRequest {
    pub message: Option<String>,
    pub hearts: Option<i64>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Full replacement of a thought
#[derive(Debug, Deserialize)]
pub struct ReplaceThoughtRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub hearts: i64,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CreateThoughtRequest {
    pub fn validate(self) -> Result<NewThought, ValidationError> {
        let message = validate_message(self.message.as_deref())?;
        Ok(NewThought {
            message: message.to_string(),
        })
    }
}

impl UpdateThoughtRequest {
    pub fn validate(self) -> Result<ThoughtPatch, ValidationError> {
        if let Some(message) = &self.message {
            validate_message(Some(message))?;
        }
        if let Some(hearts) = self.hearts {
            validate_hearts(hearts)?;
        }
        Ok(ThoughtPatch {
            message: self.message,
            hearts: self.hearts,
            created_at: self.created_at,
        })
    }
}

impl ReplaceThoughtRequest {
    pub fn validate(self) -> Result<ThoughtReplacement, ValidationError> {
        let message = validate_message(self.message.as_deref())?.to_string();
        let hearts = validate_hearts(self.hearts)?;
        Ok(ThoughtReplacement {
            message,
            hearts,
            created_at: self.created_at,
        })
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub total_thoughts: u64,
}

/// One entry of the route listing served at `/`
#[derive(Debug, Serialize)]
pub struct EndpointDescriptor {
    pub path: &'static str,
    pub methods: &'static [&'static str],
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("duplicated value for {field}")]
    Duplicate { field: &'static str, value: String },

    #[error("not found")]
    NotFound,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { field, value } => AppError::Duplicate { field, value },
            other => {
                error!(error = %other, "Storage operation failed");
                AppError::InvalidRequest(other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Parse a path id into an ObjectId.
pub fn parse_id(raw: &str) -> Result<ThoughtId, AppError> {
    ThoughtId::parse_str(raw)
        .map_err(|e| AppError::InvalidRequest(format!("invalid id {raw:?}: {e}")))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "validation_error",
                    message: "Thought validation failed".to_string(),
                    fields: None,
                    details: Some(json!({ (err.field()): err.to_string() })),
                },
            ),
            AppError::Duplicate { field, value } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "duplicate_key",
                    message: "Duplicated value".to_string(),
                    fields: Some(json!({ field: value })),
                    details: None,
                },
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: "not_found",
                    message: "Not found".to_string(),
                    fields: None,
                    details: None,
                },
            ),
            AppError::InvalidRequest(detail) => {
                warn!(detail = %detail, "Invalid request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "invalid_request",
                        message: "Invalid request".to_string(),
                        fields: None,
                        details: Some(json!(detail)),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
