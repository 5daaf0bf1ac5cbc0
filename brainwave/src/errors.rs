//! # API Errors
//!
//! [`ApiError`] is what every Brainwave handler returns on failure. Each variant maps to one
//! HTTP status and renders as a small JSON body:
//!
//! ```json
//! { "error": "Thought with ID '…' not found" }
//! { "error": "Validation failed", "details": [{ "field": "size", "message": "Must be between 1 and 100" }] }
//! ```
//!
//! Database and internal failures are logged through `tracing` and answered with a generic
//! message; their details never reach the client.
//!
//! ```rust,ignore
//! async fn show(Path(id): Path<Uuid>) -> Result<Json<Thought>, ApiError> {
//!     let request = validate_search(&query, &config, FIELDS, ORDER, "updatedAt")?; // 422
//!     let thought = Thought::get_one(&db, owner, id).await?;                       // 404 / 500
//!     Ok(Json(thought))
//! }
//! ```

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use crate::validation::{ValidationError, ValidationErrors};

const DATABASE_ERROR_MESSAGE: &str = "A database error occurred";

/// Failure of an API request, with the HTTP status it answers with.
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found
    NotFound {
        /// Resource type, e.g. "Thought"
        resource: String,
        id: Option<String>,
    },

    /// 400 Bad Request
    BadRequest { message: String },

    /// 401 Unauthorized - missing or rejected credentials
    Unauthorized { message: String },

    /// 403 Forbidden
    Forbidden { message: String },

    /// 409 Conflict - e.g. an email that is already registered
    Conflict { message: String },

    /// 422 Unprocessable Entity - one entry per offending input
    ValidationFailed { errors: Vec<ValidationError> },

    /// 500 Internal Server Error (details logged, not exposed)
    Database { internal: DbErr },

    /// 500 Internal Server Error
    Internal {
        message: String,
        /// Logged, not sent to the client
        internal: Option<String>,
    },
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a 401 Unauthorized error
    ///
    /// # Example
    /// ```rust,ignore
    /// return Err(ApiError::unauthorized("Invalid email or password"));
    /// ```
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a 422 error from a single failed check.
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            errors: vec![ValidationError::new(field, message)],
        }
    }

    #[must_use]
    pub const fn database(err: DbErr) -> Self {
        Self::Database { internal: err }
    }

    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            internal,
        }
    }

    /// HTTP status this error answers with
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The sanitized message sent to clients
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource, id: Some(id) } => format!("{resource} with ID '{id}' not found"),
            Self::NotFound { resource, id: None } => format!("{resource} not found"),
            Self::BadRequest { message }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::Conflict { message }
            | Self::Internal { message, .. } => message.clone(),
            Self::ValidationFailed { errors } => match errors.as_slice() {
                [single] => single.to_string(),
                errors => format!(
                    "Validation failed: {}",
                    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
                ),
            },
            Self::Database { .. } => DATABASE_ERROR_MESSAGE.to_string(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Internal {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error body sent to clients
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Present only for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let body = match self {
            Self::ValidationFailed { errors } => ErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(errors),
            },
            other => ErrorResponse {
                error: other.user_message(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// `DbErr::RecordNotFound` becomes a 404 naming the resource and a unique constraint
/// violation a 409; everything else is a 500.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        if let DbErr::RecordNotFound(msg) = &err {
            return Self::NotFound {
                resource: msg
                    .split_whitespace()
                    .next()
                    .unwrap_or("Resource")
                    .to_string(),
                id: None,
            };
        }
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            tracing::debug!(%detail, "Unique constraint violation");
            return Self::conflict("Resource already exists");
        }
        Self::database(err)
    }
}

/// A request body that is not valid JSON for the endpoint is reported against `body`.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid("body", rejection.body_text())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::ValidationFailed {
            errors: errors.into_errors(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::ValidationFailed {
            errors: vec![error],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_not_found_messages() {
        let err = ApiError::not_found("Thought", Some("123".to_string()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.user_message(), "Thought with ID '123' not found");

        let err = ApiError::not_found("Thought", None);
        assert_eq!(err.user_message(), "Thought not found");
    }

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (ApiError::not_found("Thought", None), StatusCode::NOT_FOUND),
            (ApiError::bad_request("bad"), StatusCode::BAD_REQUEST),
            (ApiError::unauthorized("no"), StatusCode::UNAUTHORIZED),
            (
                ApiError::Forbidden {
                    message: "no".to_string(),
                },
                StatusCode::FORBIDDEN,
            ),
            (ApiError::conflict("taken"), StatusCode::CONFLICT),
            (ApiError::invalid("size", "too big"), StatusCode::UNPROCESSABLE_ENTITY),
            (
                ApiError::database(DbErr::Custom("boom".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::internal("oops", None), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status_code(), expected, "{err:?}");
        }
    }

    #[test]
    fn test_validation_messages() {
        let single = ApiError::invalid("title", "Must be at least 5 characters");
        assert_eq!(single.user_message(), "title: Must be at least 5 characters");

        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::new("page", "Must be at least 1"));
        errors.add(ValidationError::new("size", "Must be a whole number"));
        let many = ApiError::from(errors);
        assert_eq!(
            many.user_message(),
            "Validation failed: page: Must be at least 1, size: Must be a whole number"
        );
    }

    #[test]
    fn test_database_details_are_hidden() {
        let err = ApiError::database(DbErr::Custom("table thoughts is locked".to_string()));
        assert_eq!(err.user_message(), DATABASE_ERROR_MESSAGE);
        assert!(!err.to_string().contains("locked"));
    }

    #[test]
    fn test_record_not_found_becomes_404() {
        let err: ApiError = DbErr::RecordNotFound("Thought not found".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.user_message(), "Thought not found");
    }

    #[test]
    fn test_other_db_errors_become_500() {
        for db_err in [
            DbErr::Custom("custom".to_string()),
            DbErr::Type("type".to_string()),
            DbErr::Json("json".to_string()),
        ] {
            let err: ApiError = db_err.into();
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(err.user_message(), DATABASE_ERROR_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_validation_response_lists_details() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::new("filter", "Invalid filter field: bogus"));
        errors.add(ValidationError::new("orderBy", "Direction must be asc or desc"));

        let (status, json) = body_json(errors.into()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "Validation failed");
        assert_eq!(json["details"][0]["field"], "filter");
        assert_eq!(json["details"][0]["message"], "Invalid filter field: bogus");
        assert_eq!(json["details"][1]["field"], "orderBy");
    }

    #[tokio::test]
    async fn test_plain_response_has_no_details() {
        let (status, json) = body_json(ApiError::conflict("Email is already registered")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"], "Email is already registered");
        assert!(json.get("details").is_none());
    }
}
