use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{
    error::{DbErr, SqlErr},
    sqlx, RuntimeErr,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Error body returned for failures that are not turned into a redirect.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Not Found",
    "message": "Id not found",
    "request_id": "req-abc123xyz",
    "timestamp": "2024-12-09T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Conflict", "Internal Server Error")
    #[schema(example = "Not Found")]
    pub error: String,
    /// Human-readable error description
    #[schema(example = "Id not found")]
    pub message: String,
    /// Field-level validation failures, when the error is a validation error
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    /// Unique request identifier for support and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "req-abc123xyz")]
    pub request_id: Option<String>,
    /// ISO 8601 timestamp when error occurred
    #[schema(example = "2024-12-09T10:30:00.000Z")]
    pub timestamp: String,
}

/// A single failed form constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "name")]
    pub field: String,
    #[schema(example = "Name size should be between 3 and 60")]
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

/// Every failure a service can report. Callers branch on the variant.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    /// The referenced id does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A delete was blocked by dependent rows.
    #[error("{0}")]
    Integrity(String),

    /// An update lost a race against another writer.
    #[error("{0}")]
    DbConcurrency(String),

    /// Submitted form failed field-level constraints.
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error("Internal error: {0}")]
    InternalError(String),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::Validation(field_errors(&err))
    }
}

/// Flattens `validator` output into a stable, field-sorted list.
pub fn field_errors(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| default_message(field, &err.code));
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

/// SQLite reports `ON DELETE RESTRICT` with the trigger constraint code
/// rather than the plain foreign-key one.
const SQLITE_CONSTRAINT_FOREIGNKEY: &str = "787";
const SQLITE_CONSTRAINT_TRIGGER: &str = "1811";

fn is_foreign_key_violation(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) {
        return true;
    }
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(db)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(db))) => {
            matches!(db.kind(), sqlx::error::ErrorKind::ForeignKeyViolation)
                || matches!(
                    db.code().as_deref(),
                    Some(SQLITE_CONSTRAINT_FOREIGNKEY) | Some(SQLITE_CONSTRAINT_TRIGGER)
                )
        }
        _ => false,
    }
}

/// Message for a rule that carries none of its own, e.g. `required`.
fn default_message(field: &str, code: &str) -> String {
    let label = field_label(field);
    match code {
        "required" => format!("{} is required", label),
        _ => format!("{} is invalid", label),
    }
}

/// `birth_date` -> `Birth Date`, `department_id` -> `Department`.
fn field_label(field: &str) -> String {
    field
        .trim_end_matches("_id")
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

impl ServiceError {
    /// Classifies a store error raised by a delete. Foreign-key violations
    /// become `Integrity` with the given message, anything else stays a
    /// database error.
    pub fn from_delete_error(err: DbErr, message: &str) -> Self {
        if is_foreign_key_violation(&err) {
            ServiceError::Integrity(message.to_string())
        } else {
            ServiceError::DatabaseError(err)
        }
    }

    /// True for the conditions controllers turn into an error-page redirect.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Integrity(_) | Self::DbConcurrency(_)
        )
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Integrity(_) | Self::DbConcurrency(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::InternalError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let errors = match &self {
            Self::Validation(errors) => errors.clone(),
            _ => Vec::new(),
        };

        let body = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            errors,
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn service_error_response_includes_request_id() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("req-123"), async {
                ServiceError::NotFound("Id not found".into()).into_response()
            })
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.request_id.as_deref(), Some("req-123"));
        assert_eq!(payload.message, "Id not found");
    }

    #[tokio::test]
    async fn validation_response_lists_field_errors() {
        let response = ServiceError::Validation(vec![FieldError::new("email", "Enter a valid email")])
            .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.errors.len(), 1);
        assert_eq!(payload.errors[0].field, "email");
    }

    #[test]
    fn status_code_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Integrity("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::DbConcurrency("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::Validation(Vec::new()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::DatabaseError(DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_message_hides_store_details() {
        assert_eq!(
            ServiceError::DatabaseError(DbErr::Custom("password=hunter2".into()))
                .response_message(),
            "Database error"
        );
        assert_eq!(
            ServiceError::Integrity("Can't delete seller because they have sales".into())
                .response_message(),
            "Can't delete seller because they have sales"
        );
    }

    #[test]
    fn rules_without_message_get_a_labelled_default() {
        assert_eq!(default_message("birth_date", "required"), "Birth Date is required");
        assert_eq!(default_message("department_id", "required"), "Department is required");
        assert_eq!(default_message("version", "integer"), "Version is invalid");
    }

    #[test]
    fn non_constraint_delete_errors_stay_database_errors() {
        let err = ServiceError::from_delete_error(
            DbErr::Exec(RuntimeErr::Internal("connection reset".into())),
            "blocked",
        );
        assert!(matches!(err, ServiceError::DatabaseError(_)));
        assert!(!err.is_user_facing());
    }
}
