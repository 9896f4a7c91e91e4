use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::errors::{ReportError, SchedulingError};
use persistence::repositories::AppointmentSaveError;
use serde::Serialize;
use thiserror::Error;

/// SQLite extended result codes surfaced by sqlx.
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";
const SQLITE_CONSTRAINT_FOREIGNKEY: &str = "787";
const SQLITE_CONSTRAINT_CHECK: &str = "275";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Field-level validation failures.
    #[error("Validation error: {} invalid field(s)", .0.len())]
    InvalidFields(Vec<ValidationDetail>),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg, None),
            ApiError::InvalidFields(details) => {
                let message = match details.as_slice() {
                    [only] => format!("{}: {}", only.field, only.message),
                    _ => format!("{} validation errors", details.len()),
                };
                (
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    message,
                    Some(details),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
                None,
            ),
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(SQLITE_CONSTRAINT_UNIQUE) | Some(SQLITE_CONSTRAINT_PRIMARYKEY) => {
                    ApiError::Conflict("Resource already exists".into())
                }
                Some(SQLITE_CONSTRAINT_FOREIGNKEY) => {
                    ApiError::NotFound("Referenced resource not found".into())
                }
                Some(SQLITE_CONSTRAINT_CHECK) => {
                    ApiError::Validation("A value is outside its allowed range".into())
                }
                _ => ApiError::Internal(format!("Database error: {}", db_err)),
            },
            sqlx::Error::PoolTimedOut => {
                ApiError::ServiceUnavailable("Database is busy, try again".into())
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details = Vec::new();
        collect_details("", &errors, &mut details);
        details.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::InvalidFields(details)
    }
}

/// Flattens nested and list errors into dotted field paths such as
/// `clients[1].phone`.
fn collect_details(
    prefix: &str,
    errors: &validator::ValidationErrors,
    out: &mut Vec<ValidationDetail>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|e| ValidationDetail {
                    field: path.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_details(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_details(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

impl From<SchedulingError> for ApiError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::Conflict { .. } => ApiError::Conflict(err.to_string()),
            SchedulingError::InvalidBusinessHours(_) => ApiError::Internal(err.to_string()),
            _ => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<AppointmentSaveError> for ApiError {
    fn from(err: AppointmentSaveError) -> Self {
        match err {
            AppointmentSaveError::Database(e) => e.into(),
            AppointmentSaveError::ServiceNotFound(id) => {
                ApiError::NotFound(format!("Service {} not found", id))
            }
            AppointmentSaveError::Rejected { source, .. } => source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use chrono::NaiveTime;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_api_error_unauthorized() {
        let error = ApiError::Unauthorized("test message".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_api_error_not_found() {
        let error = ApiError::NotFound("resource not found".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_api_error_conflict() {
        let error = ApiError::Conflict("already exists".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_api_error_validation() {
        let error = ApiError::Validation("invalid input".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_api_error_internal() {
        let error = ApiError::Internal("database connection failed".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_api_error_service_unavailable() {
        let error = ApiError::ServiceUnavailable("maintenance".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            format!("{}", ApiError::Unauthorized("test".to_string())),
            "Unauthorized: test"
        );
        assert_eq!(
            format!("{}", ApiError::NotFound("Client 3".to_string())),
            "Not found: Client 3"
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response = ApiError::Internal("disk I/O error".to_string()).into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "An internal error occurred");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, ApiError::NotFound(_)));
    }

    #[test]
    fn test_from_sqlx_pool_timeout() {
        let error: ApiError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(error, ApiError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_from_scheduling_conflict() {
        let error: ApiError = SchedulingError::Conflict {
            appointment_id: 1,
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        }
        .into();
        match error {
            ApiError::Conflict(message) => {
                assert_eq!(
                    message,
                    "Time slot conflicts with appointment from 09:00 to 09:30"
                )
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_from_scheduling_validation() {
        let error: ApiError = SchedulingError::InvalidDuration.into();
        assert!(matches!(error, ApiError::Validation(_)));
        let error: ApiError = SchedulingError::InvalidTimeRange.into();
        assert!(matches!(error, ApiError::Validation(_)));
    }

    #[test]
    fn test_from_save_error() {
        let error: ApiError = AppointmentSaveError::ServiceNotFound(4).into();
        match error {
            ApiError::NotFound(message) => assert_eq!(message, "Service 4 not found"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_nested_validation_details() {
        let request: domain::models::SaveClientsRequest = serde_json::from_str(
            r#"{ "clients": [ { "name": "Ok" }, { "name": "Bad", "phone": "123" } ] }"#,
        )
        .unwrap();
        let error: ApiError = request.validate().unwrap_err().into();

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0]["field"], "clients[1].phone");
        assert_eq!(
            body["message"],
            "clients[1].phone: Phone must have 10 or 11 digits"
        );
    }
}
