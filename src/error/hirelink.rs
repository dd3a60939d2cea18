use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error as ThisError;

use super::IsRetryable;

/// Which storage constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    Check,
    ForeignKey,
    Unique,
    NotNull,
    Other,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConstraintKind::Check => "check",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::Unique => "unique",
            ConstraintKind::NotNull => "not null",
            ConstraintKind::Other => "other",
        };
        f.write_str(s)
    }
}

#[derive(Debug, ThisError)]
pub enum HirelinkError {
    /// The store refused a write. Retrying with the same input fails again.
    #[error("{kind} constraint violated: {message}")]
    Constraint {
        kind: ConstraintKind,
        message: String,
    },

    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Unknown relation {0:?}")]
    UnknownRelation(String),

    #[error("Relation {relation:?} does not connect {parent} to {child}")]
    RelationMismatch {
        relation: String,
        parent: &'static str,
        child: &'static str,
    },

    #[error("Invalid relation catalogue: {0}")]
    InvalidRelation(String),

    #[error("Unknown column {column:?} on table {table}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("Per-parent limit is not supported on relation {0:?}")]
    UnsupportedLimit(String),

    /// A stored workload tag outside the closed set.
    #[error(transparent)]
    InvalidWorkload(#[from] hirelink_schema::UnknownWorkload),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// The workload tag that failed to decode, if that is what `err` is.
fn unknown_workload(err: &sqlx::Error) -> Option<hirelink_schema::UnknownWorkload> {
    let source = match err {
        sqlx::Error::Decode(source) | sqlx::Error::ColumnDecode { source, .. } => source,
        _ => return None,
    };
    (**source)
        .downcast_ref::<hirelink_schema::UnknownWorkload>()
        .cloned()
}

impl From<sqlx::Error> for HirelinkError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(unknown) = unknown_workload(&err) {
            return HirelinkError::InvalidWorkload(unknown);
        }

        let kind = match &err {
            sqlx::Error::Database(db) => match db.kind() {
                sqlx::error::ErrorKind::CheckViolation => Some(ConstraintKind::Check),
                sqlx::error::ErrorKind::ForeignKeyViolation => Some(ConstraintKind::ForeignKey),
                sqlx::error::ErrorKind::UniqueViolation => Some(ConstraintKind::Unique),
                sqlx::error::ErrorKind::NotNullViolation => Some(ConstraintKind::NotNull),
                _ if db.message().contains("constraint failed") => Some(ConstraintKind::Other),
                _ => None,
            },
            _ => None,
        };

        match (kind, err) {
            (Some(kind), sqlx::Error::Database(db)) => HirelinkError::Constraint {
                kind,
                message: db.message().to_string(),
            },
            (_, err) => HirelinkError::DatabaseError(err),
        }
    }
}

impl HirelinkError {
    pub fn is_constraint(&self, expected: ConstraintKind) -> bool {
        matches!(self, HirelinkError::Constraint { kind, .. } if *kind == expected)
    }
}

impl IsRetryable for HirelinkError {
    fn is_retryable(&self) -> bool {
        match self {
            HirelinkError::DatabaseError(err) => matches!(
                err,
                sqlx::Error::Io(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::WorkerCrashed
            ),
            HirelinkError::IoError(_) => true,
            _ => false,
        }
    }
}

impl IntoResponse for HirelinkError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            HirelinkError::Constraint { kind, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorObject {
                    code: "CONSTRAINT_VIOLATION".to_string(),
                    message,
                    details: Some(serde_json::json!({ "constraint": kind })),
                },
            ),

            HirelinkError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ApiErrorObject {
                    code: "NOT_FOUND".to_string(),
                    message: what,
                    details: None,
                },
            ),

            HirelinkError::DatabaseError(_)
            | HirelinkError::UnknownRelation(_)
            | HirelinkError::RelationMismatch { .. }
            | HirelinkError::InvalidRelation(_)
            | HirelinkError::UnknownColumn { .. }
            | HirelinkError::UnsupportedLimit(_)
            | HirelinkError::InvalidWorkload(_)
            | HirelinkError::ConfigError(_)
            | HirelinkError::InvalidConfig(_)
            | HirelinkError::JsonError(_)
            | HirelinkError::IoError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorObject {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                    details: None,
                },
            ),
        };
        (status, Json(ApiErrorBody { inner: error_body })).into_response()
    }
}

/// Standardized API error response payload.
#[derive(Serialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeouts_are_transient_and_programmer_errors_are_not() {
        assert!(HirelinkError::DatabaseError(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(!HirelinkError::UnknownRelation("nope".to_string()).is_retryable());
        assert!(
            !HirelinkError::Constraint {
                kind: ConstraintKind::Check,
                message: "CHECK constraint failed".to_string(),
            }
            .is_retryable()
        );
    }

    #[test]
    fn row_not_found_is_not_a_constraint() {
        let err = HirelinkError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, HirelinkError::DatabaseError(_)));
        assert!(!err.is_constraint(ConstraintKind::Check));
    }

    #[test]
    fn undecodable_workload_tags_surface_as_invalid_workload() {
        let unknown = hirelink_schema::UnknownWorkload("Fulltime".to_string());
        let err = HirelinkError::from(sqlx::Error::Decode(Box::new(unknown.clone())));
        assert!(matches!(&err, HirelinkError::InvalidWorkload(u) if *u == unknown));

        let err = HirelinkError::from(sqlx::Error::ColumnDecode {
            index: "\"workload\"".to_string(),
            source: Box::new(unknown),
        });
        assert!(matches!(err, HirelinkError::InvalidWorkload(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let other = HirelinkError::from(sqlx::Error::Decode("not a number".into()));
        assert!(matches!(other, HirelinkError::DatabaseError(_)));
    }

    #[test]
    fn constraint_maps_to_unprocessable_entity() {
        let resp = HirelinkError::Constraint {
            kind: ConstraintKind::ForeignKey,
            message: "FOREIGN KEY constraint failed".to_string(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
