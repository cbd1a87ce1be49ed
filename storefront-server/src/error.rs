//! Service-layer error type
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `BoxError`) and the
//! API-layer error (`AppError`), so handlers can use `?` on both.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// - `Db`: database/infrastructure errors (logged, mapped to InternalError)
/// - `App`: business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Log a DB error and hide it behind `InternalError`
pub fn internal(e: impl std::fmt::Display) -> AppError {
    tracing::error!("Database query error: {e}");
    AppError::new(ErrorCode::InternalError)
}

/// Unique-constraint violation (Postgres 23505)
pub fn is_unique_violation(e: &BoxError) -> bool {
    e.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.code().as_deref() == Some("23505"))
}

/// Map a write error: unique violations become `conflict`, the rest InternalError
pub fn write_error(e: BoxError, conflict: ErrorCode) -> AppError {
    if is_unique_violation(&e) {
        AppError::new(conflict)
    } else {
        internal(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_hidden_from_client() {
        let err: BoxError = "connection reset".into();
        let app: AppError = ServiceError::from(err).into();
        assert_eq!(app.code, ErrorCode::InternalError);
        assert!(!app.message.contains("connection reset"));
    }

    #[test]
    fn test_app_error_passes_through() {
        let app: AppError = ServiceError::from(AppError::new(ErrorCode::ProductNotFound)).into();
        assert_eq!(app.code, ErrorCode::ProductNotFound);
    }

    #[test]
    fn test_write_error_without_db_error() {
        let err: BoxError = "boom".into();
        assert_eq!(write_error(err, ErrorCode::CategorySlugExists).code, ErrorCode::InternalError);
    }

    #[derive(Debug)]
    struct UniqueViolation;

    impl std::fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("duplicate key value violates unique constraint")
        }
    }

    impl std::error::Error for UniqueViolation {}

    impl sqlx::error::DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
            Some("23505".into())
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn test_unique_violation_detected() {
        let err: BoxError = Box::new(sqlx::Error::Database(Box::new(UniqueViolation)));
        assert!(is_unique_violation(&err));
        assert_eq!(write_error(err, ErrorCode::MaterialCodeExists).code, ErrorCode::MaterialCodeExists);

        let other: BoxError = Box::new(sqlx::Error::RowNotFound);
        assert!(!is_unique_violation(&other));
    }
}
