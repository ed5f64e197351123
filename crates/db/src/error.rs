//! Classification of driver errors into domain errors.

use devices_core::error::CoreError;

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Map a sqlx error to a [`CoreError`].
///
/// - Unique constraint violations map to `Conflict`.
/// - Everything else maps to `Storage`.
///
/// Missing rows are handled by the callers with `fetch_optional`, so
/// `RowNotFound` never carries an id here and is treated as storage failure.
pub fn classify(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown");
            return CoreError::Conflict(format!(
                "Duplicate value violates unique constraint: {constraint}"
            ));
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Storage(err.to_string())
}
