//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `StorageError`.

use budgetsync_core::storage::StorageError;

fn map_rusqlite_error(err: &rusqlite::Error, entity_type: &'static str, id: &str) -> StorageError {
    match err {
        rusqlite::Error::QueryReturnedNoRows => StorageError::not_found(entity_type, id),

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            StorageError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StorageError::InvalidData(format!("Constraint violation for {entity_type} {id}"))
        }

        rusqlite::Error::FromSqlConversionFailure(..) => {
            StorageError::Serialization(format!("Malformed {entity_type} row: {err}"))
        }

        _ => StorageError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a StorageError.
///
/// `id` is reported in `NotFound` errors; pass an empty string for bulk
/// operations.
pub fn map_tokio_rusqlite_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: impl ToString,
) -> StorageError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error(rusqlite_err, entity_type, &id.to_string())
        }
        tokio_rusqlite::Error::Close(_) | tokio_rusqlite::Error::ConnectionClosed => {
            StorageError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => StorageError::QueryFailed(err.to_string()),
    }
}
