//! Error handling utilities for repositories

use rolebot_core::error::StoreError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to StoreError
pub fn map_db_error(e: SqlxError) -> StoreError {
    StoreError::Database(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> StoreError
where
    F: FnOnce() -> StoreError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}

/// Missing parent row on a child insert
pub fn map_foreign_key_violation(e: SqlxError, tracked_message_id: i32) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return StoreError::TrackedMessageNotFound(tracked_message_id);
        }
    }
    map_db_error(e)
}

/// Child insert: taken position or missing parent row
pub fn map_child_insert_error(e: SqlxError, tracked_message_id: i32, position: i32) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return StoreError::DuplicatePosition {
                tracked_message_id,
                position,
            };
        }
    }
    map_foreign_key_violation(e, tracked_message_id)
}

pub fn map_schema_error(e: SqlxError) -> StoreError {
    StoreError::Schema(e.to_string())
}
