//! Error types for store and domain operations.
//!
//! Uniqueness violations are surfaced as their own variant so the message
//! repository can fold them into a duplicate outcome. Every other database
//! failure is an opaque storage fault.

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for store and domain operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Unique constraint violated by an insert.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Input rejected before reaching the database.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    /// Returns true for uniqueness violations reported by the storage engine.
    pub const fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::ConstraintViolation(db_err.message().to_string());
            }
        }
        Self::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_is_a_database_fault() {
        let err = CoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, CoreError::Database(_)));
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn pool_closed_is_a_database_fault() {
        let err = CoreError::from(sqlx::Error::PoolClosed);
        assert!(matches!(err, CoreError::Database(_)));
    }

    #[test]
    fn constraint_violation_is_flagged() {
        let err = CoreError::ConstraintViolation("messages.message_id".to_string());
        assert!(err.is_constraint_violation());
        assert_eq!(err.to_string(), "Constraint violation: messages.message_id");
    }
}
