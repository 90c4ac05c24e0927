//! Set store error types

use thiserror::Error;

use super::types::SetId;

/// Errors that can occur in a set store
#[derive(Error, Debug)]
pub enum SetStoreError {
    /// No set with the requested id
    #[error("Set not found: {0}")]
    NotFound(SetId),

    /// The backing database rejected an operation
    #[error("Database error: {0}")]
    Database(String),

    /// I/O operation failed (creating the database directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<rusqlite::Error> for SetStoreError {
    fn from(err: rusqlite::Error) -> Self {
        SetStoreError::Database(err.to_string())
    }
}

/// Result type alias for set store operations
pub type SetStoreResult<T> = Result<T, SetStoreError>;

/// One or more field rules violated by a `NewSet`
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", .problems.concat())]
pub struct ValidationError {
    problems: Vec<String>,
}

impl ValidationError {
    pub fn new(problems: Vec<String>) -> Self {
        Self { problems }
    }

    pub fn problems(&self) -> &[String] {
        &self.problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SetStoreError::NotFound(SetId(42));
        assert_eq!(err.to_string(), "Set not found: 42");
    }

    #[test]
    fn test_sqlite_error_conversion() {
        let err: SetStoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, SetStoreError::Database(_)));
    }
}
