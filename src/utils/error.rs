use std::fmt;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    NotFound(String),
    DuplicateKey(String),
    InvalidRequest(String),
    TransactionFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::DuplicateKey(msg) => write!(f, "Duplicate key: {}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::TransactionFailed(msg) => write!(f, "Transaction failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Classifies a driver error, keeping unique-index violations as their
    /// own kind so callers can answer 409 instead of 500.
    pub fn from_mongo(error: mongodb::error::Error) -> AppError {
        if is_duplicate_key(&error) {
            AppError::DuplicateKey(error.to_string())
        } else {
            AppError::DatabaseError(error.to_string())
        }
    }
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match &*error.kind {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        // findAndModify reports unique-index violations as a command error
        ErrorKind::Command(command_error) => command_error.code == 11000,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_cause() {
        let error = AppError::DuplicateKey("email".to_string());
        assert_eq!(error.to_string(), "Duplicate key: email");

        let error = AppError::TransactionFailed("Failed to create user with role: boom".to_string());
        assert!(error.to_string().starts_with("Transaction failed:"));
    }
}
