use models::errors::{StoreError, StoreErrorCode};
use thiserror::Error;

pub const EMAIL_REQUIRED: &str = "email required";
pub const EMAIL_TAKEN: &str = "email already exists";
pub const NOTHING_TO_UPDATE: &str = "no data provided for update";
pub const CUSTOMER_NOT_FOUND: &str = "customer not found";

/// Repository failures. "No rows" never shows up here: the repository turns
/// it into `None`/`false`.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The store's unique constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err.code {
            StoreErrorCode::UniqueViolation => RepositoryError::Conflict(err.message),
            _ => RepositoryError::Store(err),
        }
    }
}

/// Business outcome of a failed customer operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomerError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl CustomerError {
    pub fn not_found() -> Self {
        Self::NotFound(CUSTOMER_NOT_FOUND.into())
    }

    pub fn email_taken() -> Self {
        Self::Conflict(EMAIL_TAKEN.into())
    }

    /// Stable kind name for logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            CustomerError::Validation(_) => "validation",
            CustomerError::NotFound(_) => "not_found",
            CustomerError::Conflict(_) => "conflict",
            CustomerError::Internal(_) => "internal",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CustomerError::Validation(m)
            | CustomerError::NotFound(m)
            | CustomerError::Conflict(m)
            | CustomerError::Internal(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_becomes_conflict() {
        let err = RepositoryError::from(StoreError::new(StoreErrorCode::UniqueViolation, "dup"));
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[test]
    fn other_codes_pass_through() {
        let err = RepositoryError::from(StoreError::new(StoreErrorCode::Other("08006".into()), "down"));
        match err {
            RepositoryError::Store(e) => assert_eq!(e.code.as_str(), "08006"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(CustomerError::not_found().kind(), "not_found");
        assert_eq!(CustomerError::email_taken().message(), "email already exists");
    }
}
