//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("token not found")]
    NotFound,

    #[error("user id must be positive")]
    InvalidUserId,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        match error {
            Error::RowNotFound => Self::NotFound,
            _ => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rows_are_not_found() {
        assert!(matches!(
            AuthServiceError::from(Error::RowNotFound),
            AuthServiceError::NotFound
        ));
    }

    #[test]
    fn other_errors_are_storage_errors() {
        assert!(matches!(
            AuthServiceError::from(Error::PoolTimedOut),
            AuthServiceError::Sql(Error::PoolTimedOut)
        ));
    }
}
