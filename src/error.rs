//! Error handling for the query layer.
//!
//! The HTTP-facing error mapping lives on `quote::QuoteError`; this type only
//! wraps what the database layer can raise.

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(err.to_string().starts_with("Database error"));
    }
}
