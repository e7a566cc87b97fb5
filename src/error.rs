use thiserror::Error;

/// Rejections raised while checking a single spending entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Cost cannot be negative")]
    NegativeCost,

    #[error("Date, industry, business, and items must not be empty")]
    EmptyFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("'{0}' is not a valid amount")]
    InvalidCost(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// A stored row that cannot be turned back into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Record {id} has an unparseable date '{value}'")]
    UnparseableDate { id: i64, value: String },

    #[error("Record {id} has an unparseable cost '{value}'")]
    UnparseableCost { id: i64, value: String },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to open database: {0}")]
    ConnectionFailed(rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Query failed: {0}")]
    Query(rusqlite::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref inner, ref message)
                if inner.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StorageError::ConstraintViolation(
                    message.clone().unwrap_or_else(|| inner.to_string()),
                )
            }
            other => StorageError::Query(other),
        }
    }
}

/// Outcome of an entry attempt that did not produce a record.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Entry cancelled")]
    Cancelled,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to read input: {0}")]
    Input(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}
