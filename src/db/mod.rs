pub mod repository;
pub mod sqlite;

pub use repository::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Cannot prepare database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),
}

/// Route SQLite constraint failures (UNIQUE, FOREIGN KEY, CHECK) to
/// `ConstraintViolation`; everything else stays a plain SQLite error.
pub(crate) fn classify(err: rusqlite::Error) -> DatabaseError {
    match &err {
        rusqlite::Error::SqliteFailure(e, msg)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DatabaseError::ConstraintViolation(
                msg.clone().unwrap_or_else(|| e.to_string()),
            )
        }
        _ => DatabaseError::Sqlite(err),
    }
}
