//! Database error types.

use diesel::result::DatabaseErrorKind;
use derive_more::{Display, Error};
use tracing::instrument;

/// What part of the persistence layer failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DbErrorKind {
    /// The database file could not be opened.
    #[display("connection")]
    Connection,
    /// A schema migration failed.
    #[display("migration")]
    Migration,
    /// A uniqueness, foreign-key or not-null rule rejected the write.
    #[display("constraint")]
    Constraint,
    /// Any other query failure.
    #[display("query")]
    Query,
    /// A stored value could not be interpreted.
    #[display("invalid data")]
    InvalidData,
}

/// Database error with its kind and the location that raised it.
#[derive(Debug, Clone, Display, Error)]
#[display("Database {} error: {} at {}:{}", kind, message, file, line)]
pub struct DbError {
    /// Failure category.
    pub kind: DbErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a database error tagged with the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: DbErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns true if a table constraint rejected the write, such as a
    /// profile name that is already taken.
    pub fn is_constraint(&self) -> bool {
        self.kind == DbErrorKind::Constraint
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        match &err {
            diesel::result::Error::DatabaseError(
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::NotNullViolation
                | DatabaseErrorKind::CheckViolation,
                info,
            ) => Self::new(DbErrorKind::Constraint, info.message().to_string()),
            _ => Self::new(DbErrorKind::Query, err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(DbErrorKind::Connection, err.to_string())
    }
}

// The session only logs store failures, so the kind travels in the text.
impl From<DbError> for mapquiz_core::StoreError {
    fn from(err: DbError) -> Self {
        mapquiz_core::StoreError::new(format!("{}: {}", err.kind, err.message))
    }
}
