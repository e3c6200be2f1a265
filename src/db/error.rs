//! Failures of the user and game stores.
//!
//! Both stores report through [`DbError`]. Its [`DbErrorKind`] separates a
//! rejected duplicate (an email registered twice) from every other failure,
//! so callers can answer the former as a conflict.

use connectfour_core::BoardParseError;
use derive_more::{Display, Error};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// What went wrong in a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DbErrorKind {
    /// A unique key such as a user's email already exists.
    #[display("duplicate")]
    Duplicate,
    /// Connection, query or decoding failure.
    #[display("storage")]
    Storage,
}

/// Store failure with the location it was raised at.
#[derive(Debug, Clone, Display, Error)]
#[display("Database error ({}): {} at {}:{}", kind, message, file, line)]
pub struct DbError {
    /// Failure category.
    pub kind: DbErrorKind,
    /// What failed.
    pub message: String,
    /// Line the error was raised at.
    pub line: u32,
    /// Source file the error was raised in.
    pub file: &'static str,
}

impl DbError {
    /// Creates a storage failure at the caller's location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(DbErrorKind::Storage, message)
    }

    /// Creates a duplicate-key failure at the caller's location.
    #[track_caller]
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::with_kind(DbErrorKind::Duplicate, message)
    }

    #[track_caller]
    fn with_kind(kind: DbErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns true if a unique key was already taken.
    pub fn is_duplicate(&self) -> bool {
        self.kind == DbErrorKind::Duplicate
    }
}

impl From<DieselError> for DbError {
    #[track_caller]
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::duplicate(info.message().to_string())
            }
            other => Self::new(format!("Diesel error: {}", other)),
        }
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}

impl From<BoardParseError> for DbError {
    #[track_caller]
    fn from(err: BoardParseError) -> Self {
        Self::new(format!("Corrupt board: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_is_duplicate() {
        struct Info;
        impl diesel::result::DatabaseErrorInformation for Info {
            fn message(&self) -> &str {
                "UNIQUE constraint failed: users.email"
            }
            fn details(&self) -> Option<&str> {
                None
            }
            fn hint(&self) -> Option<&str> {
                None
            }
            fn table_name(&self) -> Option<&str> {
                None
            }
            fn column_name(&self) -> Option<&str> {
                None
            }
            fn constraint_name(&self) -> Option<&str> {
                None
            }
            fn statement_position(&self) -> Option<i32> {
                None
            }
        }

        let err = DbError::from(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(Info),
        ));
        assert!(err.is_duplicate());
        assert!(err.message.contains("users.email"));

        assert!(!DbError::from(DieselError::NotFound).is_duplicate());
    }
}
