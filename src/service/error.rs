//! Service-level errors.

use connectfour_core::GameError;

use crate::db::DbError;

/// Failure of a user or game service operation.
#[derive(Debug, Clone, derive_more::Display)]
pub enum ServiceError {
    /// The game rejected the transition.
    #[display("{}", _0)]
    Game(GameError),

    /// No game is stored under the key.
    #[display("Game '{}' does not exist", key)]
    UnknownGame {
        /// The requested key.
        key: String,
    },

    /// No user registered the email.
    #[display("User '{}' not found", email)]
    UserNotFound {
        /// The requested email.
        email: String,
    },

    /// Registration with an email that is already taken.
    #[display("User with email {} already exists", email)]
    UserAlreadyExists {
        /// The taken email.
        email: String,
    },

    /// The email address is not syntactically valid.
    #[display("Invalid email address: '{}'", email)]
    InvalidEmail {
        /// The rejected email.
        email: String,
    },

    /// Email and token do not match a registered user.
    #[display("Invalid credentials")]
    InvalidCredentials,

    /// The store failed.
    #[display("{}", _0)]
    Repository(DbError),
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Game(err) => Some(err),
            Self::Repository(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GameError> for ServiceError {
    fn from(err: GameError) -> Self {
        Self::Game(err)
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        Self::Repository(err)
    }
}
