//! Storage abstractions the services are written against.

use connectfour_core::{Game, GameStatus, User};

use crate::db::DbError;

/// Store of registered users.
pub trait UserRepository: std::fmt::Debug + Send + Sync {
    /// Finds a user by email. `Ok(None)` if nobody registered it.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store cannot be queried.
    fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError>;

    /// Stores a new user and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the email is taken or the store fails.
    fn create(&self, user: User) -> Result<User, DbError>;
}

/// Store of games.
pub trait GameRepository: std::fmt::Debug + Send + Sync {
    /// Inserts or replaces the game under its key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the game cannot be written.
    fn save(&self, game: &Game) -> Result<(), DbError>;

    /// Loads a game. `Ok(None)` if the key is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store fails or the stored game is corrupt.
    fn fetch(&self, key: &str) -> Result<Option<Game>, DbError>;

    /// Lists games, optionally restricted to those `user_id` plays in
    /// and to one status. `None` means no filter.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the store fails or a stored game is corrupt.
    fn list(&self, user_id: Option<i32>, status: Option<GameStatus>) -> Result<Vec<Game>, DbError>;
}
