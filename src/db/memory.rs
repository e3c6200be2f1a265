//! In-process store for tests and throwaway servers.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use connectfour_core::{Game, GameStatus, User};
use tracing::{debug, instrument};

use crate::db::{DbError, GameRepository, UserRepository};

#[derive(Debug, Default)]
struct Users {
    by_email: HashMap<String, User>,
    last_id: i32,
}

/// Mutex-guarded user and game maps. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    users: Mutex<Users>,
    games: Mutex<HashMap<String, Game>>,
}

impl MemoryRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored games.
    pub fn game_count(&self) -> usize {
        self.games.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl UserRepository for MemoryRepository {
    #[instrument(skip(self))]
    fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(users.by_email.get(&email.to_lowercase()).cloned())
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    fn create(&self, mut user: User) -> Result<User, DbError> {
        let mut users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        let email = user.email.to_lowercase();
        if users.by_email.contains_key(&email) {
            return Err(DbError::duplicate(format!(
                "UNIQUE constraint failed: users.email ({})",
                email
            )));
        }

        users.last_id += 1;
        user.id = users.last_id;
        users.by_email.insert(email, user.clone());
        debug!(user_id = user.id, "User created");
        Ok(user)
    }
}

impl GameRepository for MemoryRepository {
    #[instrument(skip(self, game), fields(key = %game.key()))]
    fn save(&self, game: &Game) -> Result<(), DbError> {
        self.games
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(game.key().to_string(), game.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    fn fetch(&self, key: &str) -> Result<Option<Game>, DbError> {
        Ok(self
            .games
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    #[instrument(skip(self))]
    fn list(&self, user_id: Option<i32>, status: Option<GameStatus>) -> Result<Vec<Game>, DbError> {
        let games = self.games.lock().unwrap_or_else(PoisonError::into_inner);
        let mut found: Vec<Game> = games
            .values()
            .filter(|g| {
                user_id.is_none_or(|id| {
                    g.player1().id == id || g.player2().is_some_and(|p| p.id == id)
                })
            })
            .filter(|g| status.is_none_or(|s| g.status() == s))
            .cloned()
            .collect();
        found.sort_by_key(|g| g.created_at());
        Ok(found)
    }
}
