//! Game orchestration: resolve the player, load the game, transition, save.

use std::sync::Arc;

use connectfour_core::{Game, GameStatus, User};
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, GameRepository};
use crate::service::{GameStateResponse, KeyLocks, NewGameResponse, ServiceError, UserService};

/// Attempts at generating a key that is not taken yet.
const KEY_ATTEMPTS: usize = 8;

/// Game operations on behalf of players identified by email.
///
/// Mutations of one game are serialized in-process: concurrent moves on the
/// same key run one after the other, each seeing the previous one's result.
#[derive(Debug)]
pub struct GamesService {
    users: Arc<UserService>,
    games: Arc<dyn GameRepository>,
    locks: KeyLocks,
}

impl GamesService {
    /// Creates the service.
    pub fn new(users: Arc<UserService>, games: Arc<dyn GameRepository>) -> Self {
        Self {
            users,
            games,
            locks: KeyLocks::new(),
        }
    }

    /// Returns the user service this service resolves players with.
    pub fn users(&self) -> &Arc<UserService> {
        &self.users
    }

    /// Loads a game.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::UnknownGame`] if no game has this key
    /// - [`ServiceError::Repository`] if the store fails
    #[instrument(skip(self))]
    pub fn get_game(&self, key: &str) -> Result<Game, ServiceError> {
        self.games
            .fetch(key)?
            .ok_or_else(|| ServiceError::UnknownGame {
                key: key.to_string(),
            })
    }

    /// Returns the state snapshot of a game.
    ///
    /// # Errors
    ///
    /// See [`GamesService::get_game`].
    #[instrument(skip(self))]
    pub fn get_game_state(&self, key: &str) -> Result<GameStateResponse, ServiceError> {
        self.get_game(key).map(|game| GameStateResponse::from(&game))
    }

    /// Returns true if a game is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Repository`] if the store fails.
    #[instrument(skip(self))]
    pub fn game_exists(&self, key: &str) -> Result<bool, ServiceError> {
        Ok(self.games.fetch(key)?.is_some())
    }

    /// Creates a game for `email` and stores it.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::UserNotFound`] if the creator is not registered
    /// - [`ServiceError::Repository`] if the store fails or no free key was found
    #[instrument(skip(self))]
    pub fn new_game(&self, email: &str, public: bool) -> Result<NewGameResponse, ServiceError> {
        let creator = self.users.find_user_by_email(email)?;

        for attempt in 1..=KEY_ATTEMPTS {
            let game = Game::new(creator.clone(), public);
            let stored = self.locks.with_lock(game.key(), || {
                if self.games.fetch(game.key())?.is_some() {
                    return Ok::<_, ServiceError>(false);
                }
                self.games.save(&game)?;
                Ok(true)
            })?;

            if stored {
                info!(key = %game.key(), "Game created");
                return Ok(NewGameResponse::from(&game));
            }
            warn!(key = %game.key(), attempt, "Generated key already taken");
        }

        Err(DbError::new(format!("No free game key after {} attempts", KEY_ATTEMPTS)).into())
    }

    /// Seats `email` as the second player.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::UserNotFound`] or [`ServiceError::UnknownGame`]
    /// - [`ServiceError::Game`] if the game rejects the join
    /// - [`ServiceError::Repository`] if the store fails
    #[instrument(skip(self))]
    pub fn join_game(&self, key: &str, email: &str) -> Result<GameStateResponse, ServiceError> {
        let user = self.users.find_user_by_email(email)?;
        self.transition(key, |game| game.join(user))
    }

    /// Plays the 1-based `column` on behalf of `email`.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::UserNotFound`] or [`ServiceError::UnknownGame`]
    /// - [`ServiceError::Game`] if the move is illegal
    /// - [`ServiceError::Repository`] if the store fails
    #[instrument(skip(self))]
    pub fn play_move(
        &self,
        key: &str,
        email: &str,
        column: i64,
    ) -> Result<GameStateResponse, ServiceError> {
        let user = self.users.find_user_by_email(email)?;
        self.transition(key, |game| game.play(&user, column))
    }

    /// Aborts the game on behalf of one of its players.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::UserNotFound`] or [`ServiceError::UnknownGame`]
    /// - [`ServiceError::Game`] if the game is over or `email` does not play in it
    /// - [`ServiceError::Repository`] if the store fails
    #[instrument(skip(self))]
    pub fn abort_game(&self, key: &str, email: &str) -> Result<GameStateResponse, ServiceError> {
        let user = self.users.find_user_by_email(email)?;
        self.transition(key, |game| game.abort(&user))
    }

    /// Lists public games waiting for a second player.
    ///
    /// `email` must belong to a registered user but does not filter the
    /// listing: every open public game is returned.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::UserNotFound`] if `email` is not registered
    /// - [`ServiceError::Repository`] if the store fails
    #[instrument(skip(self))]
    pub fn all_open_games(&self, email: &str) -> Result<Vec<NewGameResponse>, ServiceError> {
        self.users.find_user_by_email(email)?;

        let games = self.games.list(None, Some(GameStatus::Created))?;
        let open: Vec<_> = games
            .iter()
            .filter(|g| g.is_public())
            .map(NewGameResponse::from)
            .collect();

        debug!(count = open.len(), "Open games listed");
        Ok(open)
    }

    /// Lists every game `email` plays in, whatever its status.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::UserNotFound`] if `email` is not registered
    /// - [`ServiceError::Repository`] if the store fails
    #[instrument(skip(self))]
    pub fn all_my_games(&self, email: &str) -> Result<Vec<NewGameResponse>, ServiceError> {
        let user: User = self.users.find_user_by_email(email)?;

        let games = self.games.list(Some(user.id), None)?;
        debug!(count = games.len(), "Player games listed");
        Ok(games.iter().map(NewGameResponse::from).collect())
    }

    /// Fetch, mutate and save one game under its key lock.
    fn transition(
        &self,
        key: &str,
        apply: impl FnOnce(&mut Game) -> Result<(), connectfour_core::GameError>,
    ) -> Result<GameStateResponse, ServiceError> {
        self.locks.with_lock(key, || {
            let mut game = self.get_game(key)?;
            apply(&mut game)?;
            self.games.save(&game)?;
            Ok(GameStateResponse::from(&game))
        })
    }
}
