//! Game lifecycle state machine.
//!
//! A game moves strictly forward through its statuses:
//!
//! ```text
//! Created --join--> Started --play--> Finished
//!    |                 |
//!    +----abort--------+-------------> Aborted
//! ```
//!
//! Every transition either succeeds or returns a [`GameError`] and leaves the
//! game exactly as it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{Board, Disc, GameError, User, generate_key};

/// Number of words in a generated game key.
const KEY_WORDS_PER_GAME: usize = 3;

/// Lifecycle status of a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameStatus {
    /// Waiting for a second player.
    Created,
    /// Both players seated, moves are being played.
    Started,
    /// Someone connected four, or the board filled up.
    Finished,
    /// A player abandoned the game.
    Aborted,
    /// Placeholder used by clients before the status has been fetched.
    /// Never assigned by [`Game`].
    Unknown,
}

impl GameStatus {
    /// Returns true for terminal statuses.
    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::Finished | GameStatus::Aborted)
    }
}

/// Which player is to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerTurn {
    /// The creator of the game, playing red.
    One,
    /// The player who joined, playing yellow.
    Two,
}

impl PlayerTurn {
    /// Returns 1 or 2.
    pub fn number(self) -> u8 {
        match self {
            PlayerTurn::One => 1,
            PlayerTurn::Two => 2,
        }
    }

    /// Parses 1 or 2; anything else is `None`.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(PlayerTurn::One),
            2 => Some(PlayerTurn::Two),
            _ => None,
        }
    }

    /// Returns the other player.
    pub fn other(self) -> Self {
        match self {
            PlayerTurn::One => PlayerTurn::Two,
            PlayerTurn::Two => PlayerTurn::One,
        }
    }

    /// Returns the disc this player drops.
    pub fn disc(self) -> Disc {
        match self {
            PlayerTurn::One => Disc::Red,
            PlayerTurn::Two => Disc::Yellow,
        }
    }
}

/// Persisted form of a [`Game`], used by stores to rebuild one.
#[derive(Debug, Clone)]
pub struct GameRecord {
    /// Game key.
    pub key: String,
    /// Creator.
    pub player1: User,
    /// Joined player, if any.
    pub player2: Option<User>,
    /// Player to move, if started.
    pub turn: Option<PlayerTurn>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time the second player joined.
    pub started_at: Option<DateTime<Utc>>,
    /// Time the game finished or was aborted.
    pub finished_at: Option<DateTime<Utc>>,
    /// Listed among the open games.
    pub public: bool,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Board contents.
    pub board: Board,
}

/// A two-player connect four game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    key: String,
    player1: User,
    player2: Option<User>,
    turn: Option<PlayerTurn>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    public: bool,
    status: GameStatus,
    board: Board,
}

impl Game {
    /// Creates a game with a freshly generated key, waiting for a second player.
    #[instrument(skip(creator), fields(creator = %creator.email))]
    pub fn new(creator: User, public: bool) -> Self {
        Self::with_key(generate_key(KEY_WORDS_PER_GAME), creator, public)
    }

    /// Creates a game with the given key, waiting for a second player.
    #[instrument(skip(creator), fields(creator = %creator.email))]
    pub fn with_key(key: String, creator: User, public: bool) -> Self {
        info!(key = %key, "Creating new game");
        Self {
            key,
            player1: creator,
            player2: None,
            turn: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
            public,
            status: GameStatus::Created,
            board: Board::new(),
        }
    }

    /// Rebuilds a game from its persisted form.
    pub fn restore(record: GameRecord) -> Self {
        Self {
            key: record.key,
            player1: record.player1,
            player2: record.player2,
            turn: record.turn,
            created_at: record.created_at,
            started_at: record.started_at,
            finished_at: record.finished_at,
            public: record.public,
            status: record.status,
            board: record.board,
        }
    }

    /// Returns the game key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the creator.
    pub fn player1(&self) -> &User {
        &self.player1
    }

    /// Returns the second player, once joined.
    pub fn player2(&self) -> Option<&User> {
        self.player2.as_ref()
    }

    /// Returns whose turn it is. Only meaningful while started.
    pub fn turn(&self) -> Option<PlayerTurn> {
        self.turn
    }

    /// Returns the creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the time the second player joined.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns the time the game ended.
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Returns true if the game is listed publicly.
    pub fn is_public(&self) -> bool {
        self.public
    }

    /// Returns the lifecycle status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns true if `user` is seated in this game.
    pub fn has_player(&self, user: &User) -> bool {
        self.player1.is(user) || self.player2.as_ref().is_some_and(|p| p.is(user))
    }

    /// Returns the player whose turn it is.
    pub fn current_player(&self) -> Option<&User> {
        match self.turn? {
            PlayerTurn::One => Some(&self.player1),
            PlayerTurn::Two => self.player2.as_ref(),
        }
    }

    /// Returns the email of the player whose turn it is, or an empty string.
    pub fn current_player_email(&self) -> &str {
        self.current_player().map_or("", |p| p.email.as_str())
    }

    /// Returns true if `email` belongs to the player whose turn it is, ignoring case.
    pub fn is_player_turn(&self, email: &str) -> bool {
        self.current_player().is_some_and(|p| p.has_email(email))
    }

    /// Returns the player who connected four, if any.
    ///
    /// The turn is not passed on after a winning move, so the winner is the
    /// current player.
    pub fn winner(&self) -> Option<&User> {
        if self.status == GameStatus::Finished && self.board.has_connect_four() {
            self.current_player()
        } else {
            None
        }
    }

    /// Seats `joining` as the second player and starts the game.
    ///
    /// Joining a game you already play in is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidJoin`] if the game is past `Created` and
    /// `joining` is not one of its players.
    #[instrument(skip(self, joining), fields(key = %self.key, joining = %joining.email))]
    pub fn join(&mut self, joining: User) -> Result<(), GameError> {
        let seated = self.has_player(&joining);

        if self.status != GameStatus::Created && !seated {
            warn!(status = %self.status, "Join rejected");
            return Err(GameError::InvalidJoin);
        }

        if seated {
            debug!("Player already seated");
            return Ok(());
        }

        if self.player2.is_none() {
            self.player2 = Some(joining);
            self.turn = Some(PlayerTurn::One);
            self.status = GameStatus::Started;
            self.started_at = Some(Utc::now());
            info!("Second player joined, game started");
        }

        Ok(())
    }

    /// Drops the acting player's disc into the 1-based `column` (1..=7).
    ///
    /// Finishes the game on a connect four or a full board, otherwise
    /// passes the turn.
    ///
    /// # Errors
    ///
    /// - [`GameError::GameNotStarted`] while waiting for a second player
    /// - [`GameError::GameAlreadyOver`] once finished or aborted
    /// - [`GameError::NotYourTurn`] if `user` is not the current player
    /// - [`GameError::InvalidMove`] if the column is out of range or full
    #[instrument(skip(self, user), fields(key = %self.key, player = %user.email))]
    pub fn play(&mut self, user: &User, column: i64) -> Result<(), GameError> {
        match self.status {
            GameStatus::Started => {}
            GameStatus::Finished | GameStatus::Aborted => return Err(GameError::GameAlreadyOver),
            GameStatus::Created | GameStatus::Unknown => return Err(GameError::GameNotStarted),
        }

        let turn = self.turn.ok_or(GameError::GameNotStarted)?;

        if !self.is_player_turn(&user.email) {
            warn!(expected = %self.current_player_email(), "Move out of turn");
            return Err(GameError::NotYourTurn);
        }

        let index = column
            .checked_sub(1)
            .and_then(|c| usize::try_from(c).ok())
            .ok_or(GameError::InvalidMove { column })?;

        if !self.board.add_disc(index, turn.disc()) {
            warn!("Column full or out of range");
            return Err(GameError::InvalidMove { column });
        }

        if self.board.has_connect_four() {
            self.status = GameStatus::Finished;
            self.finished_at = Some(Utc::now());
            info!(winner = %user.email, "Connect four, game finished");
        } else if self.board.is_full() {
            self.status = GameStatus::Finished;
            self.finished_at = Some(Utc::now());
            info!("Board full, game finished in a draw");
        } else {
            self.turn = Some(turn.other());
            debug!(next = turn.other().number(), "Turn passed");
        }

        Ok(())
    }

    /// Abandons the game on behalf of one of its players.
    ///
    /// # Errors
    ///
    /// - [`GameError::GameAlreadyOver`] if the game already ended
    /// - [`GameError::NotAParticipant`] if `user` is not seated
    #[instrument(skip(self, user), fields(key = %self.key, player = %user.email))]
    pub fn abort(&mut self, user: &User) -> Result<(), GameError> {
        if self.status.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        if !self.has_player(user) {
            return Err(GameError::NotAParticipant);
        }

        self.status = GameStatus::Aborted;
        self.finished_at = Some(Utc::now());
        info!("Game aborted");
        Ok(())
    }
}
