//! Error types for board parsing and game transitions.

use derive_more::{Display, Error};

/// Rejected game transition.
///
/// A failed transition never mutates the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// Column out of range or already full.
    #[display("Invalid move: column {} is full or out of range", column)]
    InvalidMove {
        /// The 1-based column that was requested.
        column: i64,
    },

    /// The acting user is not the player whose turn it is.
    #[display("It is not your turn")]
    NotYourTurn,

    /// The game is still waiting for a second player.
    #[display("This game is not started yet, still waiting for the second player")]
    GameNotStarted,

    /// The game has finished or was aborted.
    #[display("This game is over and no more moves can be played")]
    GameAlreadyOver,

    /// Join attempted on a game that is no longer open.
    #[display("You can only join a game that has status 'created'")]
    InvalidJoin,

    /// The acting user is not seated in the game.
    #[display("You are not a player in this game")]
    NotAParticipant,
}

/// Board text or map could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Board parse error: {}", message)]
pub struct BoardParseError {
    /// What was wrong with the input.
    pub message: String,
}

impl BoardParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
