//! Transport-facing snapshots produced by the services.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use connectfour_core::{Game, GameStatus, User};
use serde::{Deserialize, Serialize};

/// Summary of a game, as shown in game listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameResponse {
    /// Game key.
    pub key: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Email of the creator.
    pub created_by: String,
    /// Lifecycle status.
    pub status: GameStatus,
}

impl From<&Game> for NewGameResponse {
    fn from(game: &Game) -> Self {
        Self {
            key: game.key().to_string(),
            created_at: game.created_at(),
            created_by: game.player1().email.clone(),
            status: game.status(),
        }
    }
}

/// Full state of a game.
///
/// The board maps 1-based row numbers, top row first, to seven-character
/// strings of `' '`, `'X'` and `'O'`. Absent players are empty strings and
/// `player_turn` is 0 until the game starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateResponse {
    /// Game key.
    pub key: String,
    /// Lifecycle status.
    pub status: GameStatus,
    /// 1 or 2, or 0 before the game started.
    pub player_turn: u8,
    /// Name of the player to move.
    pub player_turn_name: String,
    /// Email of the player to move.
    pub player_turn_email: String,
    /// Board rows.
    pub board: BTreeMap<usize, String>,
    /// Name of the creator.
    pub player1_name: String,
    /// Name of the joined player.
    pub player2_name: String,
    /// Email of the creator.
    pub player1_email: String,
    /// Email of the joined player.
    pub player2_email: String,
}

impl From<&Game> for GameStateResponse {
    fn from(game: &Game) -> Self {
        let current = game.current_player();
        let player2 = game.player2();
        Self {
            key: game.key().to_string(),
            status: game.status(),
            player_turn: game.turn().map_or(0, |t| t.number()),
            player_turn_name: current.map(|p| p.name.clone()).unwrap_or_default(),
            player_turn_email: game.current_player_email().to_string(),
            board: game.board().to_map(),
            player1_name: game.player1().name.clone(),
            player2_name: player2.map(|p| p.name.clone()).unwrap_or_default(),
            player1_email: game.player1().email.clone(),
            player2_email: player2.map(|p| p.email.clone()).unwrap_or_default(),
        }
    }
}

/// A freshly registered user, including the token to authenticate with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserResponse {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Credential for subsequent requests.
    pub token: String,
}

impl From<User> for CreateUserResponse {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
            token: user.token,
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
}
