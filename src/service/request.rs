//! Request bodies accepted by the REST surface.

use serde::{Deserialize, Serialize};

/// Create a game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameRequest {
    /// List the game among the open games.
    #[serde(default)]
    pub public: bool,
}

/// Drop a disc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayMoveRequest {
    /// 1-based column, 1..=7.
    pub column: i64,
}

/// Register a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}
