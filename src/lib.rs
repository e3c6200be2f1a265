//! Connect four server library
//!
//! Everything around the game logic of [`connectfour_core`]: storage,
//! services, the REST surface and the terminal clients.
//!
//! # Architecture
//!
//! - **Cache**: TTL key/value store in front of user lookups
//! - **Persistence**: repository traits with SQLite and in-memory stores
//! - **Services**: user registration and lookup, game orchestration
//! - **API**: axum router and server
//! - **Client**: reqwest REST client, terminal rendering, hot-seat mode
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use connectfour::{GamesService, MemoryRepository, UserService};
//!
//! # fn main() -> Result<(), connectfour::ServiceError> {
//! let repo = Arc::new(MemoryRepository::new());
//! let users = Arc::new(UserService::new(repo.clone(), Duration::from_secs(60)));
//! let games = GamesService::new(users.clone(), repo);
//!
//! users.register("Sanae", "sanae@example.com")?;
//! users.register("Dick", "dick@example.com")?;
//!
//! let game = games.new_game("sanae@example.com", true)?;
//! games.join_game(&game.key, "dick@example.com")?;
//! let state = games.play_move(&game.key, "sanae@example.com", 4)?;
//! assert_eq!(state.player_turn, 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod api;
mod cache;
mod client;
mod config;
mod db;
mod service;
mod validation;

// Crate-level exports - Game logic
pub use connectfour_core::{
    Board, BoardParseError, Disc, Game, GameError, GameRecord, GameStatus, HEIGHT, PlayerTurn,
    User, WIDTH, generate_key,
};

// Crate-level exports - Infrastructure
pub use cache::Cache;
pub use config::{ConfigError, ServerConfig};
pub use validation::{EMAIL_MAX, is_valid_email};

// Crate-level exports - Persistence
pub use db::{
    DbError, DbErrorKind, GameRepository, GameRow, MemoryRepository, NewUserRow, SqliteRepository,
    UserRepository, UserRow,
};

// Crate-level exports - Services
pub use service::{
    CreateUserResponse, ErrorResponse, GameStateResponse, GamesService, KeyLocks, NewGameRequest,
    NewGameResponse, PlayMoveRequest, RegisterRequest, ServiceError, UserService, generate_token,
};

// Crate-level exports - REST
pub use api::{ApiError, AppState, AuthenticatedPlayer, EMAIL_HEADER, JsonBody, router, serve};

// Crate-level exports - Clients
pub use client::{
    Credentials, LocalGame, MoveOutcome, RestClient, render_board, render_board_map, render_games,
    render_state, run_local,
};
