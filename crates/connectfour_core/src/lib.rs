//! Connect four game logic.
//!
//! Pure, I/O-free building blocks for the connect four server:
//!
//! - **Disc**: the content of a single board cell
//! - **Board**: the 7x6 grid with column drop and win detection
//! - **Game**: two players, a board and the lifecycle state machine
//!
//! # Example
//!
//! ```
//! use connectfour_core::{Game, GameStatus, User};
//!
//! let sanae = User::new("Sanae", "sanae@example.com");
//! let dick = User::new("Dick", "dick@example.com");
//!
//! let mut game = Game::new(sanae.clone(), true);
//! game.join(dick).unwrap();
//! game.play(&sanae, 4).unwrap();
//!
//! assert_eq!(game.status(), GameStatus::Started);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod disc;
mod error;
mod game;
mod key;
mod user;

pub use board::{Board, HEIGHT, WIDTH};
pub use disc::Disc;
pub use error::{BoardParseError, GameError};
pub use game::{Game, GameRecord, GameStatus, PlayerTurn};
pub use key::{KEY_WORDS, generate_key};
pub use user::User;
