//! Terminal clients: the REST client and the hot-seat mode.

mod console;
mod local;
mod rest;

pub use console::{render_board, render_board_map, render_games, render_state};
pub use local::{LocalGame, MoveOutcome, run_local};
pub use rest::{Credentials, RestClient};
