//! Command-line interface for connectfour.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Default server address for client commands.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

/// Connect four - online two-player game server and client
#[derive(Parser, Debug)]
#[command(name = "connectfour")]
#[command(about = "Online two-player connect four", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Server address and player credentials of client commands.
#[derive(Args, Debug, Clone)]
pub struct Connection {
    /// Game server URL
    #[arg(long, env = "CONNECTFOUR_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Registered email
    #[arg(long, env = "CONNECTFOUR_EMAIL")]
    pub email: String,

    /// Token received at registration
    #[arg(long, env = "CONNECTFOUR_TOKEN", hide_env_values = true)]
    pub token: String,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the REST game server
    Serve {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file
        #[arg(long)]
        db: Option<String>,
    },

    /// Register a player and print the token
    Register {
        /// Game server URL
        #[arg(long, env = "CONNECTFOUR_SERVER", default_value = DEFAULT_SERVER)]
        server: String,

        /// Display name
        name: String,

        /// Email address
        email: String,
    },

    /// Create a game
    New {
        #[command(flatten)]
        connection: Connection,

        /// List the game among the open games
        #[arg(long)]
        public: bool,
    },

    /// List open public games
    Open {
        #[command(flatten)]
        connection: Connection,
    },

    /// List your games
    Mine {
        #[command(flatten)]
        connection: Connection,
    },

    /// Show a game
    Show {
        #[command(flatten)]
        connection: Connection,

        /// Game key
        key: String,
    },

    /// Join a game as second player
    Join {
        #[command(flatten)]
        connection: Connection,

        /// Game key
        key: String,
    },

    /// Drop a disc
    Play {
        #[command(flatten)]
        connection: Connection,

        /// Game key
        key: String,

        /// Column, 1 to 7
        #[arg(allow_negative_numbers = true)]
        column: i64,
    },

    /// Abort a game you play in
    Abort {
        #[command(flatten)]
        connection: Connection,

        /// Game key
        key: String,
    },

    /// Play a hot-seat game in this terminal
    Local {
        /// Name of the first player (X)
        #[arg(default_value = "Player 1")]
        player1: String,

        /// Name of the second player (O)
        #[arg(default_value = "Player 2")]
        player2: String,
    },
}
