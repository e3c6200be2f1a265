//! connectfour - game server and terminal client.

#![warn(missing_docs)]

mod cli;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, Connection};
use connectfour::{
    Credentials, RestClient, ServerConfig, render_games, render_state, run_local, serve,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Command::Serve { .. }));

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            db,
        } => run_server(config, host, port, db).await,
        Command::Register {
            server,
            name,
            email,
        } => {
            let user = RestClient::new(server).register(&name, &email).await?;
            println!("Registered {} <{}>", user.name, user.email);
            println!("Token: {}", user.token);
            println!("export CONNECTFOUR_EMAIL={}", user.email);
            println!("export CONNECTFOUR_TOKEN={}", user.token);
            Ok(())
        }
        Command::New { connection, public } => {
            let game = client(connection).new_game(public).await?;
            println!("Created game {} ({})", game.key, game.status);
            println!("Share this key with your opponent.");
            Ok(())
        }
        Command::Open { connection } => {
            println!("{}", render_games(&client(connection).open_games().await?));
            Ok(())
        }
        Command::Mine { connection } => {
            println!("{}", render_games(&client(connection).my_games().await?));
            Ok(())
        }
        Command::Show { connection, key } => {
            println!("{}", render_state(&client(connection).game_state(&key).await?));
            Ok(())
        }
        Command::Join { connection, key } => {
            println!("{}", render_state(&client(connection).join(&key).await?));
            Ok(())
        }
        Command::Play {
            connection,
            key,
            column,
        } => {
            println!("{}", render_state(&client(connection).play(&key, column).await?));
            Ok(())
        }
        Command::Abort { connection, key } => {
            println!("{}", render_state(&client(connection).abort(&key).await?));
            Ok(())
        }
        Command::Local { player1, player2 } => {
            run_local(&player1, &player2, io::stdin().lock(), io::stdout().lock())
                .context("Terminal I/O failed")?;
            Ok(())
        }
    }
}

/// Servers log at info by default; client commands stay quiet unless RUST_LOG says otherwise.
fn init_tracing(server: bool) {
    let default = if server { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn client(connection: Connection) -> RestClient {
    RestClient::new(connection.server).with_credentials(Credentials {
        email: connection.email,
        token: connection.token,
    })
}

/// Run the REST game server
#[instrument(skip_all)]
async fn run_server(
    config: Option<std::path::PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    db: Option<String>,
) -> Result<()> {
    let mut settings = match &config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    }
    .apply_env()?;

    if let Some(host) = host {
        settings = settings.with_host(host);
    }
    if let Some(port) = port {
        settings = settings.with_port(port);
    }
    if let Some(db) = db {
        settings = settings.with_db_path(db);
    }

    info!(addr = %settings.bind_address(), db = %settings.db_path(), "Starting connectfour server");
    serve(&settings).await
}
