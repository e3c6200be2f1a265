//! REST surface of the game server.
//!
//! | Method | Path                | Body         | Auth |
//! |--------|---------------------|--------------|------|
//! | GET    | `/`, `/health`      |              | no   |
//! | POST   | `/register`         | name, email  | no   |
//! | GET    | `/games`            |              | yes  |
//! | POST   | `/games`            | public       | yes  |
//! | GET    | `/games/my`         |              | yes  |
//! | GET    | `/games/{key}`      |              | yes  |
//! | POST   | `/games/{key}/join` |              | yes  |
//! | POST   | `/games/{key}/play` | column       | yes  |
//! | POST   | `/games/{key}/abort`|              | yes  |

mod auth;
mod body;
mod error;
mod handlers;

pub use auth::{AuthenticatedPlayer, EMAIL_HEADER};
pub use body::JsonBody;
pub use error::ApiError;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tracing::{info, instrument};

use crate::cache::Cache;
use crate::config::ServerConfig;
use crate::db::SqliteRepository;
use crate::service::{GamesService, ServiceError, UserService};

/// Shared state of the REST handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Game service; its user service authenticates requests.
    pub games: Arc<GamesService>,
}

impl AppState {
    /// Wraps the game service.
    pub fn new(games: Arc<GamesService>) -> Self {
        Self { games }
    }

    /// Builds services over the SQLite database named in `config`,
    /// applying migrations first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be migrated.
    #[instrument(skip(config), fields(db = %config.db_path()))]
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let repo = Arc::new(SqliteRepository::new(config.db_path()));
        repo.run_migrations().context("Failed to migrate database")?;

        let cache = match config.user_cache_max_entries() {
            Some(max) => Cache::with_max_entries(config.user_cache_ttl(), *max),
            None => Cache::new(config.user_cache_ttl()),
        };
        let users = Arc::new(UserService::with_cache(repo.clone(), cache));
        let games = Arc::new(GamesService::new(users, repo));
        Ok(Self::new(games))
    }
}

/// Runs blocking service work off the async executor.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("Worker failed: {}", e)))?
        .map_err(ApiError::from)
}

fn log_request(req: Request<Body>) -> Request<Body> {
    info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
    req
}

/// Builds the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/register", post(handlers::register))
        .route("/games", get(handlers::open_games).post(handlers::new_game))
        .route("/games/my", get(handlers::my_games))
        .route("/games/{key}", get(handlers::game_state))
        .route("/games/{key}/join", post(handlers::join_game))
        .route("/games/{key}/play", post(handlers::play_move))
        .route("/games/{key}/abort", post(handlers::abort_game))
        .with_state(state)
        .layer(ServiceBuilder::new().map_request(log_request))
}

/// Binds `config`'s address and serves until the process stops.
///
/// # Errors
///
/// Returns an error if the database cannot be prepared or the address
/// cannot be bound.
#[instrument(skip(config), fields(addr = %config.bind_address()))]
pub async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;

    info!(addr = %config.bind_address(), "Server ready");
    axum::serve(listener, router(state))
        .await
        .context("Server stopped")
}
