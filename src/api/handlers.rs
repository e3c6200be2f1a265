//! Route handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::api::{ApiError, AppState, AuthenticatedPlayer, JsonBody, blocking};
use crate::service::{
    CreateUserResponse, GameStateResponse, NewGameRequest, NewGameResponse, PlayMoveRequest,
    RegisterRequest,
};

/// Names the service.
pub async fn root() -> &'static str {
    "connectfour"
}

/// Liveness check.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Registers a player and returns their token.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), ApiError> {
    let games = state.games.clone();
    let user = blocking(move || games.users().register(&request.name, &request.email)).await?;
    info!(user_id = user.id, "Player registered");
    Ok((StatusCode::CREATED, Json(CreateUserResponse::from(user))))
}

/// Lists public games waiting for a second player.
#[instrument(skip_all, fields(email = %player.0.email))]
pub async fn open_games(
    State(state): State<AppState>,
    player: AuthenticatedPlayer,
) -> Result<Json<Vec<NewGameResponse>>, ApiError> {
    let games = state.games.clone();
    let email = player.0.email;
    Ok(Json(blocking(move || games.all_open_games(&email)).await?))
}

/// Lists every game the caller plays in.
#[instrument(skip_all, fields(email = %player.0.email))]
pub async fn my_games(
    State(state): State<AppState>,
    player: AuthenticatedPlayer,
) -> Result<Json<Vec<NewGameResponse>>, ApiError> {
    let games = state.games.clone();
    let email = player.0.email;
    Ok(Json(blocking(move || games.all_my_games(&email)).await?))
}

/// Creates a game with the caller as player 1.
#[instrument(skip_all, fields(email = %player.0.email, public = request.public))]
pub async fn new_game(
    State(state): State<AppState>,
    player: AuthenticatedPlayer,
    JsonBody(request): JsonBody<NewGameRequest>,
) -> Result<(StatusCode, Json<NewGameResponse>), ApiError> {
    let games = state.games.clone();
    let email = player.0.email;
    let created = blocking(move || games.new_game(&email, request.public)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Returns a snapshot of one game.
#[instrument(skip(state, _player))]
pub async fn game_state(
    State(state): State<AppState>,
    _player: AuthenticatedPlayer,
    Path(key): Path<String>,
) -> Result<Json<GameStateResponse>, ApiError> {
    let games = state.games.clone();
    Ok(Json(blocking(move || games.get_game_state(&key)).await?))
}

/// Seats the caller as player 2.
#[instrument(skip(state, player), fields(email = %player.0.email))]
pub async fn join_game(
    State(state): State<AppState>,
    player: AuthenticatedPlayer,
    Path(key): Path<String>,
) -> Result<Json<GameStateResponse>, ApiError> {
    let games = state.games.clone();
    let email = player.0.email;
    Ok(Json(blocking(move || games.join_game(&key, &email)).await?))
}

/// Drops the caller's disc in a column.
#[instrument(skip(state, player, request), fields(email = %player.0.email, column = request.column))]
pub async fn play_move(
    State(state): State<AppState>,
    player: AuthenticatedPlayer,
    Path(key): Path<String>,
    JsonBody(request): JsonBody<PlayMoveRequest>,
) -> Result<Json<GameStateResponse>, ApiError> {
    let games = state.games.clone();
    let email = player.0.email;
    Ok(Json(
        blocking(move || games.play_move(&key, &email, request.column)).await?,
    ))
}

/// Abandons a game on behalf of one of its players.
#[instrument(skip(state, player), fields(email = %player.0.email))]
pub async fn abort_game(
    State(state): State<AppState>,
    player: AuthenticatedPlayer,
    Path(key): Path<String>,
) -> Result<Json<GameStateResponse>, ApiError> {
    let games = state.games.clone();
    let email = player.0.email;
    Ok(Json(blocking(move || games.abort_game(&key, &email)).await?))
}
