//! HTTP client for the game server.

use anyhow::{Result, bail};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::api::EMAIL_HEADER;
use crate::service::{
    CreateUserResponse, ErrorResponse, GameStateResponse, NewGameRequest, NewGameResponse,
    PlayMoveRequest, RegisterRequest,
};

/// Email and token a client authenticates with.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Registered email.
    pub email: String,
    /// Token handed out at registration.
    pub token: String,
}

/// Client for the REST surface.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    client: reqwest::Client,
    credentials: Option<Credentials>,
}

impl RestClient {
    /// Creates an anonymous client for the server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            credentials: None,
        }
    }

    /// Returns a client acting as the given player.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let Some(credentials) = &self.credentials else {
            bail!("No credentials: register first or pass --email and --token");
        };
        Ok(request
            .header(EMAIL_HEADER, &credentials.email)
            .bearer_auth(&credentials.token))
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        warn!(status = %status, error = %message, "Server rejected request");
        bail!("{} ({})", message, status)
    }

    /// Registers a player. The response carries the token to use from now on.
    #[instrument(skip(self))]
    pub async fn register(&self, name: &str, email: &str) -> Result<CreateUserResponse> {
        let body = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
        };
        let response = self
            .client
            .post(self.url("/register"))
            .json(&body)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Creates a game.
    #[instrument(skip(self))]
    pub async fn new_game(&self, public: bool) -> Result<NewGameResponse> {
        let request = self
            .authorized(self.client.post(self.url("/games")))?
            .json(&NewGameRequest { public });
        Self::parse(request.send().await?).await
    }

    /// Lists open public games.
    #[instrument(skip(self))]
    pub async fn open_games(&self) -> Result<Vec<NewGameResponse>> {
        let request = self.authorized(self.client.get(self.url("/games")))?;
        Self::parse(request.send().await?).await
    }

    /// Lists the games this player plays in.
    #[instrument(skip(self))]
    pub async fn my_games(&self) -> Result<Vec<NewGameResponse>> {
        let request = self.authorized(self.client.get(self.url("/games/my")))?;
        Self::parse(request.send().await?).await
    }

    /// Fetches a game's state.
    #[instrument(skip(self))]
    pub async fn game_state(&self, key: &str) -> Result<GameStateResponse> {
        let request = self.authorized(self.client.get(self.url(&format!("/games/{}", key))))?;
        Self::parse(request.send().await?).await
    }

    /// Joins a game.
    #[instrument(skip(self))]
    pub async fn join(&self, key: &str) -> Result<GameStateResponse> {
        let request =
            self.authorized(self.client.post(self.url(&format!("/games/{}/join", key))))?;
        Self::parse(request.send().await?).await
    }

    /// Drops a disc in the 1-based `column`.
    #[instrument(skip(self))]
    pub async fn play(&self, key: &str, column: i64) -> Result<GameStateResponse> {
        debug!("Sending move");
        let request = self
            .authorized(self.client.post(self.url(&format!("/games/{}/play", key))))?
            .json(&PlayMoveRequest { column });
        Self::parse(request.send().await?).await
    }

    /// Aborts a game.
    #[instrument(skip(self))]
    pub async fn abort(&self, key: &str) -> Result<GameStateResponse> {
        let request =
            self.authorized(self.client.post(self.url(&format!("/games/{}/abort", key))))?;
        Self::parse(request.send().await?).await
    }
}
