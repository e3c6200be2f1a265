//! Player authentication from request headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use connectfour_core::User;
use tracing::debug;

use crate::api::{ApiError, AppState, blocking};

/// Header naming the acting player.
pub const EMAIL_HEADER: &str = "x-player-email";

/// The registered player a request acts for.
///
/// Extracted from the `X-Player-Email` header and the
/// `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct AuthenticatedPlayer(pub User);

fn credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
    let email = headers
        .get(EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing X-Player-Email header".to_string()))?;

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    Ok((email.to_string(), token.to_string()))
}

impl FromRequestParts<AppState> for AuthenticatedPlayer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (email, token) = credentials(&parts.headers)?;
        let games = state.games.clone();
        let user = blocking(move || games.users().authenticate(&email, &token)).await?;
        debug!(email = %user.email, "Player authenticated");
        Ok(Self(user))
    }
}
