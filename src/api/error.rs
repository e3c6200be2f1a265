//! Mapping of failures onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::service::{ErrorResponse, ServiceError};

/// Failure of a REST request.
#[derive(Debug, derive_more::Display)]
pub enum ApiError {
    /// A service operation failed.
    #[display("{}", _0)]
    Service(ServiceError),

    /// The request body could not be read as JSON of the expected shape.
    #[display("{}", message)]
    BadBody {
        /// Status chosen by the body extractor.
        status: StatusCode,
        /// What was wrong with the body.
        message: String,
    },

    /// Credentials missing or malformed.
    #[display("Unauthorized: {}", _0)]
    Unauthorized(String),

    /// The request could not be completed for reasons outside the services.
    #[display("Internal error: {}", _0)]
    Internal(String),
}

impl std::error::Error for ApiError {}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl ApiError {
    /// Returns the status code this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Service(err) => match err {
                ServiceError::Game(_) | ServiceError::InvalidEmail { .. } => {
                    StatusCode::BAD_REQUEST
                }
                ServiceError::UnknownGame { .. } | ServiceError::UserNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                ServiceError::UserAlreadyExists { .. } => StatusCode::CONFLICT,
                ServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadBody { status, .. } => *status,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            warn!(status = %status, error = %self, "Request rejected");
            match self {
                Self::Service(err) => err.to_string(),
                other => other.to_string(),
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
