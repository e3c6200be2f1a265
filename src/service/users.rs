//! User registration and lookup.

use std::sync::Arc;
use std::time::Duration;

use connectfour_core::User;
use tracing::{debug, error, info, instrument, warn};

use crate::cache::Cache;
use crate::db::UserRepository;
use crate::service::ServiceError;
use crate::validation::is_valid_email;

/// Generates an opaque 32 hex digit credential.
pub fn generate_token() -> String {
    format!("{:032x}", rand::random::<u128>())
}

/// Resolves users by email, cache first.
///
/// Emails are normalized to lower case before they reach the cache or the
/// store.
#[derive(Debug)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    cache: Cache<String, User>,
}

impl UserService {
    /// Creates a service caching lookups for `ttl`. A zero TTL disables the cache.
    #[instrument(skip(repo))]
    pub fn new(repo: Arc<dyn UserRepository>, ttl: Duration) -> Self {
        Self::with_cache(repo, Cache::new(ttl))
    }

    /// Creates a service using the given cache.
    pub fn with_cache(repo: Arc<dyn UserRepository>, cache: Cache<String, User>) -> Self {
        Self { repo, cache }
    }

    /// Seeds the cache with `user`.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub fn remember(&self, user: &User) {
        self.cache.store(user.email.to_lowercase(), user.clone());
    }

    /// Finds a user by email, ignoring case.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::UserNotFound`] if nobody registered the email
    /// - [`ServiceError::Repository`] if the store fails
    #[instrument(skip(self))]
    pub fn find_user_by_email(&self, email: &str) -> Result<User, ServiceError> {
        let email = email.to_lowercase();

        if let Some(user) = self.cache.load(&email) {
            debug!("User served from cache");
            return Ok(user);
        }

        match self.repo.find_by_email(&email) {
            Ok(Some(user)) => {
                self.cache.store(email, user.clone());
                Ok(user)
            }
            Ok(None) => {
                debug!("User not found");
                Err(ServiceError::UserNotFound { email })
            }
            Err(err) => {
                error!(error = %err, "User lookup failed");
                Err(err.into())
            }
        }
    }

    /// Registers a user with the given credential.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidEmail`] if the email is malformed
    /// - [`ServiceError::UserAlreadyExists`] if the email is taken
    /// - [`ServiceError::Repository`] if the store fails
    #[instrument(skip(self, token))]
    pub fn create_user(&self, email: &str, name: &str, token: &str) -> Result<User, ServiceError> {
        let email = email.to_lowercase();
        if !is_valid_email(&email) {
            warn!("Rejected invalid email");
            return Err(ServiceError::InvalidEmail { email });
        }

        match self.find_user_by_email(&email) {
            Ok(_) => return Err(ServiceError::UserAlreadyExists { email }),
            Err(ServiceError::UserNotFound { .. }) => {}
            Err(err) => return Err(err),
        }

        let mut user = User::new(name, email.clone());
        user.token = token.to_string();
        let user = match self.repo.create(user) {
            Ok(user) => user,
            Err(err) if err.is_duplicate() => {
                warn!("Email registered concurrently");
                return Err(ServiceError::UserAlreadyExists { email });
            }
            Err(err) => return Err(err.into()),
        };
        self.remember(&user);

        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Registers a user with a freshly generated token.
    ///
    /// # Errors
    ///
    /// See [`UserService::create_user`].
    #[instrument(skip(self))]
    pub fn register(&self, name: &str, email: &str) -> Result<User, ServiceError> {
        self.create_user(email, name, &generate_token())
    }

    /// Returns the user owning `email` if `token` is theirs.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidCredentials`] for an unknown email or wrong token
    /// - [`ServiceError::Repository`] if the store fails
    #[instrument(skip(self, token))]
    pub fn authenticate(&self, email: &str, token: &str) -> Result<User, ServiceError> {
        let user = match self.find_user_by_email(email) {
            Ok(user) => user,
            Err(ServiceError::UserNotFound { .. }) => return Err(ServiceError::InvalidCredentials),
            Err(err) => return Err(err),
        };

        if token.is_empty() || user.token != token {
            warn!("Token mismatch");
            return Err(ServiceError::InvalidCredentials);
        }
        Ok(user)
    }
}
