//! Player identity.

use serde::{Deserialize, Serialize};

/// A registered player. The email address is the natural key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier; 0 until persisted.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Opaque credential.
    pub token: String,
}

impl User {
    /// Creates an unsaved user without a token.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
            token: String::new(),
        }
    }

    /// Returns true if both users have the same email, ignoring case.
    pub fn is(&self, other: &User) -> bool {
        self.has_email(&other.email)
    }

    /// Returns true if this user's email equals `email`, ignoring case.
    pub fn has_email(&self, email: &str) -> bool {
        !self.email.is_empty() && self.email.eq_ignore_ascii_case(email)
    }

    /// Returns true if the user has not been stored yet.
    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}
