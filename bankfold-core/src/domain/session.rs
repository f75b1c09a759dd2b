//! Session token and login credentials

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque session key issued by the provider on login
///
/// Immutable once issued. Every authenticated call borrows it; logout
/// consumes it, so a closed session cannot be used again.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw key. Returns `None` for an empty key, which the provider
    /// uses to signal a failed login.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keep the key out of logs and panics
        let shown: String = self.0.chars().take(4).collect();
        write!(f, "SessionToken({}…)", shown)
    }
}

/// Provider login triple
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Provider (bank) code, e.g. "test" in the sandbox
    pub provider: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        provider: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Sandbox fixture login
    pub fn sandbox() -> Self {
        Self::new("test", "12345", "gfdsa")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("provider", &self.provider)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
