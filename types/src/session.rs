//! Session lifecycle types.

use std::fmt;

/// Authentication state tracked by the session guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Active,
    Checking,
    Renewing,
    /// The user abandoned renewal and the client navigated away.
    FailedHard,
}

impl SessionState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Checking => "checking",
            Self::Renewing => "renewing",
            Self::FailedHard => "failed-hard",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pages the client can navigate to, discarding all in-flight work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The public landing page.
    Entry,
    Logout,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Manual Debug impl to prevent leaking passwords in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
