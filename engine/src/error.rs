//! Error types for bootstrap, session recovery and server access.

use crate::bootstrap::StageKind;

/// Failure talking to the annotation server or building a subsystem.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid endpoint {path:?}: {source}")]
    InvalidUrl {
        path: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Subsystem unavailable: {0}")]
    Subsystem(String),
}

/// Outcome of a session probe or login attempt that did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Not authenticated (HTTP {status})")]
    Unauthorized { status: u16 },
    #[error(transparent)]
    Transport(#[from] ServiceError),
}

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The initial probe failed; the client has navigated to the entry page.
    #[error("Authentication check failed: {0}")]
    HardAuthFailure(#[source] AuthError),
    #[error("Stage {stage} failed: {source}")]
    Stage {
        stage: StageKind,
        #[source]
        source: ServiceError,
    },
    #[error("Stage {stage} ran before {missing}")]
    OutOfOrder { stage: StageKind, missing: StageKind },
}

impl BootstrapError {
    #[must_use]
    pub fn stage(&self) -> StageKind {
        match self {
            Self::HardAuthFailure(_) => StageKind::AuthProbe,
            Self::Stage { stage, .. } | Self::OutOfOrder { stage, .. } => *stage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The user dismissed the renewal form; the client has navigated away.
    #[error("Session renewal cancelled")]
    Cancelled,
}
