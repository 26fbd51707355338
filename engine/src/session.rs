//! Session guard: re-authenticates in place when the server session expires.

use std::sync::{Arc, Mutex, PoisonError};

use labelui_types::ui::{OverlayContent, OverlayRequest};
use labelui_types::{Credentials, Destination, SessionState};

use crate::collaborators::{AuthService, CredentialPrompt, Navigator, PromptOutcome, UsernameSource};
use crate::error::SessionError;
use crate::overlay::OverlayHandle;

pub struct SessionGuard {
    auth: Arc<dyn AuthService>,
    overlay: OverlayHandle,
    prompt: Arc<dyn CredentialPrompt>,
    usernames: Arc<dyn UsernameSource>,
    navigator: Arc<dyn Navigator>,
    state: Mutex<SessionState>,
    /// One renewal at a time; later callers re-probe once it finishes.
    renewal: tokio::sync::Mutex<()>,
}

impl SessionGuard {
    pub fn new(
        auth: Arc<dyn AuthService>,
        overlay: OverlayHandle,
        prompt: Arc<dyn CredentialPrompt>,
        usernames: Arc<dyn UsernameSource>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            auth,
            overlay,
            prompt,
            usernames,
            navigator,
            state: Mutex::new(SessionState::Active),
            renewal: tokio::sync::Mutex::new(()),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `continuation` once the session is known to be active.
    ///
    /// A failed probe puts up the renewal form and waits for the user. The
    /// continuation is dropped unrun if the user cancels.
    pub async fn verify<T>(&self, continuation: impl FnOnce() -> T) -> Result<T, SessionError> {
        let _renewal = self.renewal.lock().await;

        self.set_state(SessionState::Checking);
        match self.auth.probe().await {
            Ok(()) => {
                self.set_state(SessionState::Active);
                return Ok(continuation());
            }
            Err(err) => tracing::info!(error = %err, "Session expired; requesting credentials"),
        }

        let username = self.usernames.username();
        let mut invalid_credentials = false;
        loop {
            self.set_state(SessionState::Renewing);
            self.overlay.show(OverlayRequest::new(OverlayContent::SessionRenewal {
                username: username.clone(),
                invalid_credentials,
            }));

            let password = match self.prompt.collect(&username, invalid_credentials).await {
                PromptOutcome::Cancel => {
                    self.set_state(SessionState::FailedHard);
                    tracing::info!("Session renewal cancelled");
                    self.navigator.navigate(Destination::Entry);
                    return Err(SessionError::Cancelled);
                }
                PromptOutcome::Submit(password) if password.is_empty() => {
                    tracing::debug!("Password required");
                    continue;
                }
                PromptOutcome::Submit(password) => password,
            };

            self.set_state(SessionState::Checking);
            let credentials = Credentials::new(username.clone(), password);
            match self.auth.login(&credentials).await {
                Ok(()) => {
                    self.set_state(SessionState::Active);
                    tracing::info!(username = %username, "Session renewed");
                    let output = continuation();
                    self.overlay.hide();
                    return Ok(output);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Session renewal rejected");
                    invalid_credentials = true;
                }
            }
        }
    }

    pub async fn ensure_active(&self) -> Result<(), SessionError> {
        self.verify(|| ()).await
    }

    fn set_state(&self, next: SessionState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != next {
            tracing::debug!(from = %*state, to = %next, "Session state");
            *state = next;
        }
    }
}
