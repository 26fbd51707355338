//! Boundaries to the services and subsystems the engine drives but does not own.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use labelui_types::{Credentials, Destination, GlobalConfiguration, ProjectSettings};

use crate::error::{AuthError, ServiceError};

/// Future returned by server-facing collaborators.
pub type ServiceFut<'a, T> = Pin<Box<dyn Future<Output = Result<T, ServiceError>> + Send + 'a>>;

/// Future returned by [`AuthService`].
pub type AuthFut<'a> = Pin<Box<dyn Future<Output = Result<(), AuthError>> + Send + 'a>>;

pub trait AuthService: Send + Sync {
    /// Succeeds when the current session is authenticated.
    fn probe(&self) -> AuthFut<'_>;
    fn login<'a>(&'a self, credentials: &'a Credentials) -> AuthFut<'a>;
}

pub trait ConfigurationSource: Send + Sync {
    fn load_configuration(&self) -> ServiceFut<'_, GlobalConfiguration>;
    fn project_settings(&self) -> ServiceFut<'_, ProjectSettings>;
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: Destination);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Submit(String),
    Cancel,
}

/// Collects a password while the renewal overlay is up.
pub trait CredentialPrompt: Send + Sync {
    fn collect<'a>(
        &'a self,
        username: &'a str,
        invalid_credentials: bool,
    ) -> Pin<Box<dyn Future<Output = PromptOutcome> + Send + 'a>>;
}

/// The account name currently shown in the interface.
pub trait UsernameSource: Send + Sync {
    fn username(&self) -> String;
}

impl UsernameSource for String {
    fn username(&self) -> String {
        self.clone()
    }
}

/// Keyboard and command dispatch; live for as long as it is held.
pub trait CommandListener: Send + Sync {}

pub trait LabelClassLegend: Send + Sync {
    fn class_count(&self) -> usize;
}

/// Owns the annotated items, their tiles and pending submissions.
pub trait Gallery: Send + Sync {
    /// Fetch the next batch; resolves to the number of tiles now shown.
    fn load_next_batch(&self) -> ServiceFut<'_, usize>;
    /// Send pending annotations. A final flush must be idempotent.
    fn submit_annotations(&self, is_final: bool) -> ServiceFut<'_, ()>;
    fn render_all(&self);
    fn tile_count(&self) -> usize;
    /// Width over height of the first tile, if any tile is present.
    fn tile_aspect_ratio(&self) -> Option<f64>;
}

/// Worker status panel for deployments with an AI controller.
pub trait AiWorkerPanel: Send + Sync {}

/// Everything the gallery needs from earlier stages.
pub struct GalleryContext<'a> {
    pub configuration: &'a GlobalConfiguration,
    pub project: &'a ProjectSettings,
    pub legend: Arc<dyn LabelClassLegend>,
}

pub trait SubsystemFactory: Send + Sync {
    fn command_listener(
        &self,
        configuration: &GlobalConfiguration,
    ) -> Result<Arc<dyn CommandListener>, ServiceError>;

    fn label_class_legend(
        &self,
        project: &ProjectSettings,
    ) -> Result<Arc<dyn LabelClassLegend>, ServiceError>;

    fn gallery(&self, context: GalleryContext<'_>) -> Result<Arc<dyn Gallery>, ServiceError>;

    fn ai_worker_panel(&self, controller_uri: &str) -> Result<Arc<dyn AiWorkerPanel>, ServiceError>;
}
