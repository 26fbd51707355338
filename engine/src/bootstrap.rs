//! Ordered start-up of the annotation interface.
//!
//! Stages run strictly one after another behind the loading overlay. The
//! first stage failing sends the user to the entry page; any later failure
//! halts start-up with the overlay and its busy holds left in place.

use std::fmt;
use std::sync::Arc;

use labelui_config::ClientConfig;
use labelui_types::ui::{OverlayContent, OverlayRequest};
use labelui_types::{Destination, GlobalConfiguration, ProjectSettings, Viewport, ViewportLayout};
use labelui_utils::CookieStore;

use crate::collaborators::{
    AiWorkerPanel, AuthService, CommandListener, ConfigurationSource, CredentialPrompt, Gallery,
    GalleryContext, LabelClassLegend, Navigator, SubsystemFactory, UsernameSource,
};
use crate::error::{BootstrapError, ServiceError};
use crate::gate::{BusyToken, ControlSurface, UiBlockGate};
use crate::interface::{AnnotationInterface, EventHandlers, SKIP_TUTORIAL_COOKIE, Subsystems};
use crate::layout::{LayoutEngine, PanelId, PresentationAdapter};
use crate::overlay::{OverlayHandle, OverlayPresenter, OverlaySettings, OverlaySurface};
use crate::session::SessionGuard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    AuthProbe,
    LoadConfiguration,
    LoadProjectSettings,
    CommandListener,
    LabelClassLegend,
    DataGallery,
    AiWorkers,
    FirstBatch,
    EnableInterface,
    Tutorial,
}

impl StageKind {
    pub const ALL: [StageKind; 10] = [
        StageKind::AuthProbe,
        StageKind::LoadConfiguration,
        StageKind::LoadProjectSettings,
        StageKind::CommandListener,
        StageKind::LabelClassLegend,
        StageKind::DataGallery,
        StageKind::AiWorkers,
        StageKind::FirstBatch,
        StageKind::EnableInterface,
        StageKind::Tutorial,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AuthProbe => "auth-probe",
            Self::LoadConfiguration => "load-configuration",
            Self::LoadProjectSettings => "load-project-settings",
            Self::CommandListener => "command-listener",
            Self::LabelClassLegend => "label-class-legend",
            Self::DataGallery => "data-gallery",
            Self::AiWorkers => "ai-workers",
            Self::FirstBatch => "first-batch",
            Self::EnableInterface => "enable-interface",
            Self::Tutorial => "tutorial",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Collaborators the bootstrap wires together.
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub configuration: Arc<dyn ConfigurationSource>,
    pub factory: Arc<dyn SubsystemFactory>,
    pub navigator: Arc<dyn Navigator>,
    pub presentation: Arc<dyn PresentationAdapter>,
    pub controls: Arc<dyn ControlSurface>,
    pub overlay_surface: Box<dyn OverlaySurface>,
    pub prompt: Arc<dyn CredentialPrompt>,
    pub usernames: Arc<dyn UsernameSource>,
    pub cookies: Box<dyn CookieStore>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapSettings {
    pub overlay: OverlaySettings,
    /// Height of the navbar and footer, subtracted from the viewport.
    pub chrome_height: f64,
    /// Viewport used for the first layout pass.
    pub viewport: Viewport,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl BootstrapSettings {
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        let layout = config.layout();
        Self {
            overlay: OverlaySettings::from(&config.overlay()),
            chrome_height: layout.chrome_height,
            viewport: layout.viewport(),
        }
    }
}

/// Results of completed stages.
#[derive(Default)]
struct Progress {
    configuration: Option<GlobalConfiguration>,
    project: Option<ProjectSettings>,
    command_listener: Option<Arc<dyn CommandListener>>,
    legend: Option<Arc<dyn LabelClassLegend>>,
    gallery: Option<Arc<dyn Gallery>>,
    ai_worker_panel: Option<Arc<dyn AiWorkerPanel>>,
    handlers: Option<EventHandlers>,
    interface_block: Option<BusyToken>,
    layout: Option<ViewportLayout>,
}

fn require<T>(value: Option<T>, stage: StageKind, missing: StageKind) -> Result<T, BootstrapError> {
    value.ok_or(BootstrapError::OutOfOrder { stage, missing })
}

pub struct Bootstrap {
    auth: Arc<dyn AuthService>,
    configuration: Arc<dyn ConfigurationSource>,
    factory: Arc<dyn SubsystemFactory>,
    navigator: Arc<dyn Navigator>,
    presentation: Arc<dyn PresentationAdapter>,
    cookies: Box<dyn CookieStore>,
    settings: BootstrapSettings,
    gate: UiBlockGate,
    overlay: OverlayHandle,
    session: Arc<SessionGuard>,
    progress: Progress,
}

impl Bootstrap {
    pub fn new(services: Services, settings: BootstrapSettings) -> Self {
        let gate = UiBlockGate::new(services.controls);
        let overlay = OverlayHandle::new(OverlayPresenter::new(
            services.overlay_surface,
            gate.clone(),
            settings.overlay,
        ));
        let session = Arc::new(SessionGuard::new(
            services.auth.clone(),
            overlay.clone(),
            services.prompt,
            services.usernames,
            services.navigator.clone(),
        ));

        Self {
            auth: services.auth,
            configuration: services.configuration,
            factory: services.factory,
            navigator: services.navigator,
            presentation: services.presentation,
            cookies: services.cookies,
            settings,
            gate,
            overlay,
            session,
            progress: Progress::default(),
        }
    }

    /// Overlay shared with the bootstrap; keep a clone to drive transitions.
    #[must_use]
    pub fn overlay(&self) -> &OverlayHandle {
        &self.overlay
    }

    #[must_use]
    pub fn gate(&self) -> &UiBlockGate {
        &self.gate
    }

    /// Run every stage in order.
    ///
    /// On error the loading overlay stays up and the interface stays blocked
    /// for as long as an [`OverlayHandle`] clone is alive.
    pub async fn run(mut self) -> Result<AnnotationInterface, BootstrapError> {
        tracing::info!("Starting annotation interface");
        self.overlay.show(OverlayRequest::new(OverlayContent::Loading));

        for stage in StageKind::ALL {
            tracing::debug!(%stage, "Stage starting");
            if let Err(err) = self.run_stage(stage).await {
                tracing::error!(%stage, error = %err, "Start-up halted");
                return Err(err);
            }
            tracing::info!(%stage, "Stage complete");
        }

        self.finish()
    }

    async fn run_stage(&mut self, stage: StageKind) -> Result<(), BootstrapError> {
        let failed = |source: ServiceError| BootstrapError::Stage { stage, source };
        match stage {
            StageKind::AuthProbe => {
                if let Err(err) = self.auth.probe().await {
                    tracing::warn!(error = %err, "Not logged in; leaving for entry page");
                    self.navigator.navigate(Destination::Entry);
                    return Err(BootstrapError::HardAuthFailure(err));
                }
            }
            StageKind::LoadConfiguration => {
                let configuration = self.configuration.load_configuration().await.map_err(failed)?;
                self.progress.configuration = Some(configuration);
            }
            StageKind::LoadProjectSettings => {
                let project = self.configuration.project_settings().await.map_err(failed)?;
                tracing::debug!(project = %project.name, "Project settings loaded");
                self.progress.project = Some(project);
            }
            StageKind::CommandListener => {
                let configuration = require(
                    self.progress.configuration.as_ref(),
                    stage,
                    StageKind::LoadConfiguration,
                )?;
                let listener = self.factory.command_listener(configuration).map_err(failed)?;
                self.progress.command_listener = Some(listener);
            }
            StageKind::LabelClassLegend => {
                let project = require(
                    self.progress.project.as_ref(),
                    stage,
                    StageKind::LoadProjectSettings,
                )?;
                let legend = self.factory.label_class_legend(project).map_err(failed)?;
                tracing::debug!(classes = legend.class_count(), "Label classes ready");
                self.progress.legend = Some(legend);
            }
            StageKind::DataGallery => self.build_gallery(stage)?,
            StageKind::AiWorkers => {
                let configuration = require(
                    self.progress.configuration.as_ref(),
                    stage,
                    StageKind::LoadConfiguration,
                )?;
                match configuration.ai_controller() {
                    Some(uri) => {
                        let panel = self.factory.ai_worker_panel(uri).map_err(failed)?;
                        self.presentation
                            .set_panel_visible(PanelId::AiWorkerMiniPanel, true);
                        self.progress.ai_worker_panel = Some(panel);
                    }
                    None => tracing::debug!("No AI controller configured"),
                }
            }
            StageKind::FirstBatch => {
                let gallery = require(self.progress.gallery.clone(), stage, StageKind::DataGallery)?;
                let tiles = gallery.load_next_batch().await.map_err(failed)?;
                tracing::debug!(tiles, "First batch loaded");
                let handlers = require(self.progress.handlers.as_ref(), stage, StageKind::DataGallery)?;
                self.progress.layout = handlers.resized(self.settings.viewport);
            }
            StageKind::EnableInterface => {
                self.overlay.hide();
                self.progress.interface_block = None;
            }
            StageKind::Tutorial => {
                if self.cookies.get(SKIP_TUTORIAL_COOKIE).is_some() {
                    tracing::debug!("Tutorial skipped");
                } else {
                    self.overlay.show(OverlayRequest::new(OverlayContent::Tutorial).large());
                }
            }
        }
        Ok(())
    }

    /// Build the gallery and wire the interface handlers around it.
    fn build_gallery(&mut self, stage: StageKind) -> Result<(), BootstrapError> {
        let configuration = require(
            self.progress.configuration.as_ref(),
            stage,
            StageKind::LoadConfiguration,
        )?;
        let project = require(
            self.progress.project.as_ref(),
            stage,
            StageKind::LoadProjectSettings,
        )?;
        let legend = require(self.progress.legend.clone(), stage, StageKind::LabelClassLegend)?;

        let gallery = self
            .factory
            .gallery(GalleryContext {
                configuration,
                project,
                legend,
            })
            .map_err(|source| BootstrapError::Stage { stage, source })?;

        // Controls stay disabled until the interface is enabled.
        self.progress.interface_block = Some(self.gate.acquire("interface-controls"));

        let layout = LayoutEngine::new(
            self.presentation.clone(),
            configuration.layout_params(),
            self.settings.chrome_height,
        );
        self.progress.handlers = Some(EventHandlers::new(
            gallery.clone(),
            layout,
            self.navigator.clone(),
        ));
        self.progress.gallery = Some(gallery);
        Ok(())
    }

    fn finish(self) -> Result<AnnotationInterface, BootstrapError> {
        let Progress {
            command_listener,
            legend,
            gallery,
            ai_worker_panel,
            handlers,
            layout,
            ..
        } = self.progress;

        let last = StageKind::Tutorial;
        let subsystems = Subsystems {
            command_listener: require(command_listener, last, StageKind::CommandListener)?,
            legend: require(legend, last, StageKind::LabelClassLegend)?,
            gallery: require(gallery, last, StageKind::DataGallery)?,
            ai_worker_panel,
        };
        let handlers = require(handlers, last, StageKind::DataGallery)?;

        tracing::info!("Annotation interface ready");
        Ok(AnnotationInterface::new(
            handlers,
            subsystems,
            self.session,
            self.overlay,
            self.gate,
            self.cookies,
            layout,
        ))
    }
}
