//! Core engine for LabelUI: start-up orchestration, session recovery,
//! overlay and layout state.
//!
//! The engine never touches a page directly. Rendering, navigation and
//! server access arrive through the traits in [`collaborators`], [`gate`],
//! [`overlay`] and [`layout`], so the whole start-up sequence runs headless.

pub mod backend;
pub mod bootstrap;
pub mod collaborators;
pub mod error;
pub mod gate;
pub mod interface;
pub mod layout;
pub mod overlay;
pub mod session;


pub use backend::HttpBackend;
pub use bootstrap::{Bootstrap, BootstrapSettings, Services, StageKind};
pub use collaborators::{
    AiWorkerPanel, AuthFut, AuthService, CommandListener, ConfigurationSource, CredentialPrompt,
    Gallery, GalleryContext, LabelClassLegend, Navigator, PromptOutcome, ServiceFut,
    SubsystemFactory, UsernameSource,
};
pub use error::{AuthError, BootstrapError, ServiceError, SessionError};
pub use gate::{BusyToken, ControlSurface, UiBlockGate};
pub use interface::{AnnotationInterface, EventHandlers, SKIP_TUTORIAL_COOKIE, Subsystems, WindowEvent};
pub use layout::{LayoutEngine, PanelId, PresentationAdapter};
pub use overlay::{OverlayHandle, OverlayPresenter, OverlaySettings, OverlaySurface};
pub use session::SessionGuard;

pub use labelui_config::{ClientConfig, EndpointsConfig};
pub use labelui_types::{
    Credentials, Destination, GlobalConfiguration, ProjectSettings, SessionState, Viewport,
    ViewportLayout,
};
pub use labelui_types::ui::{OverlayContent, OverlayPhase, OverlayRequest};
