//! Shared test utilities and fixtures
//!
//! A mock annotation server plus page-side fakes for driving the bootstrap
//! end to end.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use labelui_engine::{
    AiWorkerPanel, BootstrapSettings, CommandListener, ControlSurface, CredentialPrompt,
    Destination, Gallery, GalleryContext, GlobalConfiguration, HttpBackend, LabelClassLegend,
    Navigator, OverlaySettings, OverlaySurface, PanelId, PresentationAdapter, ProjectSettings,
    PromptOutcome, ServiceError, ServiceFut, Services, SubsystemFactory, Viewport, ViewportLayout,
};
use labelui_config::EndpointsConfig;
use labelui_types::ui::{CardSize, OverlayContent, TransitionKind};
use labelui_utils::CookieJar;

pub fn configuration_body() -> serde_json::Value {
    serde_json::json!({
        "minImageWidth": 120,
        "numImageColumns_max": 4,
        "numImagesPerBatch": 8,
        "aiControllerURI": null
    })
}

pub fn project_body() -> serde_json::Value {
    serde_json::json!({
        "projectName": "Wildlife survey",
        "projectDescription": "Camera trap images",
        "annotationType": "labels",
        "predictionType": "labels",
        "demoMode": false
    })
}

/// Mount a server that accepts the session and serves both configuration documents.
pub async fn start_annotation_server() -> MockServer {
    let server = MockServer::start().await;
    mount_login_check(&server, 200).await;
    Mock::given(method("GET"))
        .and(path("/getConfig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(configuration_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/getProjectSettings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_body()))
        .mount(&server)
        .await;
    server
}

pub async fn mount_login_check(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/loginCheck"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub fn backend(server: &MockServer) -> Arc<HttpBackend> {
    Arc::new(HttpBackend::new(&server.uri(), EndpointsConfig::default()).expect("backend"))
}

pub fn instant_settings() -> BootstrapSettings {
    BootstrapSettings {
        overlay: OverlaySettings::instant(),
        chrome_height: 56.0,
        viewport: Viewport::new(1280.0, 800.0),
    }
}

#[derive(Default)]
pub struct Controls {
    calls: Mutex<Vec<bool>>,
}

impl Controls {
    pub fn calls(&self) -> Vec<bool> {
        self.calls.lock().expect("controls").clone()
    }
}

impl ControlSurface for Controls {
    fn set_controls_enabled(&self, enabled: bool) {
        self.calls.lock().expect("controls").push(enabled);
    }
}

pub struct Surface;

impl OverlaySurface for Surface {
    fn set_card_size(&mut self, _size: CardSize) {}
    fn set_content(&mut self, _content: &OverlayContent) {}
    fn clear_content(&mut self) {}
    fn begin_transition(&mut self, _kind: TransitionKind) {}
}

#[derive(Default)]
pub struct Page {
    layouts: Mutex<Vec<ViewportLayout>>,
    panels: Mutex<Vec<PanelId>>,
}

impl Page {
    pub fn layouts(&self) -> Vec<ViewportLayout> {
        self.layouts.lock().expect("page").clone()
    }

    pub fn panels(&self) -> Vec<PanelId> {
        self.panels.lock().expect("page").clone()
    }
}

impl PresentationAdapter for Page {
    fn side_panel_width(&self) -> f64 {
        280.0
    }

    fn apply_tile_geometry(&self, layout: &ViewportLayout) {
        self.layouts.lock().expect("page").push(*layout);
    }

    fn set_gallery_width(&self, _width: f64) {}

    fn set_legend_height(&self, _height: f64) {}

    fn set_panel_visible(&self, panel: PanelId, visible: bool) {
        if visible {
            self.panels.lock().expect("page").push(panel);
        }
    }
}

#[derive(Default)]
pub struct Navigation {
    destinations: Mutex<Vec<Destination>>,
}

impl Navigation {
    pub fn destinations(&self) -> Vec<Destination> {
        self.destinations.lock().expect("navigation").clone()
    }
}

impl Navigator for Navigation {
    fn navigate(&self, destination: Destination) {
        self.destinations.lock().expect("navigation").push(destination);
    }
}

pub struct Prompt {
    answers: Mutex<VecDeque<PromptOutcome>>,
    asked: AtomicUsize,
}

impl Prompt {
    pub fn answering(answers: impl IntoIterator<Item = PromptOutcome>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: AtomicUsize::new(0),
        }
    }

    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl CredentialPrompt for Prompt {
    fn collect<'a>(
        &'a self,
        _username: &'a str,
        _invalid_credentials: bool,
    ) -> Pin<Box<dyn Future<Output = PromptOutcome> + Send + 'a>> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        let answer = self
            .answers
            .lock()
            .expect("prompt")
            .pop_front()
            .unwrap_or(PromptOutcome::Cancel);
        Box::pin(async move { answer })
    }
}

struct Listener;
impl CommandListener for Listener {}

struct Legend;
impl LabelClassLegend for Legend {
    fn class_count(&self) -> usize {
        2
    }
}

struct Workers;
impl AiWorkerPanel for Workers {}

/// Gallery showing a fixed number of square tiles once loaded.
pub struct Tiles {
    batch: usize,
    shown: AtomicUsize,
    flushes: AtomicUsize,
}

impl Tiles {
    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl Gallery for Tiles {
    fn load_next_batch(&self) -> ServiceFut<'_, usize> {
        self.shown.store(self.batch, Ordering::SeqCst);
        Box::pin(async move { Ok(self.batch) })
    }

    fn submit_annotations(&self, _is_final: bool) -> ServiceFut<'_, ()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Ok(()) })
    }

    fn render_all(&self) {}

    fn tile_count(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }

    fn tile_aspect_ratio(&self) -> Option<f64> {
        (self.tile_count() > 0).then_some(1.0)
    }
}

pub struct Factory {
    tiles: Arc<Tiles>,
}

impl Factory {
    pub fn tiles(&self) -> Arc<Tiles> {
        self.tiles.clone()
    }
}

impl SubsystemFactory for Factory {
    fn command_listener(
        &self,
        _configuration: &GlobalConfiguration,
    ) -> Result<Arc<dyn CommandListener>, ServiceError> {
        Ok(Arc::new(Listener))
    }

    fn label_class_legend(
        &self,
        _project: &ProjectSettings,
    ) -> Result<Arc<dyn LabelClassLegend>, ServiceError> {
        Ok(Arc::new(Legend))
    }

    fn gallery(&self, context: GalleryContext<'_>) -> Result<Arc<dyn Gallery>, ServiceError> {
        assert_eq!(context.configuration.images_per_batch, self.tiles.batch);
        Ok(self.tiles.clone())
    }

    fn ai_worker_panel(&self, _controller_uri: &str) -> Result<Arc<dyn AiWorkerPanel>, ServiceError> {
        Ok(Arc::new(Workers))
    }
}

/// Page-side fakes handed to the bootstrap, kept for assertions.
pub struct Fixture {
    pub controls: Arc<Controls>,
    pub page: Arc<Page>,
    pub navigation: Arc<Navigation>,
    pub prompt: Arc<Prompt>,
    pub factory: Arc<Factory>,
}

impl Fixture {
    pub fn new(prompt: Prompt) -> Self {
        Self {
            controls: Arc::new(Controls::default()),
            page: Arc::new(Page::default()),
            navigation: Arc::new(Navigation::default()),
            prompt: Arc::new(prompt),
            factory: Arc::new(Factory {
                tiles: Arc::new(Tiles {
                    batch: 8,
                    shown: AtomicUsize::new(0),
                    flushes: AtomicUsize::new(0),
                }),
            }),
        }
    }

    pub fn services(&self, backend: Arc<HttpBackend>, cookies: CookieJar) -> Services {
        Services {
            auth: backend.clone(),
            configuration: backend,
            factory: self.factory.clone(),
            navigator: self.navigation.clone(),
            presentation: self.page.clone(),
            controls: self.controls.clone(),
            overlay_surface: Box::new(Surface),
            prompt: self.prompt.clone(),
            usernames: Arc::new("annotator".to_string()),
            cookies: Box::new(cookies),
        }
    }
}
