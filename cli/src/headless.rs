//! Terminal stand-ins for the page: controls, overlay, layout and prompts are
//! reported through tracing and stdout instead of being drawn.

use std::fs;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin};

use labelui_engine::{
    AiWorkerPanel, CommandListener, ControlSurface, CredentialPrompt, Destination, Gallery,
    GalleryContext, GlobalConfiguration, HttpBackend, LabelClassLegend, Navigator, OverlayContent,
    OverlaySurface, PanelId, PresentationAdapter, ProjectSettings, PromptOutcome, ServiceError,
    ServiceFut, SubsystemFactory, ViewportLayout,
};
use labelui_types::ui::{CardSize, TransitionKind};
use labelui_utils::{CookieJar, CookieStore};

/// Images are never decoded headless; tiles are assumed to be 4:3.
const ASSUMED_TILE_ASPECT: f64 = 4.0 / 3.0;

pub struct LoggingControls;

impl ControlSurface for LoggingControls {
    fn set_controls_enabled(&self, enabled: bool) {
        tracing::info!(enabled, "Interface controls");
    }
}

pub struct LoggingOverlay;

impl OverlaySurface for LoggingOverlay {
    fn set_card_size(&mut self, size: CardSize) {
        tracing::debug!(?size, "Overlay card size");
    }

    fn set_content(&mut self, content: &OverlayContent) {
        tracing::info!(content = content.label(), "Overlay shown");
        match content {
            OverlayContent::SessionRenewal { username, .. } => {
                println!("Session expired for {username}. Enter the password to continue, or Ctrl-D to cancel.");
            }
            OverlayContent::Tutorial => println!("Tutorial available."),
            OverlayContent::Markup(markup) => println!("{markup}"),
            OverlayContent::Loading => {}
        }
    }

    fn clear_content(&mut self) {
        tracing::debug!("Overlay cleared");
    }

    fn begin_transition(&mut self, kind: TransitionKind) {
        tracing::trace!(?kind, "Overlay transition");
    }
}

pub struct LoggingPage {
    side_panel_width: f64,
}

impl LoggingPage {
    pub fn new(side_panel_width: f64) -> Self {
        Self { side_panel_width }
    }
}

impl PresentationAdapter for LoggingPage {
    fn side_panel_width(&self) -> f64 {
        self.side_panel_width
    }

    fn apply_tile_geometry(&self, layout: &ViewportLayout) {
        tracing::debug!(
            width = layout.tile_width,
            height = layout.tile_height,
            min_width = layout.min_tile_width,
            "Tile geometry"
        );
    }

    fn set_gallery_width(&self, width: f64) {
        tracing::debug!(width, "Gallery width");
    }

    fn set_legend_height(&self, height: f64) {
        tracing::debug!(height, "Legend height");
    }

    fn set_panel_visible(&self, panel: PanelId, visible: bool) {
        tracing::info!(%panel, visible, "Panel visibility");
    }
}

/// Reads the renewal password from stdin, one line per attempt.
pub struct StdinPrompt {
    input: tokio::sync::Mutex<BufReader<Stdin>>,
}

impl StdinPrompt {
    pub fn new() -> Self {
        Self {
            input: tokio::sync::Mutex::new(BufReader::new(tokio::io::stdin())),
        }
    }
}

/// Input is read line by line with terminal echo left on.
fn renewal_prompt(username: &str, hint: &str) -> String {
    format!("Password for {username}{hint} (input is shown as typed): ")
}

impl CredentialPrompt for StdinPrompt {
    fn collect<'a>(
        &'a self,
        username: &'a str,
        invalid_credentials: bool,
    ) -> Pin<Box<dyn Future<Output = PromptOutcome> + Send + 'a>> {
        Box::pin(async move {
            let hint = if invalid_credentials {
                " (invalid password entered)"
            } else {
                ""
            };
            let mut stdout = tokio::io::stdout();
            let prompt = renewal_prompt(username, hint);
            if let Err(err) = stdout.write_all(prompt.as_bytes()).await {
                tracing::warn!(error = %err, "Failed to write prompt");
            }
            if let Err(err) = stdout.flush().await {
                tracing::warn!(error = %err, "Failed to flush prompt");
            }

            let mut line = String::new();
            match self.input.lock().await.read_line(&mut line).await {
                Ok(0) => PromptOutcome::Cancel,
                Ok(_) => PromptOutcome::Submit(line.trim_end_matches(['\r', '\n']).to_string()),
                Err(err) => {
                    tracing::warn!(error = %err, "Failed to read password");
                    PromptOutcome::Cancel
                }
            }
        })
    }
}

/// Reports navigation instead of leaving the page.
pub struct PrintingNavigator {
    backend: Arc<HttpBackend>,
}

impl PrintingNavigator {
    pub fn new(backend: Arc<HttpBackend>) -> Self {
        Self { backend }
    }
}

impl Navigator for PrintingNavigator {
    fn navigate(&self, destination: Destination) {
        match self.backend.destination_url(destination) {
            Ok(url) => {
                tracing::info!(?destination, %url, "Navigating");
                println!("Navigate to {url}");
            }
            Err(err) => tracing::error!(?destination, error = %err, "Cannot resolve destination"),
        }
    }
}

/// Cookie jar persisted to a file after every write.
pub struct FileCookies {
    path: Option<PathBuf>,
    jar: CookieJar,
}

impl FileCookies {
    pub fn open(path: Option<PathBuf>) -> Self {
        let jar = path
            .as_deref()
            .and_then(|path| fs::read_to_string(path).ok())
            .map(|text| CookieJar::from_lines(&text))
            .unwrap_or_default();
        Self { path, jar }
    }

    fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Some(parent) = path.parent()
            && let Err(err) = fs::create_dir_all(parent)
        {
            tracing::warn!(path = %parent.display(), error = %err, "Failed to create cookie dir");
            return;
        }
        if let Err(err) = fs::write(path, self.jar.to_lines()) {
            tracing::warn!(path = %path.display(), error = %err, "Failed to save cookies");
        }
    }
}

impl CookieStore for FileCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.jar.get(name)
    }

    fn set(&mut self, name: &str, value: &str, days: i64) {
        self.jar.set(name, value, days);
        self.save();
    }
}

struct HeadlessListener;
impl CommandListener for HeadlessListener {}

struct HeadlessLegend;
impl LabelClassLegend for HeadlessLegend {
    fn class_count(&self) -> usize {
        0
    }
}

struct HeadlessWorkerPanel;
impl AiWorkerPanel for HeadlessWorkerPanel {}

/// Gallery that fetches batches but keeps no annotations of its own.
pub struct HeadlessGallery {
    backend: Arc<HttpBackend>,
    limit: usize,
    tiles: AtomicUsize,
    renders: AtomicUsize,
}

impl HeadlessGallery {
    pub fn new(backend: Arc<HttpBackend>, limit: usize) -> Self {
        Self {
            backend,
            limit,
            tiles: AtomicUsize::new(0),
            renders: AtomicUsize::new(0),
        }
    }
}

/// Number of items in a batch document: an `entries` map or array, or a bare array.
fn batch_len(batch: &serde_json::Value) -> usize {
    let entries = batch.get("entries").unwrap_or(batch);
    match entries {
        serde_json::Value::Object(map) => map.len(),
        serde_json::Value::Array(items) => items.len(),
        _ => 0,
    }
}

impl Gallery for HeadlessGallery {
    fn load_next_batch(&self) -> ServiceFut<'_, usize> {
        Box::pin(async move {
            let batch = self.backend.next_batch(self.limit).await?;
            let count = batch_len(&batch);
            self.tiles.store(count, Ordering::SeqCst);
            tracing::info!(count, "Batch loaded");
            Ok(count)
        })
    }

    fn submit_annotations(&self, is_final: bool) -> ServiceFut<'_, ()> {
        tracing::debug!(is_final, "Nothing to submit");
        Box::pin(async { Ok(()) })
    }

    fn render_all(&self) {
        let frame = self.renders.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(frame, tiles = self.tile_count(), "Gallery rendered");
    }

    fn tile_count(&self) -> usize {
        self.tiles.load(Ordering::SeqCst)
    }

    fn tile_aspect_ratio(&self) -> Option<f64> {
        (self.tile_count() > 0).then_some(ASSUMED_TILE_ASPECT)
    }
}

pub struct HeadlessFactory {
    backend: Arc<HttpBackend>,
}

impl HeadlessFactory {
    pub fn new(backend: Arc<HttpBackend>) -> Self {
        Self { backend }
    }
}

impl SubsystemFactory for HeadlessFactory {
    fn command_listener(
        &self,
        _configuration: &GlobalConfiguration,
    ) -> Result<Arc<dyn CommandListener>, ServiceError> {
        Ok(Arc::new(HeadlessListener))
    }

    fn label_class_legend(
        &self,
        project: &ProjectSettings,
    ) -> Result<Arc<dyn LabelClassLegend>, ServiceError> {
        tracing::info!(project = %project.name, "Project");
        Ok(Arc::new(HeadlessLegend))
    }

    fn gallery(&self, context: GalleryContext<'_>) -> Result<Arc<dyn Gallery>, ServiceError> {
        Ok(Arc::new(HeadlessGallery::new(
            self.backend.clone(),
            context.configuration.images_per_batch,
        )))
    }

    fn ai_worker_panel(&self, controller_uri: &str) -> Result<Arc<dyn AiWorkerPanel>, ServiceError> {
        tracing::info!(controller = controller_uri, "AI controller configured");
        Ok(Arc::new(HeadlessWorkerPanel))
    }
}
