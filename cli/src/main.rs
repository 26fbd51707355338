//! LabelUI CLI - headless driver for the annotation interface start-up.
//!
//! Runs the same bootstrap a browser session would against a configured
//! server, with the page replaced by tracing output:
//!
//! ```text
//! main() -> ClientConfig::load() -> HttpBackend -> Bootstrap::run()
//!                                                      |
//!                                                      v
//!                                  AnnotationInterface -> layout report -> BeforeUnload
//! ```

mod headless;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use labelui_config::ClientConfig;
use labelui_engine::{
    Bootstrap, BootstrapSettings, HttpBackend, SKIP_TUTORIAL_COOKIE, Services, WindowEvent,
};
use labelui_utils::CookieStore;

use headless::{
    FileCookies, HeadlessFactory, LoggingControls, LoggingOverlay, LoggingPage, PrintingNavigator,
    StdinPrompt,
};

const FRAME_DURATION: Duration = Duration::from_millis(16);

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Prompts and reports own stdout; without a log file, stay silent.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in state_file_candidates(&["logs", "labelui.log"]) {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

/// `~/.labelui/<parts>`, then `./.labelui/<parts>`.
fn state_file_candidates(parts: &[&str]) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(config_path) = ClientConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(parts.iter().fold(config_dir.to_path_buf(), |path, part| path.join(part)));
    }

    candidates.push(parts.iter().fold(PathBuf::from(".labelui"), |path, part| path.join(part)));
    candidates
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let config = ClientConfig::load()
        .context("failed to load LabelUI config")?
        .unwrap_or_default();
    let base_url = config.base_url();
    let backend = Arc::new(
        HttpBackend::new(&base_url, config.endpoints())
            .with_context(|| format!("invalid server URL {base_url}"))?,
    );
    let username = config.username().unwrap_or_else(|| {
        tracing::warn!("No username configured; session renewal will send an empty name");
        String::new()
    });

    let services = Services {
        auth: backend.clone(),
        configuration: backend.clone(),
        factory: Arc::new(HeadlessFactory::new(backend.clone())),
        navigator: Arc::new(PrintingNavigator::new(backend.clone())),
        presentation: Arc::new(LoggingPage::new(config.layout().side_panel_width)),
        controls: Arc::new(LoggingControls),
        overlay_surface: Box::new(LoggingOverlay),
        prompt: Arc::new(StdinPrompt::new()),
        usernames: Arc::new(username),
        cookies: Box::new(FileCookies::open(
            state_file_candidates(&["cookies"]).into_iter().next(),
        )),
    };

    let bootstrap = Bootstrap::new(services, BootstrapSettings::from_config(&config));
    let overlay = bootstrap.overlay().clone();
    let ticker = overlay.spawn_ticker(FRAME_DURATION);

    let result = bootstrap.run().await;
    let mut interface = match result {
        Ok(interface) => interface,
        Err(err) => {
            ticker.abort();
            return Err(err).with_context(|| format!("start-up against {base_url} failed"));
        }
    };

    match interface.layout() {
        Some(layout) => println!(
            "{} x {} tiles of {:.0} x {:.0} px",
            layout.columns, layout.rows, layout.tile_width, layout.tile_height
        ),
        None => println!("No tiles loaded"),
    }

    // The tutorial has nothing to teach a headless run.
    if interface.cookies().get(SKIP_TUTORIAL_COOKIE).is_none() {
        interface.dismiss_tutorial(true);
    }

    interface
        .session()
        .ensure_active()
        .await
        .context("session could not be renewed")?;

    let flushed = interface.handle(WindowEvent::BeforeUnload).await;
    ticker.abort();
    flushed.context("final submission failed")?;
    Ok(())
}
