//! Client config file driving a real backend.

use std::fs;

use labelui_engine::{AuthService, BootstrapSettings, ClientConfig, HttpBackend};

use crate::common::start_annotation_server;

#[tokio::test]
async fn config_file_points_backend_at_server() {
    let server = start_annotation_server().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        format!(
            r#"
[server]
base_url = "{}/"
username = "annotator"

[layout]
chrome_height = 40.0
viewport_width = 1024.0

[overlay]
reduced_motion = true
"#,
            server.uri()
        ),
    )
    .expect("write config");

    let config = ClientConfig::load_from(&path)
        .expect("parse config")
        .expect("config present");
    assert_eq!(config.base_url(), server.uri());
    assert_eq!(config.username().as_deref(), Some("annotator"));

    let settings = BootstrapSettings::from_config(&config);
    assert!((settings.chrome_height - 40.0).abs() < f64::EPSILON);
    assert!((settings.viewport.width - 1024.0).abs() < f64::EPSILON);
    assert!(settings.overlay.fade.is_zero());

    let backend = HttpBackend::new(&config.base_url(), config.endpoints()).expect("backend");
    backend.probe().await.expect("probe");
}

#[test]
fn missing_config_file_is_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = ClientConfig::load_from(&dir.path().join("absent.toml")).expect("load");
    assert!(config.is_none());
}

#[test]
fn malformed_config_names_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[server\nbase_url = 1").expect("write config");

    let err = ClientConfig::load_from(&path).unwrap_err();
    assert_eq!(err.path(), &path);
}
