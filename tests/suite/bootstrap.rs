//! Full start-up sequence against a mock annotation server.

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

use labelui_engine::{
    Bootstrap, BootstrapError, Destination, OverlayContent, OverlayPhase, PanelId, PromptOutcome,
    ServiceError, SessionError, SessionState, StageKind, WindowEvent,
};
use labelui_utils::CookieJar;

use crate::common::{
    Fixture, Prompt, backend, configuration_body, instant_settings, mount_login_check,
    start_annotation_server,
};

fn skip_tutorial() -> CookieJar {
    CookieJar::from_header("skipTutorial=true")
}

#[tokio::test]
async fn starts_interface_against_server() {
    let server = start_annotation_server().await;
    let fixture = Fixture::new(Prompt::answering([]));

    let mut interface = Bootstrap::new(
        fixture.services(backend(&server), skip_tutorial()),
        instant_settings(),
    )
    .run()
    .await
    .expect("bootstrap");

    assert_eq!(fixture.controls.calls(), vec![false, true]);
    assert!(!interface.gate().is_blocked());
    assert_eq!(interface.overlay().phase(), OverlayPhase::Closed);

    let layout = interface.layout().expect("layout");
    assert!(layout.columns >= 1 && layout.columns <= 4);
    assert_eq!(fixture.page.layouts(), vec![layout]);
    assert!(!fixture.page.panels().contains(&PanelId::AiWorkerMiniPanel));
    assert!(interface.subsystems().ai_worker_panel.is_none());

    interface.handle(WindowEvent::BeforeUnload).await.expect("flush");
    assert_eq!(fixture.factory.tiles().flushes(), 1);
    assert_eq!(fixture.prompt.asked(), 0);
}

#[tokio::test]
async fn ai_controller_shows_worker_panel() {
    let server = wiremock::MockServer::start().await;
    mount_login_check(&server, 200).await;
    let mut configuration = configuration_body();
    configuration["aiControllerURI"] = "http://ai.local:5000".into();
    Mock::given(method("GET"))
        .and(path("/getConfig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(configuration))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/getProjectSettings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(crate::common::project_body()))
        .mount(&server)
        .await;
    let fixture = Fixture::new(Prompt::answering([]));

    let interface = Bootstrap::new(
        fixture.services(backend(&server), skip_tutorial()),
        instant_settings(),
    )
    .run()
    .await
    .expect("bootstrap");

    assert!(interface.subsystems().ai_worker_panel.is_some());
    assert!(fixture.page.panels().contains(&PanelId::AiWorkerMiniPanel));
}

#[tokio::test]
async fn rejected_session_leaves_for_entry() {
    let server = wiremock::MockServer::start().await;
    mount_login_check(&server, 401).await;
    Mock::given(method("GET"))
        .and(path("/getConfig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(configuration_body()))
        .expect(0)
        .mount(&server)
        .await;
    let fixture = Fixture::new(Prompt::answering([]));

    let err = Bootstrap::new(
        fixture.services(backend(&server), skip_tutorial()),
        instant_settings(),
    )
    .run()
    .await
    .err()
    .expect("hard auth failure");

    assert!(matches!(err, BootstrapError::HardAuthFailure(_)));
    assert_eq!(fixture.navigation.destinations(), vec![Destination::Entry]);
    assert_eq!(fixture.prompt.asked(), 0);
}

#[tokio::test]
async fn project_settings_error_stops_start_up() {
    let server = wiremock::MockServer::start().await;
    mount_login_check(&server, 200).await;
    Mock::given(method("GET"))
        .and(path("/getConfig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(configuration_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/getProjectSettings"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let fixture = Fixture::new(Prompt::answering([]));

    let bootstrap = Bootstrap::new(
        fixture.services(backend(&server), skip_tutorial()),
        instant_settings(),
    );
    let overlay = bootstrap.overlay().clone();
    let gate = bootstrap.gate().clone();
    let err = bootstrap.run().await.err().expect("stage failure");

    match err {
        BootstrapError::Stage { stage, source } => {
            assert_eq!(stage, StageKind::LoadProjectSettings);
            assert!(matches!(source, ServiceError::Status { status: 500, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(gate.is_blocked());
    assert_eq!(overlay.content(), Some(OverlayContent::Loading));
    assert!(fixture.navigation.destinations().is_empty());
}

#[tokio::test]
async fn expired_session_is_renewed_in_place() {
    let server = start_annotation_server().await;
    let fixture = Fixture::new(Prompt::answering([
        PromptOutcome::Submit("wrong".into()),
        PromptOutcome::Submit("s3cret".into()),
    ]));
    let interface = Bootstrap::new(
        fixture.services(backend(&server), skip_tutorial()),
        instant_settings(),
    )
    .run()
    .await
    .expect("bootstrap");

    server.reset().await;
    mount_login_check(&server, 401).await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("username=annotator"))
        .and(body_string_contains("password=s3cret"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    interface.session().ensure_active().await.expect("renewed");

    assert_eq!(fixture.prompt.asked(), 2);
    assert_eq!(interface.session().state(), SessionState::Active);
    assert_eq!(interface.overlay().phase(), OverlayPhase::Closed);
    assert!(!interface.gate().is_blocked());
    assert!(fixture.navigation.destinations().is_empty());
}

#[tokio::test]
async fn cancelled_renewal_leaves_for_entry() {
    let server = start_annotation_server().await;
    let fixture = Fixture::new(Prompt::answering([PromptOutcome::Cancel]));
    let interface = Bootstrap::new(
        fixture.services(backend(&server), skip_tutorial()),
        instant_settings(),
    )
    .run()
    .await
    .expect("bootstrap");

    server.reset().await;
    mount_login_check(&server, 401).await;

    let err = interface.session().ensure_active().await.unwrap_err();
    assert_eq!(err, SessionError::Cancelled);
    assert_eq!(interface.session().state(), SessionState::FailedHard);
    assert_eq!(fixture.navigation.destinations(), vec![Destination::Entry]);
}
