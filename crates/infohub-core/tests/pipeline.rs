//! End-to-end pipeline tests against a mock content origin.

use infohub_core::bridge::parse_message;
use infohub_core::{
    AppPaths, EmbeddedMessage, Hub, HubConfig, MenuAction, NativeMessage, PageId, ThemeMode,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Setup {
    server: MockServer,
    paths: AppPaths,
    _dir: tempfile::TempDir,
}

async fn setup() -> Setup {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let paths = AppPaths::prepare(dir.path().join("config"), dir.path().join("cache")).unwrap();
    Setup {
        server,
        paths,
        _dir: dir,
    }
}

fn hub(setup: &Setup) -> Hub {
    let config = HubConfig {
        base_url: setup.server.uri(),
        request_timeout_secs: 5,
        ..HubConfig::default()
    };
    Hub::from_config(&config, &setup.paths).unwrap()
}

async fn serve(server: &MockServer, route: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_home_then_theme_change_fetches_readme_once() {
    let setup = setup().await;
    serve(&setup.server, "/README.md", "# Welcome\n\n| a | b |\n|---|---|\n| 1 | 2 |", 1).await;
    let mut hub = hub(&setup);

    let shown = hub.navigate(&MenuAction::ShowHome).await.unwrap();
    assert!(shown.error.is_none());
    assert!(shown.document.as_str().contains("<h1>Welcome</h1>"));
    assert!(shown.document.as_str().contains("<table>"));

    let change = hub.set_theme(ThemeMode::Dark, None).unwrap();
    let NativeMessage::ApplyThemeOverride { css, .. } = &change.message;
    assert!(css.contains("#2b2b2b"));
    assert!(hub.current_page().unwrap().is_home());

    // Dropping the server verifies README.md was requested exactly once.
}

#[tokio::test]
async fn test_fragment_page_with_missing_style() {
    let setup = setup().await;
    serve(&setup.server, "/gui/baro.html", "<div>Baro</div>", 1).await;
    serve(&setup.server, "/gui/Script/baro.js", "console.log('x')", 1).await;
    Mock::given(method("GET"))
        .and(path("/gui/Styles/baro_styles.css"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&setup.server)
        .await;
    let mut hub = hub(&setup);

    let action = MenuAction::Navigate(PageId::new("baro").unwrap());
    let shown = hub.navigate(&action).await.unwrap();
    let html = shown.document.as_str();

    assert!(shown.error.is_none());
    assert!(html.contains("<div>Baro</div>"));
    assert!(html.contains("<style id=\"infohub-page-style\"></style>"));
    assert!(html.find("console.log('x')").unwrap() < html.find("function initBridge()").unwrap());
    assert_eq!(hub.current_page().map(PageId::as_str), Some("baro"));
}

#[tokio::test]
async fn test_server_error_yields_error_document() {
    let setup = setup().await;
    Mock::given(method("GET"))
        .and(path("/gui/fissures.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&setup.server)
        .await;
    let mut hub = hub(&setup);

    let action = MenuAction::Navigate(PageId::new("fissures").unwrap());
    let shown = hub.navigate(&action).await.unwrap();

    assert!(shown.error.unwrap().contains("HTTP 500"));
    assert!(shown.document.as_str().contains("Error loading page"));
    assert!(hub.current_page().is_none());
}

#[tokio::test]
async fn test_theme_survives_restart_and_reaches_page() {
    let setup = setup().await;
    {
        let mut hub = hub(&setup);
        hub.set_theme(ThemeMode::Dark, None).unwrap();
    }

    let hub = hub(&setup);
    assert_eq!(hub.theme().mode(), ThemeMode::Dark);

    let ready = parse_message(json!({ "channel": "infohub", "kind": "bridge_ready" })).unwrap();
    assert_eq!(ready, EmbeddedMessage::BridgeReady);
    let reply = hub.handle_embedded(ready).unwrap().unwrap();
    assert_eq!(reply, hub.theme_message());
    assert!(reply.to_wire().contains("\"kind\":\"apply_theme_override\""));
}
