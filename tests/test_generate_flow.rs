use std::sync::Arc;
use std::time::Duration;

use magic_caption::client::{GenerationPath, HttpCaptionBackend, Orchestrator};
use magic_caption::constants::GENERATE_PATH;
use magic_caption::gemini::{GeminiClient, GeminiConfig, TextModel};
use magic_caption::images::{ImageEndpoint, seed_of};
use magic_caption::score::{DbScoreStore, ScoreStore};
use magic_caption::tone::Tone;
use magic_caption::types::GenerationRequest;
use magic_caption::web::{AppState, serve};
use serde_json::{Value, json};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Starts the service in the background, talking to `upstream` as its model.
async fn start_service(upstream: &MockServer) -> String {
    let mut config = GeminiConfig::new("integration-key");
    config.base_url = upstream.uri();
    config.timeout = Duration::from_secs(5);
    let model: Arc<dyn TextModel> = Arc::new(GeminiClient::new(config).expect("gemini client"));
    let state = AppState::new(
        Some(model),
        ImageEndpoint::pollinations().expect("image endpoint"),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = serve(listener, state).await;
    });
    format!("http://{addr}")
}

/// An address nothing listens on.
async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

fn model_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    }))
}

async fn orchestrator_for(endpoint: &str, score_path: &str) -> Orchestrator {
    let backend =
        HttpCaptionBackend::new(endpoint, Duration::from_secs(5)).expect("http backend");
    let score = DbScoreStore::open(score_path).await.expect("score store");
    Orchestrator::new(
        Arc::new(backend),
        ImageEndpoint::pollinations().expect("image endpoint"),
        Arc::new(score),
    )
}

#[tokio::test]
async fn network_path_awards_ten_and_persists() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r":generateContent$"))
        .respond_with(model_reply(
            r#"{"caption":"gm, builders","image_prompts":["desk at dawn","latte art","skyline"]}"#,
        ))
        .expect(1)
        .mount(&upstream)
        .await;
    let endpoint = start_service(&upstream).await;

    let dir = tempfile::tempdir().expect("tempdir");
    let score_path = dir.path().join("score.sqlite");
    let score_path = score_path.to_str().expect("utf8 path");

    let orchestrator = orchestrator_for(&endpoint, score_path).await;
    let request = GenerationRequest::new("gm", Tone::Professional).expect("request");
    let generated = orchestrator.generate(&request).await;

    assert_eq!(generated.path, GenerationPath::Network);
    assert_eq!(generated.result.caption, "gm, builders");
    assert_eq!(generated.result.images.len(), 3);
    for (url, prompt) in generated.result.images.iter().zip(["desk%20at%20dawn", "latte%20art", "skyline"]) {
        assert!(url.contains(prompt), "{url} should carry {prompt}");
        assert!(url.contains("width=1080&height=1080"));
        assert!(seed_of(url).is_some_and(|seed| seed < 99_999));
    }
    assert_eq!(generated.score, 10);

    let reopened = DbScoreStore::open(score_path).await.expect("reopen");
    assert_eq!(reopened.load().await.expect("load"), 10);
}

#[tokio::test]
async fn scenario_a_unreachable_service_uses_morning_fallback() {
    let endpoint = dead_endpoint().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let score_path = dir.path().join("score.sqlite");
    let score_path = score_path.to_str().expect("utf8 path");

    let orchestrator = orchestrator_for(&endpoint, score_path).await;
    let request =
        GenerationRequest::new("morning coffee run", Tone::Professional).expect("request");
    let generated = orchestrator.generate(&request).await;

    assert_eq!(generated.path, GenerationPath::Fallback);
    assert!(generated.result.caption.starts_with("Rise and shine"));
    assert_eq!(
        generated.result.image_prompts,
        vec![
            "morning coffee run cinematic lighting 4k",
            "morning coffee run aesthetic minimal high quality",
            "morning coffee run vibrant artistic style",
        ]
    );
    assert_eq!(generated.result.images.len(), 3);
    assert!(generated.result.images[0].contains("morning%20coffee%20run%20cinematic"));
    assert_eq!(generated.score, 5);
}

#[tokio::test]
async fn scenario_b_get_is_rejected_without_upstream_call() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(model_reply("{}"))
        .expect(0)
        .mount(&upstream)
        .await;
    let endpoint = start_service(&upstream).await;

    let resp = reqwest::Client::new()
        .get(format!("{endpoint}{GENERATE_PATH}"))
        .send()
        .await
        .expect("send");

    assert_eq!(resp.status().as_u16(), 405);
    let body: Value = resp.json().await.expect("json body");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn scenario_c_unparseable_model_text_falls_back() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r":generateContent$"))
        .respond_with(model_reply("Here you go: a caption about coffee!"))
        .mount(&upstream)
        .await;
    let endpoint = start_service(&upstream).await;

    let resp = reqwest::Client::new()
        .post(format!("{endpoint}{GENERATE_PATH}"))
        .json(&json!({"prompt": "coffee", "mode": "funny"}))
        .send()
        .await
        .expect("send");
    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body, json!({"error": "Failed to generate content"}));

    let dir = tempfile::tempdir().expect("tempdir");
    let score_path = dir.path().join("score.sqlite");
    let score_path = score_path.to_str().expect("utf8 path");
    let orchestrator = orchestrator_for(&endpoint, score_path).await;
    let request = GenerationRequest::new("coffee", Tone::Funny).expect("request");
    let generated = orchestrator.generate(&request).await;

    assert_eq!(generated.path, GenerationPath::Fallback);
    assert!(generated.result.caption.starts_with("Life begins after coffee."));
    assert_eq!(generated.score, 5);
}

#[tokio::test]
async fn missing_key_is_generic_server_error() {
    let state = AppState::new(None, ImageEndpoint::pollinations().expect("image endpoint"));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = serve(listener, state).await;
    });

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}{GENERATE_PATH}"))
        .json(&json!({"prompt": "gm", "mode": "funny"}))
        .send()
        .await
        .expect("send");
    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = resp.json().await.expect("json body");
    assert_eq!(body, json!({"error": "Server configuration error"}));
}
