use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde_json::{Value, json};
use tldw_core::{
    HostConfig, HttpOptions, NO_SUMMARY, Provider, SummaryConfig, TldwError, extract_transcript,
    fetch_host_config, request_summary,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

const TWO_CUES: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0">Hello</text><text start="1">World</text></transcript>"#;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });
    format!("http://{}", addr)
}

fn host_with_tracks(tracks: Value) -> HostConfig {
    let json = json!({
        "ytInitialPlayerResponse": {
            "captions": {
                "playerCaptionsTracklistRenderer": { "captionTracks": tracks }
            }
        }
    });
    HostConfig::from_json_str(&json.to_string()).expect("host config")
}

fn client() -> reqwest::Client {
    HttpOptions::default().build_client().expect("client")
}

fn summary_config(base: &str, api_key: Option<&str>) -> SummaryConfig {
    let mut config = SummaryConfig::for_provider(Provider::Deepseek, api_key.map(str::to_string));
    config.endpoint = format!("{}/v1/chat/completions", base);
    config
}

#[tokio::test]
async fn transcript_comes_from_auto_generated_track() {
    let app = Router::new()
        .route("/manual", get(|| async { "<text>wrong track</text>" }))
        .route("/asr", get(|| async { TWO_CUES }));
    let base = serve(app).await;

    let host = host_with_tracks(json!([
        { "kind": "manual", "baseUrl": format!("{}/manual", base) },
        { "kind": "asr", "baseUrl": format!("{}/asr", base), "languageCode": "en" },
    ]));

    let transcript = extract_transcript(&host, &client()).await.expect("transcript");
    assert_eq!(transcript.text(), "Hello\nWorld");
    assert!(transcript.is_auto_generated());
    assert_eq!(transcript.language_code.as_deref(), Some("en"));
    assert_eq!(transcript.source_url, format!("{}/asr", base));
}

#[tokio::test]
async fn document_without_cues_is_an_empty_transcript() {
    let app = Router::new().route("/empty", get(|| async { "<transcript></transcript>" }));
    let base = serve(app).await;
    let host = host_with_tracks(json!([{ "baseUrl": format!("{}/empty", base) }]));

    let transcript = extract_transcript(&host, &client()).await.expect("transcript");
    assert!(transcript.is_empty());
    assert_eq!(transcript.text(), "");
}

#[tokio::test]
async fn error_status_on_timed_text_is_a_fetch_error() {
    let app = Router::new().route("/gone", get(|| async { (StatusCode::NOT_FOUND, "nope") }));
    let base = serve(app).await;
    let host = host_with_tracks(json!([{ "baseUrl": format!("{}/gone", base) }]));

    let err = extract_transcript(&host, &client()).await.unwrap_err();
    assert!(err.is_fetch());
    match err {
        TldwError::FetchStatus { status, .. } => assert_eq!(status.as_u16(), 404),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_a_fetch_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let host = host_with_tracks(json!([{ "baseUrl": format!("http://{}/x", addr) }]));
    let err = extract_transcript(&host, &client()).await.unwrap_err();
    assert!(matches!(err, TldwError::Fetch { .. }), "{err:?}");
}

#[tokio::test]
async fn slow_timed_text_times_out() {
    let app = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            TWO_CUES
        }),
    );
    let base = serve(app).await;
    let host = host_with_tracks(json!([{ "baseUrl": format!("{}/slow", base) }]));

    let client = HttpOptions::default()
        .with_timeout(Some(Duration::from_millis(200)))
        .build_client()
        .expect("client");
    let err = extract_transcript(&host, &client).await.unwrap_err();
    assert!(matches!(err, TldwError::Timeout { .. }), "{err:?}");
}

#[tokio::test]
async fn upstream_failures_happen_before_any_request() {
    let client = client();

    let host = HostConfig::from_json_str("{}").expect("host");
    let err = extract_transcript(&host, &client).await.unwrap_err();
    assert!(matches!(err, TldwError::ConfigNotFound));

    let host = host_with_tracks(json!([]));
    let err = extract_transcript(&host, &client).await.unwrap_err();
    assert!(matches!(err, TldwError::NoCaptions));

    let host = host_with_tracks(json!([{ "kind": "asr" }]));
    let err = extract_transcript(&host, &client).await.unwrap_err();
    assert!(matches!(err, TldwError::InvalidTrack));
}

#[tokio::test]
async fn watch_page_leads_to_transcript() {
    let app = Router::new()
        .route("/asr", get(|| async { TWO_CUES }))
        .route(
            "/watch",
            get(|headers: HeaderMap| async move {
                let base = format!(
                    "http://{}",
                    headers["host"].to_str().expect("host header")
                );
                format!(
                    r#"<html><script>var ytInitialPlayerResponse = {{"captions":{{"playerCaptionsTracklistRenderer":{{"captionTracks":[{{"baseUrl":"{}/asr","kind":"asr"}}]}}}},"videoDetails":{{"title":"a }}; b"}}}};var other = 1;</script></html>"#,
                    base
                )
            }),
        );
    let base = serve(app).await;
    let client = client();

    let host = fetch_host_config(&client, &format!("{}/watch", base))
        .await
        .expect("host config");
    let transcript = extract_transcript(&host, &client).await.expect("transcript");
    assert_eq!(transcript.lines, vec!["Hello", "World"]);
}

#[tokio::test]
async fn watch_page_without_player_response() {
    let app = Router::new().route("/watch", get(|| async { "<html>consent wall</html>" }));
    let base = serve(app).await;

    let err = fetch_host_config(&client(), &format!("{}/watch", base))
        .await
        .unwrap_err();
    assert!(matches!(err, TldwError::PlayerResponseNotFound { .. }));
}

#[derive(Clone, Default)]
struct Captured {
    body: Arc<Mutex<Option<Value>>>,
    auth: Arc<Mutex<Option<String>>>,
    hits: Arc<AtomicUsize>,
}

async fn capture_completion(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    captured.hits.fetch_add(1, Ordering::SeqCst);
    *captured.auth.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *captured.body.lock().unwrap() = Some(body);
    Json(json!({ "choices": [{ "message": { "content": "A short summary." } }] }))
}

#[tokio::test]
async fn summary_request_truncates_transcript_and_authenticates() {
    let captured = Captured::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(capture_completion))
        .with_state(captured.clone());
    let base = serve(app).await;

    let transcript = "a".repeat(12_000) + &"z".repeat(3_000);
    let summary = request_summary(
        &client(),
        &transcript,
        &summary_config(&base, Some("Bearer sk-test")),
    )
    .await
    .expect("summary");

    assert_eq!(summary, "A short summary.");
    assert_eq!(captured.auth.lock().unwrap().as_deref(), Some("Bearer sk-test"));

    let body = captured.body.lock().unwrap().clone().expect("body");
    assert_eq!(body["model"], "deepseek-chat");
    let user = body["messages"][1]["content"].as_str().expect("user content");
    let prefix = "Summarize the following text to ~100 words:\n\n";
    assert!(user.starts_with(prefix));
    assert_eq!(&user[prefix.len()..], "a".repeat(12_000));
}

#[tokio::test]
async fn summary_without_choices_falls_back() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({ "id": "x" })) }),
    );
    let base = serve(app).await;

    let summary = request_summary(&client(), "text", &summary_config(&base, Some("sk-test")))
        .await
        .expect("summary");
    assert_eq!(summary, NO_SUMMARY);
}

#[tokio::test]
async fn summary_api_error_keeps_status_and_body() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "rate limited") }),
    );
    let base = serve(app).await;

    let err = request_summary(&client(), "text", &summary_config(&base, Some("sk-test")))
        .await
        .unwrap_err();
    match err {
        TldwError::SummaryApi { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "rate limited");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn summary_api_error_reports_unreadable_body() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        while !request.ends_with(b"}") {
            let n = socket.read(&mut buf).await.expect("read");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(b"HTTP/1.1 502 Bad Gateway\r\ncontent-length: 100\r\n\r\npartial")
            .await
            .expect("write");
    });

    let base = format!("http://{}", addr);
    let err = request_summary(&client(), "text", &summary_config(&base, Some("sk-test")))
        .await
        .unwrap_err();
    match err {
        TldwError::SummaryApi { status, body } => {
            assert_eq!(status, 502);
            assert!(body.starts_with("<unreadable body:"), "{body}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn placeholder_credential_never_reaches_the_api() {
    let captured = Captured::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(capture_completion))
        .with_state(captured.clone());
    let base = serve(app).await;

    for key in [None, Some("YOUR-API-HERE")] {
        let err = request_summary(&client(), "text", &summary_config(&base, key))
            .await
            .unwrap_err();
        assert!(matches!(err, TldwError::MissingCredential { .. }));
    }
    assert_eq!(captured.hits.load(Ordering::SeqCst), 0);
}
