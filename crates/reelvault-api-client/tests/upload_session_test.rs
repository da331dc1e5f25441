//! Upload session tests against a mock media host.
//!
//! Run with: `cargo test -p reelvault-api-client --test upload_session_test`

use chrono::{Duration as ChronoDuration, Utc};
use reelvault_api_client::{UploadError, UploadErrorKind, UploadFile, Uploader};
use reelvault_core::models::{UploadCredential, UploadProgress};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UPLOAD_PATH: &str = "/api/v1/files/upload";

fn credential() -> UploadCredential {
    UploadCredential {
        public_key: "public_test_key".to_string(),
        token: "2b0f7e9a-1c1d-4c3e-8f52-9a4d7b6e5c01".to_string(),
        signature: "9f6a0d4bdf6fe936c180ef8b9eac71ae35e9b97f".to_string(),
        expires_at: Utc::now() + ChronoDuration::minutes(10),
    }
}

fn video(len: usize) -> UploadFile {
    UploadFile::new("clip.mp4", vec![0x42u8; len])
}

fn uploader(server: &MockServer) -> Uploader {
    Uploader::new(
        reqwest::Client::new(),
        format!("{}{}", server.uri(), UPLOAD_PATH),
    )
}

fn success_body() -> serde_json::Value {
    serde_json::json!({
        "fileId": "file_123",
        "name": "clip.mp4",
        "url": "https://ik.example.com/clip.mp4",
        "thumbnailUrl": "https://ik.example.com/clip.mp4/ik-thumbnail.jpg"
    })
}

#[tokio::test]
async fn test_upload_reports_monotonic_progress_to_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(body_string_contains("name=\"publicKey\""))
        .and(body_string_contains("public_test_key"))
        .and(body_string_contains("name=\"signature\""))
        .and(body_string_contains("name=\"expire\""))
        .and(body_string_contains("name=\"fileName\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(1)
        .mount(&server)
        .await;

    let total = 300 * 1024;
    let mut events: Vec<UploadProgress> = Vec::new();
    let result = uploader(&server)
        .start_upload(
            video(total),
            credential(),
            |p| events.push(p),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.url, "https://ik.example.com/clip.mp4");
    assert_eq!(result.file_id.as_deref(), Some("file_123"));

    assert!(!events.is_empty());
    for pair in events.windows(2) {
        assert!(pair[0].bytes_sent <= pair[1].bytes_sent);
    }
    for event in &events {
        assert_eq!(event.bytes_total, total as u64);
        assert!(event.bytes_sent <= event.bytes_total);
    }
    let last = events.last().unwrap();
    assert!(last.is_complete());
    assert_eq!(last.percent(), 100.0);
}

#[tokio::test]
async fn test_reused_credential_is_rejected_by_host() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "message": "The token has already been used"
        })))
        .mount(&server)
        .await;

    let uploader = uploader(&server);
    let credential = credential();
    let cancel = CancellationToken::new();

    uploader
        .start_upload(video(1024), credential.clone(), |_| {}, &cancel)
        .await
        .unwrap();

    let err = uploader
        .start_upload(video(1024), credential, |_| {}, &cancel)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), UploadErrorKind::InvalidRequest);
    assert!(matches!(
        err,
        UploadError::InvalidRequest { status: Some(400), ref message } if message.contains("already been used")
    ));
    assert!(!err.is_retryable());
    assert_eq!(err.user_message(), "Invalid request.");
}

#[tokio::test]
async fn test_host_failure_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = uploader(&server)
        .start_upload(video(2048), credential(), |_| {}, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), UploadErrorKind::Server);
    assert!(err.is_retryable());
    assert_eq!(err.user_message(), "Server error.");
}

#[tokio::test]
async fn test_success_without_url_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"fileId": "f"})))
        .mount(&server)
        .await;

    let err = uploader(&server)
        .start_upload(video(16), credential(), |_| {}, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), UploadErrorKind::Unknown);
    assert_eq!(err.user_message(), "Unexpected error.");
}

#[tokio::test]
async fn test_expired_credential_never_reaches_host() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(0)
        .mount(&server)
        .await;

    let mut expired = credential();
    expired.expires_at = Utc::now() - ChronoDuration::seconds(1);

    let mut events = 0;
    let err = uploader(&server)
        .start_upload(video(16), expired, |_| events += 1, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), UploadErrorKind::Auth);
    assert_eq!(events, 0);
}

#[tokio::test]
async fn test_empty_file_never_reaches_host() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = uploader(&server)
        .start_upload(
            UploadFile::new("empty.mp4", Vec::new()),
            credential(),
            |_| {},
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), UploadErrorKind::InvalidRequest);
    assert_eq!(err.user_message(), "Please select a video file.");
}

#[tokio::test]
async fn test_cancel_aborts_in_flight_upload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_body())
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let mut events: Vec<UploadProgress> = Vec::new();
    let err = uploader(&server)
        .start_upload(video(128 * 1024), credential(), |p| events.push(p), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::Aborted));
    assert!(!err.is_retryable());
    assert_eq!(err.user_message(), "Upload aborted.");
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(events.iter().all(|p| p.bytes_total == 128 * 1024));
}

#[tokio::test]
async fn test_already_cancelled_token_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = uploader(&server)
        .start_upload(video(16), credential(), |_| {}, &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), UploadErrorKind::Aborted);
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    // Bind then drop a listener so the port is known to refuse connections.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let uploader = Uploader::new(
        reqwest::Client::new(),
        format!("http://{}{}", addr, UPLOAD_PATH),
    );
    let err = uploader
        .start_upload(video(16), credential(), |_| {}, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), UploadErrorKind::Network);
    assert!(err.is_retryable());
    assert_eq!(err.user_message(), "Network error.");
}
