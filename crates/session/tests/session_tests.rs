mod common;

use analysis::mock::{MockResponse, MockServer};
use analysis::{AnalysisClient, AnalysisConfig, AnalysisError, Severity};
use common::{FakeBackend, PREDICTION, png_bytes, temp_file, two_cameras};
use session::view::{PreviewStatus, ResultBody};
use session::{CaptureOptions, RequestState, Session};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;
use tokio::time::timeout;
use video::VideoError;

fn client_for(url: &str) -> AnalysisClient {
    AnalysisClient::new(AnalysisConfig::default().with_endpoint(url)).unwrap()
}

fn session_for(backend: &Arc<FakeBackend>, url: &str) -> Session {
    Session::new(backend.clone(), client_for(url), CaptureOptions::default())
}

async fn wait_for_frame(session: &Session) {
    let mut frames = session.feed().expect("no feed bound").subscribe();
    timeout(Duration::from_secs(5), frames.wait_for(|f| f.is_some()))
        .await
        .expect("no frame in time")
        .expect("worker gone");
}

fn prediction(url: &str) -> String {
    format!(
        r#"{{"image_url":"{}","jumlah_jerawat":1,"tingkat_keparahan":"ringan","analisa":"{}"}}"#,
        url, url
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upload_round_trip() {
    let server = MockServer::respond_with(MockResponse::json(PREDICTION)).await.unwrap();
    let backend = FakeBackend::new(two_cameras());
    let mut session = session_for(&backend, &server.url("/predict"));

    let path = temp_file("round-trip.png", &png_bytes());
    let handle = session.upload(&path).await.unwrap();
    assert!(session.store().snapshot().is_loading());
    handle.await.unwrap();

    let state = session.store().snapshot();
    let result = state.current().unwrap();
    assert_eq!(result.annotated_image_url, "u");
    assert_eq!(result.acne_count, 3);
    assert_eq!(result.severity, Severity::Moderate);
    assert_eq!(result.analysis_text, "x");

    let view = session.view();
    assert_eq!(
        view.results.body,
        ResultBody::Annotated {
            image_url: "u".to_string()
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upload_sends_file_unchanged() {
    let server = MockServer::respond_with(MockResponse::json(PREDICTION)).await.unwrap();
    let backend = FakeBackend::new(two_cameras());
    let mut session = session_for(&backend, &server.url("/predict"));

    let path = temp_file("unchanged.png", &png_bytes());
    session.upload(&path).await.unwrap().await.unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/predict");
    assert!(request.header("content-type").unwrap().starts_with("multipart/form-data"));
    assert!(request.body_contains(b"name=\"image\""));
    assert!(request.body_contains(b"filename=\"unchanged.png\""));
    assert!(request.body_contains(&png_bytes()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_capture_sends_named_jpeg() {
    let server = MockServer::respond_with(MockResponse::json(PREDICTION)).await.unwrap();
    let backend = FakeBackend::new(two_cameras());
    let mut session = session_for(&backend, &server.url("/predict"));

    session.start().await;
    wait_for_frame(&session).await;
    assert!(session.view().preview.capture_enabled);

    let handle = session.capture().await.expect("nothing captured");
    handle.await.unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body_contains(b"name=\"image\""));
    assert!(requests[0].body_contains(b"filename=\"capture.jpg\""));
    assert!(requests[0].body_contains(b"image/jpeg"));
    assert_eq!(session.last_capture().unwrap().file_name.as_deref(), Some("capture.jpg"));
    assert!(session.store().snapshot().current().is_some());

    session.shutdown().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_network_failure_clears_loading() {
    // a port nobody listens on
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let backend = FakeBackend::new(two_cameras());
    let mut session = session_for(&backend, &format!("http://{}/predict", addr));

    let path = temp_file("network.png", &png_bytes());
    session.upload(&path).await.unwrap().await.unwrap();

    let state = session.store().snapshot();
    assert!(!state.is_loading());
    assert!(matches!(state.error(), Some(AnalysisError::Network(_))));
    assert!(state.can_retry());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failure_keeps_previous_result() {
    let server = MockServer::start(|request| {
        if request.body_contains(b"broken.png") {
            MockResponse::json("").with_status(503)
        } else {
            MockResponse::json(PREDICTION)
        }
    })
    .await
    .unwrap();
    let backend = FakeBackend::new(two_cameras());
    let mut session = session_for(&backend, &server.url("/predict"));

    let good = temp_file("good.png", &png_bytes());
    let broken = temp_file("broken.png", &png_bytes());
    session.upload(&good).await.unwrap().await.unwrap();
    session.upload(&broken).await.unwrap().await.unwrap();

    let state = session.store().snapshot();
    assert_eq!(state.error(), Some(&AnalysisError::Server(503)));
    assert_eq!(state.last_result().unwrap().acne_count, 3);

    let view = session.view();
    assert!(matches!(view.results.body, ResultBody::Failed { retry: true, .. }));
    assert!(view.results.analysis.unwrap().previous);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_retry_resends_last_image() {
    let calls = Arc::new(AtomicUsize::new(0));
    let server = MockServer::start({
        let calls = Arc::clone(&calls);
        move |_| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                MockResponse::json("").with_status(502)
            } else {
                MockResponse::json(PREDICTION)
            }
        }
    })
    .await
    .unwrap();
    let backend = FakeBackend::new(two_cameras());
    let mut session = session_for(&backend, &server.url("/predict"));

    assert!(session.retry().is_none());

    let path = temp_file("retry.png", &png_bytes());
    session.upload(&path).await.unwrap().await.unwrap();
    assert!(session.store().snapshot().can_retry());

    session.retry().expect("retry refused").await.unwrap();
    assert!(session.store().snapshot().current().is_some());
    assert!(session.retry().is_none());

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.body_contains(b"filename=\"retry.png\"")));
}

async fn race(tag: &str, first: &str, second: &str) -> RequestState {
    let server = MockServer::start(|request| {
        if request.body_contains(b"slow.png") {
            MockResponse::json(prediction("slow")).with_delay(Duration::from_millis(400))
        } else {
            MockResponse::json(prediction("fast"))
        }
    })
    .await
    .unwrap();
    let backend = FakeBackend::new(two_cameras());
    let mut session = session_for(&backend, &server.url("/predict"));

    let first = temp_file(&format!("{}-{}", tag, first), &png_bytes());
    let second = temp_file(&format!("{}-{}", tag, second), &png_bytes());
    let a = session.upload(&first).await.unwrap();
    let b = session.upload(&second).await.unwrap();
    a.await.unwrap();
    b.await.unwrap();

    assert_eq!(server.requests().len(), 2);
    session.store().snapshot().request().clone()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_latest_request_wins_when_answered_first() {
    let state = race("a", "slow.png", "fast.png").await;
    match state {
        RequestState::Succeeded(result) => assert_eq!(result.annotated_image_url, "fast"),
        other => panic!("unexpected state {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_latest_request_wins_when_answered_last() {
    let state = race("b", "fast.png", "slow.png").await;
    match state {
        RequestState::Succeeded(result) => assert_eq!(result.annotated_image_url, "slow"),
        other => panic!("unexpected state {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_select_device_releases_previous() {
    let backend = FakeBackend::new(two_cameras());
    let mut session = session_for(&backend, "http://127.0.0.1:9/predict");

    session.start().await;
    wait_for_frame(&session).await;
    let first = backend.stats_for("/dev/video0").pop().unwrap();
    assert!(first.is_open());

    session.select_device("/dev/video2").await.unwrap();
    assert!(!first.is_open());
    assert_eq!(session.feed().unwrap().device().id, "/dev/video2");
    assert_eq!(session.registry().selected_id(), Some("/dev/video2"));

    wait_for_frame(&session).await;
    assert_eq!(
        session.view().preview.status,
        PreviewStatus::Live {
            device: "Kamera 2".to_string()
        }
    );

    let error = session.select_device("/dev/video9").await.unwrap_err();
    assert_eq!(error, VideoError::UnknownDevice("/dev/video9".to_string()));
    assert_eq!(session.feed().unwrap().device().id, "/dev/video2");

    session.shutdown().await;
    let second = backend.stats_for("/dev/video2").pop().unwrap();
    assert!(!second.is_open());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_no_devices_leaves_preview_blank() {
    let backend = FakeBackend::new(Vec::new());
    let mut session = session_for(&backend, "http://127.0.0.1:9/predict");

    session.start().await;
    assert!(session.feed().is_none());
    assert!(session.capture().await.is_none());

    let view = session.view();
    assert!(!view.device_picker.enabled);
    assert_eq!(view.preview.status, PreviewStatus::Blank);
    assert!(view.preview.upload_enabled);
    assert_eq!(view.results.body, ResultBody::Placeholder);
}
