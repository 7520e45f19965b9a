//! Client behaviour against a mocked backend.

use std::time::Duration;

use draw_client::{ApiClient, ClientError, GenerationApi, TaskState};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DRAWING: &str = "data:image/png;base64,iVBORw0KGgo=";

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri(), Duration::from_secs(5)).expect("client")
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn generate_returns_result_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_json(json!({ "image": DRAWING })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "ab12cd34",
            "model_url": "/outputs/ab12cd34_model.glb",
            "stl_url": "/outputs/ab12cd34_model.stl",
            "message": "done"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .generate_3d_model(DRAWING)
        .await
        .expect("generation");
    assert_eq!(result.task_id, "ab12cd34");
    assert_eq!(result.model_url, "/outputs/ab12cd34_model.glb");
    assert_eq!(result.stl_url, "/outputs/ab12cd34_model.stl");
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn generate_surfaces_backend_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "detail": "model crashed" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate_3d_model(DRAWING)
        .await
        .expect_err("backend error");
    match &err {
        ClientError::Backend { status, detail } => {
            assert_eq!(*status, 500);
            assert_eq!(detail.as_deref(), Some("model crashed"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "model crashed");
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn generate_without_model_url_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "x",
            "model_url": "",
            "stl_url": ""
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate_3d_model(DRAWING)
        .await
        .expect_err("missing url");
    assert!(matches!(err, ClientError::UnexpectedResponse(_)));
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn download_stl_fetches_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/download/ab12cd34"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"solid kid".to_vec()))
        .mount(&server)
        .await;

    let bytes = client_for(&server)
        .download_stl("ab12cd34")
        .await
        .expect("download");
    assert_eq!(bytes, b"solid kid");
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn download_stl_missing_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/download/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "not found" })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .download_stl("gone")
        .await
        .expect_err("404");
    assert_eq!(err.detail(), Some("not found"));
}

#[tokio::test]
async fn download_stl_without_task_id_never_hits_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .download_stl("")
        .await
        .expect_err("missing id");
    assert!(matches!(err, ClientError::MissingTaskId));
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn fetch_model_resolves_relative_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/outputs/ab12cd34_model.glb"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"glTF".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let bytes = client_for(&server)
        .fetch_model("/outputs/ab12cd34_model.glb")
        .await
        .expect("model");
    assert_eq!(bytes, b"glTF");
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn status_and_health() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/status/ab12cd34"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "message": "ready"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "message": "running"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let status = client.task_status("ab12cd34").await.expect("status");
    assert_eq!(status.status, TaskState::Completed);

    let health = client.health().await.expect("health");
    assert!(health.is_ok());
}
