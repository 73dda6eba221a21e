use vision_chat_backend::config::DEFAULT_MODEL;
use vision_chat_backend::routes::create_router;
use vision_chat_backend::services::vision_client::VisionClient;
use vision_chat_backend::state::AppState;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use mockito::Matcher;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::util::ServiceExt;

const UPSTREAM_PATH: &str = "/v1/chat/completions";

fn app_with_upstream(upstream_url: String) -> Router {
    let vision = VisionClient::new(upstream_url, "test-key", DEFAULT_MODEL);
    create_router("public").with_state(Arc::new(AppState::new(vision)))
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/process_image")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "gpt-4-vision-preview",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_forwards_frame_and_passes_reply_through() {
    let mut server = mockito::Server::new_async().await;
    let envelope = completion("The image shows a <b>cat</b>.<br><b>Objects:</b> cat");

    let mock = server
        .mock("POST", UPSTREAM_PATH)
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({
                "model": "gpt-4-vision-preview",
                "max_tokens": 400
            })),
            Matcher::Regex(r#""url":"data:image/jpeg;base64,QUJDRA==""#.to_string()),
            Matcher::Regex(r#""type":"text""#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope.to_string())
        .expect(1)
        .create_async()
        .await;

    let app = app_with_upstream(format!("{}{}", server.url(), UPSTREAM_PATH));
    let response = app
        .oneshot(post_json(r#"{"image": "QUJDRA=="}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, envelope);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_provider_error_body_is_relayed_with_200() {
    let mut server = mockito::Server::new_async().await;
    let provider_error = json!({
        "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
    });

    let _mock = server
        .mock("POST", UPSTREAM_PATH)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(provider_error.to_string())
        .create_async()
        .await;

    let app = app_with_upstream(format!("{}{}", server.url(), UPSTREAM_PATH));
    let response = app.oneshot(post_json(r#"{"image": "QUJD"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, provider_error);
}

#[tokio::test]
async fn test_missing_or_empty_image_is_rejected_without_upstream_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", UPSTREAM_PATH)
        .expect(0)
        .create_async()
        .await;

    let app = app_with_upstream(format!("{}{}", server.url(), UPSTREAM_PATH));

    for body in [r#"{}"#, r#"{"image": ""}"#, r#"{"image": null}"#, "not json"] {
        let response = app.clone().oneshot(post_json(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(
            body_json(response).await,
            json!({"error": "No image data received."})
        );
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_transport_failure_returns_generic_500() {
    // Nothing listens on port 1.
    let app = app_with_upstream(format!("http://127.0.0.1:1{}", UPSTREAM_PATH));

    let response = app.oneshot(post_json(r#"{"image": "QUJD"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Failed to process the image."})
    );
}

#[tokio::test]
async fn test_unreadable_upstream_body_returns_generic_500() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", UPSTREAM_PATH)
        .with_status(502)
        .with_header("content-type", "text/html")
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let app = app_with_upstream(format!("{}{}", server.url(), UPSTREAM_PATH));
    let response = app.oneshot(post_json(r#"{"image": "QUJD"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Failed to process the image."})
    );
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = app_with_upstream("http://127.0.0.1:1".to_string());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
