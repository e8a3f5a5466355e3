//! Functional tests for the HTTP inference backend

use gen_card_gallery::backend::{http_backend::HttpBackend, InferenceService};
use gen_card_gallery::config::InferenceConfig;
use gen_card_gallery::error::AppError;
use gen_card_gallery::generation::GenerationPipeline;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> InferenceConfig {
    InferenceConfig {
        backend: "http".to_string(),
        endpoint: Some(server.uri()),
        latent_dim: 4,
        width: 2,
        height: 2,
        ..InferenceConfig::default()
    }
}

#[tokio::test]
async fn test_infer_returns_pixels() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/infer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "width": 2,
            "height": 2,
            "data": vec![0.5f32; 12],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&config_for(&server)).unwrap();
    let pixels = backend.infer(&[0.0, 1.0, -1.0, 0.5]).await.unwrap();

    assert_eq!((pixels.width, pixels.height), (2, 2));
    assert_eq!(pixels.data.len(), 12);
}

#[tokio::test]
async fn test_latent_is_sent_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/infer"))
        .and(wiremock::matchers::body_json(json!({ "latent": [0.0, 1.0, -1.0, 0.5] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "width": 1,
            "height": 1,
            "data": [0.0, 0.0, 0.0],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&config_for(&server)).unwrap();
    assert!(backend.infer(&[0.0, 1.0, -1.0, 0.5]).await.is_ok());
}

#[tokio::test]
async fn test_server_error_is_inference_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/infer"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&config_for(&server)).unwrap();
    let err = backend.infer(&[0.0; 4]).await.unwrap_err();
    assert!(matches!(err, AppError::Inference(_)));
}

#[tokio::test]
async fn test_malformed_tensor_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/infer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "width": 2,
            "height": 2,
            "data": [0.0, 0.0],
        })))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&config_for(&server)).unwrap();
    assert!(backend.infer(&[0.0; 4]).await.is_err());
}

#[tokio::test]
async fn test_pipeline_over_http_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/infer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "width": 2,
            "height": 2,
            "data": vec![-0.25f32; 12],
        })))
        .mount(&server)
        .await;

    let backend = Arc::new(HttpBackend::new(&config_for(&server)).unwrap());
    let pipeline = GenerationPipeline::new(backend, 1);

    let card = pipeline.generate().await.unwrap();
    assert!(card.image.starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let config = InferenceConfig {
        backend: "http".to_string(),
        endpoint: Some("http://127.0.0.1:9".to_string()),
        latent_dim: 4,
        timeout_ms: 500,
        ..InferenceConfig::default()
    };

    let backend = HttpBackend::new(&config).unwrap();
    let err = backend.infer(&[0.0; 4]).await.unwrap_err();
    assert!(matches!(err, AppError::HttpClient(_)));
}
