//! Integration tests for the HTTP contract.
//!
//! The router is driven directly with `tower::ServiceExt::oneshot` against a
//! stub-backed model, so every test exercises the real extraction, validation,
//! and error-translation path without a TCP listener.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use embedder::Backend;
use server::{build_router, ServerConfig, ServerState};

fn test_state(loaded: bool) -> Arc<ServerState> {
    let config = ServerConfig {
        backend: Backend::Stub,
        ..ServerConfig::default()
    };
    let state = Arc::new(ServerState::new(config));
    if loaded {
        state.manager.start().expect("stub model should load");
    }
    state
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_embed(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/embed")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn l2_norm(vector: &[serde_json::Value]) -> f32 {
    vector
        .iter()
        .map(|v| v.as_f64().unwrap() as f32)
        .map(|x| x * x)
        .sum::<f32>()
        .sqrt()
}

#[tokio::test]
async fn root_lists_endpoints() {
    let app = build_router(test_state(false));
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["service"], "Embedding Service");
    let endpoints: Vec<&str> = json["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(endpoints.contains(&"/embed"));
    assert!(endpoints.contains(&"/embed/single"));
    assert!(endpoints.contains(&"/health"));
}

#[tokio::test]
async fn health_returns_503_before_load() {
    let app = build_router(test_state(false));
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn health_returns_ok_after_load() {
    let app = build_router(test_state(true));
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["model"], "intfloat/multilingual-e5-base");
    assert_eq!(json["dims"], 384);
}

#[tokio::test]
async fn embed_returns_503_before_load() {
    let app = build_router(test_state(false));
    let body = serde_json::json!({"texts": ["hello"]});
    let response = app.oneshot(post_embed(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn embed_returns_one_vector_per_text() {
    let app = build_router(test_state(true));
    let body = serde_json::json!({"texts": ["a", "b", "c"], "prefix": "passage: "});
    let response = app.oneshot(post_embed(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let embeddings = json["embeddings"].as_array().unwrap();
    assert_eq!(embeddings.len(), 3);
    let dims = json["dims"].as_u64().unwrap() as usize;
    for vector in embeddings {
        assert_eq!(vector.as_array().unwrap().len(), dims);
    }
}

#[tokio::test]
async fn embed_vectors_are_unit_norm() {
    let app = build_router(test_state(true));
    let body = serde_json::json!({"texts": ["삼성 노트북"], "prefix": "passage: "});
    let response = app.oneshot(post_embed(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["dims"], 384);
    let embeddings = json["embeddings"].as_array().unwrap();
    assert_eq!(embeddings.len(), 1);
    let norm = l2_norm(embeddings[0].as_array().unwrap());
    assert!((norm - 1.0).abs() < 1e-5, "expected unit norm, got {norm}");
}

#[tokio::test]
async fn embed_rejects_101_texts_before_model() {
    let state = test_state(false); // model never loaded: proves no invocation
    let app = build_router(state);

    let texts: Vec<String> = (0..101).map(|i| format!("text {i}")).collect();
    let body = serde_json::json!({"texts": texts});
    let response = app.oneshot(post_embed(&body)).await.unwrap();

    // 400, not 503: the count check fires before readiness is ever consulted
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn embed_rejects_empty_texts() {
    let app = build_router(test_state(true));
    let body = serde_json::json!({"texts": []});
    let response = app.oneshot(post_embed(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn embed_accepts_exactly_100_texts() {
    let app = build_router(test_state(true));
    let texts: Vec<String> = (0..100).map(|i| format!("text {i}")).collect();
    let body = serde_json::json!({"texts": texts});
    let response = app.oneshot(post_embed(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["embeddings"].as_array().unwrap().len(), 100);
}

#[tokio::test]
async fn embed_prefix_changes_vectors() {
    let state = test_state(true);

    let with_prefix = build_router(state.clone())
        .oneshot(post_embed(
            &serde_json::json!({"texts": ["a"], "prefix": "x"}),
        ))
        .await
        .unwrap();
    let without = build_router(state)
        .oneshot(post_embed(
            &serde_json::json!({"texts": ["a"], "prefix": ""}),
        ))
        .await
        .unwrap();

    let v1 = body_json(with_prefix).await["embeddings"][0].clone();
    let v2 = body_json(without).await["embeddings"][0].clone();
    assert_ne!(v1, v2);
}

#[tokio::test]
async fn embed_is_deterministic() {
    let state = test_state(true);
    let body = serde_json::json!({"texts": ["deterministic"]});

    let first = build_router(state.clone())
        .oneshot(post_embed(&body))
        .await
        .unwrap();
    let second = build_router(state).oneshot(post_embed(&body)).await.unwrap();

    assert_eq!(
        body_json(first).await["embeddings"],
        body_json(second).await["embeddings"]
    );
}

#[tokio::test]
async fn embed_single_returns_unwrapped_vector() {
    let app = build_router(test_state(true));
    let response = app
        .oneshot(
            Request::get("/embed/single?text=hello&prefix=query:%20")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let dims = json["dims"].as_u64().unwrap() as usize;
    let embedding = json["embedding"].as_array().unwrap();
    assert_eq!(embedding.len(), dims);
    let norm = l2_norm(embedding);
    assert!((norm - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn embed_single_defaults_to_query_prefix() {
    let state = test_state(true);

    let single = build_router(state.clone())
        .oneshot(
            Request::get("/embed/single?text=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let batch = build_router(state)
        .oneshot(post_embed(
            &serde_json::json!({"texts": ["abc"], "prefix": "query: "}),
        ))
        .await
        .unwrap();

    let single_vec = body_json(single).await["embedding"].clone();
    let batch_vec = body_json(batch).await["embeddings"][0].clone();
    assert_eq!(single_vec, batch_vec);
}

#[tokio::test]
async fn embed_single_returns_503_before_load() {
    let app = build_router(test_state(false));
    let response = app
        .oneshot(
            Request::get("/embed/single?text=hello")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_router(test_state(true));
    let response = app
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = build_router(test_state(true));
    let response = app
        .oneshot(
            Request::get("/health")
                .header("x-request-id", "test-req-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "test-req-1"
    );
}

#[tokio::test]
async fn not_ready_after_stop() {
    let state = test_state(true);
    state.manager.stop().unwrap();

    let response = build_router(state)
        .oneshot(post_embed(&serde_json::json!({"texts": ["x"]})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
