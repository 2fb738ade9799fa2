//! Trigger API behavior: the batch call always succeeds; failure is
//! visible only through the embedded counts.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use es_projector::server::{self, AppState};
use es_projector::{
    BatchCoordinator, ChangeDispatcher, ClusterHealthProbe, EndpointRegistry, EsClient,
    RetryPolicy,
};
use http_body_util::BodyExt;
use projector_core::ElasticsearchConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(endpoints: HashMap<String, String>) -> axum::Router {
    let registry = EndpointRegistry::new(endpoints);
    let client = EsClient::new(&ElasticsearchConfig::default(), RetryPolicy::default()).unwrap();
    let probe = ClusterHealthProbe::new(client.http_client(), Duration::from_secs(2));
    let coordinator = Arc::new(BatchCoordinator::new(ChangeDispatcher::new(
        registry, probe, client,
    )));
    server::router(AppState { coordinator })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn ingest_replies_200_with_counts_even_when_every_record_fails() {
    let payload = json!({
        "records": [
            {
                "operation": "INSERT",
                "afterImage": {"codigo": {"S": "p-1"}, "tenant_id": {"S": "t-unmapped"}}
            },
            {"operation": "PURGE"}
        ]
    });

    let response = app(HashMap::new())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ingest")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Batch processed");
    assert_eq!(body["total_records"], 2);
    assert_eq!(body["successful_records"], 1); // the unknown operation no-op
    assert_eq!(body["failed_records"], 1);
}

#[tokio::test]
async fn empty_batch_is_a_successful_noop() {
    let response = app(HashMap::new())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ingest")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"records": []}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_records"], 0);
    assert_eq!(body["failed_records"], 0);
}

#[tokio::test]
async fn health_routes_respond() {
    let response = app(HashMap::new())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");

    let response = app(HashMap::new())
        .oneshot(
            Request::builder()
                .uri("/health/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
