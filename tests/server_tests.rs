//! Live Server Tests
//!
//! Binds the router on an ephemeral port and drives it over real HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use entity_cache::{
    cache::EntityCache,
    create_router,
    db::{EntityStore, SqliteStore},
    models::Entity,
    AppState,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn spawn_server() -> SocketAddr {
    let store: Arc<dyn EntityStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
    let app = create_router(AppState::new(EntityCache::with_defaults(store)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_crud_over_http() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let url = format!("http://{}/api/cache", addr);

    let created: Entity = client
        .post(&url)
        .json(&json!({"name": "alpha"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created, Entity::new(1, "alpha"));

    let listed: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(listed["data"], json!([{"id": 1, "name": "alpha"}]));

    let response = client
        .put(&url)
        .json(&json!({"id": 1, "name": "beta"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listed: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(listed["data"], json!([{"id": 1, "name": "beta"}]));

    let response = client
        .delete(format!("{}?id=1", url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listed: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(listed["data"], json!([]));
}

#[tokio::test]
async fn test_concurrent_creates_all_visible() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let url = format!("http://{}/api/cache", addr);

    // Warm the cache so every insert goes through the synchronization path.
    client.get(&url).send().await.unwrap();

    let mut handles = Vec::new();
    for i in 0..16 {
        let client = client.clone();
        let url = url.clone();
        handles.push(tokio::spawn(async move {
            client
                .post(&url)
                .json(&json!({"name": format!("n{}", i)}))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    let listed: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    let data = listed["data"].as_array().unwrap();
    assert_eq!(data.len(), 16);

    let mut ids: Vec<i64> = data.iter().map(|e| e["id"].as_i64().unwrap()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 16);
}

#[tokio::test]
async fn test_invalid_payload_over_http() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/api/cache", addr))
        .json(&json!({"name": "z".repeat(60)}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}
