//! HTTP REST API routes

mod emotion_routes;
mod marker_routes;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::infrastructure::state::AppState;

pub use emotion_routes::{CreatedResponse, MessageResponse};
pub use marker_routes::MarkerQuery;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Emotion collection
        .route("/api/emotions", get(emotion_routes::list_emotions))
        .route("/api/emotions", post(emotion_routes::create_emotion))
        .route("/api/emotions", put(emotion_routes::replace_emotions))
        .route("/api/emotions", delete(emotion_routes::clear_emotions))
        // Markers
        .route("/api/markers", get(marker_routes::get_markers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::AppConfig;
    use crate::infrastructure::persistence::{
        FileSlotStore, SlotEventStore, SqliteSlotStore, DEFAULT_SLOT,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;

    async fn app() -> Router {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let slots = Arc::new(SqliteSlotStore::new(pool).await.unwrap());
        let store = Arc::new(SlotEventStore::new(slots, DEFAULT_SLOT));
        create_routes().with_state(Arc::new(AppState::new(AppConfig::default(), store)))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(body) => {
                request = request.header("content-type", "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn report(id: &str, lat: f64, lng: f64, intensity: i64) -> Value {
        json!({
            "id": id,
            "location": { "lat": lat, "lng": lng, "name": "東京都周辺" },
            "emotion": "joy",
            "intensity": intensity,
            "timestamp": "2024-05-01T09:00:00Z",
            "userName": "佐藤 花子"
        })
    }

    #[tokio::test]
    async fn test_post_then_list() {
        let app = app().await;

        let (status, body) = send(&app, "POST", "/api/emotions", Some(report("a", 35.68, 139.65, 80))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["emotion"]["id"], "a");
        assert!(body["message"].is_string());

        let (status, body) = send(&app, "GET", "/api/emotions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["userName"], "佐藤 花子");
    }

    #[tokio::test]
    async fn test_post_applies_defaults() {
        let app = app().await;
        let minimal = json!({ "id": "m", "location": { "lat": 1.0, "lng": 2.0 }, "emotion": "sorrow" });

        let (status, body) = send(&app, "POST", "/api/emotions", Some(minimal)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["emotion"]["intensity"], 50);
        assert_eq!(body["emotion"]["userName"], "");
    }

    #[tokio::test]
    async fn test_post_missing_fields_is_bad_request() {
        let app = app().await;
        let (status, _) = send(&app, "POST", "/api/emotions", Some(json!({ "id": "x" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, "GET", "/api/emotions", None).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_posts_are_all_kept() {
        let dir = std::env::temp_dir().join(format!("emodus-posts-{}", uuid::Uuid::new_v4()));
        let slots = Arc::new(FileSlotStore::open(&dir).await.unwrap());
        let store = Arc::new(SlotEventStore::new(slots, DEFAULT_SLOT));
        let app = create_routes().with_state(Arc::new(AppState::new(AppConfig::default(), store)));

        let posts: Vec<_> = (0..50)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move {
                    let body = report(&format!("p{i}"), 35.0, 139.0, 50);
                    send(&app, "POST", "/api/emotions", Some(body)).await.0
                })
            })
            .collect();
        for post in posts {
            assert_eq!(post.await.unwrap(), StatusCode::CREATED);
        }

        let (status, body) = send(&app, "GET", "/api/emotions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 50);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_put_is_atomic() {
        let app = app().await;
        send(&app, "POST", "/api/emotions", Some(report("kept", 35.0, 139.0, 10))).await;

        let (status, _) = send(&app, "PUT", "/api/emotions", Some(json!({ "not": "an array" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let invalid = json!([report("ok", 35.0, 139.0, 10), report("bad", 35.0, 139.0, 150)]);
        let (status, _) = send(&app, "PUT", "/api/emotions", Some(invalid)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, "GET", "/api/emotions", None).await;
        assert_eq!(body[0]["id"], "kept");
        assert_eq!(body.as_array().unwrap().len(), 1);

        let valid = json!([report("x", 35.0, 139.0, 10), report("y", 36.0, 140.0, 20)]);
        let (status, _) = send(&app, "PUT", "/api/emotions", Some(valid)).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = send(&app, "GET", "/api/emotions", None).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_clears() {
        let app = app().await;
        send(&app, "POST", "/api/emotions", Some(report("a", 35.0, 139.0, 10))).await;

        let (status, _) = send(&app, "DELETE", "/api/emotions", None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = send(&app, "GET", "/api/emotions", None).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_markers_by_zoom() {
        let app = app().await;
        let collection = json!([
            report("tokyo", 35.6762, 139.6503, 40),
            report("kawasaki", 35.5272, 139.7025, 60),
            report("sapporo", 43.0642, 141.3469, 90)
        ]);
        send(&app, "PUT", "/api/emotions", Some(collection)).await;

        let (status, body) = send(&app, "GET", "/api/markers?zoom=6", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["clusterCount"], 1);
        assert_eq!(body["individualCount"], 1);
        assert_eq!(body["markers"][0]["kind"], "cluster");
        assert_eq!(body["markers"][0]["intensity"], 50);
        assert_eq!(body["markers"][0]["id"], "cluster-tokyo-2");

        let (_, body) = send(&app, "GET", "/api/markers?zoom=19", None).await;
        assert_eq!(body["clusterCount"], 0);
        assert_eq!(body["individualCount"], 3);
    }
}
