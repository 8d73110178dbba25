pub mod health;
pub mod sessions;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::AppState;

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", get(sessions::list_sessions))
        .route("/high-score", get(sessions::high_score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::SessionSummary, tests::test_state};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn app(state: Arc<AppState>) -> Router {
        create_routes().with_state(state)
    }

    #[tokio::test]
    async fn test_health_reports_sessions() {
        let state = Arc::new(test_state());
        let session_id = Uuid::new_v4();
        state.sessions.insert(session_id, SessionSummary::new(session_id));

        let (status, body) = get_json(app(state), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["active_sessions"], 1);
    }

    #[tokio::test]
    async fn test_list_sessions() {
        let state = Arc::new(test_state());
        let session_id = Uuid::new_v4();
        state.sessions.insert(session_id, SessionSummary::new(session_id));

        let (status, body) = get_json(app(state), "/api/sessions").await;

        assert_eq!(status, StatusCode::OK);
        let sessions = body.as_array().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0]["session_id"], session_id.to_string());
        assert_eq!(sessions[0]["phase"], "menu");
    }

    #[tokio::test]
    async fn test_high_score_starts_at_zero() {
        let (status, body) = get_json(app(Arc::new(test_state())), "/api/high-score").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["high_score"], 0);
    }
}
