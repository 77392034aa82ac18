// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// JSON endpoints live under `/api/v1/`; the dashboard page is served at `/`.
// Routes are public. The only write path is the cache refresh, which drops
// cached series and nothing else.
//
// CORS is configured permissively.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::api::dashboard::render_page;
use crate::app_state::{AppState, ReportError};

// =============================================================================
// Router construction
// =============================================================================

/// Build the full router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(dashboard))
        .route("/api/v1/health", get(health))
        .route("/api/v1/outlook", get(outlook))
        .route("/api/v1/errors", get(recent_errors))
        .route("/api/v1/refresh", post(refresh))
        .layer(cors)
        .with_state(state)
}

/// Optional MCX reference price from the query string.
#[derive(Debug, Default, Deserialize)]
struct OutlookQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    mcx_price: Option<f64>,
}

/// A blank form field arrives as `mcx_price=`; treat it as absent.
fn blank_as_none<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn status_for(err: &ReportError) -> StatusCode {
    match err {
        ReportError::InvalidReferencePrice { .. } => StatusCode::BAD_REQUEST,
        ReportError::PrimaryUnavailable { .. } | ReportError::Scoring(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.start_time.elapsed().as_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Outlook
// =============================================================================

async fn outlook(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OutlookQuery>,
) -> Response {
    match state.build_report(query.mcx_price).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            let body = serde_json::json!({ "error": e.to_string() });
            (status_for(&e), Json(body)).into_response()
        }
    }
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OutlookQuery>,
) -> Response {
    let result = state.build_report(query.mcx_price).await;
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => status_for(e),
    };
    (status, Html(render_page(&result))).into_response()
}

// =============================================================================
// Error log
// =============================================================================

async fn recent_errors(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.recent_errors())
}

// =============================================================================
// Cache refresh
// =============================================================================

#[derive(Serialize)]
struct RefreshResponse {
    cleared: usize,
}

async fn refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(RefreshResponse {
        cleared: state.refresh(),
    })
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::market_data::cache::tests::StubSource;
    use crate::market_data::SeriesCache;
    use crate::runtime_config::RuntimeConfig;
    use crate::types::test_support::flat;
    use crate::types::PriceSeries;

    fn app(series: Vec<PriceSeries>) -> Router {
        let cache = SeriesCache::new(StubSource::new(series), Duration::from_secs(3600));
        router(Arc::new(AppState::new(RuntimeConfig::default(), Box::new(cache))))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_ok() {
        let (status, body) = get_json(app(vec![]), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn outlook_json_has_four_calls() {
        let (status, body) =
            get_json(app(vec![flat("HG=F", 40, 4.5)]), "/api/v1/outlook?mcx_price=900").await;
        assert_eq!(status, StatusCode::OK);
        let calls = body["outlook"]["calls"].as_array().unwrap();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0]["label"], "Today");
        assert_eq!(calls[3]["label"], "Day +3");
        assert_eq!(calls[0]["bias"], "Sideways");
        assert_eq!(body["projection"]["reference_price"], 900.0);
    }

    #[tokio::test]
    async fn outlook_without_copper_is_503() {
        let (status, body) = get_json(app(vec![]), "/api/v1/outlook").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("HG=F"));
    }

    #[tokio::test]
    async fn bad_reference_price_is_400() {
        let (status, _) =
            get_json(app(vec![flat("HG=F", 40, 4.5)]), "/api/v1/outlook?mcx_price=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dashboard_renders_horizons() {
        let resp = app(vec![flat("HG=F", 40, 4.5)])
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        for label in ["Today", "Tomorrow", "Day +2", "Day +3"] {
            assert!(html.contains(label), "missing {label}");
        }
        assert!(html.contains("Sideways"));
    }

    #[tokio::test]
    async fn blank_reference_price_renders_dashboard() {
        let resp = app(vec![flat("HG=F", 40, 4.5)])
            .oneshot(Request::builder().uri("/?mcx_price=").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Today"));

        let (status, body) =
            get_json(app(vec![flat("HG=F", 40, 4.5)]), "/api/v1/outlook?mcx_price=").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["projection"].is_null());
    }

    #[tokio::test]
    async fn non_numeric_reference_price_is_400() {
        let resp = app(vec![flat("HG=F", 40, 4.5)])
            .oneshot(
                Request::builder()
                    .uri("/api/v1/outlook?mcx_price=abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn refresh_clears_cached_series() {
        let state = Arc::new(AppState::new(
            RuntimeConfig::default(),
            Box::new(SeriesCache::new(
                StubSource::new(vec![flat("HG=F", 40, 4.5)]),
                Duration::from_secs(3600),
            )),
        ));
        state.build_report(None).await.unwrap();
        let resp = router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        // Only copper was available, so only copper was cached.
        assert_eq!(body["cleared"], 1);
        assert_eq!(state.refresh(), 0);
    }

    #[tokio::test]
    async fn errors_endpoint_lists_feed_failures() {
        let state = Arc::new(AppState::new(
            RuntimeConfig::default(),
            Box::new(SeriesCache::new(
                StubSource::new(vec![flat("HG=F", 40, 4.5)]),
                Duration::from_secs(3600),
            )),
        ));
        state.build_report(None).await.unwrap();
        let (status, body) = get_json(router(state), "/api/v1/errors").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 4);
    }
}
