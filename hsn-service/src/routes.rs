use crate::error::AppError;
use crate::metrics::{self, Outcome};
use crate::state::SharedState;
use axum::extract::{Query, State};
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use hsn_core::{resolve, sanitize, LookupPolicy, LookupResponse, QueryResult, SearchResponse};
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/", get(lookup_get))
        .route("/lookup", get(lookup_get).post(lookup_post))
        .route("/search", get(search))
        .route("/status", get(status))
        .route("/reload", post(reload))
        .route("/metrics", get(metrics::metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// GET /?hsn_code=, GET /lookup?hsn_code=, POST /lookup
#[derive(Debug, Default, Deserialize)]
pub struct LookupParams {
    #[serde(default)]
    pub hsn_code: Option<String>,
}

pub async fn lookup_get(
    State(state): State<SharedState>,
    Query(params): Query<LookupParams>,
) -> Result<Json<LookupResponse>, AppError> {
    lookup(&state, params.hsn_code.as_deref()).await
}

pub async fn lookup_post(
    State(state): State<SharedState>,
    Json(params): Json<LookupParams>,
) -> Result<Json<LookupResponse>, AppError> {
    lookup(&state, params.hsn_code.as_deref()).await
}

async fn lookup(state: &SharedState, raw: Option<&str>) -> Result<Json<LookupResponse>, AppError> {
    let Some(query) = raw.and_then(sanitize) else {
        state.metrics.invalid_count.fetch_add(1, Ordering::Relaxed);
        debug!(raw = ?raw, "rejected lookup without digits");
        return Err(AppError::invalid_query());
    };

    let start = Instant::now();
    let (table, generation) = state.table().await;
    let result = resolve(&query, &table, &state.options);
    let duration_us = start.elapsed().as_micros() as u64;

    let outcome = match &result {
        QueryResult::ExactMatch { .. } => Outcome::Exact,
        QueryResult::PrefixMatches { .. } => Outcome::Prefix,
        QueryResult::NotFound => Outcome::NotFound,
    };
    state
        .metrics
        .record_lookup(query.as_str(), outcome, duration_us);
    info!(
        query = %query,
        outcome = outcome.as_str(),
        generation,
        duration_us,
        "lookup"
    );

    LookupResponse::from_result(&result)
        .map(Json)
        .ok_or_else(|| AppError::not_found(query.as_str()))
}

// GET /search?q=&limit=
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

pub async fn search(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let term = params.q.unwrap_or_default();
    let limit = params.limit.unwrap_or(state.search_limit);

    let (table, _) = state.table().await;
    let result = table.search(&term, limit);
    state.metrics.search_count.fetch_add(1, Ordering::Relaxed);
    debug!(term = %result.term, total_found = result.total_found, "search");

    Json(SearchResponse::from(&result))
}

// GET /status
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub service: String,
    pub entries: usize,
    pub generation: u64,
    pub source: String,
    pub policy: LookupPolicy,
    pub max_prefix_results: usize,
}

pub async fn status(State(state): State<SharedState>) -> Json<StatusResponse> {
    let (table, generation) = state.table().await;
    Json(StatusResponse {
        service: "hsn-service".to_string(),
        entries: table.len(),
        generation,
        source: state.source.to_string(),
        policy: state.options.policy,
        max_prefix_results: state.options.max_prefix_results,
    })
}

// POST /reload
pub async fn reload(State(state): State<SharedState>) -> Result<Json<StatusResponse>, AppError> {
    state.metrics.reload_count.fetch_add(1, Ordering::Relaxed);

    match state.reload().await {
        Ok((entries, generation)) => {
            info!(entries, generation, source = %state.source, "table reloaded");
        }
        Err(err) => {
            state.metrics.reload_failures.fetch_add(1, Ordering::Relaxed);
            warn!(error = %err, source = %state.source, "table reload failed, keeping previous table");
            return Err(AppError::from(err));
        }
    }

    Ok(status(State(state)).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use hsn_core::{LookupOptions, TableBuilder, TableSource};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> SharedState {
        let mut builder = TableBuilder::new();
        for (code, description, rate) in [
            ("1001", "Wheat and meslin", "0"),
            ("1006", "Rice", "0"),
            ("2201", "Waters, including mineral waters", "18"),
            ("2203", "Beer made from malt", "28"),
            ("8409", "Parts for spark-ignition engines", "28"),
        ] {
            builder
                .push_parts(code, description, rate.parse().unwrap())
                .unwrap();
        }
        Arc::new(AppState::new(
            builder.build(),
            TableSource::Builtin,
            LookupOptions::default(),
            20,
        ))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn exact_lookup_sanitizes_input() {
        let (status, body) = get_json(router(test_state()), "/lookup?hsn_code=84-09").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "exact_search");
        assert_eq!(body["hsn_code"], "8409");
        assert_eq!(body["gst_rate"], "28%");
    }

    #[tokio::test]
    async fn root_path_accepts_query_parameter() {
        let (status, body) = get_json(router(test_state()), "/?hsn_code=1001").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["description"], "Wheat and meslin");
        assert_eq!(body["gst_rate"], "0%");
    }

    #[tokio::test]
    async fn prefix_lookup_lists_matches() {
        let (status, body) = get_json(router(test_state()), "/lookup?hsn_code=22").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "prefix_search");
        assert_eq!(body["prefix"], "22");
        assert_eq!(body["total_found"], 2);
        assert_eq!(body["results"][0]["hsn_code"], "2201");
        assert_eq!(body["results"][1]["hsn_code"], "2203");
    }

    #[tokio::test]
    async fn unknown_code_is_404() {
        let (status, body) = get_json(router(test_state()), "/lookup?hsn_code=9999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }

    #[tokio::test]
    async fn missing_or_empty_code_is_400() {
        let state = test_state();
        let (status, body) = get_json(router(state.clone()), "/lookup").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_query");

        let (status, _) = get_json(router(state.clone()), "/lookup?hsn_code=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(state.metrics.invalid_count.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn post_lookup_reads_body() {
        let resp = router(test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/lookup")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"hsn_code":"1006"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["description"], "Rice");
    }

    #[tokio::test]
    async fn search_by_description() {
        let (status, body) = get_json(router(test_state()), "/search?q=rice").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_found"], 1);
        assert_eq!(body["results"][0]["hsn_code"], "1006");

        let (_, body) = get_json(router(test_state()), "/search?limit=2").await;
        assert_eq!(body["total_found"], 5);
        assert_eq!(body["results"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn reload_swaps_table_and_reports_status() {
        let state = test_state();
        let resp = router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/reload")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let (_, body) = get_json(router(state.clone()), "/status").await;
        assert_eq!(body["generation"], 1);
        assert_eq!(body["source"], "builtin");
        assert_eq!(body["policy"], "exact_first");
        // Builtin table has 8471, the test table did not
        let (status, _) = get_json(router(state), "/lookup?hsn_code=8471").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_count_outcomes() {
        let state = test_state();
        for uri in [
            "/lookup?hsn_code=1001",
            "/lookup?hsn_code=10",
            "/lookup?hsn_code=9999",
        ] {
            get_json(router(state.clone()), uri).await;
        }

        let (_, body) = get_json(router(state), "/metrics").await;
        assert_eq!(body["lookups"]["total"], 3);
        assert_eq!(body["lookups"]["exact"], 1);
        assert_eq!(body["lookups"]["prefix"], 1);
        assert_eq!(body["lookups"]["not_found"], 1);
    }

    #[tokio::test]
    async fn unknown_codes_do_not_grow_top_codes() {
        let state = test_state();
        for i in 0..500 {
            let uri = format!("/lookup?hsn_code={}{:0>200}", 9, i);
            let (status, _) = get_json(router(state.clone()), &uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
        get_json(router(state.clone()), "/lookup?hsn_code=1001").await;

        assert_eq!(state.metrics.not_found_count.load(Ordering::Relaxed), 500);
        assert_eq!(state.metrics.top_codes.lock().unwrap().len(), 1);

        let (_, body) = get_json(router(state), "/metrics").await;
        assert_eq!(body["top_codes"][0]["code"], "1001");
    }

    #[tokio::test]
    async fn cors_preflight_is_answered() {
        let resp = router(test_state())
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/lookup")
                    .header("origin", "http://localhost:3000")
                    .header("access-control-request-method", "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
        assert_eq!(
            resp.headers()
                .get("access-control-max-age")
                .and_then(|v| v.to_str().ok()),
            Some("3600")
        );
        let methods = resp
            .headers()
            .get("access-control-allow-methods")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        for method in ["GET", "POST", "OPTIONS"] {
            assert!(methods.contains(method), "missing {} in {}", method, methods);
        }
    }
}
