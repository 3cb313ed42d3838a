//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::db;
use crate::errors::IndexerError;
use crate::events::EventRecord;
use crate::summary::{self, ProjectSummary};

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 1_000;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

/// Build the router with all routes and middleware attached.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(get_all_events))
        .route("/projects/:id/events", get(get_project_events))
        .route("/projects/:id/summary", get(get_project_summary))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub project_id: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for IndexerError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::NOT_FOUND
        } else {
            error!("API request failed: {self}");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, IndexerError>;

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /projects/:id/events`
///
/// Returns all indexed events for the given project identifier.
pub async fn get_project_events(
    State(state): State<Arc<ApiState>>,
    Path(project_id): Path<String>,
) -> ApiResult<EventsResponse> {
    let events = db::get_events_for_project(&state.pool, &project_id).await?;
    Ok(Json(EventsResponse {
        project_id,
        count: events.len(),
        events,
    }))
}

/// `GET /projects/:id/summary`
///
/// Rebuilds raised total, settlement status and per-donor balances from the
/// project's events. 404 when nothing has been indexed for the id.
pub async fn get_project_summary(
    State(state): State<Arc<ApiState>>,
    Path(project_id): Path<String>,
) -> ApiResult<ProjectSummary> {
    let events = db::get_events_for_project(&state.pool, &project_id).await?;
    if events.is_empty() {
        return Err(IndexerError::NotFound(format!("project {project_id}")));
    }
    Ok(Json(summary::summarize(&project_id, &events)?))
}

/// `GET /events?limit=&offset=`
///
/// Returns a page of indexed events across all projects.
pub async fn get_all_events(
    State(state): State<Arc<ApiState>>,
    Query(page): Query<Pagination>,
) -> ApiResult<AllEventsResponse> {
    let limit = page.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = page.offset.unwrap_or(0).max(0);
    let events = db::get_all_events(&state.pool, limit, offset).await?;
    Ok(Json(AllEventsResponse {
        count: events.len(),
        events,
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::events::CrowdfundEvent;

    fn event(id: &str, kind: &str, actor: &str, amount: &str, ledger: i64) -> CrowdfundEvent {
        CrowdfundEvent {
            event_id: id.to_string(),
            event_type: kind.to_string(),
            project_id: Some("0".to_string()),
            actor: Some(actor.to_string()),
            beneficiary: (kind == "project_created").then(|| "GBENEF".to_string()),
            amount: Some(amount.to_string()),
            ledger,
            timestamp: 0,
            contract_id: "CCROWD".to_string(),
            tx_hash: None,
        }
    }

    async fn app() -> Router {
        let pool = db::memory_pool().await.unwrap();
        db::insert_events(
            &pool,
            &[
                event("1", "project_created", "GOWNER", "1000", 1),
                event("2", "donated", "GD1", "70", 2),
                event("3", "donated", "GD2", "200", 3),
                event("4", "refunded", "GD1", "70", 4),
            ],
        )
        .await
        .unwrap();
        router(Arc::new(ApiState { pool }))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = get_json(app().await, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn project_events_are_listed() {
        let (status, body) = get_json(app().await, "/projects/0/events").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 4);
        assert_eq!(body["events"][1]["event_type"], "donated");
    }

    #[tokio::test]
    async fn summary_reflects_refund() {
        let (status, body) = get_json(app().await, "/projects/0/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["raised"], 200);
        assert_eq!(body["funding_goal"], 1000);
        assert_eq!(body["withdrawn"], false);
        assert_eq!(body["donors"]["GD2"], 200);
        assert!(body["donors"].get("GD1").is_none());
    }

    #[tokio::test]
    async fn unknown_project_summary_is_404() {
        let (status, body) = get_json(app().await, "/projects/9/summary").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("project 9"));
    }

    #[tokio::test]
    async fn events_are_paginated() {
        let (status, body) = get_json(app().await, "/events?limit=2&offset=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["events"][0]["event_id"], "2");
    }
}
