//! HTTP request handlers for the API server.
//!
//! Each analytics endpoint parses [`WindowParams`], builds a validated
//! filter and hands it to the shared [`Analytics`] engine.

use crate::query::{ApiQuery, WindowParams};
use axum::{
    extract::{rejection::QueryRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router as AxumRouter,
};
use nabeeh_analytics::{
    Analytics, AnalyticsError, Heatmap, InspectorDetail, InspectorList, NationwideSummary,
    PortDetail, PortIncidents, PortKpis, PortSummary,
};
use nabeeh_domain::{IncidentStore, Port, RiskScorer};
use nabeeh_store::MemoryStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Analytics engine over the loaded snapshot
    pub analytics: Arc<Analytics<Arc<MemoryStore>>>,
}

impl AppState {
    /// Wrap a loaded store and scorer
    pub fn new(store: Arc<MemoryStore>, scorer: RiskScorer) -> Self {
        Self {
            analytics: Arc::new(Analytics::new(store, scorer)),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Always "ok" once the snapshot is loaded
    pub status: String,
    /// Known ports
    pub ports: usize,
    /// Known inspectors
    pub inspectors: usize,
    /// Loaded incidents
    pub incidents: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable code
    pub error: String,
    /// Human-readable detail
    pub message: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// `from` or `to` could not be parsed
    InvalidDate(String),
    /// `severity` is not one of the three levels
    InvalidSeverity(String),
    /// Required parameter is absent
    MissingParameter(&'static str),
    /// Query string could not be decoded (e.g. a non-numeric `limit`)
    InvalidQuery(String),
    /// Range or lookup failure from the analytics layer
    Analytics(AnalyticsError),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidDate(_) => (StatusCode::BAD_REQUEST, "invalid_date"),
            AppError::InvalidSeverity(_) => (StatusCode::BAD_REQUEST, "invalid_severity"),
            AppError::MissingParameter(_) => (StatusCode::BAD_REQUEST, "missing_parameter"),
            AppError::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "invalid_query"),
            AppError::Analytics(e) if e.is_not_found() => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Analytics(_) => (StatusCode::BAD_REQUEST, "invalid_range"),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::InvalidDate(raw) => format!("Cannot parse '{}' as a date or timestamp", raw),
            AppError::InvalidSeverity(raw) => {
                format!("Unknown severity '{}', expected LOW, MEDIUM or HIGH", raw)
            }
            AppError::MissingParameter(name) => format!("Missing query parameter: {}", name),
            AppError::InvalidQuery(detail) => detail.clone(),
            AppError::Analytics(e) => e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.message();
        warn!(status = status.as_u16(), code, %message, "Request rejected");

        let body = Json(ErrorResponse {
            error: code.to_string(),
            message,
        });
        (status, body).into_response()
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidQuery(rejection.body_text())
    }
}

impl From<AnalyticsError> for AppError {
    fn from(e: AnalyticsError) -> Self {
        AppError::Analytics(e)
    }
}

/// GET /health - Liveness plus snapshot counts
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let store = state.analytics.store();
    Json(HealthCheckResponse {
        status: "ok".to_string(),
        ports: store.ports().len(),
        inspectors: store.inspectors().len(),
        incidents: store.incidents().len(),
    })
}

/// GET /api/summary - Nationwide summary
async fn summary(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<WindowParams>,
) -> Result<Json<NationwideSummary>, AppError> {
    let filter = params.to_filter()?;
    Ok(Json(state.analytics.nationwide_summary(&filter)))
}

/// GET /api/ports - One summary per known port
///
/// Without `from` and `to` this is the plain port reference table.
async fn ports(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<WindowParams>,
) -> Result<Response, AppError> {
    if !params.has_window() {
        let ports: Vec<Port> = state.analytics.store().ports().to_vec();
        debug!(ports = ports.len(), "Port reference table requested");
        return Ok(Json(ports).into_response());
    }

    let filter = params.to_filter()?;
    let summaries: Vec<PortSummary> = state.analytics.port_summaries(&filter);
    Ok(Json(summaries).into_response())
}

/// GET /api/ports/:port_id/details - Port detail
async fn port_detail(
    State(state): State<AppState>,
    Path(port_id): Path<String>,
    ApiQuery(params): ApiQuery<WindowParams>,
) -> Result<Json<PortDetail>, AppError> {
    let filter = params.to_filter()?;
    debug!(%port_id, "Port detail requested");
    Ok(Json(state.analytics.port_detail(&port_id, &filter)?))
}

/// GET /api/inspectors - Inspectors ranked by incident count
async fn inspectors(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<WindowParams>,
) -> Result<Json<InspectorList>, AppError> {
    let filter = params.to_filter()?;
    Ok(Json(state.analytics.inspector_list(&filter, params.limit)))
}

/// GET /api/inspectors/:inspector_id - Inspector detail
async fn inspector_detail(
    State(state): State<AppState>,
    Path(inspector_id): Path<String>,
    ApiQuery(params): ApiQuery<WindowParams>,
) -> Result<Json<InspectorDetail>, AppError> {
    let filter = params.to_filter()?;
    debug!(%inspector_id, "Inspector detail requested");
    Ok(Json(state.analytics.inspector_detail(&inspector_id, &filter)?))
}

/// GET /api/heatmap - Per-port intensities
async fn heatmap(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<WindowParams>,
) -> Result<Json<Heatmap>, AppError> {
    let filter = params.to_filter()?;
    Ok(Json(state.analytics.heatmap(&filter)))
}

/// GET /api/kpis?port_id= - KPI block for one port
async fn kpis(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<WindowParams>,
) -> Result<Json<PortKpis>, AppError> {
    let port_id = params.required_port()?;
    let filter = params.to_filter()?;
    Ok(Json(state.analytics.port_kpis(port_id, &filter)?))
}

/// GET /api/incidents?port_id= - Newest incidents at one port
async fn incidents(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<WindowParams>,
) -> Result<Json<PortIncidents>, AppError> {
    let port_id = params.required_port()?;
    let filter = params.to_filter()?;
    Ok(Json(
        state
            .analytics
            .port_incidents(port_id, &filter, params.limit)?,
    ))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/api/summary", get(summary))
        .route("/api/ports", get(ports))
        .route("/api/ports/:port_id/details", get(port_detail))
        .route("/api/inspectors", get(inspectors))
        .route("/api/inspectors/:inspector_id", get(inspector_detail))
        .route("/api/heatmap", get(heatmap))
        .route("/api/kpis", get(kpis))
        .route("/api/incidents", get(incidents))
        .with_state(state)
}
