// HTTP request handlers
use crate::domain::filters::FilterQuery;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;

/// Route segment serving the aggregated view instead of a single query
const VIEW_ROUTE: &str = "view";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/:dashboard/:resource", get(dashboard_resource))
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// `GET /api/{dashboard}/view` builds the whole view; any other resource
/// segment runs the single catalog query registered under that route.
pub async fn dashboard_resource(
    Path((dashboard, resource)): Path<(String, String)>,
    query: Result<Query<FilterQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidFilters(e.body_text()))?;
    let filters = query.resolve();
    let service = &state.dashboard_service;

    if resource == VIEW_ROUTE {
        let view = service
            .build_view(&dashboard, filters)
            .await
            .map_err(|e| ApiError::from_dashboard("dashboard view", e))?;
        return Ok(Json(view).into_response());
    }

    let set = service.catalog().resolve(&dashboard)?;
    let target = set
        .resource(&resource)
        .ok_or_else(|| ApiError::ResourceNotFound {
            dashboard: dashboard.clone(),
            resource: resource.clone(),
        })?;

    let data = service
        .fetch_resource(set, target, filters)
        .await
        .map_err(|e| ApiError::data_access(resource.as_str(), e))?;
    Ok(Json(data).into_response())
}
