// HTTP error responses
use crate::application::error::{ConfigurationError, DashboardError, DataAccessError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid filter parameters: {0}")]
    InvalidFilters(String),

    #[error("dashboard not found: {0}")]
    DashboardNotFound(String),

    #[error("resource not found: {dashboard}/{resource}")]
    ResourceNotFound { dashboard: String, resource: String },

    #[error("failed to fetch {resource}: {source}")]
    DataAccess {
        resource: String,
        #[source]
        source: DataAccessError,
    },

    /// Startup validation rejects a bad catalog, so handlers only see this
    /// if a catalog is swapped in without going through `from_config`.
    #[error("invalid configuration: {0}")]
    Configuration(ConfigurationError),
}

impl ApiError {
    pub fn data_access(resource: impl Into<String>, source: DataAccessError) -> Self {
        ApiError::DataAccess {
            resource: resource.into(),
            source,
        }
    }

    /// Maps an aggregate view failure; `resource` names what was requested
    pub fn from_dashboard(resource: impl Into<String>, err: DashboardError) -> Self {
        match err {
            DashboardError::DataAccess(source) => ApiError::data_access(resource, source),
            DashboardError::Configuration(ConfigurationError::UnknownDashboard(name)) => {
                ApiError::DashboardNotFound(name)
            }
            DashboardError::Configuration(err @ ConfigurationError::InvalidCatalog(_)) => {
                ApiError::Configuration(err)
            }
        }
    }
}

impl From<ConfigurationError> for ApiError {
    fn from(err: ConfigurationError) -> Self {
        ApiError::from_dashboard("dashboard", DashboardError::Configuration(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidFilters(reason) => {
                tracing::warn!(reason = %reason, "Rejected filter parameters");
                (StatusCode::BAD_REQUEST, "Invalid filter parameters".to_string())
            }
            ApiError::DashboardNotFound(name) => {
                tracing::warn!(dashboard = %name, "Unknown dashboard requested");
                (StatusCode::NOT_FOUND, format!("Unknown dashboard: {}", name))
            }
            ApiError::ResourceNotFound { dashboard, resource } => {
                tracing::warn!(dashboard = %dashboard, resource = %resource, "Unknown resource requested");
                (StatusCode::NOT_FOUND, format!("Unknown resource: {}", resource))
            }
            ApiError::DataAccess { resource, source } => {
                tracing::error!(resource = %resource, query = %source.query_id, error = %source.source, "Data access failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to fetch {}", resource),
                )
            }
            ApiError::Configuration(err) => {
                tracing::error!(error = %err, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong!".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
