// Error taxonomy for the query and aggregation layers
use thiserror::Error;

/// A query failed at the store boundary
#[derive(Debug, Error)]
#[error("query {query_id} failed: {source}")]
pub struct DataAccessError {
    pub query_id: String,
    #[source]
    pub source: sqlx::Error,
}

impl DataAccessError {
    pub fn new(query_id: impl Into<String>, source: sqlx::Error) -> Self {
        Self {
            query_id: query_id.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("unknown dashboard type: {0}")]
    UnknownDashboard(String),

    #[error("invalid dashboard catalog: {0}")]
    InvalidCatalog(String),
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    DataAccess(#[from] DataAccessError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
