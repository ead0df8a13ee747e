// PostgreSQL query executor implementation
use crate::application::error::DataAccessError;
use crate::application::query_executor::{QueryExecutor, QueryParam, QuerySpec, Row};
use crate::domain::filters::FilterSet;
use crate::infrastructure::config::DatabaseSettings;
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Column, PgPool, Row as _};

#[derive(Debug, Clone)]
pub struct PgQueryExecutor {
    pool: PgPool,
}

impl PgQueryExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds the shared pool. Callers queue on it when all connections are busy.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, sqlx::Error> {
        tracing::info!(
            "Connecting to database: {} (max {} connections)",
            mask_database_url(&settings.url),
            settings.max_connections
        );

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.acquire_timeout())
            .idle_timeout(settings.idle_timeout())
            .connect(&settings.url)
            .await
            .map_err(|e| {
                tracing::warn!("Failed to connect to database: {}", e);
                e
            })?;

        tracing::info!("Database connection pool created");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl QueryExecutor for PgQueryExecutor {
    async fn execute(
        &self,
        query: &QuerySpec,
        filters: &FilterSet,
    ) -> Result<Vec<Row>, DataAccessError> {
        let mut statement = sqlx::query(query.statement());
        for param in query.params(filters) {
            statement = match param {
                QueryParam::Text(value) => statement.bind(value),
                QueryParam::Int(value) => statement.bind(value),
            };
        }

        let rows = statement
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DataAccessError::new(query.id.clone(), e))?;

        tracing::debug!(query = %query.id, rows = rows.len(), "Query executed");
        Ok(rows.iter().map(decode_row).collect())
    }
}

fn decode_row(row: &PgRow) -> Row {
    row.columns()
        .iter()
        .map(|column| (column.name().to_string(), decode_column(row, column.ordinal())))
        .collect()
}

/// Tries the column against each supported Rust type; sqlx rejects
/// mismatched types, so the first successful decode wins.
fn decode_column(row: &PgRow, index: usize) -> Value {
    macro_rules! try_decode {
        ($ty:ty, $convert:expr) => {
            if let Ok(value) = row.try_get::<Option<$ty>, _>(index) {
                return value.map($convert).unwrap_or(Value::Null);
            }
        };
    }

    try_decode!(i32, Value::from);
    try_decode!(i64, Value::from);
    try_decode!(i16, Value::from);
    try_decode!(f64, Value::from);
    try_decode!(f32, |v: f32| Value::from(v as f64));
    try_decode!(Decimal, decimal_to_json);
    try_decode!(String, Value::String);
    try_decode!(bool, Value::Bool);
    try_decode!(chrono::NaiveDate, |v: chrono::NaiveDate| Value::String(v.to_string()));
    try_decode!(chrono::NaiveDateTime, |v: chrono::NaiveDateTime| {
        Value::String(v.and_utc().to_rfc3339())
    });
    try_decode!(chrono::DateTime<chrono::Utc>, |v: chrono::DateTime<chrono::Utc>| {
        Value::String(v.to_rfc3339())
    });

    tracing::debug!(index, "Unsupported column type, decoded as null");
    Value::Null
}

fn decimal_to_json(value: Decimal) -> Value {
    value.to_f64().map(Value::from).unwrap_or(Value::Null)
}

/// Hide the password part of a connection URL for logging
fn mask_database_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let credentials = &url[scheme_end + 3..at];
            match credentials.find(':') {
                Some(colon) => format!(
                    "{}{}:****{}",
                    &url[..scheme_end + 3],
                    &credentials[..colon],
                    &url[at..]
                ),
                None => url.to_string(),
            }
        }
        _ => url.to_string(),
    }
}
