use crate::application::catalog::ColumnRule;
use crate::application::query_executor::EntityTable;
use crate::domain::dashboard::DashboardType;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub cors_origin: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_origin: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

impl DatabaseSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

fn default_idle_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default)]
    pub dashboards: Vec<DashboardConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub kind: DashboardType,
    pub route: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
    pub table: TableConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    pub route: String,
    pub name: String,
    pub chart_type: String,
    pub source_chart_type: String,
    pub source_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TableConfig {
    pub route: String,
    pub title: String,
    pub source: EntityTable,
    #[serde(default)]
    pub columns: Vec<ColumnRule>,
}

/// Server and pool settings: `config/app.*` overlaid with `DASHBOARD_*` env vars
/// (e.g. `DASHBOARD_DATABASE__URL`)
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_catalog_config() -> anyhow::Result<CatalogConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboards"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
