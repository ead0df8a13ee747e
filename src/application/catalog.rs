// Domain query set - the fixed query catalog for each dashboard type
use crate::application::error::ConfigurationError;
use crate::application::query_executor::{QuerySource, QuerySpec};
use crate::domain::dashboard::DashboardType;
use crate::domain::widgets::ChartKind;
use crate::infrastructure::config::{CatalogConfig, ChartConfig, DashboardConfig, TableConfig};
use serde::Deserialize;
use std::collections::HashSet;

pub const CHARTS_PER_DASHBOARD: usize = 4;

/// Routes every dashboard exposes besides its charts and table
const RESERVED_ROUTES: [&str; 2] = ["kpis", "view"];

/// What to put in a table cell when the source column is absent or null
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingValue {
    #[default]
    Null,
    Zero,
    Blank,
}

/// Maps one stored column onto one table header
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnRule {
    pub header: String,
    pub column: String,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub missing: MissingValue,
}

#[derive(Debug, Clone)]
pub struct ChartSlot {
    pub route: String,
    pub name: String,
    pub chart_type: ChartKind,
    pub query: QuerySpec,
}

#[derive(Debug, Clone)]
pub struct TableSpec {
    pub route: String,
    pub title: String,
    pub columns: Vec<ColumnRule>,
    pub query: QuerySpec,
}

impl TableSpec {
    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct DashboardQuerySet {
    pub dashboard: DashboardType,
    pub route: String,
    pub title: String,
    pub description: String,
    pub kpis: QuerySpec,
    pub charts: Vec<ChartSlot>,
    pub table: TableSpec,
}

/// A single addressable query within a dashboard
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Kpis(&'a QuerySpec),
    Chart(&'a ChartSlot),
    Table(&'a TableSpec),
}

impl DashboardQuerySet {
    pub fn resource(&self, route: &str) -> Option<Resource<'_>> {
        if route == "kpis" {
            return Some(Resource::Kpis(&self.kpis));
        }
        if route == self.table.route {
            return Some(Resource::Table(&self.table));
        }
        self.charts
            .iter()
            .find(|c| c.route == route)
            .map(Resource::Chart)
    }
}

#[derive(Debug, Clone)]
pub struct DashboardCatalog {
    sets: Vec<DashboardQuerySet>,
}

impl DashboardCatalog {
    pub fn from_config(config: CatalogConfig) -> Result<Self, ConfigurationError> {
        let mut sets = Vec::with_capacity(DashboardType::ALL.len());
        let mut seen_routes = HashSet::new();

        for dashboard in config.dashboards {
            if sets
                .iter()
                .any(|s: &DashboardQuerySet| s.dashboard == dashboard.kind)
            {
                return Err(invalid(format!("{} is configured twice", dashboard.kind)));
            }
            if let Ok(other) = dashboard.route.parse::<DashboardType>() {
                if other != dashboard.kind {
                    return Err(invalid(format!(
                        "{} route '{}' is the name of {}",
                        dashboard.kind, dashboard.route, other
                    )));
                }
            }
            if !seen_routes.insert(dashboard.route.clone()) {
                return Err(invalid(format!("dashboard route '{}' is reused", dashboard.route)));
            }
            sets.push(build_query_set(dashboard)?);
        }

        for kind in DashboardType::ALL {
            if !sets.iter().any(|s| s.dashboard == kind) {
                return Err(invalid(format!("{} has no catalog entry", kind)));
            }
        }
        sets.sort_by_key(|s| DashboardType::ALL.iter().position(|k| *k == s.dashboard));

        Ok(Self { sets })
    }

    pub fn get(&self, dashboard: DashboardType) -> Result<&DashboardQuerySet, ConfigurationError> {
        self.sets
            .iter()
            .find(|s| s.dashboard == dashboard)
            .ok_or_else(|| ConfigurationError::UnknownDashboard(dashboard.to_string()))
    }

    /// Look up by canonical type name (`afterSales`) or route slug (`after-sales`)
    pub fn resolve(&self, name: &str) -> Result<&DashboardQuerySet, ConfigurationError> {
        if let Ok(kind) = name.parse::<DashboardType>() {
            return self.get(kind);
        }
        self.sets
            .iter()
            .find(|s| s.route == name)
            .ok_or_else(|| ConfigurationError::UnknownDashboard(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DashboardQuerySet> {
        self.sets.iter()
    }
}

fn invalid(message: String) -> ConfigurationError {
    ConfigurationError::InvalidCatalog(message)
}

fn build_query_set(config: DashboardConfig) -> Result<DashboardQuerySet, ConfigurationError> {
    let kind = config.kind;

    if config.charts.len() != CHARTS_PER_DASHBOARD {
        return Err(invalid(format!(
            "{} declares {} charts, expected {}",
            kind,
            config.charts.len(),
            CHARTS_PER_DASHBOARD
        )));
    }

    let mut routes: HashSet<&str> = RESERVED_ROUTES.into_iter().collect();
    for route in config
        .charts
        .iter()
        .map(|c| c.route.as_str())
        .chain(std::iter::once(config.table.route.as_str()))
    {
        if !routes.insert(route) {
            return Err(invalid(format!("{} reuses route '{}'", kind, route)));
        }
    }

    let charts = config
        .charts
        .iter()
        .map(|c| build_chart_slot(kind, c))
        .collect::<Result<Vec<_>, _>>()?;
    let table = build_table_spec(kind, config.table)?;

    Ok(DashboardQuerySet {
        dashboard: kind,
        kpis: QuerySpec::new(
            format!("{}.kpis", kind),
            QuerySource::Kpis { dashboard: kind },
        ),
        route: config.route,
        title: config.title,
        description: config.description,
        charts,
        table,
    })
}

fn build_chart_slot(kind: DashboardType, config: &ChartConfig) -> Result<ChartSlot, ConfigurationError> {
    let chart_type = config
        .chart_type
        .parse::<ChartKind>()
        .map_err(|e| invalid(format!("{} chart '{}': {}", kind, config.name, e)))?;

    Ok(ChartSlot {
        route: config.route.clone(),
        name: config.name.clone(),
        chart_type,
        query: QuerySpec::new(
            format!("{}.{}", kind, config.route),
            QuerySource::Chart {
                dashboard: kind,
                chart_type: config.source_chart_type.clone(),
                name: config.source_name.clone(),
            },
        ),
    })
}

fn build_table_spec(kind: DashboardType, config: TableConfig) -> Result<TableSpec, ConfigurationError> {
    if config.columns.is_empty() {
        return Err(invalid(format!("{} table has no columns", kind)));
    }
    let mut headers = HashSet::new();
    for column in &config.columns {
        if !headers.insert(column.header.as_str()) {
            return Err(invalid(format!("{} table repeats header '{}'", kind, column.header)));
        }
    }

    Ok(TableSpec {
        query: QuerySpec::new(
            format!("{}.{}", kind, config.route),
            QuerySource::Table {
                table: config.source,
            },
        ),
        route: config.route,
        title: config.title,
        columns: config.columns,
    })
}

/// The catalog shipped in `config/dashboards.toml`
#[cfg(test)]
pub(crate) fn shipped_catalog() -> DashboardCatalog {
    let config: CatalogConfig = toml::from_str(include_str!("../../config/dashboards.toml"))
        .expect("shipped catalog parses");
    DashboardCatalog::from_config(config).expect("shipped catalog is valid")
}
