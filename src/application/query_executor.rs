// Query executor trait and the pre-bound query definitions it runs
use crate::application::error::DataAccessError;
use crate::domain::dashboard::DashboardType;
use crate::domain::filters::FilterSet;
use async_trait::async_trait;
use serde::Deserialize;

/// One result row, column name to decoded value, in column order
pub type Row = serde_json::Map<String, serde_json::Value>;

const KPI_STATEMENT: &str = "SELECT * FROM kpi_metrics \
     WHERE dashboard_type = $1 AND month = $2 AND year = $3 \
     ORDER BY id";

const CHART_STATEMENT: &str = "SELECT * FROM chart_data \
     WHERE dashboard_type = $1 AND chart_type = $2 AND name = $3 AND month = $4 AND year = $5 \
     ORDER BY id";

const FLEET_VEHICLES_STATEMENT: &str =
    "SELECT * FROM fleet_vehicles WHERE month = $1 AND year = $2";
const SALES_REPRESENTATIVES_STATEMENT: &str =
    "SELECT * FROM sales_representatives WHERE month = $1 AND year = $2";
const SERVICE_TICKETS_STATEMENT: &str =
    "SELECT * FROM service_tickets WHERE month = $1 AND year = $2";

/// Entity tables backing the per-dashboard tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityTable {
    FleetVehicles,
    SalesRepresentatives,
    ServiceTickets,
}

impl EntityTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityTable::FleetVehicles => "fleet_vehicles",
            EntityTable::SalesRepresentatives => "sales_representatives",
            EntityTable::ServiceTickets => "service_tickets",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    Kpis {
        dashboard: DashboardType,
    },
    Chart {
        dashboard: DashboardType,
        chart_type: String,
        name: String,
    },
    Table {
        table: EntityTable,
    },
}

/// A bind parameter. Filter values only ever reach the store this way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    Text(String),
    Int(i32),
}

/// A fixed statement plus its filter-independent discriminators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub id: String,
    pub source: QuerySource,
}

impl QuerySpec {
    pub fn new(id: impl Into<String>, source: QuerySource) -> Self {
        Self {
            id: id.into(),
            source,
        }
    }

    pub fn statement(&self) -> &'static str {
        match &self.source {
            QuerySource::Kpis { .. } => KPI_STATEMENT,
            QuerySource::Chart { .. } => CHART_STATEMENT,
            QuerySource::Table { table } => match table {
                EntityTable::FleetVehicles => FLEET_VEHICLES_STATEMENT,
                EntityTable::SalesRepresentatives => SALES_REPRESENTATIVES_STATEMENT,
                EntityTable::ServiceTickets => SERVICE_TICKETS_STATEMENT,
            },
        }
    }

    /// Parameters in placeholder order (`$1`, `$2`, ...)
    pub fn params(&self, filters: &FilterSet) -> Vec<QueryParam> {
        let mut params = match &self.source {
            QuerySource::Kpis { dashboard } => {
                vec![QueryParam::Text(dashboard.as_str().to_string())]
            }
            QuerySource::Chart {
                dashboard,
                chart_type,
                name,
            } => vec![
                QueryParam::Text(dashboard.as_str().to_string()),
                QueryParam::Text(chart_type.clone()),
                QueryParam::Text(name.clone()),
            ],
            QuerySource::Table { .. } => Vec::new(),
        };
        params.push(QueryParam::Int(filters.month));
        params.push(QueryParam::Int(filters.year));
        params
    }
}

#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run one read-only, parameterized query. Never retries.
    async fn execute(
        &self,
        query: &QuerySpec,
        filters: &FilterSet,
    ) -> Result<Vec<Row>, DataAccessError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder_count(statement: &str) -> usize {
        (1..=9)
            .filter(|n| statement.contains(&format!("${}", n)))
            .count()
    }

    #[test]
    fn test_chart_params_follow_placeholder_order() {
        let spec = QuerySpec::new(
            "fleet.maintenance-chart",
            QuerySource::Chart {
                dashboard: DashboardType::Fleet,
                chart_type: "line".to_string(),
                name: "Maintenance Costs".to_string(),
            },
        );
        let params = spec.params(&FilterSet::new(6, 2024));
        assert_eq!(
            params,
            vec![
                QueryParam::Text("fleet".to_string()),
                QueryParam::Text("line".to_string()),
                QueryParam::Text("Maintenance Costs".to_string()),
                QueryParam::Int(6),
                QueryParam::Int(2024),
            ]
        );
        assert_eq!(placeholder_count(spec.statement()), params.len());
    }

    #[test]
    fn test_filters_are_never_interpolated() {
        let filters = FilterSet::new(11, 2031);
        let specs = [
            QuerySpec::new(
                "sales.kpis",
                QuerySource::Kpis {
                    dashboard: DashboardType::Sales,
                },
            ),
            QuerySpec::new(
                "afterSales.tickets-table",
                QuerySource::Table {
                    table: EntityTable::ServiceTickets,
                },
            ),
        ];
        for spec in &specs {
            assert!(!spec.statement().contains("2031"));
            assert_eq!(placeholder_count(spec.statement()), spec.params(&filters).len());
        }
        assert!(specs[1].statement().contains("service_tickets"));
    }
}
