// Dashboard service - Use case for building dashboard views
use crate::application::catalog::{ChartSlot, DashboardCatalog, DashboardQuerySet, Resource, TableSpec};
use crate::application::error::{DashboardError, DataAccessError};
use crate::application::query_executor::{QueryExecutor, QuerySpec};
use crate::application::shaper::{shape_chart, shape_kpis, shape_table};
use crate::domain::dashboard::DashboardView;
use crate::domain::filters::FilterSet;
use crate::domain::widgets::{ChartDatum, KpiDatum, TableDatum};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;

/// Result of reading one addressable resource of a dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourceData {
    Kpis(Vec<KpiDatum>),
    Chart(ChartDatum),
    Table(TableDatum),
}

/// How a chart slot of the aggregated view was filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartOutcome {
    Data,
    Empty,
    Failed,
}

impl ChartOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartOutcome::Data => "data",
            ChartOutcome::Empty => "empty",
            ChartOutcome::Failed => "failed",
        }
    }
}

#[derive(Clone)]
pub struct DashboardService {
    executor: Arc<dyn QueryExecutor>,
    catalog: Arc<DashboardCatalog>,
}

impl DashboardService {
    pub fn new(executor: Arc<dyn QueryExecutor>, catalog: Arc<DashboardCatalog>) -> Self {
        Self { executor, catalog }
    }

    pub fn catalog(&self) -> &DashboardCatalog {
        &self.catalog
    }

    /// Runs the KPI, chart and table queries of one dashboard concurrently.
    ///
    /// Chart slots that fail or come back empty are replaced by placeholders.
    /// A KPI or table failure fails the whole view, KPI first.
    pub async fn build_view(
        &self,
        dashboard: &str,
        filters: FilterSet,
    ) -> Result<DashboardView, DashboardError> {
        let set = self.catalog.resolve(dashboard)?;

        let (kpis, charts, table) = futures::join!(
            self.fetch_kpis(&set.kpis, &filters),
            join_all(set.charts.iter().map(|slot| self.fetch_chart_or_placeholder(slot, &filters))),
            self.fetch_table(&set.table, &filters),
        );
        let kpis = kpis?;
        let table = table?;
        let charts: Vec<ChartDatum> = charts.into_iter().map(|(chart, _)| chart).collect();

        tracing::debug!(
            dashboard = %set.dashboard,
            month = filters.month,
            year = filters.year,
            kpis = kpis.len(),
            rows = table.rows.len(),
            "Built dashboard view"
        );

        Ok(DashboardView::new(
            set.title.clone(),
            set.description.clone(),
            kpis,
            charts,
            table,
        ))
    }

    /// Reads a single resource (`kpis`, a chart route or the table route).
    /// Unlike `build_view`, chart failures are reported, not replaced.
    pub async fn fetch_resource(
        &self,
        set: &DashboardQuerySet,
        resource: Resource<'_>,
        filters: FilterSet,
    ) -> Result<ResourceData, DataAccessError> {
        tracing::debug!(dashboard = %set.dashboard, month = filters.month, year = filters.year, "Fetching resource");
        match resource {
            Resource::Kpis(query) => self.fetch_kpis(query, &filters).await.map(ResourceData::Kpis),
            Resource::Chart(slot) => self.fetch_chart(slot, &filters).await.map(ResourceData::Chart),
            Resource::Table(spec) => self.fetch_table(spec, &filters).await.map(ResourceData::Table),
        }
    }

    async fn fetch_kpis(
        &self,
        query: &QuerySpec,
        filters: &FilterSet,
    ) -> Result<Vec<KpiDatum>, DataAccessError> {
        match self.executor.execute(query, filters).await {
            Ok(rows) => Ok(shape_kpis(&rows)),
            Err(e) => {
                tracing::error!(query = %query.id, error = %e, "KPI query failed");
                Err(e)
            }
        }
    }

    async fn fetch_chart(
        &self,
        slot: &ChartSlot,
        filters: &FilterSet,
    ) -> Result<ChartDatum, DataAccessError> {
        let rows = self.executor.execute(&slot.query, filters).await?;
        Ok(shape_chart(&rows, &slot.name, slot.chart_type))
    }

    async fn fetch_chart_or_placeholder(
        &self,
        slot: &ChartSlot,
        filters: &FilterSet,
    ) -> (ChartDatum, ChartOutcome) {
        match self.fetch_chart(slot, filters).await {
            Ok(chart) if chart.has_data() => (chart, ChartOutcome::Data),
            Ok(_) => {
                let outcome = ChartOutcome::Empty;
                tracing::info!(query = %slot.query.id, outcome = outcome.as_str(), "Chart query returned no rows");
                (ChartDatum::placeholder(&slot.name, slot.chart_type), outcome)
            }
            Err(e) => {
                let outcome = ChartOutcome::Failed;
                tracing::warn!(query = %slot.query.id, outcome = outcome.as_str(), error = %e, "Chart query failed, using placeholder");
                (ChartDatum::placeholder(&slot.name, slot.chart_type), outcome)
            }
        }
    }

    async fn fetch_table(
        &self,
        spec: &TableSpec,
        filters: &FilterSet,
    ) -> Result<TableDatum, DataAccessError> {
        match self.executor.execute(&spec.query, filters).await {
            Ok(rows) => Ok(shape_table(&rows, spec)),
            Err(e) => {
                tracing::error!(query = %spec.query.id, error = %e, "Table query failed");
                Err(e)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeExecutor, chart_rows, kpi_rows};
    use super::*;
    use crate::application::catalog::{CHARTS_PER_DASHBOARD, shipped_catalog};
    use crate::application::error::ConfigurationError;
    use crate::application::query_executor::Row;
    use crate::domain::dashboard::DashboardType;
    use crate::domain::widgets::ChartKind;
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::Barrier;

    fn build_service(executor: FakeExecutor) -> (DashboardService, Arc<FakeExecutor>) {
        let executor = Arc::new(executor);
        let service = DashboardService::new(executor.clone(), Arc::new(shipped_catalog()));
        (service, executor)
    }

    #[tokio::test]
    async fn test_fleet_view_with_empty_maintenance_chart() {
        let (service, _) = build_service(
            FakeExecutor::default()
                .with_rows("fleet.kpis", kpi_rows())
                .with_rows("fleet.utilization-chart", chart_rows(6))
                .with_rows("fleet.vehicle-types-chart", chart_rows(3)),
        );

        let view = service.build_view("fleet", FilterSet::new(6, 2024)).await.unwrap();

        assert_eq!(view.title, "Fleet Dashboard");
        assert_eq!(view.kpis.len(), 2);
        assert_eq!(view.charts.len(), CHARTS_PER_DASHBOARD);
        assert_eq!(view.charts[0].points.len(), 6);
        assert_eq!(view.charts[2].points.len(), 0);
        assert_eq!(view.charts[2].name, "Maintenance Costs vs Target");
        assert_eq!(view.charts[2].chart_type, ChartKind::Bar);
        assert!(view.table.rows.is_empty());
        assert_eq!(view.table.headers.len(), 5);
    }

    #[tokio::test]
    async fn test_every_dashboard_keeps_four_charts_in_catalog_order() {
        for dashboard in ["fleet", "sales", "afterSales", "after-sales"] {
            let (service, _) = build_service(FakeExecutor::default());
            let view = service.build_view(dashboard, FilterSet::new(1, 2025)).await.unwrap();
            let set = service.catalog().resolve(dashboard).unwrap();
            let expected: Vec<_> = set.charts.iter().map(|c| (c.name.clone(), c.chart_type)).collect();
            let actual: Vec<_> = view.charts.iter().map(|c| (c.name.clone(), c.chart_type)).collect();
            assert_eq!(actual, expected);
            assert!(view.charts.iter().all(|c| c.points.is_empty()));
        }
    }

    #[tokio::test]
    async fn test_failed_chart_degrades_to_placeholder() {
        let (service, _) = build_service(
            FakeExecutor::default()
                .with_rows("sales.growth-chart", chart_rows(12))
                .failing("sales.product-chart"),
        );

        let view = service.build_view("sales", FilterSet::new(3, 2024)).await.unwrap();
        assert_eq!(view.charts[0].points.len(), 12);
        assert_eq!(
            view.charts[1],
            ChartDatum::placeholder("Client Type Distribution", ChartKind::Pie)
        );
    }

    #[tokio::test]
    async fn test_empty_and_failed_charts_are_told_apart() {
        let (service, _) = build_service(
            FakeExecutor::default()
                .with_rows("fleet.utilization-chart", chart_rows(2))
                .failing("fleet.regional-chart"),
        );
        let set = service.catalog().get(DashboardType::Fleet).unwrap();
        let filters = FilterSet::new(6, 2024);

        let mut outcomes = Vec::new();
        for slot in &set.charts {
            let (chart, outcome) = service.fetch_chart_or_placeholder(slot, &filters).await;
            assert_eq!(chart.name, slot.name);
            outcomes.push(outcome);
        }
        assert_eq!(
            outcomes,
            vec![
                ChartOutcome::Data,
                ChartOutcome::Empty,
                ChartOutcome::Empty,
                ChartOutcome::Failed,
            ]
        );
        assert_eq!(ChartOutcome::Empty.as_str(), "empty");
        assert_eq!(ChartOutcome::Failed.as_str(), "failed");
    }

    #[tokio::test]
    async fn test_chart_names_come_from_catalog_not_rows() {
        let (service, _) = build_service(FakeExecutor::default().with_rows(
            "afterSales.revenue-chart",
            vec![json!({"name": "Resolution Time by Agent", "chart_type": "bar", "data_point_name": "Agent A", "data_point_value": 3, "additional_value": 4})],
        ));

        let view = service.build_view("afterSales", FilterSet::new(6, 2024)).await.unwrap();
        assert_eq!(view.charts[0].name, "Revenue Trend vs Target");
        assert_eq!(view.charts[0].chart_type, ChartKind::Line);
        assert_eq!(view.charts[0].points[0].secondary_value, Some(4.0));
    }

    #[tokio::test]
    async fn test_kpi_failure_fails_view() {
        let (service, _) = build_service(
            FakeExecutor::default()
                .failing("fleet.kpis")
                .with_rows("fleet.utilization-chart", chart_rows(2)),
        );

        let err = service.build_view("fleet", FilterSet::new(6, 2024)).await.unwrap_err();
        match err {
            DashboardError::DataAccess(e) => assert_eq!(e.query_id, "fleet.kpis"),
            other => panic!("expected data access error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_table_failure_fails_view() {
        let (service, _) = build_service(FakeExecutor::default().failing("afterSales.tickets-table"));

        let err = service.build_view("after-sales", FilterSet::new(6, 2024)).await.unwrap_err();
        assert!(matches!(
            err,
            DashboardError::DataAccess(ref e) if e.query_id == "afterSales.tickets-table"
        ));
    }

    #[tokio::test]
    async fn test_kpi_error_reported_before_table_error() {
        let (service, _) = build_service(
            FakeExecutor::default()
                .failing("sales.sales-rep-table")
                .failing("sales.kpis"),
        );

        let err = service.build_view("sales", FilterSet::new(6, 2024)).await.unwrap_err();
        assert!(matches!(err, DashboardError::DataAccess(ref e) if e.query_id == "sales.kpis"));
    }

    #[tokio::test]
    async fn test_unknown_dashboard_is_configuration_error() {
        for filters in [FilterSet::new(6, 2024), FilterSet::new(0, -1)] {
            let (service, executor) = build_service(FakeExecutor::default());
            let err = service.build_view("marketing", filters).await.unwrap_err();
            assert!(matches!(
                err,
                DashboardError::Configuration(ConfigurationError::UnknownDashboard(_))
            ));
            assert!(executor.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn test_issues_all_six_queries_with_filters() {
        let (service, executor) = build_service(FakeExecutor::default());
        let filters = FilterSet::new(13, 2024);
        service.build_view("fleet", filters).await.unwrap();

        let calls = executor.calls();
        assert_eq!(calls.len(), 6);
        assert!(calls.iter().all(|(_, f)| *f == filters));
        let mut ids: Vec<_> = calls.into_iter().map(|(id, _)| id).collect();
        ids.sort();
        assert_eq!(
            ids,
            vec![
                "fleet.kpis",
                "fleet.maintenance-chart",
                "fleet.regional-chart",
                "fleet.utilization-chart",
                "fleet.vehicle-table",
                "fleet.vehicle-types-chart",
            ]
        );
    }

    /// Every query waits until all six are in flight
    struct BarrierExecutor {
        barrier: Barrier,
    }

    #[async_trait]
    impl QueryExecutor for BarrierExecutor {
        async fn execute(
            &self,
            _query: &QuerySpec,
            _filters: &FilterSet,
        ) -> Result<Vec<Row>, DataAccessError> {
            self.barrier.wait().await;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_view_queries_run_concurrently() {
        let executor = Arc::new(BarrierExecutor {
            barrier: Barrier::new(2 + CHARTS_PER_DASHBOARD),
        });
        let service = DashboardService::new(executor, Arc::new(shipped_catalog()));

        let view = tokio::time::timeout(
            Duration::from_secs(2),
            service.build_view("afterSales", FilterSet::new(6, 2024)),
        )
        .await
        .expect("all queries in flight together")
        .unwrap();
        assert_eq!(view.charts.len(), CHARTS_PER_DASHBOARD);
    }

    #[tokio::test]
    async fn test_build_view_is_idempotent() {
        let (service, _) = build_service(
            FakeExecutor::default()
                .with_rows("sales.kpis", kpi_rows())
                .with_rows("sales.region-chart", chart_rows(4))
                .with_rows(
                    "sales.sales-rep-table",
                    vec![json!({"name": "Asha", "deals_closed": 12, "revenue": 410000, "mom_growth": "5%", "target_achievement": 92})],
                ),
        );
        let filters = FilterSet::new(6, 2024);
        let first = service.build_view("sales", filters).await.unwrap();
        let second = service.build_view("sales", filters).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fetch_resource_reports_chart_failure() {
        let (service, _) = build_service(FakeExecutor::default().failing("fleet.regional-chart"));
        let catalog = service.catalog().clone();
        let set = catalog.resolve("fleet").unwrap();

        let chart = set.resource("regional-chart").unwrap();
        let err = service.fetch_resource(set, chart, FilterSet::new(6, 2024)).await.unwrap_err();
        assert_eq!(err.query_id, "fleet.regional-chart");

        let empty = set.resource("maintenance-chart").unwrap();
        let data = service.fetch_resource(set, empty, FilterSet::new(6, 2024)).await.unwrap();
        assert_eq!(
            data,
            ResourceData::Chart(ChartDatum::placeholder("Maintenance Costs vs Target", ChartKind::Bar))
        );
    }
}
