// Dashboard domain model
use super::widgets::{ChartDatum, KpiDatum, TableDatum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DashboardType {
    #[serde(rename = "fleet")]
    Fleet,
    #[serde(rename = "sales")]
    Sales,
    #[serde(rename = "afterSales")]
    AfterSales,
}

impl DashboardType {
    pub const ALL: [DashboardType; 3] = [
        DashboardType::Fleet,
        DashboardType::Sales,
        DashboardType::AfterSales,
    ];

    /// Discriminator stored in `kpi_metrics.dashboard_type` and `chart_data.dashboard_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardType::Fleet => "fleet",
            DashboardType::Sales => "sales",
            DashboardType::AfterSales => "afterSales",
        }
    }
}

impl fmt::Display for DashboardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DashboardType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DashboardType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub description: String,
    pub kpis: Vec<KpiDatum>,
    pub charts: Vec<ChartDatum>,
    pub table: TableDatum,
}

impl DashboardView {
    pub fn new(
        title: String,
        description: String,
        kpis: Vec<KpiDatum>,
        charts: Vec<ChartDatum>,
        table: TableDatum,
    ) -> Self {
        Self {
            title,
            description,
            kpis,
            charts,
            table,
        }
    }
}
