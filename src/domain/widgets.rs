// Widget data models: KPI cards, charts and tables
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A KPI value as stored: either numeric or preformatted text ("₹4.2M")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl Default for MetricValue {
    fn default() -> Self {
        MetricValue::Number(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiDatum {
    pub title: String,
    pub value: MetricValue,
    pub previous_value: MetricValue,
    pub trend: Trend,
    pub trend_value: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Pie,
    Bar,
    Area,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Bar => "bar",
            ChartKind::Area => "area",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(ChartKind::Line),
            "pie" => Ok(ChartKind::Pie),
            "bar" => Ok(ChartKind::Bar),
            "area" => Ok(ChartKind::Area),
            other => Err(format!("unsupported chart type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDatum {
    pub name: String,
    pub chart_type: ChartKind,
    pub points: Vec<ChartPoint>,
}

impl ChartDatum {
    pub fn new(name: String, chart_type: ChartKind, points: Vec<ChartPoint>) -> Self {
        Self {
            name,
            chart_type,
            points,
        }
    }

    /// Placeholder used when a chart query fails or returns nothing
    pub fn placeholder(name: &str, chart_type: ChartKind) -> Self {
        Self::new(name.to_string(), chart_type, Vec::new())
    }

    pub fn has_data(&self) -> bool {
        !self.points.is_empty()
    }
}

pub type TableRow = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDatum {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl TableDatum {
    pub fn new(title: String, headers: Vec<String>, rows: Vec<TableRow>) -> Self {
        Self {
            title,
            headers,
            rows,
        }
    }
}
