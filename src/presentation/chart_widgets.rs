// Chart panel dispatch for dashboard front-ends
use crate::domain::widgets::{ChartDatum, ChartKind, ChartPoint};
use serde::Deserialize;

/// Chart as it arrives over the wire, before its type is trusted
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireChart {
    pub name: String,
    pub chart_type: String,
    #[serde(default)]
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartWidget {
    Line(Vec<ChartPoint>),
    Pie(Vec<ChartPoint>),
    Bar(Vec<ChartPoint>),
    Area(Vec<ChartPoint>),
    /// Rendered as an explicit "Unsupported chart type" placeholder
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel {
    pub title: String,
    pub widget: ChartWidget,
    pub no_data: bool,
}

impl ChartPanel {
    pub fn dispatch(name: &str, chart_type: &str, points: Vec<ChartPoint>) -> Self {
        let no_data = points.is_empty();
        let widget = match chart_type.parse::<ChartKind>() {
            Ok(ChartKind::Line) => ChartWidget::Line(points),
            Ok(ChartKind::Pie) => ChartWidget::Pie(points),
            Ok(ChartKind::Bar) => ChartWidget::Bar(points),
            Ok(ChartKind::Area) => ChartWidget::Area(points),
            Err(_) => {
                tracing::debug!(chart = %name, chart_type = %chart_type, "Unsupported chart type");
                ChartWidget::Unsupported(chart_type.to_string())
            }
        };

        Self {
            title: name.to_string(),
            widget,
            no_data,
        }
    }

    pub fn from_wire(chart: WireChart) -> Self {
        Self::dispatch(&chart.name, &chart.chart_type, chart.points)
    }

    pub fn from_datum(chart: &ChartDatum) -> Self {
        Self::dispatch(&chart.name, chart.chart_type.as_str(), chart.points.clone())
    }
}
