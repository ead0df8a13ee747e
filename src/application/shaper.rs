// Response shaping - raw rows into KPI, chart and table payloads
//
// All functions here are total over well-formed rows: missing or oddly
// typed fields fall back to defaults instead of failing.
use crate::application::catalog::{ColumnRule, MissingValue, TableSpec};
use crate::application::query_executor::Row;
use crate::domain::widgets::{
    ChartDatum, ChartKind, ChartPoint, KpiDatum, MetricValue, TableDatum, TableRow, Trend,
};
use serde_json::Value;

const DEFAULT_KPI_ICON: &str = "Activity";

pub fn shape_kpis(rows: &[Row]) -> Vec<KpiDatum> {
    rows.iter().map(shape_kpi).collect()
}

fn shape_kpi(row: &Row) -> KpiDatum {
    let value = metric(row, "value");
    let previous_value = metric(row, "previous_value");
    let trend = match text(row, "trend").to_ascii_lowercase().as_str() {
        "up" => Trend::Up,
        "down" => Trend::Down,
        _ => derive_trend(&value, &previous_value),
    };
    let icon = match text(row, "icon") {
        icon if icon.is_empty() => DEFAULT_KPI_ICON.to_string(),
        icon => icon,
    };

    KpiDatum {
        title: text(row, "title"),
        value,
        previous_value,
        trend,
        trend_value: text(row, "trend_value"),
        icon,
    }
}

fn derive_trend(value: &MetricValue, previous: &MetricValue) -> Trend {
    match (value.as_f64(), previous.as_f64()) {
        (Some(current), Some(previous)) if current < previous => Trend::Down,
        _ => Trend::Up,
    }
}

/// The declared name and type always win over anything embedded in the rows
pub fn shape_chart(rows: &[Row], name: &str, chart_type: ChartKind) -> ChartDatum {
    let points = rows
        .iter()
        .map(|row| ChartPoint {
            label: text(row, "data_point_name"),
            value: number(row, "data_point_value").unwrap_or(0.0),
            secondary_value: number(row, "additional_value"),
            color: Some(text(row, "color")).filter(|c| !c.is_empty()),
        })
        .collect();

    ChartDatum::new(name.to_string(), chart_type, points)
}

/// Every shaped row carries exactly the table's headers, in header order
pub fn shape_table(rows: &[Row], spec: &TableSpec) -> TableDatum {
    let shaped = rows
        .iter()
        .map(|row| {
            spec.columns
                .iter()
                .map(|rule| (rule.header.clone(), shape_cell(row, rule)))
                .collect::<TableRow>()
        })
        .collect();

    TableDatum::new(spec.title.clone(), spec.headers(), shaped)
}

fn shape_cell(row: &Row, rule: &ColumnRule) -> Value {
    match row.get(&rule.column).filter(|v| !v.is_null()) {
        Some(value) => match &rule.suffix {
            Some(suffix) => Value::String(format!("{}{}", display(value), suffix)),
            None => value.clone(),
        },
        None => match rule.missing {
            MissingValue::Null => Value::Null,
            MissingValue::Zero => Value::from(0),
            MissingValue::Blank => Value::String(String::new()),
        },
    }
}

fn metric(row: &Row, key: &str) -> MetricValue {
    match row.get(key) {
        Some(Value::Number(n)) => MetricValue::Number(n.as_f64().unwrap_or(0.0)),
        Some(Value::String(s)) => MetricValue::Text(s.clone()),
        _ => MetricValue::default(),
    }
}

fn number(row: &Row, key: &str) -> Option<f64> {
    match row.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text(row: &Row, key: &str) -> String {
    match row.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(value) => display(value),
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            // DECIMAL columns arrive as floats; print 4.0 as "4"
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}
