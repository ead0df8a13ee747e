// BI dashboard service: parameterized read queries aggregated into
// fleet, sales and after-sales dashboard views
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
