// Application layer - Use cases and the ports they depend on
pub mod catalog;
pub mod dashboard_service;
pub mod error;
pub mod query_executor;
pub mod shaper;
