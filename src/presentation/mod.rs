// Presentation layer - HTTP surface and front-end view models
pub mod app_state;
pub mod chart_widgets;
pub mod error;
pub mod handlers;
pub mod view_controller;
