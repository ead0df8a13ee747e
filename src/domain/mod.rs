// Domain layer - Plain data models shared by every other layer
pub mod dashboard;
pub mod filters;
pub mod widgets;
