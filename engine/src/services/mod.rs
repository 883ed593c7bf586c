// Services that tie the data source to the normalization pipeline.
pub mod dashboard_service;

pub use dashboard_service::DashboardService;
