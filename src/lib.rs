//! Library exports for the desktop app and integration tests.
/// Application directory resolution.
pub mod app_dirs;
/// Inference endpoint configuration.
pub mod config;
/// Shared egui UI modules.
pub mod egui_app;
/// Shared HTTP agent helpers.
pub mod http_client;
/// Detection service client.
pub mod inference;
/// File and console logging setup.
pub mod logging;
/// Upload-and-analyze workflow.
pub mod workflow;
