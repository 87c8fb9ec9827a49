//! egui front end for the upload-and-analyze workflow.

/// Bridges the workflow to the egui renderer.
pub mod controller;
/// UI-facing state owned by the controller.
pub mod state;
/// egui renderer.
pub mod ui;
/// Pure conversions from workflow data into display structs.
pub mod view_model;
