//! Shared state types for the egui UI.

use crate::egui_app::ui::style::{self, StatusTone};
use egui::Color32;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub status: StatusBarState,
    pub preview: PreviewState,
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    /// Main status message text.
    pub text: String,
    /// Badge label shown next to the status.
    pub badge_label: String,
    /// Badge color.
    pub badge_color: Color32,
    pub tone: StatusTone,
}

impl StatusBarState {
    /// Default status shown when nothing is selected.
    pub fn idle() -> Self {
        let (badge_label, badge_color) = style::status_badge(StatusTone::Idle);
        Self {
            text: "Drop an MRI image to get started".into(),
            badge_label: badge_label.into(),
            badge_color,
            tone: StatusTone::Idle,
        }
    }
}

impl Default for StatusBarState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Decoded preview of the selected image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreviewState {
    /// Generation of the selection the preview belongs to.
    pub generation: Option<u64>,
    pub loading: bool,
    pub image: Option<PreviewImage>,
    /// Set when the image could not be decoded.
    pub error: Option<String>,
}

impl PreviewState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// RGBA pixels ready to be uploaded as a texture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}
