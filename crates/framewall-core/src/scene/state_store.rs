//! Shared state store for UI collaborators.
//!
//! The selection machine publishes its observable outputs here (modal
//! visibility, slider values, selected id, hang flag); UI code polls the
//! store and re-renders when the version counter moves. This replaces the
//! original design's global settings singleton with an explicit shared
//! object handed to whoever needs it.

use std::sync::Arc;

use bevy::prelude::Resource;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Snapshot of the selection UI state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSummary {
    /// Whether the entity modal is visible.
    pub modal_visible: bool,
    /// Identifier of the selected frame, if any.
    pub selected_id: Option<String>,
    /// Current slider scale factor.
    pub scale: f32,
    /// Current slider angle in degrees.
    pub angle_degrees: f32,
    /// Whether the hanging preview is active.
    pub hanging: bool,
}

impl Default for SelectionSummary {
    fn default() -> Self {
        Self {
            modal_visible: false,
            selected_id: None,
            scale: 1.0,
            angle_degrees: 0.0,
            hanging: false,
        }
    }
}

/// Store for the selection UI state.
#[derive(Debug, Default)]
pub struct SelectionStore {
    summary: RwLock<SelectionSummary>,
    version: RwLock<u64>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_summary(&self) -> SelectionSummary {
        self.summary.read().clone()
    }

    pub fn get_version(&self) -> u64 {
        *self.version.read()
    }

    /// Shows the modal for a frame with its current slider values.
    pub fn open_modal(&self, id: &str, scale: f32, angle_degrees: f32) {
        {
            let mut summary = self.summary.write();
            summary.modal_visible = true;
            summary.selected_id = Some(id.to_string());
            summary.scale = scale;
            summary.angle_degrees = angle_degrees;
        }
        *self.version.write() += 1;
    }

    /// Hides the modal and clears the selected id.
    pub fn close_modal(&self) {
        {
            let mut summary = self.summary.write();
            summary.modal_visible = false;
            summary.selected_id = None;
        }
        *self.version.write() += 1;
    }

    pub fn set_scale(&self, scale: f32) {
        self.summary.write().scale = scale;
        *self.version.write() += 1;
    }

    pub fn set_angle_degrees(&self, angle_degrees: f32) {
        self.summary.write().angle_degrees = angle_degrees;
        *self.version.write() += 1;
    }

    pub fn set_hanging(&self, hanging: bool) {
        self.summary.write().hanging = hanging;
        *self.version.write() += 1;
    }
}

/// All state stores combined for easy sharing.
#[derive(Debug, Clone, Resource)]
pub struct StateStores {
    pub selection: Arc<SelectionStore>,
}

impl StateStores {
    pub fn new() -> Self {
        Self {
            selection: Arc::new(SelectionStore::new()),
        }
    }
}

impl Default for StateStores {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_close_modal() {
        let store = SelectionStore::new();
        let before = store.get_version();

        store.open_modal("f1", 1.5, -45.0);
        let summary = store.get_summary();
        assert!(summary.modal_visible);
        assert_eq!(summary.selected_id.as_deref(), Some("f1"));
        assert_eq!(summary.scale, 1.5);
        assert_eq!(summary.angle_degrees, -45.0);
        assert!(store.get_version() > before);

        store.close_modal();
        let summary = store.get_summary();
        assert!(!summary.modal_visible);
        assert_eq!(summary.selected_id, None);
        // Slider values are left in place for the next open.
        assert_eq!(summary.scale, 1.5);
    }

    #[test]
    fn test_summary_serializes_for_ui() {
        let store = SelectionStore::new();
        store.open_modal("f1", 2.0, 90.0);

        let json = serde_json::to_string(&store.get_summary()).unwrap();
        let parsed: SelectionSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, store.get_summary());
        assert!(json.contains("\"selected_id\":\"f1\""));
    }
}
