//! ECS resources: the command queue, the frame registry, the selection
//! state and wrappers around the pure domain types.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;

use bevy::prelude::*;
use parking_lot::Mutex;

use crate::geometry::DisplayMetrics;
use crate::image_store::{FrameImage, ImageStore};
use crate::ledger::TransformLedger;
use crate::surface::{SurfaceTracker, ViewGeometry};
use crate::tween::TweenHandle;

/// User-intent commands pushed by UI collaborators.
#[derive(Debug, Clone)]
pub enum FrameCommand {
    /// Place one frame pinned at the screen center.
    AddFrame { image: FrameImage },
    /// Place up to four frames at the template slot centers.
    AddFrames { images: Vec<FrameImage> },
    /// Remove every anchor (and therefore every frame) from the scene.
    RemoveAllAnchors,
    /// Spawn corner markers for the template slots.
    ConvertImageToWorldSpace,
    /// Deselect the currently selected frame.
    Deselect,
    /// Uniform scale for the selected frame (0.1–5.0; clamped).
    Scale { factor: f32 },
    /// Rotation for the selected frame in degrees (-360–360; clamped).
    Rotate { degrees: f32 },
    /// Enable or disable the hanging preview tint.
    HangFrames { hanging: bool },
}

/// Thread-safe FIFO command queue.
///
/// UI collaborators push commands from their own context; the scene drains
/// the queue once per frame, preserving producer order.
#[derive(Resource, Clone)]
pub struct CommandQueue {
    inner: Arc<Mutex<VecDeque<FrameCommand>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Push a command to be processed.
    pub fn push(&self, command: FrameCommand) {
        self.inner.lock().push_back(command);
    }

    /// Drain all pending commands in FIFO order.
    pub fn drain(&self) -> Vec<FrameCommand> {
        self.inner.lock().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the set of placed frames: the live entity list, the id→entity map
/// and the id→image-path association.
#[derive(Resource, Debug, Default)]
pub struct FrameRegistry {
    frames: Vec<Entity>,
    by_id: HashMap<String, Entity>,
    images: HashMap<String, PathBuf>,
}

impl FrameRegistry {
    pub fn register(&mut self, id: String, entity: Entity, image_path: PathBuf) {
        self.frames.push(entity);
        self.by_id.insert(id.clone(), entity);
        self.images.insert(id, image_path);
    }

    pub fn entity_of(&self, id: &str) -> Option<Entity> {
        self.by_id.get(id).copied()
    }

    pub fn image_of(&self, id: &str) -> Option<&PathBuf> {
        self.images.get(id)
    }

    /// Live frame entities in placement order.
    pub fn frames(&self) -> &[Entity] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.by_id.clear();
        self.images.clear();
    }
}

/// The single active selection.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// No frame selected.
    #[default]
    Idle,
    /// One frame selected; the modal is visible and sliders are live.
    Selected { id: String },
    /// Selection handoff: `from` is animating back to the wall, `to` is
    /// already lifted. Lasts until exactly `pending` completes; slider
    /// commands are ignored meanwhile.
    Switching {
        from: String,
        to: String,
        pending: TweenHandle,
    },
}

impl SelectionState {
    /// The frame the user currently interacts with: the selection, or the
    /// incoming frame of a handoff.
    pub fn active_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Selected { id } => Some(id),
            Self::Switching { to, .. } => Some(to),
        }
    }

    /// The stably selected frame, if any. `None` during a handoff.
    pub fn selected_id(&self) -> Option<&str> {
        match self {
            Self::Selected { id } => Some(id),
            _ => None,
        }
    }

    pub fn is_switching(&self) -> bool {
        matches!(self, Self::Switching { .. })
    }
}

/// Allocates unique animation handles.
#[derive(Resource, Debug, Default)]
pub struct TweenHandles {
    next: u64,
}

impl TweenHandles {
    pub fn allocate(&mut self) -> TweenHandle {
        let handle = TweenHandle(self.next);
        self.next += 1;
        handle
    }
}

/// Current hanging-preview state. Reapplying the same value is a no-op at
/// the material level (the tint is a pure function of this flag).
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct HangPreview {
    pub hanging: bool,
}

/// The detected vertical surfaces.
#[derive(Resource, Debug, Default)]
pub struct SurfaceTrackerRes(pub SurfaceTracker);

/// The view used for screen-ray conversion.
#[derive(Resource, Debug, Default)]
pub struct ViewGeometryRes(pub ViewGeometry);

/// The display the scene is viewed on.
#[derive(Resource, Debug, Default)]
pub struct DisplayMetricsRes(pub DisplayMetrics);

/// The per-frame transform ledger.
#[derive(Resource, Debug, Default)]
pub struct TransformLedgerRes(pub TransformLedger);

/// The on-disk image store.
#[derive(Resource, Debug, Clone)]
pub struct ImageStoreRes(pub ImageStore);
