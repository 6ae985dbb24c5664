//! ECS messages connecting command dispatch, placement, selection and
//! animation.

use bevy::prelude::*;

use crate::image_store::FrameImage;
use crate::tween::TweenHandle;

/// A resolved screen tap from the input layer.
#[derive(Message, Debug, Clone)]
pub struct TapEvent {
    /// Tap location in display points.
    pub screen_point: Vec2,
}

/// Request to place one frame pinned at a screen point.
#[derive(Message, Debug, Clone)]
pub struct PlaceFrameEvent {
    pub image: FrameImage,
    /// Pin location in display points.
    pub pin: Vec2,
}

/// Request to spawn the template corner markers.
#[derive(Message, Debug, Clone, Default)]
pub struct ConvertImageEvent;

/// Request to remove every anchor and frame from the scene.
#[derive(Message, Debug, Clone, Default)]
pub struct ClearFramesEvent;

/// Request to deselect the current frame (modal dismissed).
#[derive(Message, Debug, Clone, Default)]
pub struct DeselectEvent;

/// Slider-driven uniform scale for the selected frame.
#[derive(Message, Debug, Clone)]
pub struct ScaleCommandEvent {
    pub factor: f32,
}

/// Slider-driven rotation for the selected frame, in degrees.
#[derive(Message, Debug, Clone)]
pub struct RotateCommandEvent {
    pub degrees: f32,
}

/// Request to toggle the hanging preview tint.
#[derive(Message, Debug, Clone)]
pub struct HangPreviewEvent {
    pub hanging: bool,
}

/// Fired when a frame has been placed and anchored.
#[derive(Message, Debug, Clone)]
pub struct FramePlacedEvent {
    pub entity: Entity,
    pub id: String,
}

/// Fired when an animated transition has run its full duration.
///
/// Carries the exact handle of the finished animation so the selection
/// machine can await the completion it issued and ignore stale ones.
#[derive(Message, Debug, Clone)]
pub struct TweenFinishedEvent {
    pub entity: Entity,
    pub handle: TweenHandle,
}
