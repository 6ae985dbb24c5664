//! Eased transform animation.
//!
//! Every animated transition between frame states uses the same fixed
//! duration and easing. Each started animation gets a unique
//! [`TweenHandle`] so its completion can be matched to exactly the
//! transition that started it; inserting a new [`TransformTween`] on an
//! entity replaces the previous one, and the superseded handle simply
//! never fires.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Duration of every animated transition, in seconds.
pub const TRANSITION_DURATION: f32 = 0.5;

/// Easing curves for animated transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl Easing {
    /// Applies the easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// Identifier of one started animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenHandle(pub u64);

/// The animatable subset of a frame's transform: translation, scale and a
/// single rotation angle about the anchor-local Y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenTransform {
    pub translation: Vec3,
    pub scale: Vec3,
    pub angle: f32,
}

impl TweenTransform {
    pub fn new(translation: Vec3, scale: Vec3, angle: f32) -> Self {
        Self {
            translation,
            scale,
            angle,
        }
    }

    /// Samples the current visual state of an entity.
    pub fn from_transform(transform: &Transform) -> Self {
        let (axis, angle) = transform.rotation.to_axis_angle();
        // The rotation axis is ±Y; fold the axis sign into the angle.
        let angle = if axis.y < 0.0 { -angle } else { angle };
        Self {
            translation: transform.translation,
            scale: transform.scale,
            angle,
        }
    }

    /// The full transform this state describes.
    pub fn to_transform(&self) -> Transform {
        Transform {
            translation: self.translation,
            rotation: Quat::from_rotation_y(self.angle),
            scale: self.scale,
        }
    }

    /// Linear interpolation between two states.
    pub fn lerp(start: &Self, end: &Self, t: f32) -> Self {
        Self {
            translation: start.translation.lerp(end.translation, t),
            scale: start.scale.lerp(end.scale, t),
            angle: start.angle + (end.angle - start.angle) * t,
        }
    }
}

/// An in-flight animated transition on a frame entity.
#[derive(Component, Debug, Clone)]
pub struct TransformTween {
    pub handle: TweenHandle,
    pub start: TweenTransform,
    pub end: TweenTransform,
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
}

impl TransformTween {
    /// A standard transition: fixed duration, ease-in-out.
    pub fn new(handle: TweenHandle, start: TweenTransform, end: TweenTransform) -> Self {
        Self {
            handle,
            start,
            end,
            duration: TRANSITION_DURATION,
            elapsed: 0.0,
            easing: Easing::EaseInOut,
        }
    }

    /// The interpolated state at the current elapsed time.
    pub fn sample(&self) -> TweenTransform {
        let t = if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        TweenTransform::lerp(&self.start, &self.end, self.easing.apply(t))
    }

    /// Returns true once the animation has run its full duration.
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}
