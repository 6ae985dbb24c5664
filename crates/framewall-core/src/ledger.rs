//! Per-frame transform ledger.
//!
//! Every frame that has been tapped at least once has a [`TransformRecord`]:
//! the transform captured at first selection (`orig_*`, write-once) and the
//! pending values mutated by interaction (`new_*`), which are the only
//! values ever fed into outgoing transform commands.

use std::collections::HashMap;

use bevy::math::Vec3;

/// Minimum accepted uniform scale factor.
pub const SCALE_MIN: f32 = 0.1;

/// Maximum accepted uniform scale factor.
pub const SCALE_MAX: f32 = 5.0;

/// Minimum accepted slider rotation in degrees.
pub const ANGLE_MIN_DEGREES: f32 = -360.0;

/// Maximum accepted slider rotation in degrees.
pub const ANGLE_MAX_DEGREES: f32 = 360.0;

/// Converts a slider angle in degrees to the stored radians.
///
/// The sign inversion makes clockwise-feeling slider motion match
/// real-world clockwise rotation of the frame on the wall.
pub fn slider_to_angle(degrees: f32) -> f32 {
    -degrees.to_radians()
}

/// Converts stored radians back to the slider's degrees.
pub fn angle_to_slider(radians: f32) -> f32 {
    -radians.to_degrees()
}

/// Original vs. pending transform values for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRecord {
    /// Translation captured at first selection. Write-once.
    pub orig_translate: Vec3,
    /// Scale captured at first selection. Write-once.
    pub orig_scale: Vec3,
    /// Pending translation, anchor-local.
    pub new_translate: Vec3,
    /// Pending scale.
    pub new_scale: Vec3,
    /// Pending rotation angle in radians, about the anchor-local Y axis.
    pub new_angle: f32,
    /// Uniform scale factor last applied, 1.0 until the user scales.
    pub scale: f32,
}

impl TransformRecord {
    fn captured(translation: Vec3, scale: Vec3, angle: f32) -> Self {
        Self {
            orig_translate: translation,
            orig_scale: scale,
            new_translate: translation,
            new_scale: scale,
            new_angle: angle,
            scale: 1.0,
        }
    }

    /// The slider's view of the pending angle, in degrees.
    pub fn slider_angle(&self) -> f32 {
        angle_to_slider(self.new_angle)
    }
}

/// The set of transform records, keyed by frame id.
#[derive(Debug, Clone, Default)]
pub struct TransformLedger {
    records: HashMap<String, TransformRecord>,
}

impl TransformLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record for `id` if none exists, capturing the given live
    /// transform as both the original and pending values.
    ///
    /// No-op when a record is already present: `orig_*` fields are never
    /// overwritten by a later call.
    pub fn ensure_record(
        &mut self,
        id: &str,
        translation: Vec3,
        scale: Vec3,
        angle: f32,
    ) -> &TransformRecord {
        self.records
            .entry(id.to_string())
            .or_insert_with(|| TransformRecord::captured(translation, scale, angle))
    }

    pub fn get(&self, id: &str) -> Option<&TransformRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Overwrites the pending X/Z translation from the frame's live
    /// position, capturing manual-drag displacement while selected.
    ///
    /// Y is intentionally untouched: it encodes the lifted-while-selected
    /// offset managed by the selection machine, not user drag.
    pub fn capture_drag(&mut self, id: &str, x: f32, z: f32) -> bool {
        let Some(record) = self.records.get_mut(id) else {
            return false;
        };
        record.new_translate.x = x;
        record.new_translate.z = z;
        true
    }

    /// Raises the pending Y to the resting height plus `offset`.
    pub fn lift(&mut self, id: &str, offset: f32) -> Option<Vec3> {
        let record = self.records.get_mut(id)?;
        record.new_translate.y = record.orig_translate.y + offset;
        Some(record.new_translate)
    }

    /// Restores the pending Y to the resting height.
    pub fn settle(&mut self, id: &str) -> Option<Vec3> {
        let record = self.records.get_mut(id)?;
        record.new_translate.y = record.orig_translate.y;
        Some(record.new_translate)
    }

    /// Applies a uniform scale factor: `new_scale = orig_scale * factor`.
    ///
    /// The factor is clamped to [`SCALE_MIN`]..=[`SCALE_MAX`]. Returns the
    /// resulting scale, or `None` when no record exists.
    pub fn apply_scale(&mut self, id: &str, factor: f32) -> Option<Vec3> {
        let record = self.records.get_mut(id)?;
        let factor = factor.clamp(SCALE_MIN, SCALE_MAX);
        record.scale = factor;
        record.new_scale = record.orig_scale * factor;
        Some(record.new_scale)
    }

    /// Applies a slider rotation in degrees, storing the sign-inverted
    /// radians. Degrees are clamped to
    /// [`ANGLE_MIN_DEGREES`]..=[`ANGLE_MAX_DEGREES`]. Returns the stored
    /// angle, or `None` when no record exists.
    pub fn apply_rotation(&mut self, id: &str, degrees: f32) -> Option<f32> {
        let record = self.records.get_mut(id)?;
        let degrees = degrees.clamp(ANGLE_MIN_DEGREES, ANGLE_MAX_DEGREES);
        record.new_angle = slider_to_angle(degrees);
        Some(record.new_angle)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
