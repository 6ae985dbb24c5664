//! Vertical-surface tracking and raycast placement.
//!
//! The scene runtime estimates vertical planes (walls) over time; a frame
//! is placed by casting a ray from a screen point and taking the nearest
//! intersection with any detected plane. Detection latency is expected:
//! a miss is a normal outcome, not an error.

use bevy::math::{Quat, Vec2, Vec3};
use bevy::transform::components::Transform;

/// A world-space pose on a wall.
///
/// The rotation maps local +Y onto the wall's outward normal, so a frame
/// parented at this pose lies flat on the wall and a positive local-Y
/// translation lifts it off the wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl WorldPose {
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// The anchor transform for this pose.
    pub fn to_transform(&self) -> Transform {
        Transform {
            translation: self.translation,
            rotation: self.rotation,
            ..Transform::IDENTITY
        }
    }
}

/// An estimated vertical plane with finite extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedPlane {
    /// Center of the estimated plane patch.
    pub center: Vec3,
    /// Outward-facing normal. Must be horizontal for a vertical plane.
    pub normal: Vec3,
    /// Half extents: x along the wall horizontally, y vertically.
    pub half_extents: Vec2,
}

impl DetectedPlane {
    /// A vertical plane from a center, a horizontal outward normal and a
    /// full width/height. The normal's vertical component is discarded.
    pub fn vertical(center: Vec3, normal: Vec3, width: f32, height: f32) -> Self {
        let flat = Vec3::new(normal.x, 0.0, normal.z).normalize_or(Vec3::Z);
        Self {
            center,
            normal: flat,
            half_extents: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    /// In-plane horizontal axis.
    fn right(&self) -> Vec3 {
        Vec3::Y.cross(self.normal).normalize_or(Vec3::X)
    }

    /// Ray/plane-patch intersection: returns the distance along the ray,
    /// or `None` when the ray misses the patch or points away from it.
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let denom = direction.dot(self.normal);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (self.center - origin).dot(self.normal) / denom;
        if t <= 1e-4 {
            return None;
        }
        let hit = origin + direction * t;
        let offset = hit - self.center;
        let local_x = offset.dot(self.right());
        let local_y = offset.dot(Vec3::Y);
        if local_x.abs() <= self.half_extents.x && local_y.abs() <= self.half_extents.y {
            Some(t)
        } else {
            None
        }
    }
}

/// The set of vertical planes detected so far.
#[derive(Debug, Clone, Default)]
pub struct SurfaceTracker {
    planes: Vec<DetectedPlane>,
}

impl SurfaceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a newly estimated plane.
    pub fn add_plane(&mut self, plane: DetectedPlane) {
        self.planes.push(plane);
    }

    pub fn planes(&self) -> &[DetectedPlane] {
        &self.planes
    }

    pub fn clear(&mut self) {
        self.planes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Casts a ray against every detected plane and returns the nearest
    /// intersection as a wall pose, or `None` when no vertical surface is
    /// estimated along the ray yet.
    pub fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<WorldPose> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let mut nearest: Option<(f32, &DetectedPlane)> = None;
        for plane in &self.planes {
            if let Some(t) = plane.raycast(origin, direction) {
                if nearest.is_none_or(|(best, _)| t < best) {
                    nearest = Some((t, plane));
                }
            }
        }

        nearest.map(|(t, plane)| {
            let rotation = Quat::from_rotation_arc(Vec3::Y, plane.normal);
            WorldPose::new(origin + direction * t, rotation)
        })
    }
}

/// Pinhole view used to turn screen points into world rays.
///
/// The camera looks along its local -Z axis; screen coordinates are in
/// display points with the origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewGeometry {
    /// Camera pose in world space.
    pub camera: Transform,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport size in display points.
    pub viewport_points: Vec2,
}

impl ViewGeometry {
    pub fn new(camera: Transform, fov_y: f32, viewport_points: Vec2) -> Self {
        Self {
            camera,
            fov_y,
            viewport_points,
        }
    }

    /// World-space ray through the given screen point. Returns the origin
    /// and a normalized direction.
    pub fn screen_ray(&self, point: Vec2) -> (Vec3, Vec3) {
        let ndc_x = 2.0 * point.x / self.viewport_points.x - 1.0;
        let ndc_y = 1.0 - 2.0 * point.y / self.viewport_points.y;
        let tan_half = (self.fov_y / 2.0).tan();
        let aspect = self.viewport_points.x / self.viewport_points.y;

        let local = Vec3::new(ndc_x * tan_half * aspect, ndc_y * tan_half, -1.0);
        let direction = (self.camera.rotation * local).normalize();
        (self.camera.translation, direction)
    }
}

impl Default for ViewGeometry {
    fn default() -> Self {
        Self {
            camera: Transform::IDENTITY,
            fov_y: 60f32.to_radians(),
            viewport_points: Vec2::new(1280.0, 720.0),
        }
    }
}
