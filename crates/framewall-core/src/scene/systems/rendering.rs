//! Gizmo-based preview rendering.
//!
//! Draws detected walls, placed frames and guide points with Bevy's
//! Gizmos API. This gives the native viewer immediate feedback while a
//! textured renderer can be layered on later; the headless plugin never
//! schedules these systems.

use bevy::prelude::*;

use crate::scene::components::{CollisionExtents, FrameMaterial, FrameTexture, GuidePoint, PlacedFrame};
use crate::scene::resources::{SelectionState, SurfaceTrackerRes};

/// Gizmo colors for preview rendering.
#[derive(Resource)]
pub struct FrameGizmoConfig {
    /// Color for placed, textured frames.
    pub frame_color: Color,
    /// Color for frames that fell back to the placeholder material.
    pub placeholder_color: Color,
    /// Color for the selected frame.
    pub selected_color: Color,
    /// Color for detected wall outlines.
    pub wall_color: Color,
    /// Color for guide points.
    pub guide_color: Color,
    /// Radius of a guide point marker, in meters.
    pub guide_radius: f32,
}

impl Default for FrameGizmoConfig {
    fn default() -> Self {
        Self {
            frame_color: Color::srgb(0.9, 0.7, 0.2),
            placeholder_color: Color::srgb(0.1, 0.1, 0.1),
            selected_color: Color::srgb(1.0, 1.0, 1.0),
            wall_color: Color::srgba(0.3, 0.6, 0.9, 0.4),
            guide_color: Color::srgb(0.2, 0.4, 1.0),
            guide_radius: 0.01,
        }
    }
}

/// System to draw detected wall outlines.
pub fn render_walls(mut gizmos: Gizmos, surfaces: Res<SurfaceTrackerRes>, config: Res<FrameGizmoConfig>) {
    for plane in surfaces.0.planes() {
        let right = Vec3::Y.cross(plane.normal).normalize_or(Vec3::X) * plane.half_extents.x;
        let up = Vec3::Y * plane.half_extents.y;
        let corners = [
            plane.center - right - up,
            plane.center + right - up,
            plane.center + right + up,
            plane.center - right + up,
        ];
        for i in 0..4 {
            gizmos.line(corners[i], corners[(i + 1) % 4], config.wall_color);
        }
    }
}

/// System to draw placed frames as rectangles, tinted by material and
/// selection state.
pub fn render_frames(
    mut gizmos: Gizmos,
    config: Res<FrameGizmoConfig>,
    selection: Res<SelectionState>,
    frames: Query<(&PlacedFrame, &FrameMaterial, &CollisionExtents, &GlobalTransform)>,
) {
    for (frame, material, extents, world) in frames.iter() {
        let mut color = match material.texture {
            FrameTexture::Image(_) => config.frame_color,
            FrameTexture::Placeholder => config.placeholder_color,
        };
        if selection.active_id() == Some(frame.id.as_str()) {
            color = config.selected_color;
        }
        let color = color.with_alpha(material.opacity);

        let affine = world.affine();
        let corners = [
            Vec3::new(-extents.half_width, 0.0, -extents.half_depth),
            Vec3::new(extents.half_width, 0.0, -extents.half_depth),
            Vec3::new(extents.half_width, 0.0, extents.half_depth),
            Vec3::new(-extents.half_width, 0.0, extents.half_depth),
        ]
        .map(|corner| affine.transform_point3(corner));
        for i in 0..4 {
            gizmos.line(corners[i], corners[(i + 1) % 4], color);
        }
        gizmos.line(corners[0], corners[2], color);
    }
}

/// System to draw guide point markers.
pub fn render_guide_points(
    mut gizmos: Gizmos,
    config: Res<FrameGizmoConfig>,
    points: Query<&GlobalTransform, With<GuidePoint>>,
) {
    for world in points.iter() {
        gizmos.sphere(
            Isometry3d::from_translation(world.translation()),
            config.guide_radius,
            config.guide_color,
        );
    }
}
