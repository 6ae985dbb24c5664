//! ECS components for placed frames.

use std::path::{Path, PathBuf};

use bevy::prelude::*;

use crate::image_store::ImageStore;

/// A placed picture frame.
#[derive(Component, Debug, Clone)]
pub struct PlacedFrame {
    /// Unique identifier, generated once at creation.
    pub id: String,
    /// Path of the saved source image, used as the texture source.
    pub image_path: PathBuf,
}

/// Marker for the world anchor entity a frame is parented under.
///
/// One anchor per frame; anchors are never reparented.
#[derive(Component, Debug, Clone, Default)]
pub struct WallAnchor;

/// Texture source of a frame's material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameTexture {
    /// Textured from the saved image at this path.
    Image(PathBuf),
    /// Opaque fallback when the texture could not be read.
    Placeholder,
}

/// Visual material of a frame.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct FrameMaterial {
    pub texture: FrameTexture,
    /// 1.0 normally, 0.5 under the hanging preview.
    pub opacity: f32,
}

impl FrameMaterial {
    /// Resolves the material for an image path, falling back to the
    /// placeholder when the file cannot be read as an image.
    pub fn resolve(path: &Path) -> Self {
        let texture = if ImageStore::probe(path).is_some() {
            FrameTexture::Image(path.to_path_buf())
        } else {
            tracing::warn!(
                "[frames] texture unreadable, using placeholder: {}",
                path.display()
            );
            FrameTexture::Placeholder
        };
        Self {
            texture,
            opacity: 1.0,
        }
    }
}

/// Hit-test collision shape of a frame: a flat rectangle in the entity's
/// local XZ plane.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CollisionExtents {
    pub half_width: f32,
    pub half_depth: f32,
}

impl CollisionExtents {
    pub fn from_size(width: f32, depth: f32) -> Self {
        Self {
            half_width: width / 2.0,
            half_depth: depth / 2.0,
        }
    }

    /// Intersects a world-space ray with this rectangle under the given
    /// world transform. Returns the world-space distance to the hit.
    pub fn ray_hit(&self, world: &GlobalTransform, origin: Vec3, direction: Vec3) -> Option<f32> {
        let inverse = world.affine().inverse();
        let local_origin = inverse.transform_point3(origin);
        let local_direction = inverse.transform_vector3(direction);

        if local_direction.y.abs() < 1e-6 {
            return None;
        }
        let t = -local_origin.y / local_direction.y;
        if t <= 1e-4 {
            return None;
        }
        let hit = local_origin + local_direction * t;
        if hit.x.abs() > self.half_width || hit.z.abs() > self.half_depth {
            return None;
        }
        let world_hit = world.affine().transform_point3(hit);
        Some(world_hit.distance(origin))
    }
}

/// Marker for the small corner markers produced by the image-to-world
/// conversion command.
#[derive(Component, Debug, Clone, Default)]
pub struct GuidePoint;
