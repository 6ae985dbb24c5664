//! Surface placement systems.
//!
//! Turns placement requests into anchored frame entities: raycast the pin
//! point against the detected walls, save the image, spawn the frame under
//! a fresh world anchor. A raycast miss skips the placement silently;
//! surface detection latency is expected and transient.

use bevy::prelude::*;
use uuid::Uuid;

use crate::geometry::{pixel_to_point, pixels_to_meters};
use crate::layout::{TEMPLATE_IMAGE_HEIGHT, TEMPLATE_IMAGE_WIDTH, template_slots};
use crate::scene::components::{CollisionExtents, FrameMaterial, GuidePoint, PlacedFrame, WallAnchor};
use crate::scene::events::{ConvertImageEvent, FramePlacedEvent, PlaceFrameEvent};
use crate::scene::resources::{
    DisplayMetricsRes, FrameRegistry, ImageStoreRes, SurfaceTrackerRes, ViewGeometryRes,
};
use crate::surface::WorldPose;

/// System to place requested frames onto detected walls.
pub fn handle_place_frames(
    mut commands: Commands,
    mut events: MessageReader<PlaceFrameEvent>,
    view: Res<ViewGeometryRes>,
    surfaces: Res<SurfaceTrackerRes>,
    store: Res<ImageStoreRes>,
    mut registry: ResMut<FrameRegistry>,
    mut placed_events: MessageWriter<FramePlacedEvent>,
) {
    for event in events.read() {
        let (origin, direction) = view.0.screen_ray(event.pin);
        let Some(pose) = surfaces.0.raycast(origin, direction) else {
            tracing::debug!("[placement] no vertical surface at {:?}", event.pin);
            continue;
        };

        let id = Uuid::new_v4().to_string();
        let path = match store.0.save_image(&event.image, &id) {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!("[placement] could not save image: {err}");
                continue;
            }
        };

        let (width_m, height_m) =
            pixels_to_meters(event.image.width() as f32, event.image.height() as f32);

        let frame = commands
            .spawn((
                PlacedFrame {
                    id: id.clone(),
                    image_path: path.clone(),
                },
                FrameMaterial::resolve(&path),
                CollisionExtents::from_size(width_m, height_m),
                Transform::IDENTITY,
            ))
            .id();
        let anchor = spawn_anchor(&mut commands, &pose);
        commands.entity(anchor).add_child(frame);

        registry.register(id.clone(), frame, path);
        tracing::info!("[placement] placed frame {id} ({width_m:.3}x{height_m:.3} m)");
        placed_events.write(FramePlacedEvent { entity: frame, id });
    }
}

/// System to spawn corner markers for the template slots.
///
/// Each slot contributes four markers (its corners), each under its own
/// world anchor so the global remove-all clears them like frames. Corners
/// with no wall behind them are skipped.
pub fn handle_convert_image(
    mut commands: Commands,
    mut events: MessageReader<ConvertImageEvent>,
    view: Res<ViewGeometryRes>,
    surfaces: Res<SurfaceTrackerRes>,
    metrics: Res<DisplayMetricsRes>,
) {
    for _ in events.read() {
        let mut spawned = 0;
        for slot in template_slots() {
            let points =
                pixel_to_point(slot, TEMPLATE_IMAGE_WIDTH, TEMPLATE_IMAGE_HEIGHT, &metrics.0);
            for corner in points.corners() {
                let (origin, direction) = view.0.screen_ray(corner);
                let Some(pose) = surfaces.0.raycast(origin, direction) else {
                    continue;
                };
                let point = commands.spawn((GuidePoint, Transform::IDENTITY)).id();
                let anchor = spawn_anchor(&mut commands, &pose);
                commands.entity(anchor).add_child(point);
                spawned += 1;
            }
        }
        tracing::info!("[placement] spawned {spawned} guide points");
    }
}

/// Creates a new world anchor at the pose. One anchor per entity; anchors
/// are never reparented.
fn spawn_anchor(commands: &mut Commands, pose: &WorldPose) -> Entity {
    commands.spawn((WallAnchor, pose.to_transform())).id()
}
