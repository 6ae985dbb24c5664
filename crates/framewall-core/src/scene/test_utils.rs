//! Test utilities for headless scene integration tests.
//!
//! Provides `TestApp`, a wrapper around `bevy::app::App` that runs
//! `MinimalPlugins` + `TransformPlugin` + `FramewallHeadlessPlugin`, with
//! manually driven time so animations advance only through explicit
//! fixed-timestep stepping.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::transform::TransformPlugin;

use crate::image_store::FrameImage;
use crate::scene::events::{PlaceFrameEvent, TapEvent};
use crate::scene::plugin::{FramewallHeadlessPlugin, TICK_DT};
use crate::scene::resources::{
    CommandQueue, FrameCommand, FrameRegistry, SelectionState, SurfaceTrackerRes, ViewGeometryRes,
};
use crate::scene::state_store::StateStores;
use crate::surface::DetectedPlane;
use crate::tween::TRANSITION_DURATION;

/// Number of fixed steps that complete one standard transition.
pub(crate) const TRANSITION_STEPS: usize = (TRANSITION_DURATION / TICK_DT) as usize + 1;

/// A headless Bevy app wrapper for testing.
pub(crate) struct TestApp {
    pub app: App,
    queue: CommandQueue,
    stores: StateStores,
    _image_dir: tempfile::TempDir,
}

impl TestApp {
    /// Create a new test app with no detected surfaces.
    pub fn new() -> Self {
        let queue = CommandQueue::new();
        let stores = StateStores::new();
        let image_dir = tempfile::tempdir().expect("temp dir for image store");

        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(TransformPlugin);
        app.add_plugins(FramewallHeadlessPlugin {
            command_queue: Some(queue.clone()),
            state_stores: Some(stores.clone()),
            image_dir: Some(image_dir.path().to_path_buf()),
        });
        // Freeze time so that only explicit step calls advance the
        // animations, keeping tests deterministic.
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::ZERO));
        // Run one update to initialize all resources.
        app.update();

        Self {
            app,
            queue,
            stores,
            _image_dir: image_dir,
        }
    }

    /// A test app with one large wall two meters in front of the camera,
    /// covering the whole view.
    pub fn with_facing_wall() -> Self {
        let mut this = Self::new();
        this.add_wall(10.0, 10.0);
        this
    }

    /// A test app with a small centered wall of the given width/height.
    pub fn with_narrow_wall(size: f32) -> Self {
        let mut this = Self::new();
        this.add_wall(size, size);
        this
    }

    fn add_wall(&mut self, width: f32, height: f32) {
        self.app
            .world_mut()
            .resource_mut::<SurfaceTrackerRes>()
            .0
            .add_plane(DetectedPlane::vertical(
                Vec3::new(0.0, 0.0, -2.0),
                Vec3::Z,
                width,
                height,
            ));
    }

    /// Run a single frame update.
    pub fn update(&mut self) {
        self.app.update();
    }

    /// Advance the animations by exactly `n` fixed timesteps.
    ///
    /// Temporarily drives the clock by one fixed timestep per update, then
    /// freezes it again.
    pub fn step(&mut self, n: usize) {
        let dt = Duration::from_secs_f64(f64::from(TICK_DT));
        self.app
            .insert_resource(TimeUpdateStrategy::ManualDuration(dt));
        for _ in 0..n {
            self.app.update();
        }
        self.app
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::ZERO));
    }

    /// Run one full animated transition plus a settling update.
    pub fn finish_transition(&mut self) {
        self.step(TRANSITION_STEPS);
        self.update();
    }

    /// Push a command to the command queue.
    pub fn push_command(&mut self, command: FrameCommand) {
        self.queue.push(command);
    }

    /// Send a tap at the given screen point.
    pub fn tap(&mut self, point: Vec2) {
        self.app.world_mut().write_message(TapEvent {
            screen_point: point,
        });
        self.update();
    }

    /// Tap the registered frame wherever it currently is on screen.
    pub fn tap_frame(&mut self, id: &str) {
        let entity = self
            .registry()
            .entity_of(id)
            .expect("frame is registered");
        let world_pos = self
            .app
            .world()
            .get::<GlobalTransform>(entity)
            .unwrap()
            .translation();
        let point = self.project(world_pos);
        self.tap(point);
    }

    /// Projects a world position back to a screen point.
    pub fn project(&self, world: Vec3) -> Vec2 {
        let view = self.app.world().resource::<ViewGeometryRes>().0;
        let local = view.camera.rotation.inverse() * (world - view.camera.translation);
        let tan_half = (view.fov_y / 2.0).tan();
        let aspect = view.viewport_points.x / view.viewport_points.y;
        let ndc_x = (local.x / -local.z) / (tan_half * aspect);
        let ndc_y = (local.y / -local.z) / tan_half;
        Vec2::new(
            (ndc_x + 1.0) / 2.0 * view.viewport_points.x,
            (1.0 - ndc_y) / 2.0 * view.viewport_points.y,
        )
    }

    /// Screen center in display points.
    pub fn screen_center(&self) -> Vec2 {
        self.app
            .world()
            .resource::<ViewGeometryRes>()
            .0
            .viewport_points
            / 2.0
    }

    /// Place a frame pinned at an arbitrary screen point, bypassing the
    /// center-pinned AddFrame command.
    pub fn place_frame_at(&mut self, pin: Vec2, image: FrameImage) {
        self.app
            .world_mut()
            .write_message(PlaceFrameEvent { image, pin });
        self.update();
        self.update();
    }

    /// The id of the most recently placed frame under the tap at `pin`.
    pub fn frame_id_at(&mut self, pin: Vec2) -> Option<String> {
        let (origin, direction) = {
            let view = self.app.world().resource::<ViewGeometryRes>();
            view.0.screen_ray(pin)
        };
        let mut best: Option<(f32, String)> = None;
        let mut query = self.app.world_mut().query::<(
            &crate::scene::components::PlacedFrame,
            &crate::scene::components::CollisionExtents,
            &GlobalTransform,
        )>();
        for (frame, extents, world) in query.iter(self.app.world()) {
            if let Some(distance) = extents.ray_hit(world, origin, direction) {
                if best.as_ref().is_none_or(|(b, _)| distance < *b) {
                    best = Some((distance, frame.id.clone()));
                }
            }
        }
        best.map(|(_, id)| id)
    }

    /// Current selection state.
    pub fn selection(&self) -> SelectionState {
        self.app.world().resource::<SelectionState>().clone()
    }

    /// The frame registry.
    pub fn registry(&self) -> &FrameRegistry {
        self.app.world().resource::<FrameRegistry>()
    }

    /// The shared state stores.
    pub fn stores(&self) -> &StateStores {
        &self.stores
    }

    /// Local transform of the frame registered under `id`.
    pub fn transform_of(&mut self, id: &str) -> Transform {
        let entity = self
            .registry()
            .entity_of(id)
            .expect("frame is registered");
        *self.app.world().get::<Transform>(entity).unwrap()
    }

    /// Get a reference to the World.
    pub fn world(&self) -> &World {
        self.app.world()
    }

    /// Get a mutable reference to the World.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
