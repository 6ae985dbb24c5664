//! Bevy plugins for the framewall scene.
//!
//! Provides:
//! - `FramewallHeadlessPlugin`: logic-only plugin (no rendering/window
//!   dependencies) for headless testing
//! - `FramewallViewerPlugin`: camera, window sync, mouse-tap forwarding and
//!   gizmo rendering for the native preview

use std::path::PathBuf;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::geometry::DisplayMetrics;
use crate::image_store::ImageStore;
use crate::scene::events::*;
use crate::scene::resources::*;
use crate::scene::state_store::StateStores;
use crate::scene::systems;
use crate::scene::systems::FrameGizmoConfig;

/// Fixed timestep for animation advance, in seconds.
pub const TICK_DT: f32 = 1.0 / 60.0;

// ============================================================================
// Headless plugin (logic only)
// ============================================================================

/// Headless plugin containing all scene logic without rendering or window
/// dependencies.
///
/// Use this plugin in tests with `MinimalPlugins` (plus `TransformPlugin`
/// for hierarchy propagation) to run the command, placement, selection and
/// animation systems without a windowing or rendering backend.
#[derive(Default)]
pub struct FramewallHeadlessPlugin {
    /// Externally shared command queue; a fresh one when `None`.
    pub command_queue: Option<CommandQueue>,
    /// Externally shared state stores; fresh ones when `None`.
    pub state_stores: Option<StateStores>,
    /// Directory for saved frame textures; a temp-dir default when `None`.
    pub image_dir: Option<PathBuf>,
}

impl Plugin for FramewallHeadlessPlugin {
    fn build(&self, app: &mut App) {
        // ====================================================================
        // Time
        // ====================================================================
        app.insert_resource(Time::<Fixed>::from_seconds(f64::from(TICK_DT)));

        // ====================================================================
        // Resources
        // ====================================================================
        let image_dir = self
            .image_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("framewall-images"));

        app.init_resource::<FrameRegistry>()
            .init_resource::<TransformLedgerRes>()
            .init_resource::<SelectionState>()
            .init_resource::<TweenHandles>()
            .init_resource::<HangPreview>()
            .init_resource::<SurfaceTrackerRes>()
            .init_resource::<ViewGeometryRes>()
            .init_resource::<DisplayMetricsRes>()
            .insert_resource(ImageStoreRes(ImageStore::new(image_dir)))
            .insert_resource(self.command_queue.clone().unwrap_or_default())
            .insert_resource(self.state_stores.clone().unwrap_or_default());

        // ====================================================================
        // Messages
        // ====================================================================
        app.add_message::<TapEvent>()
            .add_message::<PlaceFrameEvent>()
            .add_message::<ConvertImageEvent>()
            .add_message::<ClearFramesEvent>()
            .add_message::<DeselectEvent>()
            .add_message::<ScaleCommandEvent>()
            .add_message::<RotateCommandEvent>()
            .add_message::<HangPreviewEvent>()
            .add_message::<FramePlacedEvent>()
            .add_message::<TweenFinishedEvent>();

        // ====================================================================
        // Systems
        // ====================================================================

        // Command dispatch and handlers run in producer order within one
        // frame: dispatch first, then placement, then selection, then the
        // registry-level operations.
        app.add_systems(
            Update,
            (
                systems::process_commands,
                systems::handle_place_frames,
                systems::handle_convert_image,
                systems::handle_taps,
                systems::handle_deselect,
                systems::handle_scale_commands,
                systems::handle_rotate_commands,
                systems::handle_tween_finished,
                systems::handle_clear_frames,
                systems::handle_hang_preview,
            )
                .chain(),
        );

        // Animation advance runs on the fixed schedule so transitions
        // progress by exact timesteps.
        app.add_systems(FixedUpdate, systems::advance_tweens);
    }
}

// ============================================================================
// Viewer plugin (camera + input + gizmo rendering)
// ============================================================================

/// Viewer plugin for the native preview: spawns a camera, keeps the view
/// geometry in sync with the window, forwards mouse clicks as taps and
/// renders walls/frames/guide points with gizmos.
///
/// Requires `DefaultPlugins` (window + render backends); never add it in
/// headless tests.
pub struct FramewallViewerPlugin;

impl Plugin for FramewallViewerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameGizmoConfig>();

        app.add_systems(Startup, setup_preview_camera);

        app.add_systems(
            Update,
            (sync_view_from_window, forward_mouse_taps)
                .chain()
                .before(systems::process_commands),
        );

        app.add_systems(
            Update,
            (
                systems::render_walls,
                systems::render_frames,
                systems::render_guide_points,
            ),
        );
    }
}

/// Spawns the preview camera at the origin, looking down -Z.
fn setup_preview_camera(mut commands: Commands) {
    commands.spawn((Camera3d::default(), Transform::IDENTITY));
    tracing::info!("[viewer] preview camera spawned");
}

/// Keeps the screen-ray geometry in sync with the window and camera.
fn sync_view_from_window(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<&Transform, With<Camera3d>>,
    mut view: ResMut<ViewGeometryRes>,
    mut metrics: ResMut<DisplayMetricsRes>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    metrics.0 = DisplayMetrics::new(size, window.scale_factor());
    view.0.viewport_points = size;
    if let Ok(camera) = cameras.single() {
        view.0.camera = *camera;
    }
}

/// Forwards left mouse clicks as tap events.
fn forward_mouse_taps(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut taps: MessageWriter<TapEvent>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    taps.write(TapEvent {
        screen_point: cursor,
    });
}
