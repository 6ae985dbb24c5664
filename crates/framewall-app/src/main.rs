//! Native preview harness for framewall.
//!
//! Opens a window with a simulated wall, renders placed frames as gizmo
//! outlines and maps keyboard/mouse input onto the command surface:
//!
//! - left click        tap (select / deselect frames)
//! - `1`..`4`          place a single colored frame at the screen center
//! - `T`               place the four-frame template set
//! - `C`               spawn template corner guide points
//! - `H`               toggle the hanging preview
//! - `X`               remove all anchors
//! - up/down arrows    scale slider for the selected frame
//! - left/right arrows rotate slider for the selected frame
//! - `D`               deselect (modal dismissed)

use bevy::prelude::*;
use tracing_subscriber::EnvFilter;

use framewall_core::image_store::FrameImage;
use framewall_core::scene::{
    CommandQueue, FrameCommand, FramewallHeadlessPlugin, FramewallViewerPlugin, StateStores,
    SurfaceTrackerRes,
};
use framewall_core::surface::DetectedPlane;

/// Slider step per arrow-key press.
const SCALE_STEP: f32 = 0.1;
const ANGLE_STEP: f32 = 5.0;

/// Local mirror of the slider values driven by the arrow keys.
#[derive(Resource, Default)]
struct SliderInput {
    scale: f32,
    angle_degrees: f32,
    hanging: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let command_queue = CommandQueue::new();
    let state_stores = StateStores::new();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "framewall preview".into(),
                ..Window::default()
            }),
            ..WindowPlugin::default()
        }))
        .add_plugins(FramewallHeadlessPlugin {
            command_queue: Some(command_queue),
            state_stores: Some(state_stores),
            image_dir: Some(std::env::temp_dir().join("framewall-preview")),
        })
        .add_plugins(FramewallViewerPlugin)
        .insert_resource(SliderInput {
            scale: 1.0,
            ..SliderInput::default()
        })
        .add_systems(Startup, seed_demo_wall)
        .add_systems(Update, (track_selection_sliders, keyboard_commands).chain())
        .run();
}

/// Seeds one large simulated wall in front of the camera, standing in for
/// converged surface detection.
fn seed_demo_wall(mut surfaces: ResMut<SurfaceTrackerRes>) {
    surfaces.0.add_plane(DetectedPlane::vertical(
        Vec3::new(0.0, 0.0, -2.5),
        Vec3::Z,
        4.0,
        2.5,
    ));
    tracing::info!("[app] demo wall seeded");
}

/// Maps keyboard input onto frame commands.
fn keyboard_commands(
    keys: Res<ButtonInput<KeyCode>>,
    queue: Res<CommandQueue>,
    mut sliders: ResMut<SliderInput>,
) {
    const SWATCHES: [(KeyCode, [u8; 4]); 4] = [
        (KeyCode::Digit1, [200, 60, 60, 255]),
        (KeyCode::Digit2, [60, 160, 70, 255]),
        (KeyCode::Digit3, [70, 90, 200, 255]),
        (KeyCode::Digit4, [210, 180, 60, 255]),
    ];

    for (key, color) in SWATCHES {
        if keys.just_pressed(key) {
            queue.push(FrameCommand::AddFrame {
                image: FrameImage::solid(1200, 1600, color),
            });
        }
    }

    if keys.just_pressed(KeyCode::KeyT) {
        let images = SWATCHES
            .iter()
            .map(|(_, color)| FrameImage::solid(1000, 1200, *color))
            .collect();
        queue.push(FrameCommand::AddFrames { images });
    }
    if keys.just_pressed(KeyCode::KeyC) {
        queue.push(FrameCommand::ConvertImageToWorldSpace);
    }
    if keys.just_pressed(KeyCode::KeyX) {
        queue.push(FrameCommand::RemoveAllAnchors);
    }
    if keys.just_pressed(KeyCode::KeyD) {
        queue.push(FrameCommand::Deselect);
    }
    if keys.just_pressed(KeyCode::KeyH) {
        sliders.hanging = !sliders.hanging;
        queue.push(FrameCommand::HangFrames {
            hanging: sliders.hanging,
        });
    }

    if keys.just_pressed(KeyCode::ArrowUp) {
        sliders.scale += SCALE_STEP;
        queue.push(FrameCommand::Scale {
            factor: sliders.scale,
        });
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        sliders.scale -= SCALE_STEP;
        queue.push(FrameCommand::Scale {
            factor: sliders.scale,
        });
    }
    if keys.just_pressed(KeyCode::ArrowRight) {
        sliders.angle_degrees += ANGLE_STEP;
        queue.push(FrameCommand::Rotate {
            degrees: sliders.angle_degrees,
        });
    }
    if keys.just_pressed(KeyCode::ArrowLeft) {
        sliders.angle_degrees -= ANGLE_STEP;
        queue.push(FrameCommand::Rotate {
            degrees: sliders.angle_degrees,
        });
    }
}

/// Keeps the local slider mirror in sync with the published selection
/// state, so arrow keys continue from the selected frame's stored values.
fn track_selection_sliders(stores: Res<StateStores>, mut sliders: ResMut<SliderInput>) {
    let summary = stores.selection.get_summary();
    if summary.modal_visible {
        sliders.scale = summary.scale;
        sliders.angle_degrees = summary.angle_degrees;
    }
}
