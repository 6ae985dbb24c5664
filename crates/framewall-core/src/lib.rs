//! Framewall Core Library
//!
//! Places imported pictures as flat, texture-mapped rectangular frames on
//! detected vertical surfaces in a live 3D scene, and lets the user select,
//! translate, scale and rotate them interactively.
//!
//! The pure domain modules live at the crate root; the Bevy ECS integration
//! (components, resources, systems, plugins) lives under [`scene`].

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod geometry;
pub mod image_store;
pub mod layout;
pub mod ledger;
pub mod surface;
pub mod tween;

// Bevy integration
pub mod scene;

pub use geometry::{DisplayMetrics, PixelRect, pixel_to_point, pixels_to_meters};
pub use image_store::{FrameImage, ImageStore, ImageStoreError};
pub use layout::{TEMPLATE_IMAGE_HEIGHT, TEMPLATE_IMAGE_WIDTH, template_slots};
pub use ledger::{
    ANGLE_MAX_DEGREES, ANGLE_MIN_DEGREES, SCALE_MAX, SCALE_MIN, TransformLedger, TransformRecord,
    slider_to_angle,
};
pub use surface::{DetectedPlane, SurfaceTracker, ViewGeometry, WorldPose};
pub use tween::{Easing, TRANSITION_DURATION, TransformTween, TweenHandle, TweenTransform};
