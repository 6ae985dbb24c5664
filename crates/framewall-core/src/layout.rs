//! Fixed four-slot wall layout template.
//!
//! The template describes where the bulk-placement commands pin their
//! frames: four rectangles authored against a fixed reference image size.
//! Slots are converted into display points with
//! [`geometry::pixel_to_point`](crate::geometry::pixel_to_point) before use.

use crate::geometry::PixelRect;

/// Width of the reference image the template was authored against.
pub const TEMPLATE_IMAGE_WIDTH: f32 = 1072.0;

/// Height of the reference image the template was authored against.
pub const TEMPLATE_IMAGE_HEIGHT: f32 = 1072.0;

/// Number of slots in the template.
pub const TEMPLATE_SLOTS: usize = 4;

/// The four template slots, in placement order.
pub fn template_slots() -> [PixelRect; TEMPLATE_SLOTS] {
    [
        PixelRect::new(220.0, 260.0, 120.0, 140.0),
        PixelRect::new(480.0, 130.0, 150.0, 200.0),
        PixelRect::new(480.0, 350.0, 150.0, 200.0),
        PixelRect::new(780.0, 250.0, 120.0, 140.0),
    ]
}
