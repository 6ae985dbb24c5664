//! Pixel/meter and pixel/point conversion.
//!
//! Frames are printed-photo sized: a pixel dimension maps to the physical
//! size the image would have when printed at photo DPI. Template layouts are
//! authored in source-image pixel space and must be rescaled into device
//! display points before they can be used as tap locations.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

/// DPI used to print photos.
pub const PRINT_DPI: f32 = 300.0;

/// Centimeters per inch.
pub const CM_PER_INCH: f32 = 2.54;

/// Converts a pixel dimension pair to physical meters.
///
/// `meters = (pixels * (cm_per_inch / dpi)) / 100`
pub fn pixels_to_meters(width_px: f32, height_px: f32) -> (f32, f32) {
    let width_m = (width_px * (CM_PER_INCH / PRINT_DPI)) / 100.0;
    let height_m = (height_px * (CM_PER_INCH / PRINT_DPI)) / 100.0;
    (width_m, height_m)
}

/// An axis-aligned rectangle with its origin at the top-left corner.
///
/// Used both for source-image pixel rects (the layout template) and for the
/// display-point rects produced by [`pixel_to_point`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center of the rectangle.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corners in top-left, top-right, bottom-left, bottom-right order.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.x + self.width, self.y),
            Vec2::new(self.x, self.y + self.height),
            Vec2::new(self.x + self.width, self.y + self.height),
        ]
    }
}

/// Display geometry of the device the scene is viewed on.
///
/// Replaces ambient screen globals: every conversion that needs the display
/// receives this explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    /// Viewport size in display points.
    pub size_points: Vec2,
    /// Device pixels per display point.
    pub scale_factor: f32,
}

impl DisplayMetrics {
    pub fn new(size_points: Vec2, scale_factor: f32) -> Self {
        Self {
            size_points,
            scale_factor,
        }
    }

    /// Viewport size in device pixels.
    pub fn size_pixels(&self) -> Vec2 {
        self.size_points * self.scale_factor
    }

    /// Screen center in display points.
    pub fn center_point(&self) -> Vec2 {
        self.size_points / 2.0
    }
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            size_points: Vec2::new(1280.0, 720.0),
            scale_factor: 2.0,
        }
    }
}

/// Rescales a rect defined in source-image pixel space into display points.
///
/// The scale is the ratio of device pixel resolution to image resolution,
/// normalized back to points by the device scale factor.
pub fn pixel_to_point(
    rect: PixelRect,
    image_width: f32,
    image_height: f32,
    metrics: &DisplayMetrics,
) -> PixelRect {
    let screen_pixels = metrics.size_pixels();
    let x_scale = screen_pixels.x / image_width;
    let y_scale = screen_pixels.y / image_height;

    PixelRect {
        x: (rect.x * x_scale) / metrics.scale_factor,
        y: (rect.y * y_scale) / metrics.scale_factor,
        width: (rect.width * x_scale) / metrics.scale_factor,
        height: (rect.height * y_scale) / metrics.scale_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixels_to_meters() {
        // 300 px at 300 DPI is one inch, i.e. 2.54 cm.
        let (w, h) = pixels_to_meters(300.0, 600.0);
        assert!((w - 0.0254).abs() < 1e-6);
        assert!((h - 0.0508).abs() < 1e-6);
    }

    #[test]
    fn test_pixels_to_meters_zero() {
        let (w, h) = pixels_to_meters(0.0, 0.0);
        assert_eq!(w, 0.0);
        assert_eq!(h, 0.0);
    }

    #[test]
    fn test_pixel_to_point_identity_resolution() {
        // When the image resolution equals the screen pixel resolution, the
        // conversion reduces to dividing by the scale factor.
        let metrics = DisplayMetrics::new(Vec2::new(500.0, 400.0), 2.0);
        let rect = PixelRect::new(100.0, 200.0, 50.0, 80.0);
        let out = pixel_to_point(rect, 1000.0, 800.0, &metrics);
        assert!((out.x - 50.0).abs() < 1e-4);
        assert!((out.y - 100.0).abs() < 1e-4);
        assert!((out.width - 25.0).abs() < 1e-4);
        assert!((out.height - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_pixel_to_point_scales_with_screen() {
        let metrics = DisplayMetrics::new(Vec2::new(536.0, 536.0), 2.0);
        let rect = PixelRect::new(0.0, 0.0, 1072.0, 1072.0);
        // Full reference image maps to the full screen in points.
        let out = pixel_to_point(rect, 1072.0, 1072.0, &metrics);
        assert!((out.width - 536.0).abs() < 1e-3);
        assert!((out.height - 536.0).abs() < 1e-3);
    }

    #[test]
    fn test_rect_center_and_corners() {
        let rect = PixelRect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(rect.center(), Vec2::new(60.0, 40.0));
        let corners = rect.corners();
        assert_eq!(corners[0], Vec2::new(10.0, 20.0));
        assert_eq!(corners[3], Vec2::new(110.0, 60.0));
    }
}
