//! On-disk image storage for frame textures.
//!
//! Imported pictures are written as PNG files into an app-private
//! directory; the scene only ever sees the resulting path as an opaque
//! texture source. Filesystem failures are reported but never fatal to the
//! scene.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgba};
use thiserror::Error;

/// Errors from the image store.
#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("image store IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image encode/decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid image payload: {0}")]
    InvalidPayload(String),
}

/// An imported picture carried by placement commands: raw RGBA8 pixels
/// plus dimensions.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl FrameImage {
    /// Builds an image from RGBA8 pixel data. Fails when the buffer length
    /// does not match the dimensions.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageStoreError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(ImageStoreError::InvalidPayload(format!(
                "expected {expected} bytes for {width}x{height} RGBA, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A solid-color image, handy for demos and tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn to_buffer(&self) -> Result<ImageBuffer<Rgba<u8>, Vec<u8>>, ImageStoreError> {
        ImageBuffer::from_raw(self.width, self.height, self.pixels.clone()).ok_or_else(|| {
            ImageStoreError::InvalidPayload("pixel buffer does not match dimensions".into())
        })
    }
}

impl fmt::Debug for FrameImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Writes and removes PNG files in an app-private directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Saves `image` as `<name>.png` under the store directory and returns
    /// the written path.
    pub fn save_image(&self, image: &FrameImage, name: &str) -> Result<PathBuf, ImageStoreError> {
        fs::create_dir_all(&self.root)?;
        let path = self.root.join(format!("{name}.png"));
        image.to_buffer()?.save(&path)?;
        Ok(path)
    }

    /// Removes every file in the store directory. Individual failures are
    /// logged and skipped; the scene keeps running either way.
    pub fn delete_images(&self) -> Result<(), ImageStoreError> {
        if !self.root.exists() {
            return Ok(());
        }
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() {
                if let Err(err) = fs::remove_file(&path) {
                    tracing::warn!("[image_store] could not remove {}: {err}", path.display());
                }
            }
        }
        Ok(())
    }

    /// Checks that a saved texture is readable, without decoding pixels.
    pub fn probe(path: &Path) -> Option<(u32, u32)> {
        image::image_dimensions(path).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_probe() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        let image = FrameImage::solid(8, 6, [200, 40, 40, 255]);

        let path = store.save_image(&image, "photo").unwrap();
        assert!(path.ends_with("photo.png"));
        assert_eq!(ImageStore::probe(&path), Some((8, 6)));
    }

    #[test]
    fn test_delete_images_empties_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        let image = FrameImage::solid(4, 4, [0, 0, 0, 255]);
        store.save_image(&image, "a").unwrap();
        store.save_image(&image, "b").unwrap();

        store.delete_images().unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_delete_images_missing_dir_is_ok() {
        let store = ImageStore::new("/nonexistent/framewall-test-store");
        assert!(store.delete_images().is_ok());
    }

    #[test]
    fn test_from_rgba8_validates_length() {
        assert!(FrameImage::from_rgba8(2, 2, vec![0; 16]).is_ok());
        assert!(FrameImage::from_rgba8(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn test_probe_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.png");
        fs::write(&path, b"garbage").unwrap();
        assert_eq!(ImageStore::probe(&path), None);
    }
}
