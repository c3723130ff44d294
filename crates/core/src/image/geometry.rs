//! Image geometry.

use serde::{Deserialize, Serialize};

use crate::common::error::AccessError;

/// Dimensions shared by every image in a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageGeometry {
    /// Width in pixels.
    pub width: u64,
    /// Height in pixels.
    pub height: u64,
    /// Bytes per pixel.
    pub pixel_size: u64,
}

impl ImageGeometry {
    /// Creates a geometry.
    pub const fn new(width: u64, height: u64, pixel_size: u64) -> Self {
        Self {
            width,
            height,
            pixel_size,
        }
    }

    /// Creates a square RGB geometry, the shape the experiments use.
    pub const fn square_rgb(size: u64) -> Self {
        Self::new(size, size, 3)
    }

    /// Pixels per image.
    #[inline]
    pub const fn pixels(&self) -> u64 {
        self.width * self.height
    }

    /// Bytes per image.
    #[inline]
    pub const fn image_bytes(&self) -> u64 {
        self.pixels() * self.pixel_size
    }

    /// Returns `true` when `(x, y)` lies on the pixel grid.
    #[inline]
    pub const fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width && (y as u64) < self.height
    }

    /// Linear byte address of pixel `(x, y)` within the image starting at `role_offset`.
    ///
    /// Computed as `(x + y * width) * pixel_size + role_offset`. No clamping is
    /// performed; callers apply the border policy first.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::CoordinateOutOfRange`] if `(x, y)` is off the grid.
    #[inline]
    pub const fn pixel_address(&self, x: i64, y: i64, role_offset: u64) -> Result<u64, AccessError> {
        if !self.contains(x, y) {
            return Err(AccessError::CoordinateOutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let index = x as u64 + y as u64 * self.width;
        Ok(index * self.pixel_size + role_offset)
    }
}
