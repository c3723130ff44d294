//! Flat address-space layout.
//!
//! All images live in one byte array. Source images occupy the read region,
//! batch-indexed from address zero; destination images follow in the write
//! region. Each image is `width * height * pixel_size` contiguous bytes:
//!
//! ```text
//! | src 0 | src 1 | ... | src n-1 | dst 0 | dst 1 | ... | dst n-1 |
//! ```

use serde::Serialize;

use super::geometry::ImageGeometry;
use crate::common::error::AccessError;

/// Which half of the address space an image lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Source images.
    Read,
    /// Destination images.
    Write,
}

/// Address layout of a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AddressLayout {
    geometry: ImageGeometry,
    batch_size: u64,
}

impl AddressLayout {
    /// Creates the layout for `batch_size` images of `geometry`.
    pub const fn new(geometry: ImageGeometry, batch_size: u64) -> Self {
        Self {
            geometry,
            batch_size,
        }
    }

    /// Image geometry.
    pub const fn geometry(&self) -> &ImageGeometry {
        &self.geometry
    }

    /// Base address of image `image_index` in `region`.
    ///
    /// Computed once per image, not per pixel.
    #[inline]
    pub const fn role_offset(&self, region: Region, image_index: u64) -> u64 {
        let stride = self.geometry.image_bytes();
        let base = match region {
            Region::Read => 0,
            Region::Write => self.batch_size * stride,
        };
        base + image_index * stride
    }

    /// Size in bytes of the address space; the write region is only present when stores are modeled.
    pub const fn address_space_bytes(&self, with_write_region: bool) -> u64 {
        let read = self.batch_size * self.geometry.image_bytes();
        if with_write_region { 2 * read } else { read }
    }

    /// Byte address of `(x, y)` in the image at `role_offset`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::CoordinateOutOfRange`] if `(x, y)` is off the grid.
    #[inline]
    pub const fn address(&self, x: i64, y: i64, role_offset: u64) -> Result<u64, AccessError> {
        self.geometry.pixel_address(x, y, role_offset)
    }
}
