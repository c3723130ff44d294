//! Image-side model: where a destination pixel reads from and where its bytes live.
//!
//! This module provides:
//! 1. **Geometry:** Image dimensions and pixel size.
//! 2. **Kernels:** Rotation and flip transforms mapping destination to source coordinates.
//! 3. **Border:** Reflect-101 handling for source coordinates that fall outside the image.
//! 4. **Layout:** Translation of pixel coordinates into linear byte addresses.

/// Reflect-101 border policy.
pub mod border;

/// Image dimensions.
pub mod geometry;

/// Geometric kernels and their coordinate transforms.
pub mod kernel;

/// Flat address-space layout (read and write regions).
pub mod layout;

pub use border::reflect_101;
pub use geometry::ImageGeometry;
pub use kernel::{Kernel, KernelKind, SourceCoord, Transform};
pub use layout::{AddressLayout, Region};
