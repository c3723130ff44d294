//! Geometric resampling kernels.
//!
//! A [`Kernel`] maps each destination pixel `(x', y')` to the source coordinate
//! it reads from. Flips land exactly on the pixel grid; rotation lands between
//! pixels and is therefore resolved by bilinear interpolation over four taps.
//!
//! Rotation is always treated as interpolating, even for multiples of 90°, so
//! every rotated pixel costs four taps regardless of the drawn angle.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::ImageGeometry;
use crate::common::error::ConfigError;

/// Kernel selector as it appears in configuration (`rot`, `hflip`, `vflip`).
///
/// Deserialization goes through [`FromStr`], so an unknown name reports
/// [`ConfigError::UnknownKernel`] whether it comes from JSON or the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum KernelKind {
    /// Rotation by a random angle, drawn once per image.
    #[default]
    #[serde(rename = "rot")]
    Rot,
    /// Horizontal flip.
    #[serde(rename = "hflip")]
    HFlip,
    /// Vertical flip.
    #[serde(rename = "vflip")]
    VFlip,
}

impl KernelKind {
    /// All selectable kernels, in the order the experiment grid sweeps them.
    pub const ALL: [Self; 3] = [Self::Rot, Self::HFlip, Self::VFlip];

    /// Configuration name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rot => "rot",
            Self::HFlip => "hflip",
            Self::VFlip => "vflip",
        }
    }

    /// Draws this image's kernel parameters.
    ///
    /// Only rotation consumes randomness: one angle from
    /// `[-max_rotation_degrees, max_rotation_degrees]`.
    pub fn instantiate<R: Rng>(self, rng: &mut R, max_rotation_degrees: f64) -> Kernel {
        match self {
            Self::Rot => {
                let bound = max_rotation_degrees.abs();
                Kernel::Rotate {
                    angle_degrees: rng.random_range(-bound..=bound),
                }
            }
            Self::HFlip => Kernel::HorizontalFlip,
            Self::VFlip => Kernel::VerticalFlip,
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for KernelKind {
    type Error = ConfigError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl FromStr for KernelKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rot" => Ok(Self::Rot),
            "hflip" => Ok(Self::HFlip),
            "vflip" => Ok(Self::VFlip),
            other => Err(ConfigError::UnknownKernel(other.to_string())),
        }
    }
}

/// A kernel with its parameters fixed for one image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Kernel {
    /// Rotation about the image center offset, by `angle_degrees`.
    Rotate {
        /// Rotation angle in degrees.
        angle_degrees: f64,
    },
    /// Mirror across the vertical axis.
    HorizontalFlip,
    /// Mirror across the horizontal axis.
    VerticalFlip,
}

impl Kernel {
    /// Whether source coordinates need four-tap interpolation.
    pub const fn needs_interpolation(&self) -> bool {
        matches!(self, Self::Rotate { .. })
    }

    /// Binds the kernel to an image geometry.
    pub fn transform(&self, geometry: &ImageGeometry) -> Transform {
        match *self {
            Self::Rotate { angle_degrees } => {
                let (sin, cos) = angle_degrees.to_radians().sin_cos();
                Transform::Rotate {
                    cos,
                    sin,
                    center_x: geometry.width as f64 / 2.0,
                    center_y: geometry.height as f64 / 2.0,
                }
            }
            Self::HorizontalFlip => Transform::HorizontalFlip {
                width: geometry.width as i64,
            },
            Self::VerticalFlip => Transform::VerticalFlip {
                height: geometry.height as i64,
            },
        }
    }
}

/// Source coordinate produced by a transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SourceCoord {
    /// Lands on the pixel grid.
    Exact(i64, i64),
    /// Lands between pixels.
    Fractional(f64, f64),
}

/// A kernel bound to a geometry: the `(x', y') -> (x, y)` map itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transform {
    /// `(x, y) = R(angle) · (x', y') + (width / 2, height / 2)`.
    Rotate {
        /// Cosine of the angle.
        cos: f64,
        /// Sine of the angle.
        sin: f64,
        /// Horizontal offset.
        center_x: f64,
        /// Vertical offset.
        center_y: f64,
    },
    /// `(x, y) = (width - x' - 1, y')`.
    HorizontalFlip {
        /// Image width.
        width: i64,
    },
    /// `(x, y) = (x', height - y' - 1)`.
    VerticalFlip {
        /// Image height.
        height: i64,
    },
}

impl Transform {
    /// Whether [`Transform::apply`] yields fractional coordinates.
    pub const fn needs_interpolation(&self) -> bool {
        matches!(self, Self::Rotate { .. })
    }

    /// Maps destination `(x', y')` to its source coordinate.
    #[inline]
    pub fn apply(&self, x: i64, y: i64) -> SourceCoord {
        match *self {
            Self::Rotate {
                cos,
                sin,
                center_x,
                center_y,
            } => {
                let (xf, yf) = (x as f64, y as f64);
                SourceCoord::Fractional(
                    cos.mul_add(xf, sin * yf) + center_x,
                    (-sin).mul_add(xf, cos * yf) + center_y,
                )
            }
            Self::HorizontalFlip { width } => SourceCoord::Exact(width - x - 1, y),
            Self::VerticalFlip { height } => SourceCoord::Exact(x, height - y - 1),
        }
    }
}
