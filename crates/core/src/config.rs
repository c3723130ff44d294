//! Configuration system for the resampling cache model.
//!
//! This module defines all configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline batch, image, and cache constants.
//! 2. **Structures:** `SimConfig` and per-level `CacheLevelConfig`, deserializable from JSON.
//! 3. **Validation:** Static checks that turn a `SimConfig` into a `ValidatedConfig`
//!    (normalized cache geometry) before any simulator state is created.

use serde::{Deserialize, Serialize};

use crate::common::error::ConfigError;
use crate::image::{ImageGeometry, KernelKind};

/// Default configuration constants.
///
/// These match the baseline of the batch-size experiments.
mod defaults {
    /// Default image width and height in pixels.
    pub const IMAGE_SIZE: u64 = 250;

    /// Default bytes per pixel (packed RGB).
    pub const PIXEL_SIZE: u64 = 3;

    /// Default number of images in a batch.
    pub const N_IMAGES: u64 = 1;

    /// Default L1 capacity (32 KiB).
    pub const L1_CAPACITY: u64 = 32 * 1024;

    /// Default L2 capacity (2 MiB).
    pub const L2_CAPACITY: u64 = 2 * 1024 * 1024;

    /// Default block size in bytes.
    pub const BLOCK_SIZE: u64 = 64;

    /// Default associativity.
    pub const WAYS: u64 = 8;

    /// Default number of rows processed together.
    pub const PARALLELISM: u64 = 1;

    /// Default DRAM cost multiplier.
    pub const DRAM_MULTIPLIER: f64 = 1.0;

    /// Default rotation bound in degrees; angles are drawn from `[-bound, bound]`.
    pub const MAX_ROTATION_DEGREES: f64 = 90.0;

    /// Largest number of lines a single level may hold (256 MiB of 64-byte blocks).
    pub const MAX_LINES: u64 = 1 << 22;
}

/// Cache replacement policy algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Least Recently Used replacement policy.
    #[default]
    #[serde(alias = "Lru", alias = "lru")]
    Lru,
}

/// Individual cache level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheLevelConfig {
    /// Display name (`L1`, `L2`, ...).
    pub name: String,

    /// Total capacity in bytes.
    pub capacity_bytes: u64,

    /// Block (line) size in bytes.
    #[serde(default = "CacheLevelConfig::default_block_size")]
    pub block_size: u64,

    /// Associativity. Zero selects a fully associative level.
    #[serde(default = "CacheLevelConfig::default_ways")]
    pub ways: u64,

    /// Replacement policy.
    #[serde(default)]
    pub policy: ReplacementPolicy,
}

impl CacheLevelConfig {
    /// Creates a level with LRU replacement.
    pub fn new(name: impl Into<String>, capacity_bytes: u64, block_size: u64, ways: u64) -> Self {
        Self {
            name: name.into(),
            capacity_bytes,
            block_size,
            ways,
            policy: ReplacementPolicy::Lru,
        }
    }

    /// Largest number of lines a level may hold; every line is allocated up front.
    pub const MAX_LINES: u64 = defaults::MAX_LINES;

    fn default_block_size() -> u64 {
        defaults::BLOCK_SIZE
    }

    fn default_ways() -> u64 {
        defaults::WAYS
    }

    /// Validates this level and normalizes `ways == 0` to a fully associative shape.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming this level if capacity or block size is zero,
    /// the block is smaller than `access_size`, `block_size * ways` overflows, the
    /// capacity does not divide evenly, or the level holds more than
    /// [`CacheLevelConfig::MAX_LINES`] lines.
    pub fn geometry(&self, access_size: u64) -> Result<CacheGeometry, ConfigError> {
        if self.capacity_bytes == 0 {
            return Err(ConfigError::ZeroCapacity {
                level: self.name.clone(),
            });
        }
        if self.block_size == 0 {
            return Err(ConfigError::ZeroBlockSize {
                level: self.name.clone(),
            });
        }
        if self.block_size < access_size {
            return Err(ConfigError::BlockSmallerThanAccess {
                level: self.name.clone(),
                block_size: self.block_size,
                access_size,
            });
        }

        let divisor = if self.ways == 0 {
            Some(self.block_size)
        } else {
            self.block_size.checked_mul(self.ways)
        }
        .ok_or_else(|| ConfigError::GeometryOverflow {
            level: self.name.clone(),
        })?;
        if self.capacity_bytes % divisor != 0 {
            return Err(ConfigError::CapacityNotDivisible {
                level: self.name.clone(),
                capacity: self.capacity_bytes,
                divisor,
            });
        }

        let lines = self.capacity_bytes / self.block_size;
        if lines > Self::MAX_LINES {
            return Err(ConfigError::LevelTooLarge {
                level: self.name.clone(),
                lines,
                max: Self::MAX_LINES,
            });
        }

        let (sets, ways) = if self.ways == 0 {
            (1, lines)
        } else {
            (self.capacity_bytes / divisor, self.ways)
        };

        Ok(CacheGeometry {
            name: self.name.clone(),
            sets: sets as usize,
            ways: ways as usize,
            block_size: self.block_size,
            policy: self.policy,
        })
    }
}

/// Normalized shape of one cache level. `sets * ways * block_size == capacity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheGeometry {
    /// Display name.
    pub name: String,
    /// Number of sets.
    pub sets: usize,
    /// Blocks per set.
    pub ways: usize,
    /// Block size in bytes.
    pub block_size: u64,
    /// Replacement policy.
    pub policy: ReplacementPolicy,
}

impl CacheGeometry {
    /// Total capacity in bytes.
    pub const fn capacity(&self) -> u64 {
        self.sets as u64 * self.ways as u64 * self.block_size
    }
}

/// Root configuration for one simulation run.
///
/// # Examples
///
/// ```
/// use warpcache_core::config::SimConfig;
/// use warpcache_core::image::KernelKind;
///
/// let json = r#"{
///     "kernel": "hflip",
///     "image": { "width": 4, "height": 4, "pixel_size": 3 },
///     "n_images": 1,
///     "levels": [
///         { "name": "L1", "capacity_bytes": 12, "block_size": 12, "ways": 1 },
///         { "name": "L2", "capacity_bytes": 4096, "block_size": 64, "ways": 8 }
///     ]
/// }"#;
///
/// let config: SimConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.kernel, KernelKind::HFlip);
/// assert_eq!(config.parallelism, 1);
/// assert!(!config.model_stores);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Kernel to simulate.
    #[serde(default)]
    pub kernel: KernelKind,

    /// Geometry shared by every image in the batch.
    #[serde(default)]
    pub image: ImageGeometry,

    /// Number of images in the batch.
    #[serde(default = "SimConfig::default_n_images")]
    pub n_images: u64,

    /// Cache levels, nearest first.
    #[serde(default = "SimConfig::default_levels")]
    pub levels: Vec<CacheLevelConfig>,

    /// Number of consecutive rows processed together.
    #[serde(default = "SimConfig::default_parallelism")]
    pub parallelism: u64,

    /// Issue one store per destination pixel into the write region.
    #[serde(default)]
    pub model_stores: bool,

    /// Scale applied to all three DRAM cost constants.
    #[serde(default = "SimConfig::default_dram_multiplier")]
    pub dram_multiplier: f64,

    /// Seed for the per-image rotation angle source.
    #[serde(default)]
    pub seed: u64,

    /// Rotation angles are drawn uniformly from `[-max_rotation_degrees, max_rotation_degrees]`.
    #[serde(default = "SimConfig::default_max_rotation")]
    pub max_rotation_degrees: f64,
}

impl SimConfig {
    fn default_n_images() -> u64 {
        defaults::N_IMAGES
    }

    fn default_levels() -> Vec<CacheLevelConfig> {
        vec![
            CacheLevelConfig::new(
                "L1",
                defaults::L1_CAPACITY,
                defaults::BLOCK_SIZE,
                defaults::WAYS,
            ),
            CacheLevelConfig::new(
                "L2",
                defaults::L2_CAPACITY,
                defaults::BLOCK_SIZE,
                defaults::WAYS,
            ),
        ]
    }

    fn default_parallelism() -> u64 {
        defaults::PARALLELISM
    }

    fn default_dram_multiplier() -> f64 {
        defaults::DRAM_MULTIPLIER
    }

    fn default_max_rotation() -> f64 {
        defaults::MAX_ROTATION_DEGREES
    }

    /// Runs every static check and normalizes the cache levels.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered, naming the offending parameter.
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        let image = self.image;
        if image.width == 0 {
            return Err(ConfigError::ZeroDimension { param: "width" });
        }
        if image.height == 0 {
            return Err(ConfigError::ZeroDimension { param: "height" });
        }
        if image.pixel_size == 0 {
            return Err(ConfigError::ZeroDimension {
                param: "pixel_size",
            });
        }
        if self.n_images == 0 {
            return Err(ConfigError::NoImages);
        }
        if self.levels.is_empty() {
            return Err(ConfigError::NoCacheLevels);
        }
        if self.parallelism == 0 {
            return Err(ConfigError::ZeroParallelism);
        }
        if !self.dram_multiplier.is_finite() || self.dram_multiplier < 0.0 {
            return Err(ConfigError::InvalidMultiplier(self.dram_multiplier));
        }
        if !self.max_rotation_degrees.is_finite() {
            return Err(ConfigError::InvalidRotation(self.max_rotation_degrees));
        }

        let image_bytes = image
            .width
            .checked_mul(image.height)
            .and_then(|px| px.checked_mul(image.pixel_size));
        // The write region doubles the footprint when stores are modeled.
        let span = image_bytes
            .and_then(|bytes| bytes.checked_mul(self.n_images))
            .and_then(|bytes| bytes.checked_mul(2));
        if span.is_none() {
            return Err(ConfigError::AddressSpaceOverflow {
                n_images: self.n_images,
                image_bytes: image_bytes.unwrap_or(u64::MAX),
            });
        }

        let levels = self
            .levels
            .iter()
            .map(|level| level.geometry(image.pixel_size))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidatedConfig {
            kernel: self.kernel,
            image,
            n_images: self.n_images,
            levels,
            parallelism: self.parallelism,
            model_stores: self.model_stores,
            dram_multiplier: self.dram_multiplier,
            seed: self.seed,
            max_rotation_degrees: self.max_rotation_degrees,
        })
    }
}

impl Default for SimConfig {
    /// Creates the default configuration: one 250x250 RGB image rotated through a
    /// 32 KiB L1 and a 2 MiB L2, both 8-way with 64-byte blocks.
    fn default() -> Self {
        Self {
            kernel: KernelKind::default(),
            image: ImageGeometry::default(),
            n_images: defaults::N_IMAGES,
            levels: Self::default_levels(),
            parallelism: defaults::PARALLELISM,
            model_stores: false,
            dram_multiplier: defaults::DRAM_MULTIPLIER,
            seed: 0,
            max_rotation_degrees: defaults::MAX_ROTATION_DEGREES,
        }
    }
}

impl Default for ImageGeometry {
    fn default() -> Self {
        Self {
            width: defaults::IMAGE_SIZE,
            height: defaults::IMAGE_SIZE,
            pixel_size: defaults::PIXEL_SIZE,
        }
    }
}

/// A configuration that passed [`SimConfig::validate`]. Immutable for the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedConfig {
    /// Kernel to simulate.
    pub kernel: KernelKind,
    /// Image geometry (all dimensions positive).
    pub image: ImageGeometry,
    /// Number of images (positive).
    pub n_images: u64,
    /// Normalized cache levels, nearest first.
    pub levels: Vec<CacheGeometry>,
    /// Rows processed together (positive).
    pub parallelism: u64,
    /// Whether destination stores are issued.
    pub model_stores: bool,
    /// DRAM cost multiplier.
    pub dram_multiplier: f64,
    /// Angle-source seed.
    pub seed: u64,
    /// Rotation bound in degrees.
    pub max_rotation_degrees: f64,
}

impl ValidatedConfig {
    /// Total destination pixels across the batch.
    pub const fn total_pixels(&self) -> u64 {
        self.n_images * self.image.pixels()
    }
}
