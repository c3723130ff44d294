//! Error definitions.
//!
//! This module defines every way a simulation run can fail. It provides:
//! 1. **Configuration Errors:** Static parameter checks performed before any simulator state exists.
//! 2. **Cost-Model Errors:** Missing or malformed externally supplied timing/energy values.
//! 3. **Access Errors:** Runtime invariant violations (coordinates or addresses out of range).
//! 4. **Run Errors:** The umbrella type returned by the pipeline.

use thiserror::Error;

/// Invalid static configuration, rejected before simulation starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// An image dimension (`width`, `height` or `pixel_size`) is zero.
    #[error("image {param} must be positive")]
    ZeroDimension {
        /// Name of the offending dimension.
        param: &'static str,
    },

    /// `n_images` is zero.
    #[error("n_images must be at least 1")]
    NoImages,

    /// The hierarchy has no cache levels.
    #[error("at least one cache level is required")]
    NoCacheLevels,

    /// A level's capacity is zero.
    #[error("cache level {level}: capacity_bytes must be positive")]
    ZeroCapacity {
        /// Level name.
        level: String,
    },

    /// A level's block size is zero.
    #[error("cache level {level}: block_size must be positive")]
    ZeroBlockSize {
        /// Level name.
        level: String,
    },

    /// A level's block is smaller than one pixel access (sub-block splitting is not modeled).
    #[error("cache level {level}: block_size {block_size} is smaller than the {access_size}-byte pixel access")]
    BlockSmallerThanAccess {
        /// Level name.
        level: String,
        /// Configured block size.
        block_size: u64,
        /// Pixel size in bytes.
        access_size: u64,
    },

    /// Capacity does not split evenly into `block_size * ways`.
    #[error("cache level {level}: capacity {capacity} is not divisible by block_size * ways = {divisor}")]
    CapacityNotDivisible {
        /// Level name.
        level: String,
        /// Configured capacity.
        capacity: u64,
        /// `block_size * ways` (or `block_size` when fully associative).
        divisor: u64,
    },

    /// `block_size * ways` does not fit in 64 bits.
    #[error("cache level {level}: block_size * ways overflows")]
    GeometryOverflow {
        /// Level name.
        level: String,
    },

    /// The level has more lines than the simulator will allocate.
    #[error("cache level {level}: {lines} lines exceeds the limit of {max}")]
    LevelTooLarge {
        /// Level name.
        level: String,
        /// `capacity_bytes / block_size`.
        lines: u64,
        /// Largest supported line count.
        max: u64,
    },

    /// Row parallelism must be at least one row.
    #[error("parallelism must be at least 1")]
    ZeroParallelism,

    /// DRAM multiplier is negative or not finite.
    #[error("dram_multiplier must be a finite, non-negative number (got {0})")]
    InvalidMultiplier(f64),

    /// Rotation bound is not finite.
    #[error("max_rotation_degrees must be finite (got {0})")]
    InvalidRotation(f64),

    /// Kernel name is not one of `rot`, `hflip`, `vflip`.
    #[error("unsupported kernel '{0}' (expected rot, hflip or vflip)")]
    UnknownKernel(String),

    /// The address space of the requested batch does not fit in 64 bits.
    #[error("address space of {n_images} images of {image_bytes} bytes overflows")]
    AddressSpaceOverflow {
        /// Number of images requested.
        n_images: u64,
        /// Bytes per image.
        image_bytes: u64,
    },
}

/// Malformed or missing externally supplied cost values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostModelError {
    /// A required value (`access_time_ns` or `read_energy_nj`) is absent.
    #[error("cost entry {entry}: missing {field}")]
    MissingValue {
        /// Level or `DRAM`.
        entry: String,
        /// Name of the missing value.
        field: &'static str,
    },

    /// A value is negative, NaN or infinite.
    #[error("cost entry {entry}: {field} must be finite and non-negative (got {value})")]
    InvalidValue {
        /// Level or `DRAM`.
        entry: String,
        /// Name of the offending value.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A positional entry does not hold two or three numbers.
    #[error("cost entry {entry}: expected 2 or 3 values, got {len}")]
    BadArity {
        /// Level or `DRAM`.
        entry: String,
        /// Number of values supplied.
        len: usize,
    },

    /// The cost model describes a different number of levels than the hierarchy.
    #[error("cost model has {got} cache levels but the hierarchy has {expected}")]
    LevelCountMismatch {
        /// Number of cache levels in the hierarchy.
        expected: usize,
        /// Number of cache entries in the cost model.
        got: usize,
    },

    /// The cost model file could not be parsed.
    #[error("malformed cost model: {0}")]
    Parse(String),
}

/// Runtime invariant violations. These indicate a geometry or border-handling bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The address translator was handed a coordinate outside the image.
    #[error("pixel coordinate ({x}, {y}) outside {width}x{height} image")]
    CoordinateOutOfRange {
        /// Column.
        x: i64,
        /// Row.
        y: i64,
        /// Image width.
        width: u64,
        /// Image height.
        height: u64,
    },

    /// A request touches bytes beyond the declared address space.
    #[error("access [{address:#x}, +{size}) outside the {limit}-byte address space")]
    AddressOutOfRange {
        /// Start address.
        address: u64,
        /// Request size.
        size: u64,
        /// Size of the address space.
        limit: u64,
    },
}

/// Error returned by a simulation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Rejected configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rejected cost model.
    #[error("cost model error: {0}")]
    CostModel(#[from] CostModelError),

    /// Fatal runtime invariant violation; the run is aborted.
    #[error("runtime invariant violated: {0}")]
    Access(#[from] AccessError),
}
