//! Cost model.
//!
//! Per-access time and energy constants for every cache level and for DRAM.
//! They come from an external hardware characterization step and are consumed
//! here as plain numbers; nothing in this crate derives them. This module provides:
//! 1. **Input parsing:** JSON entries given as objects or as positional `[time, read, write]` lists.
//! 2. **Resolution:** Required values are enforced; a missing write energy defaults to 0.0 with a warning.
//! 3. **Aggregation:** Counters times constants, normalized per pixel (see [`aggregate()`]).

/// Energy/time aggregation over final counters.
pub mod aggregate;

use serde::{Deserialize, Serialize};

pub use aggregate::{LevelCost, Metrics, aggregate};

use crate::common::error::CostModelError;

/// Resolved constants for one level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccessCost {
    /// Time per access in nanoseconds.
    pub access_time_ns: f64,
    /// Energy per read access in nanojoules.
    pub read_energy_nj: f64,
    /// Energy per write access in nanojoules.
    pub write_energy_nj: f64,
}

impl AccessCost {
    /// Creates a cost entry.
    pub const fn new(access_time_ns: f64, read_energy_nj: f64, write_energy_nj: f64) -> Self {
        Self {
            access_time_ns,
            read_energy_nj,
            write_energy_nj,
        }
    }

    /// Multiplies all three constants by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(
            self.access_time_ns * factor,
            self.read_energy_nj * factor,
            self.write_energy_nj * factor,
        )
    }
}

/// Cost entry as supplied by the characterization tool.
///
/// Either an object with named fields or a list of two or three numbers in the
/// order `access_time, read_energy, write_energy`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAccessCost {
    /// Positional values.
    Values(Vec<f64>),
    /// Named values, any of which may be absent.
    Fields {
        /// Time per access in nanoseconds.
        #[serde(default, alias = "access_time")]
        access_time_ns: Option<f64>,
        /// Energy per read in nanojoules.
        #[serde(default, alias = "read_energy")]
        read_energy_nj: Option<f64>,
        /// Energy per write in nanojoules.
        #[serde(default, alias = "write_energy")]
        write_energy_nj: Option<f64>,
    },
}

impl RawAccessCost {
    /// Resolves the entry named `entry` into constants.
    ///
    /// # Errors
    ///
    /// Returns [`CostModelError`] if the access time or read energy is missing,
    /// a positional list does not hold two or three values, or any value is
    /// negative or not finite.
    pub fn resolve(&self, entry: &str) -> Result<AccessCost, CostModelError> {
        let (time, read, write) = match self {
            Self::Values(values) => match values.as_slice() {
                [t, r] => (Some(*t), Some(*r), None),
                [t, r, w] => (Some(*t), Some(*r), Some(*w)),
                other => {
                    return Err(CostModelError::BadArity {
                        entry: entry.to_string(),
                        len: other.len(),
                    });
                }
            },
            Self::Fields {
                access_time_ns,
                read_energy_nj,
                write_energy_nj,
            } => (*access_time_ns, *read_energy_nj, *write_energy_nj),
        };

        let access_time_ns = require(entry, "access_time_ns", time)?;
        let read_energy_nj = require(entry, "read_energy_nj", read)?;
        let write_energy_nj = match write {
            Some(value) => check(entry, "write_energy_nj", value)?,
            None => {
                tracing::warn!(entry, "write_energy_nj not supplied, defaulting to 0.0");
                0.0
            }
        };

        Ok(AccessCost::new(access_time_ns, read_energy_nj, write_energy_nj))
    }
}

fn require(entry: &str, field: &'static str, value: Option<f64>) -> Result<f64, CostModelError> {
    let value = value.ok_or_else(|| CostModelError::MissingValue {
        entry: entry.to_string(),
        field,
    })?;
    check(entry, field, value)
}

fn check(entry: &str, field: &'static str, value: f64) -> Result<f64, CostModelError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CostModelError::InvalidValue {
            entry: entry.to_string(),
            field,
            value,
        })
    }
}

/// Unresolved cost model file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RawCostModel {
    /// Cache levels, nearest first.
    pub levels: Vec<RawAccessCost>,
    /// Main memory.
    pub dram: RawAccessCost,
}

/// Per-access constants for every cache level and DRAM. Read-only once loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Cache levels, nearest first.
    pub levels: Vec<AccessCost>,
    /// Main memory.
    pub dram: AccessCost,
}

impl CostModel {
    /// Creates a cost model from resolved constants.
    pub const fn new(levels: Vec<AccessCost>, dram: AccessCost) -> Self {
        Self { levels, dram }
    }

    /// Resolves every entry of a raw model. Cache levels are named `L1`, `L2`, ...
    ///
    /// # Errors
    ///
    /// Returns the first entry's [`CostModelError`].
    pub fn from_raw(raw: &RawCostModel) -> Result<Self, CostModelError> {
        let levels = raw
            .levels
            .iter()
            .enumerate()
            .map(|(i, entry)| entry.resolve(&format!("L{}", i + 1)))
            .collect::<Result<Vec<_>, _>>()?;
        let dram = raw.dram.resolve("DRAM")?;
        Ok(Self { levels, dram })
    }

    /// Parses and resolves a JSON cost model.
    ///
    /// # Examples
    ///
    /// ```
    /// use warpcache_core::cost::CostModel;
    ///
    /// let model = CostModel::from_json(r#"{
    ///     "levels": [[0.5, 0.01, 0.012], { "access_time": 3.1, "read_energy": 0.2 }],
    ///     "dram": [50.0, 5.0, 5.5]
    /// }"#).unwrap();
    /// assert_eq!(model.levels.len(), 2);
    /// assert_eq!(model.levels[1].write_energy_nj, 0.0);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CostModelError::Parse`] for malformed JSON, otherwise as [`CostModel::from_raw`].
    pub fn from_json(json: &str) -> Result<Self, CostModelError> {
        let raw: RawCostModel =
            serde_json::from_str(json).map_err(|e| CostModelError::Parse(e.to_string()))?;
        Self::from_raw(&raw)
    }

    /// Copy with the DRAM constants multiplied by `multiplier`.
    pub fn scaled_dram(&self, multiplier: f64) -> Self {
        Self {
            levels: self.levels.clone(),
            dram: self.dram.scaled(multiplier),
        }
    }

    /// Ensures there is one entry per cache level.
    ///
    /// # Errors
    ///
    /// Returns [`CostModelError::LevelCountMismatch`] otherwise.
    pub fn check_levels(&self, expected: usize) -> Result<(), CostModelError> {
        if self.levels.len() == expected {
            Ok(())
        } else {
            Err(CostModelError::LevelCountMismatch {
                expected,
                got: self.levels.len(),
            })
        }
    }
}
