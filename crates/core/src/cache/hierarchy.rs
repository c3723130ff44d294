//! Multi-level cache hierarchy.
//!
//! Levels are ordered nearest first and backed by [`MainMemory`]. A request
//! walks the levels until one hits; every level it misses in allocates the
//! block and forwards one request of the same kind to the next level. Main
//! memory terminates the walk and always hits, so access counts telescope:
//! each level's loads equal the previous level's load misses, and likewise
//! for stores.

use serde::Serialize;

use super::CacheLevel;
use crate::common::data::{AccessEvent, AccessKind};
use crate::common::error::AccessError;
use crate::config::{CacheGeometry, ValidatedConfig};
use crate::image::AddressLayout;
use crate::stats::LevelStats;

/// Backing store. Never misses and forwards nowhere.
#[derive(Debug, Clone)]
pub struct MainMemory {
    stats: LevelStats,
}

impl MainMemory {
    /// Name used for the memory entry in reports.
    pub const NAME: &'static str = "DRAM";

    /// Creates an untouched main memory.
    pub fn new() -> Self {
        Self {
            stats: LevelStats::new(Self::NAME),
        }
    }

    /// Records one request; always a hit.
    pub fn access(&mut self, kind: AccessKind) {
        self.stats.record(kind, true);
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &LevelStats {
        &self.stats
    }
}

impl Default for MainMemory {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a request was finally serviced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AccessOutcome {
    /// Hit in the cache level with this index (0 = nearest).
    Level(usize),
    /// Missed every level and was serviced by main memory.
    Memory,
}

/// An owned cache hierarchy for one simulation run.
#[derive(Debug)]
pub struct CacheHierarchy {
    levels: Vec<CacheLevel>,
    memory: MainMemory,
    address_space_bytes: u64,
}

impl CacheHierarchy {
    /// Creates an empty hierarchy over an address space of `address_space_bytes`.
    pub fn new(levels: &[CacheGeometry], address_space_bytes: u64) -> Self {
        Self {
            levels: levels.iter().map(CacheLevel::new).collect(),
            memory: MainMemory::new(),
            address_space_bytes,
        }
    }

    /// Creates the hierarchy a validated configuration describes, sized to its batch layout.
    pub fn from_config(config: &ValidatedConfig) -> Self {
        let layout = AddressLayout::new(config.image, config.n_images);
        Self::new(
            &config.levels,
            layout.address_space_bytes(config.model_stores),
        )
    }

    /// Cache levels, nearest first.
    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    /// Main memory.
    pub const fn memory(&self) -> &MainMemory {
        &self.memory
    }

    /// Size of the declared address space in bytes.
    pub const fn address_space_bytes(&self) -> u64 {
        self.address_space_bytes
    }

    /// Issues a load of `size` bytes at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::AddressOutOfRange`] if the request leaves the address space.
    pub fn load(&mut self, addr: u64, size: u64) -> Result<AccessOutcome, AccessError> {
        self.request(AccessKind::Load, addr, size)
    }

    /// Issues a store of `size` bytes at `addr` (write-allocate).
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::AddressOutOfRange`] if the request leaves the address space.
    pub fn store(&mut self, addr: u64, size: u64) -> Result<AccessOutcome, AccessError> {
        self.request(AccessKind::Store, addr, size)
    }

    /// Issues a recorded trace event.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::AddressOutOfRange`] if the request leaves the address space.
    pub fn issue(&mut self, event: AccessEvent) -> Result<AccessOutcome, AccessError> {
        self.request(event.kind, event.address, event.size)
    }

    fn request(
        &mut self,
        kind: AccessKind,
        addr: u64,
        size: u64,
    ) -> Result<AccessOutcome, AccessError> {
        let in_range = addr
            .checked_add(size)
            .is_some_and(|end| end <= self.address_space_bytes);
        if !in_range {
            return Err(AccessError::AddressOutOfRange {
                address: addr,
                size,
                limit: self.address_space_bytes,
            });
        }

        for (index, level) in self.levels.iter_mut().enumerate() {
            if level.access(addr, kind) {
                return Ok(AccessOutcome::Level(index));
            }
        }
        self.memory.access(kind);
        Ok(AccessOutcome::Memory)
    }

    /// Snapshot of every level's counters plus main memory.
    pub fn stats(&self) -> HierarchyStats {
        HierarchyStats {
            levels: self.levels.iter().map(|l| l.stats().clone()).collect(),
            dram: self.memory.stats().clone(),
        }
    }

    /// Empties every level and clears all counters.
    pub fn reset(&mut self) {
        for level in &mut self.levels {
            level.reset();
        }
        self.memory = MainMemory::new();
    }
}

/// Counters of a whole hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HierarchyStats {
    /// Cache levels, nearest first.
    pub levels: Vec<LevelStats>,
    /// Main memory.
    pub dram: LevelStats,
}
