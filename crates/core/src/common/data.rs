//! Memory Access Types.
//!
//! These types describe the requests the trace driver hands to the cache hierarchy.
//! They are used for the following:
//! 1. **Counter Selection:** Loads and stores are tallied separately at every level.
//! 2. **Cost Selection:** Loads are charged read energy, stores write energy.
//! 3. **Trace Inspection:** Tests and trace dumps observe the exact request sequence.

use serde::Serialize;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    /// Data read of a source pixel (or interpolation tap).
    Load,

    /// Data write of a destination pixel.
    Store,
}

/// A single request issued by the trace driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AccessEvent {
    /// Load or store.
    pub kind: AccessKind,
    /// Linear byte address in the flat image address space.
    pub address: u64,
    /// Request size in bytes (one pixel).
    pub size: u64,
}

impl AccessEvent {
    /// Creates a load event.
    #[inline]
    pub const fn load(address: u64, size: u64) -> Self {
        Self {
            kind: AccessKind::Load,
            address,
            size,
        }
    }

    /// Creates a store event.
    #[inline]
    pub const fn store(address: u64, size: u64) -> Self {
        Self {
            kind: AccessKind::Store,
            address,
            size,
        }
    }
}
