//! Common types shared across the model.
//!
//! This module provides:
//! 1. **Access Kinds:** Classification of memory requests as loads or stores.
//! 2. **Error Handling:** Configuration, cost-model, and access-invariant errors.

/// Memory access classification.
pub mod data;

/// Error taxonomy for configuration, cost model, and runtime invariants.
pub mod error;

pub use data::{AccessEvent, AccessKind};
pub use error::{AccessError, ConfigError, CostModelError, SimError};
