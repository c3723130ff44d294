//! Least Recently Used (LRU) Replacement Policy.
//!
//! Evicts the line that has not been accessed for the longest time. Each set
//! keeps a usage stack of way indices; an access moves its way to the top
//! (Most Recently Used) and the bottom of the stack is the victim.
//!
//! The stacks live in one flat arena of `sets * ways` entries, so a set is the
//! slice `[set * ways, (set + 1) * ways)` and no per-set allocation exists.
//!
//! # Performance
//!
//! - `update()`: O(W) where W is the associativity
//! - `get_victim()`: O(1)
//! - Space: O(S × W)

use super::ReplacementPolicy;

/// LRU Policy state.
#[derive(Debug, Clone)]
pub struct LruPolicy {
    /// Concatenated usage stacks. Within a set, index 0 is MRU and the last index is LRU.
    order: Vec<usize>,
    ways: usize,
}

impl LruPolicy {
    /// Creates a new LRU policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        let order = (0..sets).flat_map(|_| 0..ways).collect();
        Self { order, ways }
    }

    fn stack_mut(&mut self, set: usize) -> &mut [usize] {
        let start = set * self.ways;
        &mut self.order[start..start + self.ways]
    }

    /// Usage stack of `set`, MRU first.
    pub fn stack(&self, set: usize) -> &[usize] {
        let start = set * self.ways;
        &self.order[start..start + self.ways]
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Moves `way` to the MRU position, shifting the more recent ways down by one.
    fn update(&mut self, set: usize, way: usize) {
        let stack = self.stack_mut(set);
        if let Some(pos) = stack.iter().position(|&w| w == way) {
            stack[..=pos].rotate_right(1);
        }
    }

    /// Returns the way at the bottom of the usage stack.
    fn get_victim(&mut self, set: usize) -> usize {
        self.stack(set).last().copied().unwrap_or(0)
    }

    fn reset(&mut self) {
        let ways = self.ways;
        for (i, slot) in self.order.iter_mut().enumerate() {
            *slot = i % ways;
        }
    }
}
