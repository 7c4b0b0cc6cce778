//! Miss-Counter LRU Replacement Policy.
//!
//! Every way of every set carries a counter of accesses that went to *other* ways
//! since this way was last used. A hit increments all counters in the set and then
//! zeroes the hit way; a fill zeroes the filled way and leaves the others alone. The
//! victim is the way with the highest counter, ties going to the lowest way number.
//!
//! This realizes LRU without timestamps or usage stacks and reproduces the hardware
//! replacement order exactly.
//!
//! # Performance
//!
//! - `update()`: O(W) where W is the associativity
//! - `get_victim()`: O(W)
//! - Space: O(S × W) counters

use super::ReplacementPolicy;

/// Miss-counter LRU state.
#[derive(Clone, Debug)]
pub struct MissCounterLru {
    /// Per-way counters, `ways` entries per set.
    miss: Vec<u32>,
    ways: usize,
}

impl MissCounterLru {
    /// Creates a new policy instance with every counter at zero.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            miss: vec![0; sets * ways],
            ways,
        }
    }

    /// Returns the counter of one way.
    pub fn counter(&self, set: usize, way: usize) -> u32 {
        self.miss[set * self.ways + way]
    }

    fn set_mut(&mut self, set: usize) -> &mut [u32] {
        let base = set * self.ways;
        &mut self.miss[base..base + self.ways]
    }
}

impl ReplacementPolicy for MissCounterLru {
    fn update(&mut self, set: usize, way: usize) {
        let counters = self.set_mut(set);
        for c in counters.iter_mut() {
            *c = c.saturating_add(1);
        }
        counters[way] = 0;
    }

    fn install(&mut self, set: usize, way: usize) {
        self.set_mut(set)[way] = 0;
    }

    /// Returns the first way holding the strictly largest counter.
    fn get_victim(&mut self, set: usize) -> usize {
        let mut target = 0;
        let mut max = 0;
        for (way, &miss) in self.set_mut(set).iter().enumerate() {
            if max < miss {
                max = miss;
                target = way;
            }
        }
        target
    }
}
