//! Cache Replacement Policies.
//!
//! Implements the algorithm that selects victim lines in a set-associative cache.
//! The cache itself prefers an invalid way; the policy is only consulted once every
//! way in the set holds a valid line.
//!
//! # Policies
//!
//! - `MissCounterLru`: least recently used, tracked with per-way miss counters.

/// Miss-counter LRU replacement policy.
pub mod lru;

pub use lru::MissCounterLru;

/// Trait for cache replacement policies.
///
/// Defines the interface for updating usage state and selecting victim lines.
pub trait ReplacementPolicy: Send + std::fmt::Debug {
    /// Updates the policy state when a lookup hits.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    /// * `way` - The way index within the set that hit.
    fn update(&mut self, set: usize, way: usize);

    /// Updates the policy state when a line is filled after a miss.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    /// * `way` - The way that received the new line.
    fn install(&mut self, set: usize, way: usize);

    /// Selects a victim line to evict from a full set.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    ///
    /// # Returns
    ///
    /// The index of the way to evict.
    fn get_victim(&mut self, set: usize) -> usize;
}
