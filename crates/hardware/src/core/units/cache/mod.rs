//! Set-Associative L1 Cache.
//!
//! This module implements the split L1 instruction and data caches. Unlike a timing
//! model, the caches hold real data: every word the core reads goes through them.
//! It provides:
//! 1. **Lookup and fill:** Tag/index/word extraction, hit detection, and whole-line fills
//!    from the physical store on a miss.
//! 2. **Replacement:** First invalid way, otherwise the victim chosen by the
//!    [`ReplacementPolicy`].
//! 3. **Coherence helpers:** In-place update of a cached word and invalidation by tag or
//!    range, used by the write-through path in [`hierarchy`].
//! 4. **Bypass:** Addresses at or above the cache ceiling go straight to the store.

/// Write-through memory system combining both L1 caches and RAM.
pub mod hierarchy;

/// Cache replacement policy implementations.
pub mod policies;

use self::policies::{MissCounterLru, ReplacementPolicy};
use crate::common::SimError;
use crate::config::CacheConfig;
use crate::soc::PhysicalMemory;

/// Longest supported cache line, in words.
pub const MAX_LINE_WORDS: usize = 1 << 20;

/// Cache line metadata; the payload lives in `L1Cache::data`.
#[derive(Clone, Copy, Debug, Default)]
struct CacheLine {
    tag: u32,
    valid: bool,
}

/// One set-associative L1 cache instance.
#[derive(Debug)]
pub struct L1Cache {
    /// When false, every access bypasses the cache.
    pub enabled: bool,
    /// Number of cached accesses (bypassed accesses are not counted).
    pub accesses: u64,
    /// Number of cached accesses that hit.
    pub hits: u64,
    lines: Vec<CacheLine>,
    data: Vec<u32>,
    sets: usize,
    ways: usize,
    line_words: usize,
    line_shift: u32,
    ceiling: u32,
    policy: Box<dyn ReplacementPolicy>,
}

impl L1Cache {
    /// Creates a cache with the configured geometry.
    ///
    /// Zero set and way counts fall back to one and the set count is rounded up to a
    /// power of two.
    ///
    /// # Arguments
    ///
    /// * `config` - Cache geometry.
    /// * `ceiling` - First physical address that is never cached.
    ///
    /// # Returns
    ///
    /// The cache, or [`SimError::InvalidCacheGeometry`] if the line length is not a
    /// power of two of at most [`MAX_LINE_WORDS`] words or `ceiling` is not a multiple
    /// of the line size.
    pub fn new(config: &CacheConfig, ceiling: u32) -> Result<Self, SimError> {
        let line_words = config.line_words;
        let invalid = SimError::InvalidCacheGeometry {
            line_words,
            ceiling,
        };
        if !line_words.is_power_of_two() || line_words > MAX_LINE_WORDS {
            return Err(invalid);
        }
        let line_bytes = (line_words * 4) as u32;
        if ceiling % line_bytes != 0 {
            return Err(invalid);
        }

        let sets = config.sets.max(1).next_power_of_two();
        let ways = config.ways.max(1);

        Ok(Self {
            enabled: config.enabled,
            accesses: 0,
            hits: 0,
            lines: vec![CacheLine::default(); sets * ways],
            data: vec![0; sets * ways * line_words],
            sets,
            ways,
            line_words,
            line_shift: line_bytes.trailing_zeros(),
            ceiling,
            policy: Box::new(MissCounterLru::new(sets, ways)),
        })
    }

    /// Number of sets.
    pub const fn sets(&self) -> usize {
        self.sets
    }

    /// Associativity.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Line length in bytes.
    pub const fn line_bytes(&self) -> usize {
        self.line_words * 4
    }

    /// Splits an address into `(set, tag, word)`.
    ///
    /// The tag is the address with the set-index and offset bits cleared, so all
    /// addresses of one line share it.
    #[inline]
    fn locate(&self, addr: u32) -> (usize, u32, usize) {
        let set = (addr >> self.line_shift) as usize & (self.sets - 1);
        let span_bits = self.line_shift + self.sets.trailing_zeros();
        let tag = if span_bits >= 32 {
            0
        } else {
            addr & !((1u32 << span_bits) - 1)
        };
        let word = (addr >> 2) as usize & (self.line_words - 1);
        (set, tag, word)
    }

    #[inline]
    const fn line_index(&self, set: usize, way: usize) -> usize {
        set * self.ways + way
    }

    /// Finds the valid way holding the line of `addr`.
    ///
    /// # Returns
    ///
    /// The way index on a hit, `None` on a miss.
    pub fn lookup(&self, addr: u32) -> Option<usize> {
        let (set, tag, _) = self.locate(addr);
        (0..self.ways).find(|&w| {
            let line = &self.lines[self.line_index(set, w)];
            line.valid && line.tag == tag
        })
    }

    /// Returns `true` if the line of `addr` is currently cached.
    pub fn contains(&self, addr: u32) -> bool {
        self.lookup(addr).is_some()
    }

    /// Returns `true` if `addr` is served by this cache at all.
    #[inline]
    pub const fn covers(&self, addr: u32) -> bool {
        self.enabled && addr < self.ceiling
    }

    /// Reads the word at `addr`, filling the line on a miss.
    ///
    /// # Arguments
    ///
    /// * `ram` - The physical store backing this cache.
    /// * `addr` - Physical address; the low two bits are ignored.
    ///
    /// # Returns
    ///
    /// The word, or the store's error for an address outside RAM.
    pub fn read(&mut self, ram: &mut PhysicalMemory, addr: u32) -> Result<u32, SimError> {
        if !self.covers(addr) {
            return ram.read_word(addr);
        }

        self.accesses += 1;
        let (set, _, word) = self.locate(addr);
        if let Some(way) = self.lookup(addr) {
            self.hits += 1;
            self.policy.update(set, way);
            return Ok(self.data[self.line_index(set, way) * self.line_words + word]);
        }

        let way = self.fill(ram, addr)?;
        Ok(self.data[self.line_index(set, way) * self.line_words + word])
    }

    /// Loads the line containing `addr` from the store into a victim way.
    ///
    /// # Returns
    ///
    /// The way that now holds the line.
    fn fill(&mut self, ram: &mut PhysicalMemory, addr: u32) -> Result<usize, SimError> {
        let (set, tag, _) = self.locate(addr);
        let victim = (0..self.ways)
            .find(|&w| !self.lines[self.line_index(set, w)].valid)
            .unwrap_or_else(|| self.policy.get_victim(set));

        let idx = self.line_index(set, victim);
        self.lines[idx].valid = false;

        let base = addr & !((1u32 << self.line_shift) - 1);
        let start = idx * self.line_words;
        for i in 0..self.line_words {
            self.data[start + i] = ram.read_word(base + (i as u32) * 4)?;
        }

        self.lines[idx] = CacheLine { tag, valid: true };
        self.policy.install(set, victim);
        Ok(victim)
    }

    /// Replaces the cached copy of a word if its line is present.
    ///
    /// # Returns
    ///
    /// `true` on a hit.
    pub fn update_word(&mut self, addr: u32, val: u32) -> bool {
        let (set, _, word) = self.locate(addr);
        match self.lookup(addr) {
            Some(way) => {
                let idx = self.line_index(set, way) * self.line_words + word;
                self.data[idx] = val;
                true
            }
            None => false,
        }
    }

    /// Invalidates the line holding `addr`, if any.
    pub fn invalidate(&mut self, addr: u32) {
        let (set, _, _) = self.locate(addr);
        if let Some(way) = self.lookup(addr) {
            let idx = self.line_index(set, way);
            self.lines[idx].valid = false;
        }
    }

    /// Invalidates every line that overlaps `[addr, addr + len)`.
    pub fn invalidate_range(&mut self, addr: u32, len: usize) {
        if len == 0 {
            return;
        }
        let line = self.line_bytes() as u64;
        let first = u64::from(addr) & !(line - 1);
        let end = u64::from(addr) + len as u64;
        let mut cur = first;
        while cur < end && cur <= u64::from(u32::MAX) {
            self.invalidate(cur as u32);
            cur += line;
        }
    }
}
