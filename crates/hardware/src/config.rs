//! Configuration system for the simulator.
//!
//! This module defines all configuration structures used to parameterize the
//! simulator. It provides:
//! 1. **Defaults:** Baseline hardware constants (RAM ceiling, IOSR, cache geometry, TLB size).
//! 2. **Structures:** Hierarchical config for general, memory, cache, interrupt, and debug settings.
//! 3. **Parsing:** JSON deserialization where every field is optional.
//!
//! Configuration is supplied as JSON (the CLI's `--config` file) or built with `Config::default()`.

use serde::Deserialize;

/// Default configuration constants for the simulator.
///
/// These values define the reference hardware when not explicitly overridden.
mod defaults {
    use crate::common::constants;

    /// Highest RAM address plus one (64 MiB).
    pub const MEMORY_MAX_ADDR: u32 = constants::MEMORY_MAX_ADDR;

    /// Reset value of the I/O base register.
    pub const IOSR: u32 = constants::IOSR_DEFAULT;

    /// Initial kernel stack pointer.
    pub const KERNEL_STACK: u32 = constants::STACK_DEFAULT;

    /// Number of direct-mapped TLB slots.
    pub const TLB_ENTRIES: usize = constants::TLB_ENTRIES;

    /// Sets per L1 cache.
    pub const CACHE_SETS: usize = 16;

    /// Ways per L1 cache set.
    pub const CACHE_WAYS: usize = 4;

    /// Words per L1 cache line (64 bytes).
    pub const CACHE_LINE_WORDS: usize = 16;

    /// IDT vector of the page fault.
    pub const PAGE_FAULT_VECTOR: u32 = 1;

    /// IDT vector of the protection fault.
    pub const PROTECTION_FAULT_VECTOR: u32 = 2;

    /// Cycles between device polls.
    pub const POLL_INTERVAL: u64 = constants::POLL_INTERVAL;
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use mist32_core::config::Config;
///
/// let config = Config::default();
/// assert!(!config.general.exit_on_null_return);
/// assert_eq!(config.cache.l1_d.ways, 4);
/// ```
///
/// Deserializing from JSON; omitted sections and fields keep their defaults:
///
/// ```
/// use mist32_core::config::Config;
///
/// let json = r#"{
///     "general": { "entry_pc": 4096, "exit_on_null_return": true },
///     "memory": { "iosr": 4026531840 },
///     "cache": { "l1_i": { "enabled": false } },
///     "debug": { "breakpoints": [4100, 4104] }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.general.entry_pc, 0x1000);
/// assert_eq!(config.memory.iosr, 0xF000_0000);
/// assert!(!config.cache.l1_i.enabled);
/// assert_eq!(config.cache.l1_i.sets, 16);
/// assert_eq!(config.debug.breakpoints, vec![0x1004, 0x1008]);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Physical memory map and translation parameters
    #[serde(default)]
    pub memory: MemoryConfig,
    /// L1 cache configuration
    #[serde(default)]
    pub cache: CacheHierarchyConfig,
    /// Fault vector assignment
    #[serde(default)]
    pub interrupt: InterruptConfig,
    /// Breakpoints and polling
    #[serde(default)]
    pub debug: DebugConfig,
}

impl Config {
    /// Parses a configuration from a JSON document.
    ///
    /// # Arguments
    ///
    /// * `json` - The JSON text.
    ///
    /// # Returns
    ///
    /// The parsed configuration, or the `serde_json` error describing the first problem.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// General simulation settings and options.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Initial program counter.
    #[serde(default)]
    pub entry_pc: u32,

    /// Stop when a `b` to address zero leaves both PC and R31 at zero.
    #[serde(default)]
    pub exit_on_null_return: bool,

    /// Log every retired instruction at TRACE level.
    #[serde(default)]
    pub trace: bool,

    /// Stop after this many cycles; unlimited when absent.
    #[serde(default)]
    pub max_cycles: Option<u64>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            entry_pc: 0,
            exit_on_null_return: false,
            trace: false,
            max_cycles: None,
        }
    }
}

/// Physical memory map and translation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Highest RAM address plus one.
    #[serde(default = "MemoryConfig::default_max_addr")]
    pub max_addr: u32,

    /// Reset value of the I/O base register.
    #[serde(default = "MemoryConfig::default_iosr")]
    pub iosr: u32,

    /// Initial kernel stack pointer.
    #[serde(default = "MemoryConfig::default_kernel_stack")]
    pub kernel_stack: u32,

    /// Number of TLB slots (rounded up to a power of two).
    #[serde(default = "MemoryConfig::default_tlb_entries")]
    pub tlb_entries: usize,
}

impl MemoryConfig {
    fn default_max_addr() -> u32 {
        defaults::MEMORY_MAX_ADDR
    }

    fn default_iosr() -> u32 {
        defaults::IOSR
    }

    fn default_kernel_stack() -> u32 {
        defaults::KERNEL_STACK
    }

    fn default_tlb_entries() -> usize {
        defaults::TLB_ENTRIES
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_addr: defaults::MEMORY_MAX_ADDR,
            iosr: defaults::IOSR,
            kernel_stack: defaults::KERNEL_STACK,
            tlb_entries: defaults::TLB_ENTRIES,
        }
    }
}

/// Configuration of the split L1 caches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheHierarchyConfig {
    /// L1 instruction cache
    #[serde(default)]
    pub l1_i: CacheConfig,
    /// L1 data cache
    #[serde(default)]
    pub l1_d: CacheConfig,
}

/// Geometry of one set-associative cache.
///
/// Set count and line length are rounded up to powers of two so that index and
/// tag extraction stay pure bit operations.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// When false, every access goes straight to the physical store.
    #[serde(default = "CacheConfig::default_enabled")]
    pub enabled: bool,

    /// Number of sets.
    #[serde(default = "CacheConfig::default_sets")]
    pub sets: usize,

    /// Associativity.
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Line length in 32-bit words.
    #[serde(default = "CacheConfig::default_line_words")]
    pub line_words: usize,
}

impl CacheConfig {
    const fn default_enabled() -> bool {
        true
    }

    fn default_sets() -> usize {
        defaults::CACHE_SETS
    }

    fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    fn default_line_words() -> usize {
        defaults::CACHE_LINE_WORDS
    }

    /// Line length in bytes.
    pub const fn line_bytes(&self) -> usize {
        self.line_words * 4
    }
}

impl Default for CacheConfig {
    /// The reference geometry: 4 ways, 16 sets, 16-word lines.
    fn default() -> Self {
        Self {
            enabled: true,
            sets: defaults::CACHE_SETS,
            ways: defaults::CACHE_WAYS,
            line_words: defaults::CACHE_LINE_WORDS,
        }
    }
}

/// IDT vectors used for synchronous faults.
#[derive(Debug, Clone, Deserialize)]
pub struct InterruptConfig {
    /// Vector raised on a page fault.
    #[serde(default = "InterruptConfig::default_page_fault_vector")]
    pub page_fault_vector: u32,

    /// Vector raised on a protection fault.
    #[serde(default = "InterruptConfig::default_protection_fault_vector")]
    pub protection_fault_vector: u32,
}

impl InterruptConfig {
    fn default_page_fault_vector() -> u32 {
        defaults::PAGE_FAULT_VECTOR
    }

    fn default_protection_fault_vector() -> u32 {
        defaults::PROTECTION_FAULT_VECTOR
    }
}

impl Default for InterruptConfig {
    fn default() -> Self {
        Self {
            page_fault_vector: defaults::PAGE_FAULT_VECTOR,
            protection_fault_vector: defaults::PROTECTION_FAULT_VECTOR,
        }
    }
}

/// Debugger-facing settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DebugConfig {
    /// Program-counter values that switch the engine into step mode.
    #[serde(default)]
    pub breakpoints: Vec<u32>,

    /// Cycles between device polls; zero disables polling.
    #[serde(default = "DebugConfig::default_poll_interval")]
    pub poll_interval: u64,
}

impl DebugConfig {
    fn default_poll_interval() -> u64 {
        defaults::POLL_INTERVAL
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            breakpoints: Vec::new(),
            poll_interval: defaults::POLL_INTERVAL,
        }
    }
}
