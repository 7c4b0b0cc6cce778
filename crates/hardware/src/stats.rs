//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the MIST32 simulator. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived metrics (CPI, MIPS).
//! 2. **Privilege split:** Cycles spent in kernel and user mode.
//! 3. **Exceptions:** Faults raised and interrupts taken.
//! 4. **Memory:** Hit/access counts for L1-I and L1-D, TLB hits/misses, and page walks.
//!
//! Cache and TLB counters live in the units themselves; [`crate::core::Cpu::stats`]
//! copies them into a snapshot.

use std::fmt;
use std::time::Instant;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    /// Wall-clock instant the simulation started.
    pub start_time: Instant,
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions that completed without faulting.
    pub instructions_retired: u64,

    /// Cycles spent in kernel mode.
    pub cycles_kernel: u64,
    /// Cycles spent in user mode.
    pub cycles_user: u64,

    /// Page and protection faults raised.
    pub faults: u64,
    /// Interrupts delivered (NMI, software and device).
    pub interrupts: u64,

    /// L1-I cached accesses.
    pub icache_accesses: u64,
    /// L1-I hits.
    pub icache_hits: u64,
    /// L1-D cached accesses.
    pub dcache_accesses: u64,
    /// L1-D hits.
    pub dcache_hits: u64,

    /// Translations served by the TLB.
    pub tlb_hits: u64,
    /// Translations that missed the TLB.
    pub tlb_misses: u64,
    /// Page-table walks performed.
    pub page_walks: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            cycles_kernel: 0,
            cycles_user: 0,
            faults: 0,
            interrupts: 0,
            icache_accesses: 0,
            icache_hits: 0,
            dcache_accesses: 0,
            dcache_hits: 0,
            tlb_hits: 0,
            tlb_misses: 0,
            page_walks: 0,
        }
    }
}

/// Hit rate in percent; zero when there were no accesses.
fn hit_rate(hits: u64, accesses: u64) -> f64 {
    if accesses == 0 {
        0.0
    } else {
        (hits as f64 / accesses as f64) * 100.0
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.start_time.elapsed().as_secs_f64().max(f64::EPSILON);
        let cyc = self.cycles.max(1);
        let instr = self.instructions_retired.max(1);

        writeln!(f, "==========================================================")?;
        writeln!(f, "MIST32 SIMULATION STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "host_seconds             {seconds:.4} s")?;
        writeln!(f, "sim_cycles               {}", self.cycles)?;
        writeln!(f, "sim_insts                {}", self.instructions_retired)?;
        writeln!(
            f,
            "sim_ipc                  {:.4}",
            self.instructions_retired as f64 / cyc as f64
        )?;
        writeln!(f, "sim_cpi                  {:.4}", cyc as f64 / instr as f64)?;
        writeln!(
            f,
            "sim_mips                 {:.2}",
            (self.instructions_retired as f64 / seconds) / 1_000_000.0
        )?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "CORE BREAKDOWN")?;
        writeln!(
            f,
            "  cycles.kernel          {} ({:.2}%)",
            self.cycles_kernel,
            (self.cycles_kernel as f64 / cyc as f64) * 100.0
        )?;
        writeln!(
            f,
            "  cycles.user            {} ({:.2}%)",
            self.cycles_user,
            (self.cycles_user as f64 / cyc as f64) * 100.0
        )?;
        writeln!(f, "  faults                 {}", self.faults)?;
        writeln!(f, "  interrupts             {}", self.interrupts)?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "MEMORY HIERARCHY")?;
        for (name, hits, accesses) in [
            ("L1-I", self.icache_hits, self.icache_accesses),
            ("L1-D", self.dcache_hits, self.dcache_accesses),
        ] {
            writeln!(
                f,
                "  {name:<6} accesses: {accesses:<10} | hits: {hits:<10} | hit_rate: {:.2}%",
                hit_rate(hits, accesses)
            )?;
        }
        let lookups = self.tlb_hits + self.tlb_misses;
        writeln!(
            f,
            "  TLB    lookups: {lookups:<11} | hits: {:<10} | hit_rate: {:.2}%",
            self.tlb_hits,
            hit_rate(self.tlb_hits, lookups)
        )?;
        writeln!(f, "  walks                  {}", self.page_walks)?;
        write!(f, "==========================================================")
    }
}

impl SimStats {
    /// Prints the statistics report to stdout.
    pub fn print(&self) {
        println!("\n{self}");
    }
}
