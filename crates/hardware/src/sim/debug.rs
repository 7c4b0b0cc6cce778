//! Debug and stepping surface.
//!
//! This module defines the hooks an external harness uses to observe and steer a run:
//! 1. **Stepping:** The [`Stepper`] collaborator is consulted once per cycle while the
//!    simulator is in step mode.
//! 2. **Cancellation:** A [`CancelToken`] is set from outside (signal handler, another
//!    thread) and checked at the end of every cycle.
//! 3. **Traceback:** A [`Traceback`] ring remembers where recent taken branches were.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::Cpu;

/// What the simulator should do after a step-mode pause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepAction {
    /// Leave step mode and run freely.
    Continue,
    /// Stay in step mode and pause again after the next cycle.
    Step,
    /// Stop the run.
    Abort,
}

/// External stepping collaborator.
///
/// Called after writeback of every cycle while step mode is active, with the CPU state
/// of that cycle.
pub trait Stepper {
    /// Receives the pause notification and decides how to proceed.
    fn on_step(&mut self, cpu: &Cpu) -> StepAction;
}

/// Cooperative cancellation flag shared between the simulator and its host.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; the run stops at the end of the current cycle.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Number of taken branches a [`Traceback`] remembers.
pub const TRACEBACK_LEN: usize = 16;

/// Fixed-size ring of the PCs of the most recent taken branches.
#[derive(Clone, Debug, Default)]
pub struct Traceback {
    pcs: [u32; TRACEBACK_LEN],
    next: usize,
    wrapped: bool,
}

impl Traceback {
    /// Records the PC of a branch that was taken, evicting the oldest once full.
    pub fn record(&mut self, pc: u32) {
        self.pcs[self.next] = pc;
        self.next = (self.next + 1) % TRACEBACK_LEN;
        self.wrapped |= self.next == 0;
    }

    /// Recorded branch PCs, oldest first.
    pub fn branches(&self) -> impl Iterator<Item = u32> + '_ {
        let (start, count) = if self.wrapped {
            (self.next, TRACEBACK_LEN)
        } else {
            (0, self.next)
        };
        (0..count).map(move |i| self.pcs[(start + i) % TRACEBACK_LEN])
    }
}

impl fmt::Display for Traceback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "---- Traceback ----")?;
        for pc in self.branches() {
            write!(f, "\n{pc:#010x}")?;
        }
        Ok(())
    }
}
