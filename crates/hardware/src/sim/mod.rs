//! Simulation driver, program loading, and debug hooks.
//!
//! Provides the cycle loop that drives the CPU, utilities for placing program images
//! in memory, and the stepping and cancellation surface used by hosts.

/// Stepping collaborator, cancellation token, and branch traceback.
pub mod debug;

/// Image loading and entry point setup.
pub mod loader;

/// The cycle loop.
pub mod simulator;

pub use debug::{CancelToken, StepAction, Stepper, Traceback};
pub use simulator::{ExitReason, Simulator};
