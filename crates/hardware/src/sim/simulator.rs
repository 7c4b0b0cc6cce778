//! Simulator: owns the CPU and runs the cycle loop.
//!
//! One cycle executes at most one instruction and always follows the same order:
//! 1. **Stack selection:** On a privilege change since the last cycle, load SP from the
//!    slot of the new mode.
//! 2. **Breakpoint:** A PC in the breakpoint list turns on step mode.
//! 3. **Fetch, decode, execute:** A fetch fault skips decode and execute.
//! 4. **Writeback:** A pending fault becomes an NMI that resumes at this PC and
//!    discards the staged device store; otherwise the staged store is delivered.
//! 5. **Stack commit:** SP is saved to the slot of the mode the cycle started in.
//! 6. **Step mode:** Dump the registers, the stack, and the branch traceback, then
//!    consult the stepper.
//! 7. **Polling:** Devices are polled every `poll_interval` cycles.
//! 8. **Advance:** Take the staged next PC (it must be word aligned) or PC + 4. A
//!    staged PC from an instruction that did not fault is a taken branch and is
//!    recorded in the traceback.
//! 9. **Interrupt dispatch:** At most one interrupt is taken.
//! 10. **Exit checks:** Halt, null return, cancellation, and the cycle limit.

use std::fmt;

use tracing::{error, info, trace};

use super::debug::{CancelToken, StepAction, Stepper, Traceback};
use crate::common::SimError;
use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::reg::RETURN_REG;
use crate::config::Config;
use crate::core::Cpu;
use crate::core::arch::mode::PrivilegeMode;
use crate::core::cpu::inspect::STACK_DUMP_WORDS;
use crate::isa::decode::decode;
use crate::isa::disasm::disassemble;

/// Why a run ended without a fatal error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    /// The program executed `halt`.
    Halted,
    /// PC and the return register both reached zero (opt-in).
    NullReturn,
    /// The cancellation token was set.
    Cancelled,
    /// The stepper asked to stop.
    Aborted,
    /// The configured cycle limit was reached.
    CycleLimit,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Halted => "halted",
            Self::NullReturn => "null return",
            Self::Cancelled => "cancelled",
            Self::Aborted => "aborted by stepper",
            Self::CycleLimit => "cycle limit reached",
        };
        f.write_str(s)
    }
}

/// Top-level simulator: CPU state plus the loop controls.
pub struct Simulator {
    /// CPU architectural state (registers, caches, MMU, devices, stats).
    pub cpu: Cpu,
    /// PCs that switch the simulator into step mode.
    pub breakpoints: Vec<u32>,
    /// Pause after every cycle.
    pub step_mode: bool,
    stepper: Option<Box<dyn Stepper>>,
    cancel: CancelToken,
    exit_on_null_return: bool,
    max_cycles: Option<u64>,
    poll_interval: u64,
    last_mode: PrivilegeMode,
    last_word: Option<u32>,
    traceback: Traceback,
}

impl fmt::Debug for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("pc", &format_args!("{:#010x}", self.cpu.sys.pc))
            .field("cycles", &self.cpu.stats.cycles)
            .field("breakpoints", &self.breakpoints)
            .field("step_mode", &self.step_mode)
            .field("has_stepper", &self.stepper.is_some())
            .finish_non_exhaustive()
    }
}

impl Simulator {
    /// Creates a simulator with a fresh CPU.
    ///
    /// # Arguments
    ///
    /// * `config` - Simulator configuration.
    ///
    /// # Returns
    ///
    /// The simulator, or [`SimError::InvalidCacheGeometry`] for an unusable cache
    /// configuration.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        let cpu = Cpu::new(config)?;
        let last_mode = cpu.sys.privilege();
        Ok(Self {
            cpu,
            breakpoints: config.debug.breakpoints.clone(),
            step_mode: false,
            stepper: None,
            cancel: CancelToken::new(),
            exit_on_null_return: config.general.exit_on_null_return,
            max_cycles: config.general.max_cycles,
            poll_interval: config.debug.poll_interval.max(1),
            last_mode,
            last_word: None,
            traceback: Traceback::default(),
        })
    }

    /// Installs the stepping collaborator consulted in step mode.
    pub fn set_stepper(&mut self, stepper: Box<dyn Stepper>) {
        self.stepper = Some(stepper);
    }

    /// Returns a handle to the cancellation token.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Replaces the cancellation token, e.g. with one a signal handler already holds.
    pub fn set_cancel_token(&mut self, token: CancelToken) {
        self.cancel = token;
    }

    /// PCs of the most recent taken branches.
    pub const fn traceback(&self) -> &Traceback {
        &self.traceback
    }

    /// Encoding of the instruction fetched this cycle, `None` if the fetch did not
    /// produce one.
    pub const fn last_instruction(&self) -> Option<u32> {
        self.last_word
    }

    /// Register, stack, and traceback dump shared by step mode and fatal errors.
    fn diagnostics(&mut self) -> String {
        let stack = self.cpu.dump_stack(STACK_DUMP_WORDS);
        format!("{}{stack}\n{}", self.cpu.dump_state(), self.traceback)
    }

    /// Advances the simulator by one cycle.
    ///
    /// # Returns
    ///
    /// `Some(reason)` when the run should end after this cycle, `None` to continue, or
    /// a fatal error.
    pub fn step(&mut self) -> Result<Option<ExitReason>, SimError> {
        let mode = self.cpu.sys.privilege();
        if mode != self.last_mode {
            self.cpu.sys.select_stack(mode);
            self.last_mode = mode;
        }

        let pc = self.cpu.sys.pc;
        if !self.step_mode && self.breakpoints.contains(&pc) {
            info!(pc = format_args!("{pc:#010x}"), "breakpoint");
            self.step_mode = true;
        }

        self.last_word = None;
        if let Some(word) = self.cpu.fetch()? {
            self.last_word = Some(word);
            let inst = decode(word)?;
            if self.cpu.trace || cfg!(feature = "always-trace") {
                trace!(pc = format_args!("{pc:#010x}"), "{}", disassemble(word));
            }
            self.cpu.execute(&inst)?;
        }

        let faulted = if let Some(fault) = self.cpu.pending_fault.take() {
            self.cpu.raise_fault(fault);
            true
        } else {
            self.cpu.flush_io_writeback()?;
            self.cpu.stats.instructions_retired += 1;
            false
        };

        self.cpu.sys.commit_stack(mode);

        if self.step_mode {
            info!("step at {pc:#010x}\n{}", self.diagnostics());
            if let Some(stepper) = self.stepper.as_mut() {
                match stepper.on_step(&self.cpu) {
                    StepAction::Continue => self.step_mode = false,
                    StepAction::Step => {}
                    StepAction::Abort => return Ok(Some(ExitReason::Aborted)),
                }
            }
        }

        if self.cpu.stats.cycles % self.poll_interval == 0 {
            self.cpu.io.poll();
        }

        match self.cpu.sys.next_pc.take() {
            Some(target) if target % INSTRUCTION_SIZE != 0 => {
                return Err(SimError::MisalignedBranch { target });
            }
            Some(target) => {
                if !faulted {
                    self.traceback.record(pc);
                }
                self.cpu.sys.pc = target;
            }
            None => self.cpu.sys.pc = pc.wrapping_add(INSTRUCTION_SIZE),
        }

        let _ = self.cpu.dispatch_interrupts()?;

        self.cpu.stats.cycles += 1;
        match mode {
            PrivilegeMode::Kernel => self.cpu.stats.cycles_kernel += 1,
            PrivilegeMode::User => self.cpu.stats.cycles_user += 1,
        }

        Ok(self.exit_condition())
    }

    /// Evaluates the end-of-cycle exit checks in priority order.
    fn exit_condition(&self) -> Option<ExitReason> {
        if self.cpu.halted {
            Some(ExitReason::Halted)
        } else if self.exit_on_null_return
            && self.cpu.sys.pc == 0
            && self.cpu.regs.read(RETURN_REG) == 0
        {
            Some(ExitReason::NullReturn)
        } else if self.cancel.is_cancelled() {
            Some(ExitReason::Cancelled)
        } else if self
            .max_cycles
            .is_some_and(|limit| self.cpu.stats.cycles >= limit)
        {
            Some(ExitReason::CycleLimit)
        } else {
            None
        }
    }

    /// Runs until an exit condition or a fatal error.
    ///
    /// A fatal error is logged with the PC, the offending encoding and its disassembly
    /// (or "no encoding" when the fetch itself failed), the register and stack dumps,
    /// and the branch traceback before it is returned.
    pub fn run(&mut self) -> Result<ExitReason, SimError> {
        info!(
            entry = format_args!("{:#010x}", self.cpu.sys.pc),
            "simulation start"
        );
        loop {
            match self.step() {
                Ok(None) => {}
                Ok(Some(reason)) => {
                    info!(%reason, cycles = self.cpu.stats.cycles, "simulation end");
                    return Ok(reason);
                }
                Err(err) => {
                    let inst = self.last_word.map_or_else(
                        || "no encoding".to_string(),
                        |word| format!("{word:#010x} ({})", disassemble(word)),
                    );
                    let dump = self.diagnostics();
                    error!(
                        %err,
                        pc = format_args!("{:#010x}", self.cpu.sys.pc),
                        %inst,
                        "fatal\n{dump}"
                    );
                    return Err(err);
                }
            }
        }
    }
}
