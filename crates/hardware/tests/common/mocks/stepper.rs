use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use mist32_core::core::Cpu;
use mist32_core::sim::{StepAction, Stepper};
use mockall::mock;

mock! {
    pub Debugger {}
    impl Stepper for Debugger {
        fn on_step(&mut self, cpu: &Cpu) -> StepAction;
    }
}

/// Replays a fixed list of actions and records the PC of every pause.
///
/// Once the script runs out it answers [`StepAction::Continue`].
#[derive(Clone, Default)]
pub struct ScriptedStepper {
    actions: Arc<Mutex<VecDeque<StepAction>>>,
    pub pauses: Arc<Mutex<Vec<u32>>>,
}

impl ScriptedStepper {
    pub fn new(actions: &[StepAction]) -> Self {
        Self {
            actions: Arc::new(Mutex::new(actions.iter().copied().collect())),
            pauses: Arc::default(),
        }
    }

    pub fn paused_at(&self) -> Vec<u32> {
        self.pauses.lock().unwrap().clone()
    }
}

impl Stepper for ScriptedStepper {
    fn on_step(&mut self, cpu: &Cpu) -> StepAction {
        self.pauses.lock().unwrap().push(cpu.sys.pc);
        self.actions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(StepAction::Continue)
    }
}
