use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use agc_core::core::Fault;
use agc_core::core::machine::Machine;

use crate::input::InputEvent;
use crate::pacer::Pacer;

const READY_POLL: Duration = Duration::from_millis(50);

/// Flags shared between the CPU thread, the DSKY server and the signal
/// handler.
pub struct Control {
    /// Set once a client has loaded the page.
    pub ready: AtomicBool,
    /// Set by Ctrl-C.
    pub stop: AtomicBool,
}

impl Control {
    pub fn new(ready: bool) -> Self {
        Self {
            ready: AtomicBool::new(ready),
            stop: AtomicBool::new(false),
        }
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

/// Ctrl-C dump: where the run stopped, then the CPU state.
fn stop_report(machine: &dyn Machine, phase: &str) -> String {
    format!("interrupted {phase}\n{}", machine.snapshot())
}

/// Run `machine` until it faults or Ctrl-C is seen.
///
/// Restart faults reboot the machine and carry on; every other fault
/// dumps the CPU state and ends the run.
pub fn run(
    machine: &mut dyn Machine,
    events: &Receiver<InputEvent>,
    control: &Control,
) -> Result<(), Fault> {
    while !control.ready.load(Ordering::Acquire) {
        if control.stopped() {
            log::warn!("{}", stop_report(machine, "before start"));
            return Ok(());
        }
        spin_sleep::sleep(READY_POLL);
    }
    log::info!("CPU running");

    let pacer = Pacer::new();
    // Survives reboots, unlike machine.cycles()
    let mut total: u64 = 0;

    loop {
        if control.stopped() {
            log::warn!("{}", stop_report(machine, "while running"));
            return Ok(());
        }

        for event in events.try_iter() {
            machine.set_input(event.button, event.pressed);
        }

        match machine.run_cycle() {
            Ok(cycles) => total += u64::from(cycles),
            Err(fault) if fault.is_restart() => {
                log::warn!("{fault}\n{}", machine.snapshot());
                log::info!("rebooting");
                machine.reset();
                continue;
            }
            Err(fault) => {
                log::error!("{fault}\n{}", machine.snapshot());
                return Err(fault);
            }
        }

        pacer.pace(total);
    }
}
