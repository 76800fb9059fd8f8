//! Blocking sequence playback with loop control and cooperative
//! cancellation.

use crate::actions::{Action, ActionKind};
use crate::input::{InputDriver, InputError};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// How many times a run replays its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSpec {
    /// Replay exactly this many times, then finish.
    Fixed(NonZeroU32),
    /// Replay until the stop signal is raised.
    UntilCancelled,
}

impl LoopSpec {
    /// `Fixed(count)` for a positive count, `UntilCancelled` for zero.
    pub fn from_count(count: u32) -> Self {
        match NonZeroU32::new(count) {
            Some(n) => LoopSpec::Fixed(n),
            None => LoopSpec::UntilCancelled,
        }
    }
}

/// Cancellation flag for a single run.
///
/// The runner observes it at the start of each loop pass and between
/// actions, never in the middle of a press/hold/release. One signal belongs
/// to one run; a new run gets a fresh signal.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The fixed loop count was exhausted.
    Completed,
    /// The stop signal was observed at a boundary.
    Cancelled,
    /// Input injection failed and the run was aborted.
    Failed(InputError),
}

/// Play `sequence` under `loop_spec`, blocking the calling thread for the
/// whole run. The controller invokes this from a dedicated thread.
///
/// `on_loop_complete` fires once per fully played pass with the 0-based
/// pass index and the elapsed time since the run began. A pass cut short by
/// the stop signal does not fire it; a pass that finishes after the signal
/// was raised still does, and the run then ends at the next boundary check.
pub fn run<D: InputDriver>(
    driver: &Mutex<D>,
    sequence: &[Action],
    loop_spec: LoopSpec,
    stop: &StopSignal,
    mut on_loop_complete: impl FnMut(u32, Duration),
) -> RunOutcome {
    let started = Instant::now();
    let mut loop_index: u32 = 0;
    loop {
        if stop.is_set() {
            tracing::debug!(loops = loop_index, "run cancelled");
            return RunOutcome::Cancelled;
        }
        if let LoopSpec::Fixed(count) = loop_spec {
            if loop_index >= count.get() {
                tracing::debug!(loops = loop_index, "run completed");
                return RunOutcome::Completed;
            }
        }

        let mut interrupted = false;
        for action in sequence {
            if stop.is_set() {
                interrupted = true;
                break;
            }
            if let Err(err) = play(driver, action) {
                tracing::error!(error = %err, "input injection failed, aborting run");
                return RunOutcome::Failed(err);
            }
        }

        if !interrupted {
            on_loop_complete(loop_index, started.elapsed());
            loop_index = loop_index.saturating_add(1);
        }
    }
}

/// Play one action. A key or mouse press always reaches its release: the
/// hold sleep sits between the paired calls and nothing else interrupts
/// them.
fn play<D: InputDriver>(driver: &Mutex<D>, action: &Action) -> Result<(), InputError> {
    tracing::trace!(kind = ?action.kind, name = %action.name, "action");
    match action.kind {
        ActionKind::Key => {
            driver.lock().unwrap().key_down(&action.name)?;
            thread::sleep(action.hold_duration());
            driver.lock().unwrap().key_up(&action.name)?;
        }
        ActionKind::Mouse => {
            driver.lock().unwrap().mouse_down(&action.name)?;
            thread::sleep(action.hold_duration());
            driver.lock().unwrap().mouse_up(&action.name)?;
        }
        ActionKind::Wait => {}
    }
    thread::sleep(action.wait_duration());
    Ok(())
}
