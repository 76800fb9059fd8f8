//! Start/stop orchestration for macro playback.
//!
//! A [`Controller`] owns at most one run at a time. Starting validates the
//! sequence, walks a short countdown so the user can move focus to the
//! target window, then hands the sequence to the runner on its own thread.
//! Stopping raises the run's stop signal and returns immediately; the
//! runner winds down at the next action boundary.

use crate::actions::{self, Action, ValidationError};
use crate::input::InputDriver;
use crate::runner::{self, LoopSpec, RunOutcome, StopSignal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Number of countdown ticks before playback begins.
pub const COUNTDOWN_TICKS: u32 = 3;

const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Snapshot of what the controller is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    /// Pre-run countdown; `seconds_left` counts 3, 2, 1.
    CountingDown { seconds_left: u32 },
    /// Playback in progress. `loop_index` is the number of passes completed
    /// so far.
    Running { loop_index: u32, started: Instant },
}

impl RunState {
    pub fn is_idle(&self) -> bool {
        matches!(self, RunState::Idle)
    }

    /// Elapsed time of the active run, if one is running.
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            RunState::Running { started, .. } => Some(started.elapsed()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("a macro is already running")]
    AlreadyRunning,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Progress notifications for one controller.
///
/// Callbacks arrive on the controller's worker threads, so implementations
/// must be cheap and thread-safe. All methods default to doing nothing.
pub trait RunObserver: Send + Sync {
    /// One countdown tick, fired before its pause. `seconds_left` counts
    /// down from [`COUNTDOWN_TICKS`] to 1.
    fn countdown_tick(&self, seconds_left: u32) {
        let _ = seconds_left;
    }

    /// A full pass over the sequence finished. `loop_index` is 0-based and
    /// `elapsed` is measured from the start of playback.
    fn loop_complete(&self, loop_index: u32, elapsed: Duration) {
        let _ = (loop_index, elapsed);
    }

    /// The run ended and the controller is idle again.
    fn finished(&self, outcome: &RunOutcome) {
        let _ = outcome;
    }
}

/// Observer for callers that only poll [`Controller::state`].
pub struct NullObserver;

impl RunObserver for NullObserver {}

struct Shared {
    state: Mutex<RunState>,
    /// Stop signal of the active run. `None` while idle and during the
    /// countdown, which is what makes a stop request before playback a
    /// no-op.
    stop: Mutex<Option<StopSignal>>,
    /// Raised when the controller is dropped. Read and written under the
    /// `stop` lock so the countdown hand-over either sees it or publishes a
    /// signal for `Drop` to raise.
    abandoned: AtomicBool,
}

pub struct Controller<D: InputDriver + 'static> {
    driver: Arc<Mutex<D>>,
    shared: Arc<Shared>,
    observer: Arc<dyn RunObserver>,
    tick_interval: Duration,
}

impl<D: InputDriver + 'static> Controller<D> {
    pub fn new(driver: D, observer: Arc<dyn RunObserver>) -> Self {
        Self {
            driver: Arc::new(Mutex::new(driver)),
            shared: Arc::new(Shared {
                state: Mutex::new(RunState::Idle),
                stop: Mutex::new(None),
                abandoned: AtomicBool::new(false),
            }),
            observer,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Override the pause between countdown ticks. The countdown always has
    /// [`COUNTDOWN_TICKS`] ticks; tests shrink the interval to keep runs
    /// fast.
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn state(&self) -> RunState {
        *self.shared.state.lock().unwrap()
    }

    /// Validate `sequence` and begin the countdown-then-run cycle.
    ///
    /// Returns as soon as the run is accepted; progress is reported through
    /// the observer. Rejected with [`StartError::AlreadyRunning`] unless the
    /// controller is idle, and with the first validation problem if the
    /// sequence is not playable.
    pub fn request_start(
        &self,
        sequence: &[Action],
        loop_spec: LoopSpec,
    ) -> Result<(), StartError> {
        {
            let mut state = self.shared.state.lock().unwrap();
            if !state.is_idle() {
                return Err(StartError::AlreadyRunning);
            }
            actions::validate(sequence)?;
            *state = RunState::CountingDown {
                seconds_left: COUNTDOWN_TICKS,
            };
        }
        tracing::info!(actions = sequence.len(), ?loop_spec, "macro run accepted");

        let sequence = sequence.to_vec();
        let driver = Arc::clone(&self.driver);
        let shared = Arc::clone(&self.shared);
        let observer = Arc::clone(&self.observer);
        let tick = self.tick_interval;

        thread::spawn(move || {
            for seconds_left in (1..=COUNTDOWN_TICKS).rev() {
                *shared.state.lock().unwrap() = RunState::CountingDown { seconds_left };
                observer.countdown_tick(seconds_left);
                thread::sleep(tick);
            }

            let stop = StopSignal::new();
            {
                let mut slot = shared.stop.lock().unwrap();
                if shared.abandoned.load(Ordering::SeqCst) {
                    *shared.state.lock().unwrap() = RunState::Idle;
                    tracing::debug!("controller dropped during countdown, run abandoned");
                    return;
                }
                *slot = Some(stop.clone());
            }
            *shared.state.lock().unwrap() = RunState::Running {
                loop_index: 0,
                started: Instant::now(),
            };

            thread::spawn(move || {
                let loop_shared = Arc::clone(&shared);
                let loop_observer = Arc::clone(&observer);
                let outcome = runner::run(
                    &driver,
                    &sequence,
                    loop_spec,
                    &stop,
                    move |index, elapsed| {
                        let mut state = loop_shared.state.lock().unwrap();
                        if let RunState::Running { loop_index, .. } = &mut *state {
                            *loop_index = index + 1;
                        }
                        drop(state);
                        loop_observer.loop_complete(index, elapsed);
                    },
                );
                *shared.stop.lock().unwrap() = None;
                *shared.state.lock().unwrap() = RunState::Idle;
                tracing::info!(?outcome, "macro run finished");
                observer.finished(&outcome);
            });
        });
        Ok(())
    }

    /// Ask the active run to stop and return immediately; completion is
    /// observed via [`RunObserver::finished`]. Ignored while idle or during
    /// the countdown.
    pub fn request_stop(&self) {
        match self.shared.stop.lock().unwrap().as_ref() {
            Some(stop) => {
                tracing::debug!("stop requested");
                stop.set();
            }
            None => tracing::debug!("stop requested with no active run, ignored"),
        }
    }

    /// Hotkey entry point: stop when running, otherwise try to start with
    /// the caller's current sequence and loop mode.
    pub fn toggle(&self, sequence: &[Action], loop_spec: LoopSpec) -> Result<(), StartError> {
        if matches!(self.state(), RunState::Running { .. }) {
            self.request_stop();
            Ok(())
        } else {
            self.request_start(sequence, loop_spec)
        }
    }

    /// Block until the controller returns to idle or `timeout` passes.
    /// Returns whether it is idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.state().is_idle() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        self.state().is_idle()
    }
}

impl<D: InputDriver + 'static> Drop for Controller<D> {
    fn drop(&mut self) {
        // A detached runner must not keep injecting input once its
        // controller is gone, and a pending countdown must not start one.
        let slot = self.shared.stop.lock().unwrap();
        self.shared.abandoned.store(true, Ordering::SeqCst);
        if let Some(stop) = slot.as_ref() {
            stop.set();
        }
    }
}
