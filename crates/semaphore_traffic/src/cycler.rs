//! # Phase Cycler
//!
//! Background thread that toggles a traffic-light phase on a randomized
//! interval and publishes every transition.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────── cycler thread ────────────────┐
//!   │ loop {                                        │
//!   │   sleep(tick)                                 │
//!   │   if elapsed >= cycle {                       │
//!   │     toggle -> store phase -> send -> fan-out  │
//!   │   }                                           │
//!   │ }                                             │
//!   └───────────┬──────────────────────┬────────────┘
//!               ▼                      ▼
//!     BlockingQueue<Phase>      Sender<PhaseChange> x N
//!      (one logical consumer)    (one per subscriber)
//!               │                      │
//!           wait_for()            subscribe()
//! ```
//!
//! ## Observers
//!
//! The queue hands each published phase to exactly one receiver. Run one
//! `wait_for` caller at a time; observers that each need every transition
//! should call [`PhaseCycler::subscribe`] instead.
//!
//! ## Visibility
//!
//! The phase is stored before it is sent. A thread that receives `V` from the
//! queue therefore reads a [`PhaseCycler::current_phase`] that is `V` or newer.

use crate::config::CyclerConfig;
use crate::error::{TrafficError, TrafficResult};
use crate::phase::{Phase, PhaseChange};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use semaphore_core::BlockingQueue;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// State shared between the handle and the cycler thread.
struct Shared {
    /// Last committed phase, as `Phase as u8`. Written only by the cycler thread.
    phase: AtomicU8,
    /// Transitions published so far.
    transitions: AtomicU64,
    /// Set by `stop`, checked once per tick.
    shutdown: AtomicBool,
    /// Single-consumer handoff to `wait_for` callers.
    queue: Arc<BlockingQueue<Phase>>,
    /// Fan-out channels, pruned when the receiver is dropped.
    subscribers: Mutex<Vec<Sender<PhaseChange>>>,
}

impl Shared {
    fn current_phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Commits and publishes the next phase.
    fn publish(&self, phase: Phase, at: Instant) -> u64 {
        // Counter first: a reader that sees the new phase also sees the new count
        let generation = self.transitions.fetch_add(1, Ordering::AcqRel) + 1;
        self.phase.store(phase as u8, Ordering::Release);

        self.queue.send(phase);

        let change = PhaseChange {
            phase,
            generation,
            at,
        };
        self.subscribers.lock().retain(|tx| tx.send(change).is_ok());

        generation
    }
}

/// Lifecycle of the cycler thread.
enum Worker {
    Idle,
    Running(JoinHandle<()>),
    Stopped,
}

/// Owns a two-state phase, toggles it on a background thread, and lets other
/// threads block until a given phase is published.
///
/// ## Usage
///
/// ```rust,no_run
/// use semaphore_traffic::{CyclerConfig, Phase, PhaseCycler};
/// use std::sync::Arc;
/// use std::thread;
///
/// let cycler = Arc::new(PhaseCycler::new(CyclerConfig::default())?);
/// cycler.start()?;
///
/// let observer = Arc::clone(&cycler);
/// thread::spawn(move || {
///     observer.wait_for(Phase::Green);
///     println!("go");
/// });
/// # Ok::<(), semaphore_traffic::TrafficError>(())
/// ```
///
/// ## Lifetime
///
/// Dropping the cycler stops and joins its thread. Callers parked in
/// [`PhaseCycler::wait_for`] hold a reference to the cycler, so it cannot be
/// dropped under them; after an explicit [`PhaseCycler::stop`] those callers
/// never wake.
pub struct PhaseCycler {
    config: CyclerConfig,
    shared: Arc<Shared>,
    worker: Mutex<Worker>,
}

impl PhaseCycler {
    /// Creates a stopped cycler in `config.initial_phase`.
    ///
    /// # Errors
    ///
    /// Returns [`TrafficError::InvalidConfig`] if the config fails validation.
    pub fn new(config: CyclerConfig) -> TrafficResult<Self> {
        config.validate()?;

        let shared = Arc::new(Shared {
            phase: AtomicU8::new(config.initial_phase as u8),
            transitions: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
            queue: Arc::new(BlockingQueue::new()),
            subscribers: Mutex::new(Vec::new()),
        });

        Ok(Self {
            config,
            shared,
            worker: Mutex::new(Worker::Idle),
        })
    }

    /// Spawns the toggling loop on its own thread.
    ///
    /// # Errors
    ///
    /// - [`TrafficError::AlreadyStarted`] on any call after the first
    ///   successful one, including after [`PhaseCycler::stop`].
    /// - [`TrafficError::Spawn`] if the OS cannot create the thread. The
    ///   cycler stays idle and `start` may be retried.
    pub fn start(&self) -> TrafficResult<()> {
        let mut worker = self.worker.lock();
        if !matches!(*worker, Worker::Idle) {
            return Err(TrafficError::AlreadyStarted);
        }

        let shared = Arc::clone(&self.shared);
        let config = self.config.clone();
        let rng = cycle_rng(&config);

        let handle = thread::Builder::new()
            .name("phase-cycler".to_string())
            .spawn(move || cycle_loop(&shared, &config, rng))?;

        tracing::info!(
            min_interval_ms = self.config.min_interval_ms,
            max_interval_ms = self.config.max_interval_ms,
            initial = %self.current_phase(),
            "phase cycler started"
        );

        *worker = Worker::Running(handle);
        Ok(())
    }

    /// Signals the cycler thread to exit and joins it.
    ///
    /// Idempotent. A cycler that was never started is left untouched.
    pub fn stop(&self) {
        let mut worker = self.worker.lock();
        let handle = match std::mem::replace(&mut *worker, Worker::Stopped) {
            Worker::Running(handle) => handle,
            Worker::Idle => {
                *worker = Worker::Idle;
                return;
            }
            Worker::Stopped => return,
        };

        self.shared.shutdown.store(true, Ordering::Release);
        if handle.join().is_err() {
            tracing::warn!("phase cycler thread panicked");
        }

        tracing::info!(
            transitions = self.transitions(),
            "phase cycler stopped"
        );
    }

    /// Returns true while the cycler thread is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(*self.worker.lock(), Worker::Running(_))
    }

    /// Returns the last committed phase.
    #[inline]
    #[must_use]
    pub fn current_phase(&self) -> Phase {
        self.shared.current_phase()
    }

    /// Returns the number of transitions published so far.
    #[inline]
    #[must_use]
    pub fn transitions(&self) -> u64 {
        self.shared.transitions.load(Ordering::Acquire)
    }

    /// Blocks until `target` is received from the queue.
    ///
    /// Every non-matching phase received along the way is discarded. Only
    /// transitions are published, so a call made while the light already
    /// shows `target` waits for the next time it is entered.
    ///
    /// # Blocking
    ///
    /// Never returns if the cycler is not running or another observer takes
    /// every `target` first.
    pub fn wait_for(&self, target: Phase) {
        while self.shared.queue.receive() != target {}
        tracing::trace!(%target, "wait satisfied");
    }

    /// Blocks until the light turns green.
    pub fn wait_for_green(&self) {
        self.wait_for(Phase::Green);
    }

    /// Like [`PhaseCycler::wait_for`], but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TrafficError::WaitTimedOut`] if `target` was not received in
    /// time.
    pub fn wait_for_timeout(&self, target: Phase, timeout: Duration) -> TrafficResult<()> {
        let start = Instant::now();
        let Some(deadline) = start.checked_add(timeout) else {
            self.wait_for(target);
            return Ok(());
        };

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.shared.queue.receive_timeout(remaining) {
                Some(phase) if phase == target => return Ok(()),
                Some(_) => {}
                None => {
                    let waited_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    return Err(TrafficError::WaitTimedOut { target, waited_ms });
                }
            }
        }
    }

    /// Registers a new observer that receives every subsequent transition.
    ///
    /// Dropping the receiver unregisters it at the next transition.
    #[must_use]
    pub fn subscribe(&self) -> Receiver<PhaseChange> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.shared.subscribers.lock().push(tx);
        rx
    }

    /// Returns the number of registered subscribers.
    ///
    /// Includes subscribers added since the last transition and dropped
    /// receivers that have not been pruned yet (pruning happens on publish).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.lock().len()
    }

    /// Returns a shared handle to the phase queue.
    #[must_use]
    pub fn queue(&self) -> Arc<BlockingQueue<Phase>> {
        Arc::clone(&self.shared.queue)
    }

    /// Returns the configuration this cycler was built with.
    #[must_use]
    pub fn config(&self) -> &CyclerConfig {
        &self.config
    }
}

impl Drop for PhaseCycler {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for PhaseCycler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseCycler")
            .field("phase", &self.current_phase())
            .field("transitions", &self.transitions())
            .field("running", &self.is_running())
            .field("pending", &self.shared.queue.len())
            .finish_non_exhaustive()
    }
}

/// Builds the interval RNG: seeded from `config.seed`, else from OS entropy.
fn cycle_rng(config: &CyclerConfig) -> ChaCha8Rng {
    match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Draws the next cycle duration, uniform over the inclusive bounds.
fn draw_cycle(rng: &mut ChaCha8Rng, config: &CyclerConfig) -> Duration {
    Duration::from_millis(rng.gen_range(config.min_interval_ms..=config.max_interval_ms))
}

/// Cycler thread body.
fn cycle_loop(shared: &Shared, config: &CyclerConfig, mut rng: ChaCha8Rng) {
    let tick = config.tick();
    let mut cycle = draw_cycle(&mut rng, config);
    let mut last_toggle = Instant::now();

    while !shared.shutdown.load(Ordering::Acquire) {
        thread::sleep(tick);

        let now = Instant::now();
        if now.duration_since(last_toggle) < cycle {
            continue;
        }

        cycle = draw_cycle(&mut rng, config);
        last_toggle = now;

        let next = shared.current_phase().toggled();
        let generation = shared.publish(next, now);

        tracing::debug!(
            phase = %next,
            generation,
            next_cycle_ms = u64::try_from(cycle.as_millis()).unwrap_or(u64::MAX),
            "phase toggled"
        );
    }
}
