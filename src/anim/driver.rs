//! Animation drivers: owned frame sources with an explicit stop contract.
//!
//! A driver exists only while an animation is installed. Stopping a driver
//! is synchronous: once [`DriverHandle::stop`] returns, the driver will not
//! produce another frame. Frames already in flight carry the generation of
//! the animation they were produced for, so the receiver can discard frames
//! from a superseded driver.

use crate::error::{Result, WidgetError};
use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, trace};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A frame produced by a running driver.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    /// Generation of the animation this frame belongs to.
    pub generation: u64,
    /// Frame number within this driver (monotonically increasing).
    pub frame: u64,
    /// Time elapsed since the driver was started.
    pub elapsed: Duration,
}

/// Handle to a running animation driver.
pub trait DriverHandle {
    /// Stop the driver. No frame is produced after this returns.
    fn stop(&mut self);

    /// Whether the driver is still producing frames.
    fn is_running(&self) -> bool;
}

/// Source of animation drivers.
pub trait Scheduler {
    /// The driver type this scheduler produces.
    type Handle: DriverHandle;

    /// Start a driver for the animation with the given generation.
    fn start(&mut self, generation: u64) -> Self::Handle;

    /// Registry tracking this scheduler's live drivers.
    fn registry(&self) -> &DriverRegistry;
}

/// Shared bookkeeping of live drivers.
///
/// Cloning shares the same counters.
#[derive(Debug, Clone, Default)]
pub struct DriverRegistry {
    live: Arc<AtomicUsize>,
    started: Arc<AtomicU64>,
    stopped: Arc<AtomicU64>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of drivers currently alive.
    pub fn active(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Total number of drivers ever started.
    pub fn started(&self) -> u64 {
        self.started.load(Ordering::Acquire)
    }

    /// Total number of drivers that have stopped.
    pub fn stopped(&self) -> u64 {
        self.stopped.load(Ordering::Acquire)
    }

    /// Register a new live driver. It stays live until the guard drops.
    fn enter(&self) -> LiveGuard {
        self.live.fetch_add(1, Ordering::AcqRel);
        self.started.fetch_add(1, Ordering::AcqRel);
        LiveGuard {
            registry: self.clone(),
        }
    }
}

/// Marks one driver as live for as long as it exists.
#[derive(Debug)]
struct LiveGuard {
    registry: DriverRegistry,
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.registry.live.fetch_sub(1, Ordering::AcqRel);
        self.registry.stopped.fetch_add(1, Ordering::AcqRel);
    }
}

// =============================================================================
// Ticker driver (dedicated thread)
// =============================================================================

/// Driver backed by a dedicated frame ticker thread.
#[derive(Debug)]
pub struct TickerDriver {
    /// Generation this driver produces frames for.
    generation: u64,
    /// Handle to the ticker thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl TickerDriver {
    /// Spawn a ticker thread producing frames every `interval`.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Spawn`] if the OS fails to spawn the thread.
    pub fn spawn(
        generation: u64,
        interval: Duration,
        frame_tx: Sender<Frame>,
        registry: &DriverRegistry,
    ) -> Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        // Counted from before the thread starts until the thread body returns
        let guard = registry.enter();

        let handle = thread::Builder::new()
            .name("halo-driver".to_string())
            .spawn(move || {
                let _guard = guard;
                Self::run_loop(generation, &frame_tx, &shutdown_clone, interval);
            })
            .map_err(|source| WidgetError::Spawn {
                name: "halo-driver",
                source,
            })?;

        Ok(Self {
            generation,
            handle: Some(handle),
            shutdown,
        })
    }

    /// A driver that never produces frames.
    ///
    /// Used when a ticker thread cannot be spawned: the animation stays
    /// installed and is sampled whenever the next event arrives.
    pub fn inert(generation: u64) -> Self {
        Self {
            generation,
            handle: None,
            shutdown: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Generation this driver produces frames for.
    #[inline]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Main ticker loop.
    fn run_loop(generation: u64, frame_tx: &Sender<Frame>, shutdown: &AtomicBool, interval: Duration) {
        let start = Instant::now();
        let mut frame = 0u64;
        let mut next_tick = start + interval;

        loop {
            if shutdown.load(Ordering::Acquire) {
                break;
            }

            let now = Instant::now();
            if now >= next_tick {
                let tick = Frame {
                    generation,
                    frame,
                    elapsed: now - start,
                };

                // Non-blocking send - a slow receiver skips frames instead
                // of building a queue
                if let Err(crossbeam_channel::TrySendError::Disconnected(_)) =
                    frame_tx.try_send(tick)
                {
                    break;
                }

                frame += 1;
                next_tick += interval;

                // Behind schedule: catch up without queuing
                if next_tick < now {
                    next_tick = now + interval;
                }
            } else {
                let sleep_duration = next_tick - now;
                thread::sleep(sleep_duration.min(Duration::from_millis(1)));
            }
        }

        trace!("driver generation {generation} exited after {frame} frames");
    }
}

impl DriverHandle for TickerDriver {
    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for TickerDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Scheduler that spawns a [`TickerDriver`] per animation.
///
/// All drivers feed the same bounded frame channel.
#[derive(Debug)]
pub struct TickerScheduler {
    interval: Duration,
    frame_tx: Sender<Frame>,
    registry: DriverRegistry,
}

impl TickerScheduler {
    /// Create a scheduler and the receiver its frames arrive on.
    pub fn new(interval: Duration) -> (Self, Receiver<Frame>) {
        // Small buffer - frames should never queue up
        let (frame_tx, frame_rx) = bounded(2);
        (
            Self {
                interval,
                frame_tx,
                registry: DriverRegistry::new(),
            },
            frame_rx,
        )
    }
}

impl Scheduler for TickerScheduler {
    type Handle = TickerDriver;

    fn start(&mut self, generation: u64) -> TickerDriver {
        match TickerDriver::spawn(generation, self.interval, self.frame_tx.clone(), &self.registry) {
            Ok(driver) => driver,
            Err(e) => {
                error!("animation generation {generation} runs without frames: {e}");
                TickerDriver::inert(generation)
            }
        }
    }

    fn registry(&self) -> &DriverRegistry {
        &self.registry
    }
}

// =============================================================================
// Manual driver (host-paced)
// =============================================================================

/// Scheduler for hosts that pace frames themselves (e.g. a display link).
///
/// Drivers are bookkeeping only; the host calls
/// [`WidgetStateMachine::advance`](crate::WidgetStateMachine::advance) on
/// every frame while [`is_animating`](crate::WidgetStateMachine::is_animating)
/// is true.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    registry: DriverRegistry,
}

impl ManualScheduler {
    /// Create a scheduler with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Driver handed out by [`ManualScheduler`].
#[derive(Debug)]
pub struct ManualDriver {
    generation: u64,
    guard: Option<LiveGuard>,
}

impl ManualDriver {
    /// Generation this driver was started for.
    #[inline]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

impl DriverHandle for ManualDriver {
    fn stop(&mut self) {
        self.guard = None;
    }

    fn is_running(&self) -> bool {
        self.guard.is_some()
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualDriver;

    fn start(&mut self, generation: u64) -> ManualDriver {
        ManualDriver {
            generation,
            guard: Some(self.registry.enter()),
        }
    }

    fn registry(&self) -> &DriverRegistry {
        &self.registry
    }
}
