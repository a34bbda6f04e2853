//! Animation controller: computes retargets and owns the single live driver.

use super::animation::{Animation, AnimationStyle};
use super::driver::{DriverHandle, DriverRegistry, Scheduler};
use crate::config::WidgetConfig;
use log::debug;
use std::time::{Duration, Instant};

/// Smallest distance a breathing leg travels.
const MIN_BREATHING_SWING: f32 = 0.5;

/// The result of a retarget: a freshly installed animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Retarget {
    /// Generation of the installed animation.
    pub generation: u64,
    /// The installed animation.
    pub animation: Animation,
}

impl Retarget {
    /// Style of the installed animation.
    #[inline]
    pub const fn style(&self) -> AnimationStyle {
        self.animation.style()
    }

    /// Destination of the installed animation's first leg.
    #[inline]
    pub const fn target(&self) -> f32 {
        self.animation.to()
    }
}

/// The animation currently driving the ring.
struct Installed<H> {
    animation: Animation,
    started_at: Instant,
    generation: u64,
    driver: H,
}

impl<H> Installed<H> {
    fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }
}

/// Owns the ring animation and its driver.
///
/// # Invariants
///
/// 1. At most one driver is running at any time.
/// 2. A retarget stops the running driver before starting the next one.
/// 3. The new animation starts at the value the old one showed at the
///    moment of the retarget, so the visible progress is continuous.
pub struct AnimationController<S: Scheduler> {
    scheduler: S,
    transition: Duration,
    breathing_period: Duration,
    min_progress: f32,
    installed: Option<Installed<S::Handle>>,
    /// Target chosen by the last retarget.
    target: f32,
    generation: u64,
}

impl<S: Scheduler> std::fmt::Debug for AnimationController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationController")
            .field("generation", &self.generation)
            .field("target", &self.target)
            .field("animation", &self.animation())
            .field("animating", &self.is_animating())
            .finish_non_exhaustive()
    }
}

impl<S: Scheduler> AnimationController<S> {
    /// Create a controller resting at the empty ring.
    pub fn new(config: &WidgetConfig, scheduler: S) -> Self {
        Self {
            scheduler,
            transition: config.transition,
            breathing_period: config.breathing_period,
            min_progress: config.min_progress,
            installed: None,
            target: config.min_progress,
            generation: 0,
        }
    }

    /// Install the animation for the given inputs.
    ///
    /// While processing, the ring breathes between its current value and
    /// `1 - current`. Otherwise it eases to full when content is present, or
    /// to the minimum when it is not.
    pub fn retarget(&mut self, processing: bool, content_present: bool, now: Instant) -> Retarget {
        let current = self.progress_at(now);

        // Stop the old driver before anything else can start
        self.cancel();

        let animation = if processing {
            Animation::repeating(current, self.breathing_target(current), self.breathing_period)
        } else {
            let to = if content_present { 1.0 } else { self.min_progress };
            Animation::one_shot(current, to, self.transition)
        };

        self.target = animation.to();
        self.generation += 1;
        let driver = self.scheduler.start(self.generation);

        debug!(
            "retarget #{}: {:?} {:.4} -> {:.4}",
            self.generation,
            animation.style(),
            animation.from(),
            animation.to()
        );

        self.installed = Some(Installed {
            animation,
            started_at: now,
            generation: self.generation,
            driver,
        });

        Retarget {
            generation: self.generation,
            animation,
        }
    }

    /// Stop the running driver, if any. The installed animation is kept so
    /// the ring can still be sampled.
    ///
    /// Returns `true` if a driver was running.
    pub fn cancel(&mut self) -> bool {
        match self.installed.as_mut() {
            Some(installed) if installed.driver.is_running() => {
                installed.driver.stop();
                true
            }
            _ => false,
        }
    }

    /// Stop the driver of a one-shot animation that has reached its target.
    ///
    /// Returns `true` if a driver was stopped.
    pub fn settle(&mut self, now: Instant) -> bool {
        match self.installed.as_mut() {
            Some(installed)
                if installed.driver.is_running()
                    && installed.animation.is_settled(installed.elapsed(now)) =>
            {
                installed.driver.stop();
                debug!("animation #{} settled", installed.generation);
                true
            }
            _ => false,
        }
    }

    /// Ring progress at `now`.
    pub fn progress_at(&self, now: Instant) -> f32 {
        self.installed.as_ref().map_or(self.min_progress, |installed| {
            self.clamp(installed.animation.sample(installed.elapsed(now)))
        })
    }

    /// The value the ring is heading towards at `now`.
    pub fn target_at(&self, now: Instant) -> f32 {
        self.installed.as_ref().map_or(self.target, |installed| {
            installed.animation.target_at(installed.elapsed(now))
        })
    }

    /// Style of the installed animation (one-shot when nothing is installed).
    pub fn style(&self) -> AnimationStyle {
        self.installed.as_ref().map_or(
            AnimationStyle::OneShot {
                duration: self.transition,
            },
            |installed| installed.animation.style(),
        )
    }

    /// The installed animation, if any.
    pub fn animation(&self) -> Option<&Animation> {
        self.installed.as_ref().map(|installed| &installed.animation)
    }

    /// Whether a driver is currently running.
    pub fn is_animating(&self) -> bool {
        self.installed
            .as_ref()
            .is_some_and(|installed| installed.driver.is_running())
    }

    /// Whether `generation` belongs to the installed animation.
    pub fn is_current(&self, generation: u64) -> bool {
        self.installed
            .as_ref()
            .is_some_and(|installed| installed.generation == generation)
    }

    /// Generation of the most recent retarget (0 before the first).
    #[inline]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Lower clamp of the ring progress.
    #[inline]
    pub const fn min_progress(&self) -> f32 {
        self.min_progress
    }

    /// Live-driver bookkeeping of the underlying scheduler.
    pub fn registry(&self) -> &DriverRegistry {
        self.scheduler.registry()
    }

    /// Far end of the breathing swing starting at `current`.
    ///
    /// Mirrors `current` around the middle of the ring. Near the middle the
    /// mirror is too close to swing visibly, so the farther extreme is used.
    fn breathing_target(&self, current: f32) -> f32 {
        let mirrored = self.clamp(1.0 - current);
        if (mirrored - current).abs() >= MIN_BREATHING_SWING {
            mirrored
        } else if current < 0.5 {
            1.0
        } else {
            self.min_progress
        }
    }

    fn clamp(&self, progress: f32) -> f32 {
        progress.clamp(self.min_progress, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::ManualScheduler;
    use crate::config::MIN_PROGRESS;

    fn controller() -> AnimationController<ManualScheduler> {
        AnimationController::new(&WidgetConfig::default(), ManualScheduler::new())
    }

    #[test]
    fn test_starts_empty() {
        let ctl = controller();
        let now = Instant::now();

        assert_eq!(ctl.progress_at(now), MIN_PROGRESS);
        assert!(!ctl.is_animating());
        assert!(!ctl.style().is_repeating());
        assert_eq!(ctl.generation(), 0);
    }

    #[test]
    fn test_one_shot_targets() {
        let mut ctl = controller();
        let t0 = Instant::now();

        let r = ctl.retarget(false, true, t0);
        assert_eq!(r.target(), 1.0);
        assert_eq!(r.style(), AnimationStyle::OneShot { duration: Duration::from_secs(1) });

        let t1 = t0 + Duration::from_secs(2);
        let r = ctl.retarget(false, false, t1);
        assert_eq!(r.target(), MIN_PROGRESS);
        assert_eq!(r.animation.from(), 1.0);
    }

    #[test]
    fn test_processing_oscillates_from_current() {
        let mut ctl = controller();
        let t0 = Instant::now();

        let r = ctl.retarget(true, false, t0);
        assert!(r.style().is_repeating());
        assert_eq!(r.animation.from(), MIN_PROGRESS);
        assert!((r.target() - (1.0 - MIN_PROGRESS)).abs() < f32::EPSILON);

        // Target flips every leg
        assert_eq!(ctl.target_at(t0 + Duration::from_millis(500)), r.target());
        assert_eq!(ctl.target_at(t0 + Duration::from_millis(1500)), MIN_PROGRESS);
    }

    #[test]
    fn test_breathing_mirrors_current_value() {
        let mut ctl = controller();
        let t0 = Instant::now();

        // Fill almost completely, then start processing
        ctl.retarget(false, true, t0);
        let late = t0 + Duration::from_millis(950);
        let current = ctl.progress_at(late);
        let r = ctl.retarget(true, true, late);

        assert!(current > 0.9);
        assert!((r.target() - (1.0 - current)).abs() < 1e-6);
    }

    #[test]
    fn test_breathing_never_collapses_mid_ring() {
        let mut ctl = controller();
        let t0 = Instant::now();

        // Halfway through a fill the mirror is the same point
        ctl.retarget(false, true, t0);
        let mid = t0 + Duration::from_millis(500);
        let current = ctl.progress_at(mid);
        let r = ctl.retarget(true, true, mid);

        assert!((current - 0.5).abs() < 0.01);
        assert!((r.target() - r.animation.from()).abs() >= MIN_BREATHING_SWING - 0.01);
    }

    #[test]
    fn test_retarget_is_continuous() {
        let mut ctl = controller();
        let t0 = Instant::now();
        ctl.retarget(true, false, t0);

        let mid = t0 + Duration::from_millis(300);
        let shown = ctl.progress_at(mid);
        let r = ctl.retarget(false, true, mid);

        assert_eq!(r.animation.from(), shown);
        assert_eq!(ctl.progress_at(mid), shown);
    }

    #[test]
    fn test_retarget_cancels_previous_driver() {
        let mut ctl = controller();
        let t0 = Instant::now();

        ctl.retarget(true, false, t0);
        ctl.retarget(true, true, t0 + Duration::from_millis(10));
        ctl.retarget(false, true, t0 + Duration::from_millis(20));

        let registry = ctl.registry();
        assert_eq!(registry.started(), 3);
        assert_eq!(registry.stopped(), 2);
        assert_eq!(registry.active(), 1);
        assert!(ctl.is_current(3));
        assert!(!ctl.is_current(2));
    }

    #[test]
    fn test_settle_stops_one_shot_only() {
        let mut ctl = controller();
        let t0 = Instant::now();

        ctl.retarget(false, true, t0);
        assert!(!ctl.settle(t0 + Duration::from_millis(500)));
        assert!(ctl.settle(t0 + Duration::from_secs(1)));
        assert!(!ctl.is_animating());
        assert_eq!(ctl.progress_at(t0 + Duration::from_secs(3)), 1.0);

        ctl.retarget(true, true, t0 + Duration::from_secs(3));
        assert!(!ctl.settle(t0 + Duration::from_secs(60)));
        assert!(ctl.is_animating());
    }

    #[test]
    fn test_cancel_freezes_nothing_running() {
        let mut ctl = controller();
        assert!(!ctl.cancel());

        ctl.retarget(true, false, Instant::now());
        assert!(ctl.cancel());
        assert!(!ctl.cancel());
        assert_eq!(ctl.registry().active(), 0);
    }
}
