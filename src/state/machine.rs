//! WidgetStateMachine: reconciles the inbound signals into ring animations.

use super::observable::{Observable, SubscriptionId};
use super::snapshot::{Changes, Inputs, Phase, Snapshot};
use super::visual::VisualState;
use crate::anim::{AnimationController, DriverRegistry, Frame, Retarget, Scheduler};
use crate::config::{RingGeometry, WidgetConfig};
use crate::signal::{ContentIdentity, SequenceGate, Sequenced, Source};
use log::{debug, trace};
use std::time::Instant;

/// A sequenced notification from one of the inbound sources.
#[derive(Debug, Clone, Copy)]
pub enum Update {
    /// The engine's processing flag.
    Processing(Sequenced<bool>),
    /// The panel content identity.
    ContentIdentity(Sequenced<ContentIdentity>),
    /// The panel's chat-active flag.
    ChatActive(Sequenced<bool>),
}

impl Update {
    /// The source this update came from.
    pub const fn source(&self) -> Source {
        match self {
            Self::Processing(_) => Source::Processing,
            Self::ContentIdentity(_) => Source::ContentIdentity,
            Self::ChatActive(_) => Source::ChatActive,
        }
    }

    /// The update's sequence number.
    pub const fn seq(&self) -> u64 {
        match self {
            Self::Processing(s) | Self::ChatActive(s) => s.seq,
            Self::ContentIdentity(s) => s.seq,
        }
    }
}

/// The widget's visual state machine.
///
/// Updates are recorded with [`apply`](Self::apply) and turned into at most
/// one retarget by [`reconcile`](Self::reconcile). The `on_*` methods do
/// both in one call. Between two reconciles any number of updates may be
/// applied; only the latest value of each source matters.
///
/// # Example
///
/// ```rust
/// use halo::{ManualScheduler, WidgetConfig, WidgetStateMachine};
/// use std::time::Instant;
///
/// let mut machine = WidgetStateMachine::new(&WidgetConfig::default(), ManualScheduler::new());
/// let retarget = machine.on_processing_changed(true, Instant::now());
/// assert!(retarget.is_some());
/// assert!(machine.visual().style.is_repeating());
/// ```
pub struct WidgetStateMachine<S: Scheduler> {
    ring: RingGeometry,
    snapshot: Snapshot,
    gate: SequenceGate,
    /// Inputs the installed animation was computed for.
    reconciled: Inputs,
    controller: AnimationController<S>,
    visual: Observable<VisualState>,
    retargets: u64,
    torn_down: bool,
}

impl<S: Scheduler> std::fmt::Debug for WidgetStateMachine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetStateMachine")
            .field("snapshot", &self.snapshot)
            .field("reconciled", &self.reconciled)
            .field("controller", &self.controller)
            .field("visual", &self.visual)
            .field("retargets", &self.retargets)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl<S: Scheduler> WidgetStateMachine<S> {
    /// Create an idle machine with an empty ring.
    pub fn new(config: &WidgetConfig, scheduler: S) -> Self {
        let controller = AnimationController::new(config, scheduler);
        let now = Instant::now();
        let visual = VisualState::new(
            controller.progress_at(now),
            controller.target_at(now),
            controller.style(),
            false,
            &config.ring,
        );

        Self {
            ring: config.ring,
            snapshot: Snapshot::default(),
            gate: SequenceGate::new(),
            reconciled: Inputs::default(),
            controller,
            visual: Observable::new(visual),
            retargets: 0,
            torn_down: false,
        }
    }

    // -------------------------------------------------------------------------
    // Inbound notifications
    // -------------------------------------------------------------------------

    /// Record an update without reconciling.
    ///
    /// Stale updates (sequence number not newer than the last admitted one
    /// for the same source) and updates arriving after teardown are dropped
    /// and report no changes.
    pub fn apply(&mut self, update: Update) -> Changes {
        if self.torn_down {
            trace!("dropping {:?} update after teardown", update.source());
            return Changes::empty();
        }
        if !self.gate.admit(update.source(), update.seq()) {
            trace!("dropping stale {:?} update #{}", update.source(), update.seq());
            return Changes::empty();
        }

        let changes = match update {
            Update::Processing(s) => self.snapshot.set_processing(s.value),
            Update::ContentIdentity(s) => self.snapshot.set_identity(s.value),
            Update::ChatActive(s) => self.snapshot.set_chat_active(s.value),
        };
        if changes.contains(Changes::IDENTITY) && !changes.is_edge() {
            trace!("content replaced, presence unchanged");
        }
        changes
    }

    /// Retarget the ring if the inputs moved since the last retarget.
    ///
    /// Returns the installed animation, or `None` when nothing changed.
    pub fn reconcile(&mut self, now: Instant) -> Option<Retarget> {
        if self.torn_down {
            return None;
        }
        let inputs = self.snapshot.inputs();
        if inputs == self.reconciled {
            return None;
        }

        debug!("edge {:?} -> {:?}", self.reconciled.phase(), inputs.phase());
        self.reconciled = inputs;
        let retarget = self
            .controller
            .retarget(inputs.processing, inputs.content_present, now);
        self.retargets += 1;
        self.publish(now);
        Some(retarget)
    }

    /// The engine's processing flag changed (in delivery order).
    pub fn on_processing_changed(&mut self, processing: bool, now: Instant) -> Option<Retarget> {
        let seq = self.gate.next(Source::Processing);
        self.apply(Update::Processing(Sequenced::new(seq, processing)));
        self.reconcile(now)
    }

    /// The panel content identity changed (in delivery order).
    pub fn on_content_identity_changed(
        &mut self,
        identity: ContentIdentity,
        now: Instant,
    ) -> Option<Retarget> {
        let seq = self.gate.next(Source::ContentIdentity);
        self.apply(Update::ContentIdentity(Sequenced::new(seq, identity)));
        self.reconcile(now)
    }

    /// The panel's chat-active flag changed (in delivery order).
    pub fn on_chat_active_changed(&mut self, chat_active: bool, now: Instant) -> Option<Retarget> {
        let seq = self.gate.next(Source::ChatActive);
        self.apply(Update::ChatActive(Sequenced::new(seq, chat_active)));
        self.reconcile(now)
    }

    // -------------------------------------------------------------------------
    // Frames
    // -------------------------------------------------------------------------

    /// Sample the ring at `now` and publish it.
    ///
    /// Stops the driver once a one-shot animation has settled.
    pub fn advance(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }
        self.controller.settle(now);
        self.publish(now);
    }

    /// Handle a frame from a driver. Frames of superseded animations are
    /// discarded.
    pub fn on_frame(&mut self, frame: &Frame, now: Instant) {
        if !self.controller.is_current(frame.generation) {
            trace!(
                "discarding frame {} of superseded animation #{}",
                frame.frame,
                frame.generation
            );
            return;
        }
        self.advance(now);
    }

    /// Stop the running driver, drop every subscriber and ignore all
    /// further input. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.controller.cancel();
        self.visual.clear_subscribers();
        self.torn_down = true;
        debug!("widget torn down after {} retargets", self.retargets);
    }

    // -------------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------------

    /// Register a callback for visual state changes.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&VisualState) + Send + 'static,
    ) -> SubscriptionId {
        self.visual.subscribe(callback)
    }

    /// Remove a visual state callback.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.visual.unsubscribe(id)
    }

    /// The last published visual state.
    #[inline]
    pub const fn visual(&self) -> &VisualState {
        self.visual.get()
    }

    /// Number of visual states published so far.
    #[inline]
    pub const fn visual_version(&self) -> u64 {
        self.visual.version()
    }

    /// Latest admitted value of each signal.
    #[inline]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Current display phase.
    #[inline]
    pub const fn phase(&self) -> Phase {
        self.snapshot.phase()
    }

    /// Number of retargets performed.
    #[inline]
    pub const fn retarget_count(&self) -> u64 {
        self.retargets
    }

    /// Whether a driver is running.
    pub fn is_animating(&self) -> bool {
        self.controller.is_animating()
    }

    /// Whether [`teardown`](Self::teardown) has run.
    #[inline]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Live-driver bookkeeping.
    pub fn registry(&self) -> &DriverRegistry {
        self.controller.registry()
    }

    /// The animation controller.
    pub const fn controller(&self) -> &AnimationController<S> {
        &self.controller
    }

    fn publish(&mut self, now: Instant) {
        let progress = self.controller.progress_at(now);
        let inputs = self.snapshot.inputs();
        // Keep drawing the ring while it empties
        let ring_visible =
            inputs.processing || inputs.content_present || progress > self.controller.min_progress();
        let state = VisualState::new(
            progress,
            self.controller.target_at(now),
            self.controller.style(),
            ring_visible,
            &self.ring,
        );
        self.visual.set(state);
    }
}

impl<S: Scheduler> Drop for WidgetStateMachine<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::{AnimationStyle, ManualScheduler};
    use crate::config::MIN_PROGRESS;
    use crate::signal::Fingerprint;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn machine() -> WidgetStateMachine<ManualScheduler> {
        WidgetStateMachine::new(&WidgetConfig::default(), ManualScheduler::new())
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_starts_idle_and_empty() {
        let m = machine();

        assert_eq!(m.phase(), Phase::Idle);
        assert_eq!(m.visual().fill_progress, MIN_PROGRESS);
        assert!(!m.visual().ring_visible);
        assert!(!m.visual().style.is_repeating());
        assert!(!m.is_animating());
    }

    #[test]
    fn test_duplicate_processing_retargets_once() {
        let mut m = machine();
        let t0 = Instant::now();

        assert!(m.on_processing_changed(true, t0).is_some());
        assert!(m.on_processing_changed(true, t0).is_none());

        assert_eq!(m.retarget_count(), 1);
        assert_eq!(m.registry().started(), 1);
        assert_eq!(m.registry().stopped(), 0);
    }

    #[test]
    fn test_processing_takes_precedence() {
        let mut m = machine();
        let t0 = Instant::now();

        m.on_content_identity_changed(Some(Fingerprint::of("abc")), t0);
        m.on_processing_changed(true, t0 + secs(2));
        assert!(m.visual().style.is_repeating());

        // Content changing presence while processing keeps the ring breathing
        m.on_content_identity_changed(None, t0 + secs(3));
        m.on_content_identity_changed(Some(Fingerprint::of("def")), t0 + secs(4));
        assert_eq!(m.phase(), Phase::Processing);
        assert!(m.visual().style.is_repeating());
    }

    #[test]
    fn test_empty_after_settling_regardless_of_history() {
        let mut m = machine();
        let t0 = Instant::now();

        m.on_processing_changed(true, t0);
        m.on_chat_active_changed(true, t0 + Duration::from_millis(200));
        m.on_content_identity_changed(Some(Fingerprint::of("x")), t0 + Duration::from_millis(400));
        m.on_processing_changed(false, t0 + Duration::from_millis(700));
        m.on_chat_active_changed(false, t0 + Duration::from_millis(900));
        m.on_content_identity_changed(None, t0 + secs(1));

        m.advance(t0 + secs(3));
        assert_eq!(m.visual().fill_progress, MIN_PROGRESS);
        assert_eq!(m.visual().target, MIN_PROGRESS);
        assert!(!m.visual().ring_visible);
        assert!(!m.is_animating());
    }

    #[test]
    fn test_no_dangling_driver_after_teardown() {
        let mut m = machine();
        let t0 = Instant::now();

        for i in 0..20u64 {
            let now = t0 + Duration::from_millis(i * 37);
            match i % 3 {
                0 => m.on_processing_changed(i % 2 == 0, now),
                1 => m.on_chat_active_changed(i % 4 == 1, now),
                _ => m.on_content_identity_changed(
                    (i % 5 != 0).then(|| Fingerprint::from_hash(i)),
                    now,
                ),
            };
        }
        m.teardown();

        assert_eq!(m.registry().active(), 0);
        assert!(!m.is_animating());
    }

    #[test]
    fn test_stale_identity_is_discarded() {
        let mut m = machine();
        let t0 = Instant::now();

        // Sequence 2 (absent) arrives before sequence 1 (present)
        m.apply(Update::ContentIdentity(Sequenced::new(2, None)));
        let changes = m.apply(Update::ContentIdentity(Sequenced::new(
            1,
            Some(Fingerprint::of("late")),
        )));
        assert!(changes.is_empty());
        m.reconcile(t0);

        assert!(!m.snapshot().content_present());
        assert_eq!(m.retarget_count(), 0);
    }

    #[test]
    fn test_idle_processing_idle_scenario() {
        let mut m = machine();
        let t0 = Instant::now();

        let r = m.on_processing_changed(true, t0).unwrap();
        assert!(r.style().is_repeating());
        assert_eq!(
            r.style(),
            AnimationStyle::Repeating {
                period: secs(1),
                autoreverse: true
            }
        );

        // The target toggles each cycle
        m.advance(t0 + Duration::from_millis(500));
        let first = m.visual().target;
        m.advance(t0 + Duration::from_millis(1500));
        let second = m.visual().target;
        assert_ne!(first, second);

        let r = m.on_processing_changed(false, t0 + Duration::from_millis(1600)).unwrap();
        assert_eq!(r.style(), AnimationStyle::OneShot { duration: secs(1) });
        assert_eq!(r.target(), MIN_PROGRESS);
        assert_eq!(m.registry().active(), 1);
        assert_eq!(m.registry().stopped(), 1);
    }

    #[test]
    fn test_processing_right_after_content_still_breathes() {
        let mut m = machine();
        let t0 = Instant::now();

        m.on_content_identity_changed(Some(Fingerprint::of("abc")), t0);
        m.on_processing_changed(true, t0 + Duration::from_millis(50));
        assert!(m.visual().style.is_repeating());

        let (mut low, mut high) = (f32::MAX, f32::MIN);
        for ms in (50..=3000u64).step_by(10) {
            m.advance(t0 + Duration::from_millis(ms));
            low = low.min(m.visual().fill_progress);
            high = high.max(m.visual().fill_progress);
        }
        assert!(high - low > 0.5, "swing was only {}", high - low);
    }

    #[test]
    fn test_content_replacement_scenario() {
        let mut m = machine();
        let t0 = Instant::now();

        let r = m.on_content_identity_changed(Some(Fingerprint::of("abc")), t0).unwrap();
        assert!(!r.style().is_repeating());
        assert_eq!(r.target(), 1.0);

        let r = m.on_content_identity_changed(Some(Fingerprint::of("def")), t0 + secs(2));
        assert!(r.is_none());
        assert_eq!(m.retarget_count(), 1);
    }

    #[test]
    fn test_duplicate_processing_no_restart_scenario() {
        let mut m = machine();
        let t0 = Instant::now();

        m.on_processing_changed(true, t0);
        m.on_processing_changed(true, t0 + Duration::from_millis(1));

        assert_eq!(m.registry().started(), 1);
        assert_eq!(m.registry().stopped(), 0);
        assert!(m.controller().is_current(1));
    }

    #[test]
    fn test_coalesced_flip_produces_no_retarget() {
        let mut m = machine();
        let t0 = Instant::now();

        m.apply(Update::Processing(Sequenced::new(1, true)));
        m.apply(Update::Processing(Sequenced::new(2, false)));
        assert!(m.reconcile(t0).is_none());

        m.apply(Update::Processing(Sequenced::new(3, true)));
        m.apply(Update::ChatActive(Sequenced::new(1, true)));
        let r = m.reconcile(t0).unwrap();
        assert!(r.style().is_repeating());
        assert_eq!(m.retarget_count(), 1);
    }

    #[test]
    fn test_subscribers_see_changes_and_stop_after_teardown() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut m = machine();
        let t0 = Instant::now();

        let sink = seen.clone();
        m.subscribe(move |v: &VisualState| sink.lock().unwrap().push(v.style));

        m.on_processing_changed(true, t0);
        assert_eq!(seen.lock().unwrap().len(), 1);

        m.teardown();
        m.on_processing_changed(false, t0 + secs(1));
        m.advance(t0 + secs(2));

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(m.is_torn_down());
    }

    #[test]
    fn test_frames_of_superseded_animation_are_ignored() {
        let mut m = machine();
        let t0 = Instant::now();

        m.on_processing_changed(true, t0);
        m.on_processing_changed(false, t0 + Duration::from_millis(100));
        let version = m.visual_version();

        let stale = Frame {
            generation: 1,
            frame: 3,
            elapsed: Duration::from_millis(48),
        };
        m.on_frame(&stale, t0 + Duration::from_millis(500));
        assert_eq!(m.visual_version(), version);

        let current = Frame { generation: 2, ..stale };
        m.on_frame(&current, t0 + Duration::from_millis(500));
        assert!(m.visual_version() > version);
    }

    #[test]
    fn test_stroke_width_tracks_progress() {
        let mut m = machine();
        let t0 = Instant::now();
        m.on_processing_changed(true, t0);

        for ms in [0u64, 130, 420, 999, 1337, 2500] {
            m.advance(t0 + Duration::from_millis(ms));
            let v = m.visual();
            let expected = (1.0 - v.fill_progress) * 28.0 + 4.0;
            assert!((v.stroke_width - expected).abs() < 1e-4);
            assert!(v.fill_progress >= MIN_PROGRESS && v.fill_progress <= 1.0);
        }
    }
}
