//! Widget Actor: the UI-affinity thread that owns all widget state.
//!
//! Every mutation of the snapshot and the visual state happens on this
//! thread. Sources on other threads only send messages through a
//! [`WidgetHandle`].

use super::messages::{RenderUpdate, WidgetMessage, WidgetRequest};
use crate::anim::{DriverRegistry, Frame, Scheduler, TickerScheduler};
use crate::config::WidgetConfig;
use crate::error::{Result, WidgetError};
use crate::interaction::{InteractionHandler, PointerEvent, RingBounds, SettingToggle, WidgetSettings};
use crate::signal::{ContentIdentity, Sequenced, SequenceClock, Source};
use crate::state::WidgetStateMachine;
use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender, TryRecvError, TrySendError};
use log::{debug, trace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Capacity of the render queue. Ring frames beyond it replace the oldest
/// queued update instead of piling up behind a slow renderer.
const RENDER_QUEUE_CAPACITY: usize = 16;

/// Cloneable, thread-safe notifier for the widget actor.
///
/// All methods are fire-and-forget. Notifications sent after the actor has
/// stopped are silently dropped.
#[derive(Debug, Clone)]
pub struct WidgetHandle {
    inbox: Sender<WidgetMessage>,
    clock: Arc<SequenceClock>,
}

impl WidgetHandle {
    /// The engine started or stopped processing.
    pub fn notify_processing(&self, processing: bool) {
        let seq = self.clock.stamp(Source::Processing);
        self.post(WidgetMessage::Processing(Sequenced::new(seq, processing)));
    }

    /// The panel content changed (`None` when the panel became empty).
    pub fn notify_content_identity(&self, identity: ContentIdentity) {
        let seq = self.clock.stamp(Source::ContentIdentity);
        self.post(WidgetMessage::ContentIdentity(Sequenced::new(seq, identity)));
    }

    /// The panel's chat became active or inactive.
    pub fn notify_chat_active(&self, active: bool) {
        let seq = self.clock.stamp(Source::ChatActive);
        self.post(WidgetMessage::ChatActive(Sequenced::new(seq, active)));
    }

    /// Forward raw pointer input.
    pub fn pointer(&self, event: PointerEvent) {
        self.post(WidgetMessage::Pointer(event));
    }

    /// The host's hover recognizer changed state.
    pub fn hover(&self, hovering: bool) {
        self.post(WidgetMessage::Hover(hovering));
    }

    /// The host's tap recognizer fired.
    pub fn tap(&self) {
        self.post(WidgetMessage::Tap);
    }

    /// A context menu item was chosen.
    pub fn activate_menu_item(&self, item: SettingToggle) {
        self.post(WidgetMessage::ActivateMenuItem(item));
    }

    /// Send a message, reporting whether the actor is still listening.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Disconnected`] if the actor has stopped.
    pub fn send(&self, message: WidgetMessage) -> Result<()> {
        self.inbox
            .send(message)
            .map_err(|_| WidgetError::Disconnected)
    }

    fn post(&self, message: WidgetMessage) {
        if self.send(message).is_err() {
            trace!("widget actor gone; notification dropped");
        }
    }
}

/// Widget actor handle.
pub struct WidgetActor {
    /// Handle to the widget thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Notifier shared with every [`WidgetHandle`].
    notifier: WidgetHandle,
    /// Ring and highlight updates for the renderer.
    render_rx: Receiver<RenderUpdate>,
    /// Requests for the panel controller / settings layer.
    request_rx: Receiver<WidgetRequest>,
    /// Live animation drivers.
    registry: DriverRegistry,
}

impl WidgetActor {
    /// Spawn the widget actor thread.
    ///
    /// # Arguments
    ///
    /// * `config` - Ring geometry and timing.
    /// * `settings` - Initial user settings, owned by the actor from now on.
    /// * `bounds` - Where the widget sits in host coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Spawn`] if the OS fails to spawn the thread.
    pub fn spawn(config: WidgetConfig, settings: WidgetSettings, bounds: RingBounds) -> Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let (inbox_tx, inbox_rx) = unbounded::<WidgetMessage>();
        let (render_tx, render_rx) = bounded::<RenderUpdate>(RENDER_QUEUE_CAPACITY);
        let (request_tx, request_rx) = unbounded::<WidgetRequest>();

        let (scheduler, frame_rx) = TickerScheduler::new(config.frame_interval);
        let registry = scheduler.registry().clone();

        let mut machine = WidgetStateMachine::new(&config, scheduler);
        let render = RenderQueue {
            tx: render_tx,
            rx: render_rx.clone(),
        };
        let ring_queue = render.clone();
        machine.subscribe(move |state| ring_queue.push(RenderUpdate::Ring(*state)));
        // Initial frame so the renderer has something to draw
        render.push(RenderUpdate::Ring(*machine.visual()));

        let interaction = InteractionHandler::new(bounds, config.hover_transition, request_tx);

        let mut widget_loop = WidgetLoop {
            machine,
            interaction,
            settings,
            render,
        };

        let handle = thread::Builder::new()
            .name("halo-widget".to_string())
            .spawn(move || {
                widget_loop.run(&inbox_rx, &frame_rx, &shutdown_clone);
            })
            .map_err(|source| WidgetError::Spawn {
                name: "halo-widget",
                source,
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
            notifier: WidgetHandle {
                inbox: inbox_tx,
                clock: Arc::new(SequenceClock::new()),
            },
            render_rx,
            request_rx,
            registry,
        })
    }

    /// Spawn with default configuration and settings.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Spawn`] if the OS fails to spawn the thread.
    pub fn spawn_default(bounds: RingBounds) -> Result<Self> {
        Self::spawn(WidgetConfig::default(), WidgetSettings::default(), bounds)
    }

    /// A notifier for signal sources and the host's input layer.
    pub fn handle(&self) -> WidgetHandle {
        self.notifier.clone()
    }

    /// Receiver of ring and highlight updates.
    ///
    /// The queue is bounded; a reader that falls behind sees the newest
    /// updates and misses older frames.
    #[inline]
    pub const fn render_receiver(&self) -> &Receiver<RenderUpdate> {
        &self.render_rx
    }

    /// Receiver of panel and settings requests.
    #[inline]
    pub const fn request_receiver(&self) -> &Receiver<WidgetRequest> {
        &self.request_rx
    }

    /// Drain all pending render updates.
    pub fn drain_render(&self) -> Vec<RenderUpdate> {
        self.render_rx.try_iter().collect()
    }

    /// Number of animation drivers currently alive.
    pub fn active_drivers(&self) -> usize {
        self.registry.active()
    }

    /// Live-driver bookkeeping.
    pub const fn registry(&self) -> &DriverRegistry {
        &self.registry
    }

    /// Signal the widget thread to tear down.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        // Wake the loop if it is blocked in select
        let _ = self.notifier.send(WidgetMessage::Teardown);
    }

    /// Tear down and wait for the widget thread to finish.
    pub fn join(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for WidgetActor {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

/// Bounded render queue where the newest update always gets in.
#[derive(Clone)]
struct RenderQueue {
    tx: Sender<RenderUpdate>,
    /// Used only to evict the oldest update when the queue is full.
    rx: Receiver<RenderUpdate>,
}

impl RenderQueue {
    fn push(&self, update: RenderUpdate) {
        match self.tx.try_send(update) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => {}
            Err(TrySendError::Full(update)) => {
                trace!("render queue full; dropping oldest update");
                let _ = self.rx.try_recv();
                let _ = self.tx.try_send(update);
            }
        }
    }
}

/// State owned by the widget thread.
struct WidgetLoop {
    machine: WidgetStateMachine<TickerScheduler>,
    interaction: InteractionHandler,
    settings: WidgetSettings,
    render: RenderQueue,
}

impl WidgetLoop {
    /// Main widget loop.
    ///
    /// One turn handles a message, drains whatever else is queued, then
    /// reconciles once. Flips that cancel out within a turn never reach the
    /// ring.
    fn run(&mut self, inbox: &Receiver<WidgetMessage>, frames: &Receiver<Frame>, shutdown: &AtomicBool) {
        loop {
            if shutdown.load(Ordering::Acquire) {
                break;
            }

            let running = select! {
                recv(inbox) -> message => match message {
                    Ok(message) => self.turn(message, inbox),
                    // Every handle dropped
                    Err(_) => false,
                },
                recv(frames) -> frame => {
                    if let Ok(frame) = frame {
                        self.machine.on_frame(&frame, Instant::now());
                    }
                    true
                }
            };

            if !running {
                break;
            }
        }

        self.machine.teardown();
        debug!(
            "widget loop exited ({} drivers alive)",
            self.machine.registry().active()
        );
    }

    /// Process one turn. Returns `false` on teardown.
    fn turn(&mut self, first: WidgetMessage, inbox: &Receiver<WidgetMessage>) -> bool {
        if !self.dispatch(first) {
            return false;
        }
        loop {
            match inbox.try_recv() {
                Ok(message) => {
                    if !self.dispatch(message) {
                        return false;
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        self.machine.reconcile(Instant::now());
        true
    }

    /// Apply one message. Returns `false` on teardown.
    fn dispatch(&mut self, message: WidgetMessage) -> bool {
        if let Some(update) = message.as_update() {
            self.machine.apply(update);
            return true;
        }

        let now = Instant::now();
        let highlight = match message {
            WidgetMessage::Pointer(event) => self.interaction.on_pointer(event, &self.settings, now),
            WidgetMessage::Hover(hovering) => self.interaction.on_hover_changed(hovering, now),
            WidgetMessage::Tap => {
                self.interaction.on_tap();
                None
            }
            WidgetMessage::ActivateMenuItem(item) => {
                self.interaction.activate(item, &mut self.settings);
                None
            }
            WidgetMessage::Teardown => return false,
            WidgetMessage::Processing(_)
            | WidgetMessage::ContentIdentity(_)
            | WidgetMessage::ChatActive(_) => None,
        };

        if let Some(highlight) = highlight {
            self.render.push(RenderUpdate::Highlight(highlight));
        }
        true
    }
}
