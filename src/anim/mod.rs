//! Animation: ring transitions, frame drivers and the retarget controller.
//!
//! An [`Animation`] is a pure value: given the time elapsed since it was
//! installed it yields the ring's fill progress. Frames come from a driver
//! owned by the [`AnimationController`]; the controller always stops the
//! current driver before installing a new one, so at most one driver feeds
//! the ring at any time.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  retarget()   ┌──────────────────────┐  start(gen)  ┌──────────────┐
//! │ State Machine│ ────────────▶ │ AnimationController  │ ───────────▶ │  Scheduler   │
//! └──────────────┘               │  stop old → install  │              └──────┬───────┘
//!        ▲                       └──────────────────────┘                     │
//!        │                 Frame { generation }                               ▼
//!        └──────────────────────────────────────────────────────────── Ticker Thread
//! ```

mod animation;
mod controller;
mod driver;
mod easing;

pub use animation::{Animation, AnimationStyle};
pub use controller::{AnimationController, Retarget};
pub use driver::{
    DriverHandle, DriverRegistry, Frame, ManualDriver, ManualScheduler, Scheduler, TickerDriver,
    TickerScheduler,
};
pub use easing::ease_in_out;
