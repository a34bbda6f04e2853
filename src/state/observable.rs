//! Observable: a single-writer value cell with change notification.
//!
//! The cell is owned by exactly one writer, which takes `&mut self` to
//! publish. Subscribers run synchronously, in registration order, on the
//! writer's context right after each value-changing `set`.

/// Identifier returned by [`Observable::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&T) + Send>;

/// A version-tracked value with push-on-change subscribers.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each value-changing `set`.
/// 2. `set(v)` where `v == current` notifies nobody.
/// 3. Subscribers are notified in registration order.
pub struct Observable<T> {
    value: T,
    version: u64,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("version", &self.version)
            .field("subscriber_count", &self.subscribers.len())
            .finish()
    }
}

impl<T: PartialEq> Observable<T> {
    /// Create an observable with the given initial value (version 0).
    pub const fn new(value: T) -> Self {
        Self {
            value,
            version: 0,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// The current value.
    #[inline]
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Current version number.
    #[inline]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Publish a new value. Returns `true` if it differed from the current
    /// one and subscribers were notified.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.version += 1;
        for (_, callback) in &mut self.subscribers {
            callback(&self.value);
        }
        true
    }

    /// Register a callback for future changes.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Remove every callback.
    pub fn clear_subscribers(&mut self) {
        self.subscribers.clear();
    }

    /// Number of registered callbacks.
    #[inline]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
