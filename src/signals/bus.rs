/*!
 * Throw Bus
 * Synchronous fan-out of throw signals to registered subscribers
 *
 * Design: subscribers run on the raising thread, in registration order, once
 * per publish. The subscriber list is snapshotted before fan-out, so handlers
 * may subscribe or unsubscribe (or other threads may) without deadlock; such
 * changes take effect from the next publish.
 */

use super::policy::Verdict;
use super::sink::{DiagnosticSink, TracingSink};
use super::types::{ThrowRecord, ThrowSignal};
use crate::core::config::ThrowConfig;
use crate::core::types::short_type_name;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace, warn};

/// Subscriber callback type
pub type HandlerFn = Arc<dyn Fn(&Sender<'_>, &mut ThrowSignal<'_>) + Send + Sync>;

/// The object a signal was raised on
#[derive(Clone, Copy)]
pub struct Sender<'a> {
    type_name: &'static str,
    value: &'a dyn Any,
}

impl<'a> Sender<'a> {
    pub fn new<T: Any>(value: &'a T) -> Self {
        Self {
            type_name: short_type_name::<T>(),
            value,
        }
    }

    /// Short type name of the sender
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        let value: &'a dyn Any = self.value;
        value.downcast_ref::<T>()
    }
}

impl fmt::Debug for Sender<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Bus statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusStats {
    pub published: u64,
    pub propagated: u64,
    pub continued: u64,
    pub emitted: u64,
    pub active_subscribers: usize,
}

struct BusInner {
    subscribers: RwLock<Vec<(u64, HandlerFn)>>,
    next_id: AtomicU64,
    sink: Arc<dyn DiagnosticSink>,
    config: ThrowConfig,
    published: AtomicU64,
    propagated: AtomicU64,
    continued: AtomicU64,
    emitted: AtomicU64,
}

/// Notification bus for throw signals
///
/// Cloning is cheap and yields a handle to the same bus.
#[derive(Clone)]
pub struct ThrowBus {
    inner: Arc<BusInner>,
}

static GLOBAL: OnceLock<ThrowBus> = OnceLock::new();

impl ThrowBus {
    /// Create a bus with default configuration and the tracing sink
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ThrowBusBuilder {
        ThrowBusBuilder::new()
    }

    /// Process-wide bus, configured from the environment on first use
    pub fn global() -> &'static ThrowBus {
        GLOBAL.get_or_init(|| {
            let config = ThrowConfig::from_env().unwrap_or_else(|e| {
                warn!(error = %e, "Invalid throw configuration, using defaults");
                ThrowConfig::default()
            });
            Self::builder().with_config(config).build()
        })
    }

    pub fn config(&self) -> &ThrowConfig {
        &self.inner.config
    }

    /// Register a subscriber; it stays registered until the guard drops
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&Sender<'_>, &mut ThrowSignal<'_>) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        let handler: HandlerFn = Arc::new(handler);
        self.inner.subscribers.write().push((id, handler));
        debug!(subscriber = id, "Registered throw subscriber");

        Subscription {
            bus: self.clone(),
            id,
            attached: true,
        }
    }

    /// Remove a subscriber by id
    pub fn unsubscribe(&self, id: u64) -> bool {
        let mut subscribers = self.inner.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        let removed = subscribers.len() != before;
        drop(subscribers);

        if removed {
            debug!(subscriber = id, "Unregistered throw subscriber");
        }
        removed
    }

    pub fn is_subscribed(&self, id: u64) -> bool {
        self.inner
            .subscribers
            .read()
            .iter()
            .any(|(sid, _)| *sid == id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }

    /// Fan a signal out to every current subscriber, in registration order
    pub fn publish(&self, sender: &Sender<'_>, signal: &mut ThrowSignal<'_>) {
        let handlers: Vec<HandlerFn> = self
            .inner
            .subscribers
            .read()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        self.inner.published.fetch_add(1, Ordering::Relaxed);
        if self.inner.config.trace_publish {
            trace!(
                mode = %signal.mode(),
                identifier = signal.identifier(),
                sender = sender.type_name(),
                subscribers = handlers.len(),
                "Publishing throw signal"
            );
        }

        for handler in &handlers {
            handler(sender, &mut *signal);
        }
    }

    /// Send an unhandled advisory to the diagnostic sink
    pub(crate) fn emit(&self, record: &ThrowRecord) {
        let line = record.render(self.inner.config.advisory_fields);
        self.inner.sink.emit(record, &line);
    }

    pub(crate) fn count_verdict(&self, verdict: Verdict) {
        let counter = match verdict {
            Verdict::Continue => &self.inner.continued,
            Verdict::Propagate => &self.inner.propagated,
            Verdict::Emit => &self.inner.emitted,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> BusStats {
        BusStats {
            published: self.inner.published.load(Ordering::Relaxed),
            propagated: self.inner.propagated.load(Ordering::Relaxed),
            continued: self.inner.continued.load(Ordering::Relaxed),
            emitted: self.inner.emitted.load(Ordering::Relaxed),
            active_subscribers: self.subscriber_count(),
        }
    }
}

impl Default for ThrowBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ThrowBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThrowBus")
            .field("config", &self.inner.config)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Builder for ThrowBus
pub struct ThrowBusBuilder {
    config: ThrowConfig,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl ThrowBusBuilder {
    pub fn new() -> Self {
        Self {
            config: ThrowConfig::default(),
            sink: None,
        }
    }

    pub fn with_config(mut self, config: ThrowConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default tracing sink
    pub fn with_sink<S>(mut self, sink: S) -> Self
    where
        S: DiagnosticSink + 'static,
    {
        self.sink = Some(Arc::new(sink));
        self
    }

    pub fn build(self) -> ThrowBus {
        ThrowBus {
            inner: Arc::new(BusInner {
                subscribers: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(1),
                sink: self.sink.unwrap_or_else(|| Arc::new(TracingSink)),
                config: self.config,
                published: AtomicU64::new(0),
                propagated: AtomicU64::new(0),
                continued: AtomicU64::new(0),
                emitted: AtomicU64::new(0),
            }),
        }
    }
}

impl Default for ThrowBusBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped registration; unsubscribes on drop
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    bus: ThrowBus,
    id: u64,
    attached: bool,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Keep the subscriber registered for the lifetime of the bus
    pub fn detach(mut self) -> u64 {
        self.attached = false;
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.attached {
            self.bus.unsubscribe(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.attached)
            .finish()
    }
}
