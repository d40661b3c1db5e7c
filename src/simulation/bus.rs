//! In-process publish/subscribe bus
//!
//! Delivery is synchronous: `publish` calls every current subscriber of the
//! event's topic, in subscription order, on the calling thread, before it
//! returns. There is no queue and nothing is retained after delivery.
//!
//! Handlers receive the bus itself so they can publish follow-up events;
//! those nested publications are delivered depth-first before the outer
//! delivery moves on to its next subscriber.

use log::error;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use super::events::{
    AchievementEvent, Envelope, LevelEvent, LogisticsEvent, Outbox, TutorialEvent, WeatherEvent,
};

type Handler<E> = Rc<dyn Fn(&EventBus, &E)>;

struct Slot<E> {
    id: u64,
    handler: Handler<E>,
}

/// Subscriber list for one event type
pub struct Topic<E> {
    slots: Rc<RefCell<Vec<Slot<E>>>>,
    next_id: Cell<u64>,
}

impl<E: 'static> Topic<E> {
    fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    fn subscribe(&self, handler: Handler<E>) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.slots.borrow_mut().push(Slot { id, handler });

        let slots = Rc::downgrade(&self.slots);
        Subscription::new(move || {
            if let Some(slots) = slots.upgrade() {
                slots.borrow_mut().retain(|slot| slot.id != id);
            }
        })
    }

    /// Handlers registered at this instant. Subscribers added while the
    /// snapshot is being delivered are not part of it.
    fn snapshot(&self) -> Vec<(u64, Handler<E>)> {
        self.slots
            .borrow()
            .iter()
            .map(|slot| (slot.id, Rc::clone(&slot.handler)))
            .collect()
    }

    fn is_subscribed(&self, id: u64) -> bool {
        self.slots.borrow().iter().any(|slot| slot.id == id)
    }

    fn len(&self) -> usize {
        self.slots.borrow().len()
    }
}

/// An event type with its own topic on the bus
pub trait BusEvent: fmt::Debug + 'static {
    const TOPIC: &'static str;

    fn topic(bus: &EventBus) -> &Topic<Self>
    where
        Self: Sized;
}

impl BusEvent for LogisticsEvent {
    const TOPIC: &'static str = "logistics";

    fn topic(bus: &EventBus) -> &Topic<Self> {
        &bus.logistics
    }
}

impl BusEvent for TutorialEvent {
    const TOPIC: &'static str = "tutorial";

    fn topic(bus: &EventBus) -> &Topic<Self> {
        &bus.tutorial
    }
}

impl BusEvent for LevelEvent {
    const TOPIC: &'static str = "level";

    fn topic(bus: &EventBus) -> &Topic<Self> {
        &bus.level
    }
}

impl BusEvent for WeatherEvent {
    const TOPIC: &'static str = "weather";

    fn topic(bus: &EventBus) -> &Topic<Self> {
        &bus.weather
    }
}

impl BusEvent for AchievementEvent {
    const TOPIC: &'static str = "achievement";

    fn topic(bus: &EventBus) -> &Topic<Self> {
        &bus.achievement
    }
}

/// Handle for a registered handler
///
/// Dropping the handle (or calling [`Subscription::cancel`]) removes the
/// handler. Call [`Subscription::detach`] to keep the handler for the
/// lifetime of the bus.
#[must_use = "dropping a Subscription unsubscribes its handler"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// The central event bus with one topic per event type
pub struct EventBus {
    logistics: Topic<LogisticsEvent>,
    tutorial: Topic<TutorialEvent>,
    level: Topic<LevelEvent>,
    weather: Topic<WeatherEvent>,
    achievement: Topic<AchievementEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            logistics: Topic::new(),
            tutorial: Topic::new(),
            level: Topic::new(),
            weather: Topic::new(),
            achievement: Topic::new(),
        }
    }

    /// Register `handler` for every future event of type `E`
    pub fn subscribe<E, F>(&self, handler: F) -> Subscription
    where
        E: BusEvent,
        F: Fn(&EventBus, &E) + 'static,
    {
        E::topic(self).subscribe(Rc::new(handler))
    }

    /// Deliver `event` to every current subscriber of its topic
    ///
    /// A panicking handler is logged and skipped; the remaining handlers
    /// still receive the event.
    pub fn publish<E: BusEvent>(&self, event: E) {
        let topic = E::topic(self);
        for (id, handler) in topic.snapshot() {
            // Cancelled by an earlier handler during this delivery
            if !topic.is_subscribed(id) {
                continue;
            }
            let delivered = catch_unwind(AssertUnwindSafe(|| handler(self, &event)));
            if delivered.is_err() {
                error!(
                    "{} handler #{} panicked while handling {:?}",
                    E::TOPIC,
                    id,
                    event
                );
            }
        }
    }

    /// Publish every queued event in order, each on its own topic
    pub fn flush(&self, outbox: Outbox) {
        for envelope in outbox {
            match envelope {
                Envelope::Logistics(event) => self.publish(event),
                Envelope::Tutorial(event) => self.publish(event),
                Envelope::Level(event) => self.publish(event),
                Envelope::Weather(event) => self.publish(event),
                Envelope::Achievement(event) => self.publish(event),
            }
        }
    }

    pub fn subscriber_count<E: BusEvent>(&self) -> usize {
        E::topic(self).len()
    }
}
