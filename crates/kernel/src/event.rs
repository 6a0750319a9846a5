use std::collections::BTreeMap;

use crate::EngineSubsystem;

/// Named string arguments carried by a fired event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventArgs {
    values: BTreeMap<String, String>,
}

impl EventArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Keys are case-insensitive.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Handler for a named event. Returning `true` consumes the event and stops
/// delivery to later subscribers.
pub type EventCallback = Box<dyn FnMut(&EventArgs) -> bool>;

/// Token returned by [`EventSystem::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    callback: EventCallback,
}

/// Named-event bus.
///
/// Subscribers are invoked in subscription order. Event names are stored
/// lower-cased, so `"Quit"` and `"quit"` are the same event.
#[derive(Default)]
pub struct EventSystem {
    subscriptions: BTreeMap<String, Vec<Subscription>>,
    next_id: u64,
    fired_count: u64,
}

impl std::fmt::Debug for EventSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSystem")
            .field("events", &self.registered_event_names())
            .field("fired_count", &self.fired_count)
            .finish()
    }
}

impl EventSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, name: &str, callback: EventCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(Subscription { id, callback });
        tracing::debug!(event = name, "subscribed");
        id
    }

    /// Remove a single subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let mut removed = false;
        self.subscriptions.retain(|_, subs| {
            let before = subs.len();
            subs.retain(|s| s.id != id);
            removed |= subs.len() != before;
            !subs.is_empty()
        });
        removed
    }

    /// Deliver `name` to its subscribers. Returns `true` if one consumed it.
    pub fn fire(&mut self, name: &str, args: &EventArgs) -> bool {
        self.fired_count += 1;
        let Some(subs) = self.subscriptions.get_mut(&name.to_ascii_lowercase()) else {
            tracing::debug!(event = name, "fired with no subscribers");
            return false;
        };
        tracing::debug!(event = name, subscribers = subs.len(), "fired");
        for sub in subs.iter_mut() {
            if (sub.callback)(args) {
                return true;
            }
        }
        false
    }

    pub fn has_subscribers(&self, name: &str) -> bool {
        self.subscriptions
            .contains_key(&name.to_ascii_lowercase())
    }

    /// Lower-cased names with at least one subscriber, sorted.
    pub fn registered_event_names(&self) -> Vec<String> {
        self.subscriptions.keys().cloned().collect()
    }

    /// Total `fire` calls since construction.
    pub fn fired_count(&self) -> u64 {
        self.fired_count
    }
}

impl EngineSubsystem for EventSystem {
    fn name(&self) -> &'static str {
        "event-system"
    }

    fn shutdown(&mut self) {
        self.subscriptions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, EventCallback) {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let cb: EventCallback = Box::new(move |_| {
            h.set(h.get() + 1);
            false
        });
        (hits, cb)
    }

    #[test]
    fn fire_reaches_subscriber() {
        let mut events = EventSystem::new();
        let (hits, cb) = counter();
        events.subscribe("Quit", cb);
        assert!(!events.fire("Quit", &EventArgs::new()));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn names_are_case_insensitive() {
        let mut events = EventSystem::new();
        let (hits, cb) = counter();
        events.subscribe("Quit", cb);
        events.fire("quit", &EventArgs::new());
        events.fire("QUIT", &EventArgs::new());
        assert_eq!(hits.get(), 2);
        assert_eq!(events.registered_event_names(), vec!["quit".to_string()]);
    }

    #[test]
    fn consuming_subscriber_stops_delivery() {
        let mut events = EventSystem::new();
        events.subscribe("ping", Box::new(|_| true));
        let (hits, cb) = counter();
        events.subscribe("ping", cb);
        assert!(events.fire("ping", &EventArgs::new()));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn unknown_event_is_not_consumed() {
        let mut events = EventSystem::new();
        assert!(!events.fire("nothing", &EventArgs::new()));
        assert_eq!(events.fired_count(), 1);
    }

    #[test]
    fn unsubscribe_removes_handler() {
        let mut events = EventSystem::new();
        let (hits, cb) = counter();
        let id = events.subscribe("tick", cb);
        assert!(events.unsubscribe(id));
        assert!(!events.unsubscribe(id));
        events.fire("tick", &EventArgs::new());
        assert_eq!(hits.get(), 0);
        assert!(!events.has_subscribers("tick"));
    }

    #[test]
    fn args_are_passed_through() {
        let mut events = EventSystem::new();
        let seen = Rc::new(Cell::new(false));
        let s = Rc::clone(&seen);
        events.subscribe(
            "echo",
            Box::new(move |args| {
                s.set(args.get("Message") == Some("hi"));
                true
            }),
        );
        events.fire("echo", &EventArgs::new().with("message", "hi"));
        assert!(seen.get());
    }

    #[test]
    fn shutdown_drops_subscriptions() {
        let mut events = EventSystem::new();
        let (_hits, cb) = counter();
        events.subscribe("quit", cb);
        events.shutdown();
        assert!(events.registered_event_names().is_empty());
    }
}
