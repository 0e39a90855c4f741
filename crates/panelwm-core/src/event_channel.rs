#![forbid(unsafe_code)]

//! Typed, component-owned event channels.
//!
//! Every component that publishes notifications owns one
//! [`EventChannel<E>`] for its own event type. There is no global registry
//! and no string-keyed listener map: the event type is the contract.
//!
//! # Invariants
//!
//! 1. Listeners are invoked in subscription order.
//! 2. A listener whose [`Subscription`] has been dropped is never invoked
//!    again. Dead entries are pruned lazily on the next `emit()`.
//! 3. `emit()` snapshots the live listeners before invoking them, so a
//!    listener may subscribe, unsubscribe, or emit on the same channel
//!    without a `RefCell` double borrow.
//!
//! # Failure Modes
//!
//! - **Subscriber leak**: a `Subscription` stored forever keeps its listener
//!   alive. Drop it, or call [`EventChannel::unsubscribe`].

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type ListenerRc<E> = Rc<dyn Fn(&E)>;
type ListenerWeak<E> = Weak<dyn Fn(&E)>;

struct ChannelInner<E> {
    listeners: Vec<(u64, ListenerWeak<E>)>,
    next_id: u64,
}

/// A typed event channel with RAII subscriptions.
pub struct EventChannel<E> {
    inner: Rc<RefCell<ChannelInner<E>>>,
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ChannelInner {
                listeners: Vec::new(),
                next_id: 1,
            })),
        }
    }
}

impl<E: 'static> fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

impl<E: 'static> EventChannel<E> {
    /// Create an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`. It stays registered while the returned
    /// [`Subscription`] is alive.
    #[must_use = "dropping the subscription immediately unsubscribes the listener"]
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        let strong: ListenerRc<E> = Rc::new(listener);
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id = inner.next_id.saturating_add(1);
        inner.listeners.push((id, Rc::downgrade(&strong)));
        Subscription {
            owner: self.owner_key(),
            id,
            _guard: Box::new(strong),
        }
    }

    /// Remove a listener now instead of waiting for the next `emit()`.
    ///
    /// Returns `false` if the subscription belongs to another channel.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        if subscription.owner != self.owner_key() {
            return false;
        }
        let id = subscription.id;
        drop(subscription);
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(entry, _)| *entry != id);
        inner.listeners.len() != before
    }

    /// Deliver `event` to every live listener, returning how many ran.
    pub fn emit(&self, event: &E) -> usize {
        let live: Vec<ListenerRc<E>> = {
            let mut inner = self.inner.borrow_mut();
            inner
                .listeners
                .retain(|(_, weak)| weak.strong_count() > 0);
            inner
                .listeners
                .iter()
                .filter_map(|(_, weak)| weak.upgrade())
                .collect()
        };
        for listener in &live {
            listener(event);
        }
        live.len()
    }

    /// Number of listeners whose subscription is still alive.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .count()
    }

    /// Forget every registered listener. Outstanding subscriptions become inert.
    pub fn clear(&self) {
        self.inner.borrow_mut().listeners.clear();
    }

    // Address of the shared interior; identifies the channel a subscription
    // came from without holding it alive.
    fn owner_key(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }
}

/// RAII guard for one channel listener.
///
/// Dropping the guard drops the listener closure; the channel's weak entry
/// then fails to upgrade and is pruned.
pub struct Subscription {
    owner: usize,
    id: u64,
    _guard: Box<dyn Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, PartialEq)]
    enum Ping {
        One,
        Two,
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let channel = EventChannel::<Ping>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = {
            let log = Rc::clone(&log);
            channel.subscribe(move |e| log.borrow_mut().push(format!("a:{e:?}")))
        };
        let second = {
            let log = Rc::clone(&log);
            channel.subscribe(move |e| log.borrow_mut().push(format!("b:{e:?}")))
        };

        assert_eq!(channel.emit(&Ping::One), 2);
        assert_eq!(*log.borrow(), vec!["a:One", "b:One"]);
        drop((first, second));
    }

    #[test]
    fn dropped_subscription_stops_delivery() {
        let channel = EventChannel::<Ping>::new();
        let hits = Rc::new(Cell::new(0));
        let sub = {
            let hits = Rc::clone(&hits);
            channel.subscribe(move |_| hits.set(hits.get() + 1))
        };
        channel.emit(&Ping::One);
        drop(sub);
        assert_eq!(channel.emit(&Ping::Two), 0);
        assert_eq!(hits.get(), 1);
        assert_eq!(channel.listener_count(), 0);
    }

    #[test]
    fn unsubscribe_removes_only_that_listener() {
        let channel = EventChannel::<Ping>::new();
        let a = Rc::new(Cell::new(0));
        let b = Rc::new(Cell::new(0));
        let sub_a = {
            let a = Rc::clone(&a);
            channel.subscribe(move |_| a.set(a.get() + 1))
        };
        let _sub_b = {
            let b = Rc::clone(&b);
            channel.subscribe(move |_| b.set(b.get() + 1))
        };

        assert!(channel.unsubscribe(sub_a));
        assert_eq!(channel.listener_count(), 1);
        channel.emit(&Ping::One);
        assert_eq!((a.get(), b.get()), (0, 1));
    }

    #[test]
    fn unsubscribe_with_foreign_subscription_is_rejected() {
        let ours = EventChannel::<Ping>::new();
        let theirs = EventChannel::<Ping>::new();
        let _keep = ours.subscribe(|_| {});
        let foreign = theirs.subscribe(|_| {});

        assert!(!ours.unsubscribe(foreign));
        assert_eq!(ours.listener_count(), 1);
    }

    #[test]
    fn listener_may_emit_reentrantly() {
        let channel = Rc::new(EventChannel::<Ping>::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let channel_ref = Rc::downgrade(&channel);
            let seen = Rc::clone(&seen);
            channel.subscribe(move |e| {
                seen.borrow_mut().push(format!("{e:?}"));
                if *e == Ping::One
                    && let Some(channel) = channel_ref.upgrade()
                {
                    channel.emit(&Ping::Two);
                }
            })
        };
        channel.emit(&Ping::One);
        assert_eq!(*seen.borrow(), vec!["One", "Two"]);
    }

    #[test]
    fn debug_reports_live_listener_count() {
        let channel = EventChannel::<Ping>::new();
        let _keep = channel.subscribe(|_| {});
        let dropped = channel.subscribe(|_| {});
        drop(dropped);
        assert_eq!(
            format!("{channel:?}"),
            "EventChannel { listener_count: 1 }"
        );
    }

    #[test]
    fn clear_detaches_everything() {
        let channel = EventChannel::<Ping>::new();
        let hits = Rc::new(Cell::new(0));
        let _sub = {
            let hits = Rc::clone(&hits);
            channel.subscribe(move |_| hits.set(hits.get() + 1))
        };
        channel.clear();
        assert_eq!(channel.emit(&Ping::One), 0);
        assert_eq!(hits.get(), 0);
    }
}
