//! Synchronous publish/subscribe channel.
//!
//! [`EventBus::publish`] hands the message to every current subscriber in
//! registration order and returns once all of them have run. Handlers may
//! publish again; nested dispatches complete depth-first before the outer
//! one continues. Nesting deeper than [`MAX_DISPATCH_DEPTH`] on one thread is
//! refused so a handler that republishes its own message kind cannot recurse
//! forever.

use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use log::warn;
use thiserror::Error;

/// Deepest nesting of re-entrant dispatches allowed on one thread.
pub const MAX_DISPATCH_DEPTH: usize = 32;

thread_local! {
    static DISPATCH_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Errors returned by [`EventBus::publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A handler chain republished beyond the nesting limit.
    #[error("dispatch nested deeper than {limit} levels")]
    NestingTooDeep {
        /// The configured limit.
        limit: usize,
    },
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

type Handler<A> = Arc<dyn Fn(&A) + Send + Sync>;

struct Subscriber<A> {
    token: SubscriptionToken,
    handler: Handler<A>,
}

/// A synchronous, re-entrant message bus.
///
/// # Examples
/// ```
/// use std::sync::{Arc, Mutex};
/// use waymark_core::EventBus;
///
/// let bus = EventBus::<u32>::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// bus.subscribe(move |value| sink.lock().unwrap().push(*value));
///
/// bus.publish(7)?;
/// assert_eq!(*seen.lock().unwrap(), vec![7]);
/// # Ok::<(), waymark_core::DispatchError>(())
/// ```
pub struct EventBus<A> {
    subscribers: RwLock<Vec<Subscriber<A>>>,
    next_token: AtomicU64,
}

impl<A> EventBus<A> {
    /// Create a bus with no subscribers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_token: AtomicU64::new(0),
        }
    }

    /// Register `handler`; it receives every message published from now on.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionToken
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        let token = SubscriptionToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscriber {
                token,
                handler: Arc::new(handler),
            });
        token
    }

    /// Remove the subscriber registered under `token`.
    ///
    /// Returns `false` when the token is unknown or already removed. A
    /// dispatch already in progress still reaches the removed handler.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|subscriber| subscriber.token != token);
        subscribers.len() != before
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Deliver `message` to every current subscriber, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NestingTooDeep`] without delivering anything
    /// when called from handlers nested [`MAX_DISPATCH_DEPTH`] levels deep.
    pub fn publish(&self, message: A) -> Result<(), DispatchError> {
        if DISPATCH_DEPTH.with(Cell::get) >= MAX_DISPATCH_DEPTH {
            warn!("refusing dispatch nested deeper than {MAX_DISPATCH_DEPTH} levels");
            return Err(DispatchError::NestingTooDeep {
                limit: MAX_DISPATCH_DEPTH,
            });
        }

        // Handlers run without the lock held so they can subscribe or publish.
        let handlers: Vec<Handler<A>> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|subscriber| Arc::clone(&subscriber.handler))
            .collect();

        let _depth = DepthGuard::enter();
        for handler in handlers {
            handler(&message);
        }
        Ok(())
    }
}

impl<A> Default for EventBus<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for EventBus<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

struct DepthGuard;

impl DepthGuard {
    fn enter() -> Self {
        DISPATCH_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DISPATCH_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}
