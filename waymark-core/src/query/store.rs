//! The holder that owns the query state.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use log::{debug, warn};

use crate::action::{Action, Dispatcher};
use crate::bus::SubscriptionToken;
use crate::routing::RouteRequester;

use super::state::{QueryState, reduce};

/// Applies [`reduce`] to the current query and executes its side effects.
///
/// The store is the only writer of the query state. Transitions are applied
/// under a write lock, so concurrent publishers are serialised; readers get
/// cheap [`Arc`] snapshots that never change after publication.
///
/// When attached to a [`Dispatcher`] the store publishes
/// [`Action::QueryChanged`] after every transition that alters the state,
/// then hands any warranted route request to its [`RouteRequester`].
///
/// Notifications are published after the write lock is released. Changes
/// made on one thread are announced in order, but two threads applying
/// changing actions at once may see their `QueryChanged` messages delivered
/// in either order. Observers that need the newest state across threads
/// should read [`QueryStore::state`] rather than keep the last announced
/// snapshot.
pub struct QueryStore {
    state: RwLock<Arc<QueryState>>,
    router: Arc<dyn RouteRequester>,
    bus: Weak<Dispatcher>,
}

impl QueryStore {
    /// Create a store holding a fresh session.
    #[must_use]
    pub fn new(router: Arc<dyn RouteRequester>) -> Self {
        Self::with_state(QueryState::default(), router)
    }

    /// Create a store holding `state`.
    #[must_use]
    pub fn with_state(state: QueryState, router: Arc<dyn RouteRequester>) -> Self {
        Self {
            state: RwLock::new(Arc::new(state)),
            router,
            bus: Weak::new(),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<QueryState> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Subscribe the store to `bus`.
    ///
    /// The bus keeps the store alive until the returned token is
    /// unsubscribed; the store only holds a weak reference back.
    pub fn attach(mut self, bus: &Arc<Dispatcher>) -> (Arc<Self>, SubscriptionToken) {
        self.bus = Arc::downgrade(bus);
        let store = Arc::new(self);
        let handler = Arc::clone(&store);
        let token = bus.subscribe(move |action| {
            handler.apply(action);
        });
        (store, token)
    }

    /// Reduce `action`, notify observers and emit any route request.
    ///
    /// Returns the new snapshot when the state changed.
    pub fn apply(&self, action: &Action) -> Option<Arc<QueryState>> {
        let (changed, route_request) = {
            let mut current = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let transition = reduce(&current, action);
            let changed = (transition.state != **current).then(|| {
                let snapshot = Arc::new(transition.state);
                *current = Arc::clone(&snapshot);
                snapshot
            });
            (changed, transition.route_request)
        };

        if let Some(snapshot) = &changed {
            self.notify(snapshot);
        }
        if let Some(request) = route_request {
            debug!(
                "{} warrants a route over {} points",
                action.name(),
                request.points.len()
            );
            self.router.request_route(request);
        }
        changed
    }

    fn notify(&self, snapshot: &Arc<QueryState>) {
        if let Some(bus) = self.bus.upgrade()
            && let Err(err) = bus.publish(Action::QueryChanged(Arc::clone(snapshot)))
        {
            warn!("failed to publish query change: {err}");
        }
    }
}

impl fmt::Debug for QueryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryStore")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingRouteRequester;
    use geo::Coord;
    use rstest::{fixture, rstest};
    use std::sync::Mutex;

    struct Harness {
        bus: Arc<Dispatcher>,
        store: Arc<QueryStore>,
        router: Arc<RecordingRouteRequester>,
        seen: Arc<Mutex<Vec<Action>>>,
    }

    #[fixture]
    fn harness() -> Harness {
        let bus = Arc::new(Dispatcher::new());
        let router = Arc::new(RecordingRouteRequester::default());
        let (store, _token) = QueryStore::new(router.clone()).attach(&bus);
        let seen: Arc<Mutex<Vec<Action>>> = Arc::default();
        let sink = Arc::clone(&seen);
        bus.subscribe(move |action| sink.lock().expect("seen lock").push(action.clone()));
        Harness {
            bus,
            store,
            router,
            seen,
        }
    }

    fn changes(harness: &Harness) -> usize {
        harness
            .seen
            .lock()
            .expect("seen lock")
            .iter()
            .filter(|action| matches!(action, Action::QueryChanged(_)))
            .count()
    }

    #[rstest]
    fn completing_the_query_emits_one_request(harness: Harness) {
        let state = harness.store.state();
        let start = state.waypoints[0].clone().located_at(Coord { x: 1.0, y: 2.0 });
        let end = state.waypoints[1].clone().located_at(Coord { x: 3.0, y: 4.0 });

        harness.bus.publish(Action::SetPoint(start)).expect("publish");
        assert!(harness.router.requests().is_empty());
        harness.bus.publish(Action::SetPoint(end)).expect("publish");

        let requests = harness.router.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].points,
            vec![Coord { x: 1.0, y: 2.0 }, Coord { x: 3.0, y: 4.0 }]
        );
    }

    #[rstest]
    fn change_notification_carries_the_new_snapshot(harness: Harness) {
        harness.bus.publish(Action::ClearPoints).expect("publish");
        assert_eq!(changes(&harness), 0, "clearing an empty query changes nothing");

        let state = harness.store.state();
        let start = state.waypoints[0].clone().located_at(Coord { x: 1.0, y: 2.0 });
        harness.bus.publish(Action::SetPoint(start)).expect("publish");

        let seen = harness.seen.lock().expect("seen lock");
        // The notification is dispatched from inside the SetPoint delivery,
        // so later subscribers see it first.
        let [
            Action::ClearPoints,
            Action::QueryChanged(snapshot),
            Action::SetPoint(_),
        ] = seen.as_slice()
        else {
            panic!("expected ClearPoints, QueryChanged, SetPoint; got {seen:?}");
        };
        assert_eq!(**snapshot, *harness.store.state());
        assert!(snapshot.waypoints[0].is_initialized);
    }

    #[rstest]
    fn snapshots_are_immutable(harness: Harness) {
        let before = harness.store.state();
        harness
            .bus
            .publish(Action::AddPoint {
                at_index: 1,
                coordinate: Coord { x: 0.5, y: 0.5 },
                is_initialized: false,
            })
            .expect("publish");
        assert_eq!(before.waypoints.len(), 2);
        assert_eq!(harness.store.state().waypoints.len(), 3);
    }

    #[rstest]
    fn detached_store_still_applies_actions() {
        let router = Arc::new(RecordingRouteRequester::default());
        let store = QueryStore::new(router);
        let changed = store.apply(&Action::ClearPoints);
        assert!(changed.is_none());
        let added = store.apply(&Action::AddPoint {
            at_index: 0,
            coordinate: Coord { x: 0.0, y: 0.0 },
            is_initialized: false,
        });
        assert_eq!(added.map(|state| state.waypoints.len()), Some(3));
    }

    #[rstest]
    fn concurrent_publishers_are_serialised(harness: Harness) {
        const THREADS: usize = 4;
        const PER_THREAD: usize = 5;
        std::thread::scope(|scope| {
            for thread in 0..THREADS {
                let bus = &harness.bus;
                scope.spawn(move || {
                    for step in 0..PER_THREAD {
                        let index = u32::try_from(thread * PER_THREAD + step).expect("small");
                        let offset = f64::from(index);
                        bus.publish(Action::AddPoint {
                            at_index: 1,
                            coordinate: Coord { x: offset, y: offset },
                            is_initialized: false,
                        })
                        .expect("publish");
                    }
                });
            }
        });

        let added = THREADS * PER_THREAD;
        let latest = harness.store.state();
        assert_eq!(latest.waypoints.len(), added + 2);
        assert_eq!(latest.next_id, u64::try_from(added + 2).expect("small"));
        let mut ids: Vec<u64> = latest.waypoints.iter().map(|point| point.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), added + 2, "every insertion got its own id");
        assert_eq!(changes(&harness), added);
    }
}
