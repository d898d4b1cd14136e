//! Query state and its pure transition function.

use geo::Coord;
use log::debug;

use crate::action::Action;
use crate::profile::Profile;
use crate::routing::RouteRequest;
use crate::waypoint::{Role, Waypoint, coordinate_text};

/// The ordered waypoints and selected profile of a route query.
///
/// Index 0 is always the start, the last index the end, and everything in
/// between a via point. Ids are handed out from `next_id` and never reused.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    /// Waypoints in visiting order.
    pub waypoints: Vec<Waypoint>,
    /// Id for the next inserted waypoint.
    pub next_id: u64,
    /// Currently selected travel profile.
    pub selected_profile: Profile,
}

impl Default for QueryState {
    /// A fresh session: an empty start and an empty end waypoint.
    fn default() -> Self {
        Self {
            waypoints: vec![Waypoint::empty(0, Role::Start), Waypoint::empty(1, Role::End)],
            next_id: 2,
            selected_profile: Profile::default(),
        }
    }
}

impl QueryState {
    /// True when at least two waypoints exist and all are initialised.
    #[must_use]
    pub fn is_route_ready(&self) -> bool {
        self.waypoints.len() >= 2 && self.waypoints.iter().all(|point| point.is_initialized)
    }

    /// Waypoint coordinates in order.
    #[must_use]
    pub fn coordinates(&self) -> Vec<Coord<f64>> {
        self.waypoints.iter().map(|point| point.coordinate).collect()
    }

    /// Look up a waypoint by id.
    #[must_use]
    pub fn waypoint(&self, id: u64) -> Option<&Waypoint> {
        self.waypoints.iter().find(|point| point.id == id)
    }

    /// The route request this state warrants, if any.
    #[must_use]
    pub fn route_request(&self) -> Option<RouteRequest> {
        self.is_route_ready().then(|| RouteRequest {
            points: self.coordinates(),
            profile: (!self.selected_profile.is_sentinel())
                .then(|| self.selected_profile.key.clone()),
        })
    }

    fn position_of(&self, id: u64) -> Option<usize> {
        self.waypoints.iter().position(|point| point.id == id)
    }

    fn assign_roles(&mut self) {
        let len = self.waypoints.len();
        for (index, point) in self.waypoints.iter_mut().enumerate() {
            point.assign_position(index, len);
        }
    }
}

/// Result of reducing one action.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The state after the action.
    pub state: QueryState,
    /// Route request to emit as a side effect.
    pub route_request: Option<RouteRequest>,
}

impl Transition {
    fn unchanged(state: &QueryState) -> Self {
        Self {
            state: state.clone(),
            route_request: None,
        }
    }

    fn quiet(state: QueryState) -> Self {
        Self {
            state,
            route_request: None,
        }
    }

    fn routed(state: QueryState) -> Self {
        let route_request = state.route_request();
        Self {
            state,
            route_request,
        }
    }
}

/// Reduce `action` against `state`.
///
/// Pure: the input is never modified and the returned [`Transition`] names
/// any route request the caller should emit. Actions the query does not own
/// leave the state unchanged.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::{Action, QueryState, reduce};
///
/// let start = QueryState::default();
/// let first = start.waypoints[0].clone().located_at(Coord { x: 13.4, y: 52.5 });
/// let after_start = reduce(&start, &Action::SetPoint(first));
/// assert!(after_start.route_request.is_none());
///
/// let last = after_start.state.waypoints[1].clone().located_at(Coord { x: 13.5, y: 52.6 });
/// let after_end = reduce(&after_start.state, &Action::SetPoint(last));
/// assert_eq!(after_end.route_request.map(|r| r.points.len()), Some(2));
/// ```
#[must_use]
pub fn reduce(state: &QueryState, action: &Action) -> Transition {
    match action {
        Action::SetPoint(point) => set_point(state, point),
        Action::InvalidatePoint(point) => invalidate_point(state, point),
        Action::ClearPoints => Transition::quiet(clear_points(state)),
        Action::AddPoint {
            at_index,
            coordinate,
            is_initialized,
        } => add_point(state, *at_index, *coordinate, *is_initialized),
        Action::RemovePoint(point) => remove_point(state, point),
        Action::SetVehicle(profile) => {
            let mut next = state.clone();
            next.selected_profile = profile.clone();
            Transition::routed(next)
        }
        Action::InfoReceived(info) => match info.default_profile() {
            Some(profile) => {
                let mut next = state.clone();
                next.selected_profile = profile.clone();
                Transition::quiet(next)
            }
            None => Transition::unchanged(state),
        },
        Action::RouteReceived(_) | Action::RouteFailed(_) | Action::QueryChanged(_) => {
            Transition::unchanged(state)
        }
    }
}

fn set_point(state: &QueryState, point: &Waypoint) -> Transition {
    let Some(index) = state.position_of(point.id) else {
        debug!("ignoring SetPoint for unknown waypoint {}", point.id);
        return Transition::unchanged(state);
    };
    let mut next = state.clone();
    if let Some(slot) = next.waypoints.get_mut(index) {
        *slot = point.clone();
    }
    next.assign_roles();
    Transition::routed(next)
}

fn invalidate_point(state: &QueryState, point: &Waypoint) -> Transition {
    let Some(index) = state.position_of(point.id) else {
        return Transition::unchanged(state);
    };
    let mut next = state.clone();
    if let Some(slot) = next.waypoints.get_mut(index) {
        *slot = Waypoint {
            is_initialized: false,
            ..point.clone()
        };
    }
    next.assign_roles();
    Transition::quiet(next)
}

/// Coordinates are left in place; only text and initialisation reset.
fn clear_points(state: &QueryState) -> QueryState {
    let mut next = state.clone();
    for point in &mut next.waypoints {
        point.query_text.clear();
        point.is_initialized = false;
    }
    next
}

fn add_point(
    state: &QueryState,
    at_index: usize,
    coordinate: Coord<f64>,
    is_initialized: bool,
) -> Transition {
    let mut next = state.clone();
    let id = next.next_id;
    next.next_id += 1;

    let mut point = Waypoint::empty(id, Role::Via);
    point.coordinate = coordinate;
    point.is_initialized = is_initialized;
    if is_initialized {
        point.query_text = coordinate_text(coordinate);
    }

    let index = at_index.min(next.waypoints.len());
    next.waypoints.insert(index, point);
    next.assign_roles();
    Transition::routed(next)
}

fn remove_point(state: &QueryState, point: &Waypoint) -> Transition {
    let Some(index) = state.position_of(point.id) else {
        return Transition::unchanged(state);
    };
    let mut next = state.clone();
    next.waypoints.remove(index);
    next.assign_roles();
    Transition::routed(next)
}
