//! Waypoints and their positional roles.
//!
//! A waypoint's [`Role`] is derived from its index in the query: the first
//! waypoint starts the route, the last one ends it and everything between is a
//! via point. Marker colours follow the role.

use geo::Coord;

/// Position of a waypoint within the ordered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Role {
    /// First waypoint of the route.
    Start,
    /// Intermediate stop.
    Via,
    /// Final waypoint of the route.
    End,
}

impl Role {
    /// Derive the role for `index` in a query of `len` waypoints.
    ///
    /// Index 0 is always [`Role::Start`], so a single waypoint starts the
    /// route. With two or more waypoints the last index is [`Role::End`].
    ///
    /// # Examples
    /// ```
    /// use waymark_core::Role;
    ///
    /// assert_eq!(Role::for_position(0, 1), Role::Start);
    /// assert_eq!(Role::for_position(1, 3), Role::Via);
    /// assert_eq!(Role::for_position(2, 3), Role::End);
    /// ```
    #[must_use]
    pub const fn for_position(index: usize, len: usize) -> Self {
        if index == 0 {
            Self::Start
        } else if index + 1 == len {
            Self::End
        } else {
            Self::Via
        }
    }

    /// Marker colour for this role.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Start => "#417900",
            Self::Via => "#76a2e8",
            Self::End => "#f97777",
        }
    }
}

/// A single user-specified point in a route query.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    /// Session-unique identifier; never reused.
    pub id: u64,
    /// Location of the waypoint. Meaningful only when initialised.
    pub coordinate: Coord<f64>,
    /// Text shown in the search box for this waypoint.
    pub query_text: String,
    /// Whether the waypoint has a resolved coordinate.
    pub is_initialized: bool,
    /// Marker colour, always `role.color()`.
    pub color: &'static str,
    /// Positional role.
    pub role: Role,
}

impl Waypoint {
    /// Create an uninitialised waypoint at the origin.
    #[must_use]
    pub fn empty(id: u64, role: Role) -> Self {
        Self {
            id,
            coordinate: Coord { x: 0.0, y: 0.0 },
            query_text: String::new(),
            is_initialized: false,
            color: role.color(),
            role,
        }
    }

    /// Return a copy resolved to `coordinate`, with matching query text.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use waymark_core::{Role, Waypoint};
    ///
    /// let point = Waypoint::empty(0, Role::Start).located_at(Coord { x: 13.4, y: 52.5 });
    /// assert!(point.is_initialized);
    /// assert_eq!(point.query_text, "13.4, 52.5");
    /// ```
    #[must_use]
    pub fn located_at(mut self, coordinate: Coord<f64>) -> Self {
        self.coordinate = coordinate;
        self.query_text = coordinate_text(coordinate);
        self.is_initialized = true;
        self
    }

    /// Assign the role (and colour) for `index` in a query of `len` waypoints.
    pub(crate) fn assign_position(&mut self, index: usize, len: usize) {
        self.role = Role::for_position(index, len);
        self.color = self.role.color();
    }
}

/// Render a coordinate as `"lng, lat"`.
#[must_use]
pub fn coordinate_text(coordinate: Coord<f64>) -> String {
    format!("{}, {}", coordinate.x, coordinate.y)
}
