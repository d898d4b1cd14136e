//! Travel profiles advertised by the routing service.
//!
//! Profiles are learned once from the service's info endpoint. Before that
//! call resolves the query holds [`Profile::default`], an empty sentinel.

use geo::Rect;

/// Profile key preferred when the service info arrives.
pub const PREFERRED_PROFILE: &str = "car";

/// Capabilities a profile supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfileFeatures {
    /// Whether routes can carry elevation data.
    pub elevation: bool,
}

/// A travel mode such as `car`, `bike` or `foot`.
///
/// # Examples
/// ```
/// use waymark_core::Profile;
///
/// let sentinel = Profile::default();
/// assert!(sentinel.is_sentinel());
/// assert!(!Profile::named("bike").is_sentinel());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    /// Profile name used in route requests.
    pub key: String,
    /// Data version reported for this profile.
    pub version: String,
    /// Import date of the underlying map data.
    pub import_date: String,
    /// Supported capabilities.
    pub features: ProfileFeatures,
}

impl Profile {
    /// Profile with only a key set.
    #[must_use]
    pub fn named(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// True for the placeholder held before service info is known.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.key.is_empty()
    }
}

/// Service metadata returned by the info endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApiInfo {
    /// Area covered by the service, `x = longitude`, `y = latitude`.
    pub bbox: Option<Rect<f64>>,
    /// Service version.
    pub version: String,
    /// Import date of the map data.
    pub import_date: String,
    /// Available profiles, in service order.
    pub vehicles: Vec<Profile>,
}

impl ApiInfo {
    /// Look up a profile by key.
    #[must_use]
    pub fn profile(&self, key: &str) -> Option<&Profile> {
        self.vehicles.iter().find(|profile| profile.key == key)
    }

    /// The profile to select once info arrives.
    ///
    /// Prefers [`PREFERRED_PROFILE`] and otherwise falls back to the first
    /// available profile. Returns `None` when the service lists none.
    #[must_use]
    pub fn default_profile(&self) -> Option<&Profile> {
        self.profile(PREFERRED_PROFILE)
            .or_else(|| self.vehicles.first())
    }
}
