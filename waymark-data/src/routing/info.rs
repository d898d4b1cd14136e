//! Parse the service `info` document.
//!
//! The document mixes fixed fields (`bbox`, `version`, `import_date`) with
//! one object per profile, keyed by profile name. The `features` object uses
//! the same keys and tells which top-level fields are profiles.

use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};
use waymark_core::{ApiInfo, Profile, ProfileFeatures, RoutingError};

use super::convert::bbox_to_rect;

const FIELD_BBOX: &str = "bbox";
const FIELD_VERSION: &str = "version";
const FIELD_IMPORT_DATE: &str = "import_date";
const FIELD_FEATURES: &str = "features";

/// What a top-level `info` field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InfoField {
    Profile,
    BoundingBox,
    Version,
    ImportDate,
    Features,
    Unexpected,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileEntry {
    #[serde(default)]
    version: String,
    #[serde(default)]
    import_date: String,
}

/// Classify `key` against the profile names listed in `features`.
pub(crate) fn classify(key: &str, features: &Map<String, Value>) -> InfoField {
    if features.contains_key(key) {
        return InfoField::Profile;
    }
    match key {
        FIELD_BBOX => InfoField::BoundingBox,
        FIELD_VERSION => InfoField::Version,
        FIELD_IMPORT_DATE => InfoField::ImportDate,
        FIELD_FEATURES => InfoField::Features,
        _ => InfoField::Unexpected,
    }
}

/// Build [`ApiInfo`] from the top-level `info` object.
///
/// Profiles keep the order in which the service lists them. Unexpected
/// fields are logged and skipped.
pub(crate) fn parse_info(document: Map<String, Value>) -> Result<ApiInfo, RoutingError> {
    let features = match document.get(FIELD_FEATURES) {
        Some(Value::Object(features)) => features.clone(),
        Some(_) => return Err(parse_error("`features` must be an object")),
        None => Map::new(),
    };

    let mut info = ApiInfo::default();
    for (key, value) in document {
        match classify(&key, &features) {
            InfoField::Profile => {
                let profile = build_profile(key, value, &features)?;
                info.vehicles.push(profile);
            }
            InfoField::BoundingBox => {
                let bbox: [f64; 4] = serde_json::from_value(value)
                    .map_err(|err| parse_error(&format!("invalid `bbox`: {err}")))?;
                info.bbox = Some(bbox_to_rect(bbox));
            }
            InfoField::Version => info.version = string_value(value),
            InfoField::ImportDate => info.import_date = string_value(value),
            InfoField::Features => {}
            InfoField::Unexpected => warn!("unexpected field `{key}` in service info"),
        }
    }
    Ok(info)
}

fn build_profile(
    key: String,
    value: Value,
    features: &Map<String, Value>,
) -> Result<Profile, RoutingError> {
    let entry: ProfileEntry = serde_json::from_value(value)
        .map_err(|err| parse_error(&format!("invalid profile `{key}`: {err}")))?;
    let features = features
        .get(&key)
        .cloned()
        .map(serde_json::from_value::<FeatureEntry>)
        .transpose()
        .map_err(|err| parse_error(&format!("invalid features for `{key}`: {err}")))?
        .unwrap_or_default();
    Ok(Profile {
        key,
        version: entry.version,
        import_date: entry.import_date,
        features: ProfileFeatures {
            elevation: features.elevation,
        },
    })
}

#[derive(Debug, Default, Deserialize)]
struct FeatureEntry {
    #[serde(default)]
    elevation: bool,
}

fn string_value(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn parse_error(message: &str) -> RoutingError {
    RoutingError::Parse {
        message: message.to_owned(),
    }
}
