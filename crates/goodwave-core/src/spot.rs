//! Surf spot records as returned by the spots backend.
//!
//! ## Observed wire shape
//!
//! ### `id`
//! A JSON integer today. Identity is compared on the decimal string form so a
//! backend switching to string ids does not change equality.
//!
//! ### `level`
//! One of `"beginner"`, `"intermediate"`, `"advanced"` in practice, matched
//! case-insensitively. Anything else is kept verbatim and rated as
//! intermediate.
//!
//! ### Accessibility and ecology fields
//! Every one of them may be absent or `null` on older records.
//!
//! ### `saved`
//! Never on the wire. It is stamped client-side from the user's favorites
//! after every fetch and defaults to `false` on decode.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque, string-comparable spot identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpotId(String);

impl SpotId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<i64> for SpotId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for SpotId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl<'de> Deserialize<'de> for SpotId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => Self::from(n),
            RawId::Text(s) => Self(s),
        })
    }
}

impl Serialize for SpotId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Difficulty tier of a spot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
    /// Unrecognized wire value, kept as received.
    Other(String),
}

impl Level {
    /// Numeric difficulty on a 1..=5 scale. Unknown tiers rate as intermediate.
    #[must_use]
    pub fn difficulty(&self) -> u8 {
        match self {
            Level::Beginner => 1,
            Level::Intermediate | Level::Other(_) => 3,
            Level::Advanced => 5,
        }
    }
}

impl From<String> for Level {
    fn from(raw: String) -> Self {
        match raw.to_lowercase().as_str() {
            "beginner" => Level::Beginner,
            "intermediate" => Level::Intermediate,
            "advanced" => Level::Advanced,
            _ => Level::Other(raw),
        }
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        match level {
            Level::Beginner => "beginner".to_owned(),
            Level::Intermediate => "intermediate".to_owned(),
            Level::Advanced => "advanced".to_owned(),
            Level::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
            Level::Other(raw) => raw.as_str(),
        })
    }
}

/// A single surf spot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: SpotId,

    /// Display name, e.g. `"Hossegor - La Gravière"`.
    pub name: String,

    /// Free-text address or region. Used as the geocoding query.
    pub location: String,

    /// Break type tag such as `"beach"`, `"reef"` or `"point"`.
    #[serde(rename = "type")]
    pub spot_type: String,

    pub level: Level,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambiance: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_parking: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_ramp: Option<bool>,

    /// Walking distance from parking, in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_distance: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecology_zone_protected: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Whether the current user has favorited this spot. Client-derived.
    #[serde(skip)]
    pub saved: bool,
}

impl Spot {
    /// Returns a copy of this spot with the saved flag replaced.
    #[must_use]
    pub fn with_saved(&self, saved: bool) -> Self {
        Self {
            saved,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.location
    }

    /// Text to hand to a geocoder: the address, or the name when the address
    /// is blank.
    #[must_use]
    pub fn geocode_query(&self) -> &str {
        if self.location.trim().is_empty() {
            &self.name
        } else {
            &self.location
        }
    }

    #[must_use]
    pub fn difficulty(&self) -> u8 {
        self.level.difficulty()
    }
}

/// A resolved geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}
