use serde::{Deserialize, Serialize};

/// Geographic location coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

/// How a tracked point widens aspect orbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointCategory {
    Luminary,
    Planet,
    NodeOrPoint,
    Angle,
}

/// Raw ecliptic position of one body as returned by the ephemeris
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPosition {
    /// Longitude in degrees (0-360)
    pub longitude: f64,
    /// Latitude in degrees
    pub latitude: f64,
    /// Distance in AU
    pub distance: f64,
    /// Speed in longitude (degrees per day)
    pub speed_longitude: f64,
    pub speed_latitude: f64,
    pub speed_distance: f64,
}

impl BodyPosition {
    pub fn is_retrograde(&self) -> bool {
        self.speed_longitude < 0.0
    }
}

/// House cusps and the two chart angles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseCusps {
    /// Cusp of house `i + 1` at index `i`
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
}
