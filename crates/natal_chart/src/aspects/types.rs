use crate::ephemeris::{Body, BodyPosition, PointCategory};
use crate::zodiac::normalize;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectKind {
    Conjunction,
    Opposition,
    Trine,
    Square,
    Sextile,
    Quincunx,
    Semisextile,
    Semisquare,
    Sesquiquadrate,
}

impl AspectKind {
    pub fn name(self) -> &'static str {
        match self {
            AspectKind::Conjunction => "conjunction",
            AspectKind::Opposition => "opposition",
            AspectKind::Trine => "trine",
            AspectKind::Square => "square",
            AspectKind::Sextile => "sextile",
            AspectKind::Quincunx => "quincunx",
            AspectKind::Semisextile => "semisextile",
            AspectKind::Semisquare => "semisquare",
            AspectKind::Sesquiquadrate => "sesquiquadrate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectDefinition {
    pub kind: AspectKind,
    /// Exact angle in degrees, 0..=180
    pub exact_angle: f64,
    /// Orb before any luminary/angle widening
    pub base_orb: f64,
}

/// Aspect definitions and orb multipliers.
///
/// Built once at startup and shared read-only by every request.
#[derive(Debug, Clone, PartialEq)]
pub struct AspectTable {
    definitions: Vec<AspectDefinition>,
    /// Applied when either point is the Sun or Moon
    pub luminary_factor: f64,
    /// Applied when either point is the Ascendant or Midheaven
    pub angle_factor: f64,
}

impl AspectTable {
    pub fn new(definitions: Vec<AspectDefinition>, luminary_factor: f64, angle_factor: f64) -> Self {
        Self {
            definitions,
            luminary_factor,
            angle_factor,
        }
    }

    /// The nine major and minor aspects with their base orbs.
    pub fn standard() -> Self {
        let def = |kind, exact_angle, base_orb| AspectDefinition {
            kind,
            exact_angle,
            base_orb,
        };
        Self::new(
            vec![
                def(AspectKind::Conjunction, 0.0, 8.0),
                def(AspectKind::Opposition, 180.0, 8.0),
                def(AspectKind::Trine, 120.0, 7.0),
                def(AspectKind::Square, 90.0, 7.0),
                def(AspectKind::Sextile, 60.0, 6.0),
                def(AspectKind::Quincunx, 150.0, 5.0),
                def(AspectKind::Semisextile, 30.0, 2.0),
                def(AspectKind::Semisquare, 45.0, 3.0),
                def(AspectKind::Sesquiquadrate, 135.0, 3.0),
            ],
            1.5,
            1.2,
        )
    }

    pub fn definitions(&self) -> &[AspectDefinition] {
        &self.definitions
    }

    pub fn get(&self, kind: AspectKind) -> Option<&AspectDefinition> {
        self.definitions.iter().find(|d| d.kind == kind)
    }
}

impl Default for AspectTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// A point taking part in aspect detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedPoint {
    pub id: String,
    pub name: String,
    pub category: PointCategory,
    /// In `[0, 360)` when built through the constructors
    pub longitude: f64,
    pub latitude: f64,
    pub distance: f64,
    pub speed_longitude: f64,
    pub speed_latitude: f64,
    pub speed_distance: f64,
}

impl TrackedPoint {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: PointCategory, longitude: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            longitude: normalize(longitude),
            latitude: 0.0,
            distance: 0.0,
            speed_longitude: 0.0,
            speed_latitude: 0.0,
            speed_distance: 0.0,
        }
    }

    pub fn from_body(body: Body, position: &BodyPosition) -> Self {
        Self {
            id: body.id().to_string(),
            name: body.name().to_string(),
            category: body.category(),
            longitude: normalize(position.longitude),
            latitude: position.latitude,
            distance: position.distance,
            speed_longitude: position.speed_longitude,
            speed_latitude: position.speed_latitude,
            speed_distance: position.speed_distance,
        }
    }

    pub fn ascendant(longitude: f64) -> Self {
        Self::new("ascendant", "Ascendant", PointCategory::Angle, longitude)
    }

    pub fn midheaven(longitude: f64) -> Self {
        Self::new("midheaven", "Midheaven", PointCategory::Angle, longitude)
    }

    pub fn with_speed(mut self, speed_longitude: f64) -> Self {
        self.speed_longitude = speed_longitude;
        self
    }
}

/// One detected aspect between two points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectMatch {
    pub point_a: String,
    pub point_b: String,
    pub aspect: AspectKind,
    pub exact_angle: f64,
    /// Angular separation folded into `[0, 180]`
    #[serde(rename = "measuredSeparation")]
    pub separation: f64,
    /// Effective orb after luminary/angle widening
    pub orb_used: f64,
    /// Distance from the exact angle
    pub orb_delta: f64,
    /// Moving toward exactness
    pub applying: bool,
    /// Within 0.1° of exact
    pub exact: bool,
}
