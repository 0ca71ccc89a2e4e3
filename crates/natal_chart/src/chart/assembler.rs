//! Merges sign placement, houses and aspects into the final chart.

use crate::aspects::AspectMatch;
use crate::ephemeris::{Body, BodyPosition, EphemerisError, GeoLocation, HouseCusps};
use crate::houses::house_of;
use crate::time::{BirthData, ResolvedTime};
use crate::zodiac::{normalize, sign_of, Element, ZodiacSign};
use chrono::{NaiveDate, NaiveTime};
use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;

/// Ephemeris output for one chart, before interpretation.
#[derive(Debug, Clone)]
pub struct RawChart {
    /// One entry per tracked body, in `Body::TRACKED` order
    pub bodies: Vec<(Body, Result<BodyPosition, EphemerisError>)>,
    pub houses: HouseCusps,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignPlacement {
    pub sign: ZodiacSign,
    pub degree_in_sign: u32,
    pub minute_in_sign: u32,
    pub second_in_sign: u32,
    pub element: Element,
    /// Traditional ruling planet id
    pub ruler: &'static str,
}

impl SignPlacement {
    pub fn of(longitude: f64) -> Self {
        let pos = sign_of(longitude);
        Self {
            sign: pos.sign,
            degree_in_sign: pos.degree,
            minute_in_sign: pos.minute,
            second_in_sign: pos.second,
            element: pos.sign.element(),
            ruler: pos.sign.ruler(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedBody {
    #[serde(flatten)]
    pub position: BodyPosition,
    #[serde(flatten)]
    pub placement: SignPlacement,
    /// `None` when the cusps could not place the body
    pub house: Option<u8>,
    pub retrograde: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InterpretedBody {
    Placed(PlacedBody),
    Failed { error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretedCusp {
    pub cusp_longitude: f64,
    #[serde(flatten)]
    pub placement: SignPlacement,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretedAngle {
    pub longitude: f64,
    #[serde(flatten)]
    pub placement: SignPlacement,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InterpretedAngles {
    pub ascendant: InterpretedAngle,
    pub midheaven: InterpretedAngle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectInfo {
    pub name: String,
    pub birth_date: NaiveDate,
    pub birth_time: NaiveTime,
    pub city: String,
    pub region: String,
    pub timezone: String,
}

/// A fully interpreted natal chart. Nothing mutates it after assembly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSnapshot {
    subject: SubjectInfo,
    ephemeris_day: f64,
    coordinate: GeoLocation,
    timezone_fallback: bool,
    bodies: BTreeMap<String, InterpretedBody>,
    houses: BTreeMap<u8, InterpretedCusp>,
    angles: InterpretedAngles,
    aspects: Vec<AspectMatch>,
}

impl ChartSnapshot {
    pub fn subject(&self) -> &SubjectInfo {
        &self.subject
    }

    pub fn ephemeris_day(&self) -> f64 {
        self.ephemeris_day
    }

    pub fn coordinate(&self) -> GeoLocation {
        self.coordinate
    }

    pub fn timezone_fallback(&self) -> bool {
        self.timezone_fallback
    }

    /// Keyed by body display name ("Sun", "True Node", ...)
    pub fn bodies(&self) -> &BTreeMap<String, InterpretedBody> {
        &self.bodies
    }

    /// Keyed by house number 1..=12
    pub fn houses(&self) -> &BTreeMap<u8, InterpretedCusp> {
        &self.houses
    }

    pub fn angles(&self) -> &InterpretedAngles {
        &self.angles
    }

    pub fn aspects(&self) -> &[AspectMatch] {
        &self.aspects
    }
}

fn interpret_angle(longitude: f64) -> InterpretedAngle {
    InterpretedAngle {
        longitude: normalize(longitude),
        placement: SignPlacement::of(longitude),
    }
}

/// Build the snapshot. Bodies get a house; cusps and angles only a sign.
pub fn assemble(
    birth: &BirthData,
    resolved: &ResolvedTime,
    raw: &RawChart,
    aspects: Vec<AspectMatch>,
) -> ChartSnapshot {
    let cusps = &raw.houses.cusps;

    let bodies = raw
        .bodies
        .iter()
        .map(|(body, result)| {
            let interpreted = match result {
                Ok(position) => {
                    let house = house_of(position.longitude, cusps);
                    if house.is_none() {
                        warn!(
                            "{} at {:.4} fits no house; cusps {:?} are not a circular partition",
                            body.name(),
                            position.longitude,
                            cusps
                        );
                    }
                    InterpretedBody::Placed(PlacedBody {
                        position: BodyPosition {
                            longitude: normalize(position.longitude),
                            ..*position
                        },
                        placement: SignPlacement::of(position.longitude),
                        house,
                        retrograde: position.is_retrograde(),
                    })
                }
                Err(e) => InterpretedBody::Failed {
                    error: e.to_string(),
                },
            };
            (body.name().to_string(), interpreted)
        })
        .collect();

    let houses = cusps
        .iter()
        .enumerate()
        .map(|(i, &cusp)| {
            (
                i as u8 + 1,
                InterpretedCusp {
                    cusp_longitude: normalize(cusp),
                    placement: SignPlacement::of(cusp),
                },
            )
        })
        .collect();

    ChartSnapshot {
        subject: SubjectInfo {
            name: birth.name.clone(),
            birth_date: birth.date,
            birth_time: birth.time,
            city: birth.city.clone(),
            region: birth.region.clone(),
            timezone: resolved.timezone.clone(),
        },
        ephemeris_day: resolved.ephemeris_day,
        coordinate: resolved.coordinate,
        timezone_fallback: resolved.timezone_fallback,
        bodies,
        houses,
        angles: InterpretedAngles {
            ascendant: interpret_angle(raw.houses.ascendant),
            midheaven: interpret_angle(raw.houses.midheaven),
        },
        aspects,
    }
}
