#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use natal_chart::ephemeris::{
    Body, BodyPosition, EphemerisAdapter, EphemerisError, GeoLocation, HouseCusps,
};
use natal_chart::time::{Geocoder, TimezoneResolver};
use natal_chart::{BirthData, LookupError};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const EQUAL_CUSPS: [f64; 12] = [
    0.0, 30.0, 60.0, 90.0, 120.0, 150.0, 180.0, 210.0, 240.0, 270.0, 300.0, 330.0,
];

pub fn birth() -> BirthData {
    BirthData {
        name: "Ana".to_string(),
        date: NaiveDate::from_ymd_opt(2000, 1, 15).unwrap(),
        time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        city: "Recife".to_string(),
        region: "PE".to_string(),
    }
}

pub fn position(longitude: f64, speed_longitude: f64) -> BodyPosition {
    BodyPosition {
        longitude,
        latitude: 0.0,
        distance: 1.0,
        speed_longitude,
        speed_latitude: 0.0,
        speed_distance: 0.0,
    }
}

/// In-memory ephemeris with fixed answers.
pub struct FakeEphemeris {
    pub positions: HashMap<Body, BodyPosition>,
    pub failing_bodies: Vec<Body>,
    pub houses: Result<HouseCusps, EphemerisError>,
    pub day_result: Result<f64, EphemerisError>,
    pub day_calls: Mutex<Vec<(i32, u32, u32, f64)>>,
}

impl FakeEphemeris {
    /// Bodies spread 37° apart starting at 280.5°, equal houses from 0°.
    pub fn new() -> Self {
        let positions = Body::TRACKED
            .iter()
            .enumerate()
            .map(|(i, &body)| (body, position(280.5 + 37.0 * i as f64, 1.0)))
            .collect();
        Self {
            positions,
            failing_bodies: Vec::new(),
            houses: Ok(HouseCusps {
                cusps: EQUAL_CUSPS,
                ascendant: 0.0,
                midheaven: 270.0,
            }),
            day_result: Ok(2_451_559.083_333),
            day_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_position(mut self, body: Body, longitude: f64, speed: f64) -> Self {
        self.positions.insert(body, position(longitude, speed));
        self
    }

    pub fn failing(mut self, body: Body) -> Self {
        self.failing_bodies.push(body);
        self
    }
}

impl EphemerisAdapter for FakeEphemeris {
    fn julian_day(&self, year: i32, month: u32, day: u32, hour_utc: f64) -> Result<f64, EphemerisError> {
        self.day_calls.lock().unwrap().push((year, month, day, hour_utc));
        self.day_result.clone()
    }

    fn body_position(&self, day: f64, body: Body, _flags: i32) -> Result<BodyPosition, EphemerisError> {
        if self.failing_bodies.contains(&body) {
            return Err(EphemerisError::CalculationFailed {
                body: body.name().to_string(),
                day,
                message: "SwissEph file 'seas_18.se1' not found".to_string(),
            });
        }
        Ok(self.positions[&body])
    }

    fn house_cusps(
        &self,
        _day: f64,
        _flags: i32,
        _location: GeoLocation,
        _house_system: u8,
    ) -> Result<HouseCusps, EphemerisError> {
        self.houses.clone()
    }
}

pub struct FakeGeocoder {
    pub result: Result<GeoLocation, LookupError>,
    pub delay: Option<Duration>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn at(lat: f64, lon: f64) -> Self {
        Self {
            result: Ok(GeoLocation { lat, lon }),
            delay: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: LookupError) -> Self {
        Self {
            result: Err(err),
            delay: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, query: &str) -> Result<GeoLocation, LookupError> {
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}

pub struct FakeTimezones {
    pub result: Result<Option<String>, LookupError>,
    pub delay: Option<Duration>,
}

impl FakeTimezones {
    pub fn zone(zone: &str) -> Self {
        Self {
            result: Ok(Some(zone.to_string())),
            delay: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            result: Ok(None),
            delay: None,
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl TimezoneResolver for FakeTimezones {
    async fn zone_for(
        &self,
        _location: GeoLocation,
        _approx_local: NaiveDateTime,
    ) -> Result<Option<String>, LookupError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}
