//! Birth date, time and place to an ephemeris day number.
//!
//! This is the only stage of the chart pipeline that waits on the network:
//! it geocodes the place, looks up the timezone at that coordinate, applies
//! the historical offset to the wall-clock time and converts the resulting
//! UTC instant into a Julian day.

pub mod geocoder;
pub mod timezone;

pub use geocoder::{Geocoder, NominatimGeocoder};
pub use timezone::{local_to_utc, parse_zone, TimeApiResolver, TimezoneResolver};

use crate::ephemeris::{EphemerisAdapter, GeoLocation};
use crate::error::{ChartError, LookupError};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use log::{debug, info, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub const MISSING_FIELDS: &str = "Missing required fields";
pub const INVALID_DOB: &str = "dob must be YYYY-MM-DD";
pub const INVALID_TIME: &str = "time must be HH:mm";

/// Birth data as received from the client, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct BirthData {
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub city: String,
    pub region: String,
}

impl BirthData {
    /// Validate raw request fields: all present and non-blank, `dob` as
    /// `YYYY-MM-DD`, `time` as `HH:mm`.
    pub fn from_fields(
        name: Option<&str>,
        dob: Option<&str>,
        time: Option<&str>,
        city: Option<&str>,
        region: Option<&str>,
    ) -> Result<Self, ChartError> {
        let required = |value: Option<&str>| value.map(str::trim).filter(|v| !v.is_empty());
        let (Some(name), Some(dob), Some(time), Some(city), Some(region)) = (
            required(name),
            required(dob),
            required(time),
            required(city),
            required(region),
        ) else {
            return Err(ChartError::Validation(MISSING_FIELDS.to_string()));
        };

        let date = NaiveDate::parse_from_str(dob, "%Y-%m-%d").map_err(|e| {
            debug!("Rejected dob '{}': {}", dob, e);
            ChartError::Validation(INVALID_DOB.to_string())
        })?;
        let time = NaiveTime::parse_from_str(time, "%H:%M").map_err(|e| {
            debug!("Rejected time '{}': {}", time, e);
            ChartError::Validation(INVALID_TIME.to_string())
        })?;

        Ok(Self {
            name: name.to_string(),
            date,
            time,
            city: city.to_string(),
            region: region.to_string(),
        })
    }

    pub fn place_query(&self) -> String {
        format!("{}, {}", self.city, self.region)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTime {
    pub ephemeris_day: f64,
    pub coordinate: GeoLocation,
    pub timezone: String,
    /// The default zone was used because the lookup came back empty
    pub timezone_fallback: bool,
    pub utc: DateTime<Utc>,
}

pub struct TimeResolver {
    geocoder: Arc<dyn Geocoder>,
    timezones: Arc<dyn TimezoneResolver>,
    default_zone: Tz,
    lookup_timeout: Duration,
}

impl TimeResolver {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        timezones: Arc<dyn TimezoneResolver>,
        default_zone: Tz,
    ) -> Self {
        Self {
            geocoder,
            timezones,
            default_zone,
            lookup_timeout: Duration::from_secs(15),
        }
    }

    /// Upper bound on each network lookup, on top of any client timeout.
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn default_zone(&self) -> Tz {
        self.default_zone
    }

    pub async fn resolve(
        &self,
        birth: &BirthData,
        ephemeris: &dyn EphemerisAdapter,
    ) -> Result<ResolvedTime, ChartError> {
        let place = birth.place_query();
        let coordinate = self
            .bounded("geocoder", self.geocoder.geocode(&place))
            .await
            .map_err(|source| ChartError::Lookup {
                place: place.clone(),
                source,
            })?;

        let local = birth.date.and_time(birth.time);
        let (zone, timezone_fallback) = self.resolve_zone(coordinate, local).await;

        let utc = local_to_utc(local, zone);
        let ephemeris_day = utc_to_ephemeris_day(utc, ephemeris)?;

        info!(
            "Resolved {} at {} ({:.4}, {:.4}) to {} UTC, JD {:.6}",
            birth.name,
            place,
            coordinate.lat,
            coordinate.lon,
            utc.format("%Y-%m-%d %H:%M:%S"),
            ephemeris_day
        );

        Ok(ResolvedTime {
            ephemeris_day,
            coordinate,
            timezone: zone.name().to_string(),
            timezone_fallback,
            utc,
        })
    }

    /// Zone at the coordinate, or the default zone on any lookup miss.
    async fn resolve_zone(
        &self,
        coordinate: GeoLocation,
        local: chrono::NaiveDateTime,
    ) -> (Tz, bool) {
        let looked_up = self
            .bounded("timezone resolver", self.timezones.zone_for(coordinate, local))
            .await;

        match looked_up {
            Ok(Some(zone_id)) => match parse_zone(&zone_id) {
                Some(zone) => {
                    info!("Timezone found for {}, {} on {}: {}", coordinate.lat, coordinate.lon, local, zone_id);
                    (zone, false)
                }
                None => {
                    warn!("Unknown timezone id '{}'; using default timezone {}", zone_id, self.default_zone);
                    (self.default_zone, true)
                }
            },
            Ok(None) => {
                warn!(
                    "Could not find timezone for {}, {} on {}. Using default timezone {}",
                    coordinate.lat, coordinate.lon, local, self.default_zone
                );
                (self.default_zone, true)
            }
            Err(e) => {
                warn!("Timezone lookup failed ({}); using default timezone {}", e, self.default_zone);
                (self.default_zone, true)
            }
        }
    }

    async fn bounded<T>(
        &self,
        service: &'static str,
        lookup: impl Future<Output = Result<T, LookupError>>,
    ) -> Result<T, LookupError> {
        tokio::time::timeout(self.lookup_timeout, lookup)
            .await
            .unwrap_or(Err(LookupError::Timeout {
                service,
                timeout: self.lookup_timeout,
            }))
    }
}

/// UTC instant to Julian day via the ephemeris' own conversion.
pub fn utc_to_ephemeris_day(
    utc: DateTime<Utc>,
    ephemeris: &dyn EphemerisAdapter,
) -> Result<f64, ChartError> {
    let hour = utc.hour() as f64
        + utc.minute() as f64 / 60.0
        + utc.second() as f64 / 3600.0
        + utc.nanosecond() as f64 / 3_600_000_000_000.0;
    Ok(ephemeris.julian_day(utc.year(), utc.month(), utc.day(), hour)?)
}
