//! Coordinate to IANA timezone, and wall clock to UTC under that zone.

use crate::ephemeris::GeoLocation;
use crate::error::LookupError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use natal_config::TimezoneSettings;
use serde::Deserialize;

const SERVICE: &str = "timezone resolver";

#[async_trait]
pub trait TimezoneResolver: Send + Sync {
    /// IANA zone id in effect at `location` around `approx_local`.
    ///
    /// `Ok(None)` means the lookup worked but found nothing (open ocean,
    /// disputed areas); the caller falls back to its default zone.
    async fn zone_for(
        &self,
        location: GeoLocation,
        approx_local: NaiveDateTime,
    ) -> Result<Option<String>, LookupError>;
}

/// timeapi.io coordinate lookup client.
pub struct TimeApiResolver {
    client: reqwest::Client,
    base_url: String,
    timeout: std::time::Duration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoordinateZone {
    #[serde(default)]
    time_zone: Option<String>,
}

impl TimeApiResolver {
    pub fn new(settings: &TimezoneSettings) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| LookupError::Transport {
                service: SERVICE,
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout: settings.timeout,
        })
    }
}

#[async_trait]
impl TimezoneResolver for TimeApiResolver {
    async fn zone_for(
        &self,
        location: GeoLocation,
        _approx_local: NaiveDateTime,
    ) -> Result<Option<String>, LookupError> {
        // Zone ids are stable over time; historical offsets come from tzdata
        let url = format!("{}/api/TimeZone/coordinate", self.base_url);
        let body: CoordinateZone = self
            .client
            .get(&url)
            .query(&[("latitude", location.lat), ("longitude", location.lon)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| LookupError::from_reqwest(SERVICE, self.timeout, e))?
            .json()
            .await
            .map_err(|e| LookupError::from_reqwest(SERVICE, self.timeout, e))?;

        Ok(body.time_zone.filter(|z| !z.trim().is_empty()))
    }
}

/// Parse an IANA identifier into a zone with its full DST history.
pub fn parse_zone(zone_id: &str) -> Option<Tz> {
    zone_id.trim().parse::<Tz>().ok()
}

/// Interpret a wall-clock time in `zone` and return the UTC instant.
///
/// Repeated wall times (clocks going back) resolve to the earlier instant.
/// Skipped wall times (clocks going forward) use the offset that was in
/// force just before the jump.
pub fn local_to_utc(local: NaiveDateTime, zone: Tz) -> DateTime<Utc> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let before_gap = zone.offset_from_utc_datetime(&(local - Duration::days(1)));
            let offset_secs = before_gap.fix().local_minus_utc() as i64;
            Utc.from_utc_datetime(&(local - Duration::seconds(offset_secs)))
        }
    }
}
