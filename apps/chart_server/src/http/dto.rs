//! Request and response bodies for the chart endpoint.

use natal_chart::aspects::AspectMatch;
use natal_chart::chart::{InterpretedAngles, InterpretedBody, InterpretedCusp};
use natal_chart::ephemeris::GeoLocation;
use natal_chart::ChartSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CHART_MESSAGE: &str = "Natal chart calculated and interpreted.";

/// POST /api/generate-map
///
/// Every field is optional at the JSON level so that a missing one becomes
/// our own 400 instead of a deserializer rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateMapRequest {
    pub name: Option<String>,
    pub dob: Option<String>,
    pub time: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserData<'a> {
    pub name: &'a str,
    pub dob: String,
    pub time: String,
    pub city: &'a str,
    pub state: &'a str,
    pub timezone: &'a str,
}

#[derive(Debug, Serialize)]
pub struct Interpreted<'a> {
    pub bodies: &'a BTreeMap<String, InterpretedBody>,
    pub houses: &'a BTreeMap<u8, InterpretedCusp>,
    pub angles: &'a InterpretedAngles,
    pub aspects: &'a [AspectMatch],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub ephemeris_day: f64,
    pub coordinate: GeoLocation,
    pub timezone_fallback: bool,
}

#[derive(Debug, Serialize)]
pub struct CalculatedMap<'a> {
    pub interpreted: Interpreted<'a>,
    pub meta: ChartMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMapResponse<'a> {
    pub message: &'static str,
    pub user_data: UserData<'a>,
    pub calculated_map: CalculatedMap<'a>,
}

impl<'a> From<&'a ChartSnapshot> for GenerateMapResponse<'a> {
    fn from(chart: &'a ChartSnapshot) -> Self {
        let subject = chart.subject();
        Self {
            message: CHART_MESSAGE,
            user_data: UserData {
                name: &subject.name,
                dob: subject.birth_date.format("%Y-%m-%d").to_string(),
                time: subject.birth_time.format("%H:%M").to_string(),
                city: &subject.city,
                state: &subject.region,
                timezone: &subject.timezone,
            },
            calculated_map: CalculatedMap {
                interpreted: Interpreted {
                    bodies: chart.bodies(),
                    houses: chart.houses(),
                    angles: chart.angles(),
                    aspects: chart.aspects(),
                },
                meta: ChartMeta {
                    ephemeris_day: chart.ephemeris_day(),
                    coordinate: chart.coordinate(),
                    timezone_fallback: chart.timezone_fallback(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
