use crate::aspects::{AspectCalculator, AspectTable, TrackedPoint};
use crate::chart::assembler::{assemble, ChartSnapshot, RawChart};
use crate::ephemeris::{Body, EphemerisAdapter, GeoLocation, DEFAULT_FLAGS};
use crate::error::ChartError;
use crate::time::{BirthData, ResolvedTime, TimeResolver};
use log::error;
use std::sync::Arc;

/// Runs the whole pipeline for one request.
pub struct ChartService {
    time: TimeResolver,
    ephemeris: Arc<dyn EphemerisAdapter>,
    aspects: Arc<AspectTable>,
    house_system: u8,
    flags: i32,
}

impl ChartService {
    pub fn new(
        time: TimeResolver,
        ephemeris: Arc<dyn EphemerisAdapter>,
        aspects: Arc<AspectTable>,
        house_system: u8,
    ) -> Self {
        Self {
            time,
            ephemeris,
            aspects,
            house_system,
            flags: DEFAULT_FLAGS,
        }
    }

    pub async fn generate(&self, birth: &BirthData) -> Result<ChartSnapshot, ChartError> {
        let resolved = self.time.resolve(birth, self.ephemeris.as_ref()).await?;
        let raw = compute_raw_chart(
            self.ephemeris.as_ref(),
            resolved.ephemeris_day,
            resolved.coordinate,
            self.flags,
            self.house_system,
        )?;
        Ok(interpret(birth, &resolved, &raw, &self.aspects))
    }
}

/// Query every tracked body and the houses.
///
/// A body that fails is kept as an error entry; failing houses abort the
/// chart.
pub fn compute_raw_chart(
    ephemeris: &dyn EphemerisAdapter,
    day: f64,
    location: GeoLocation,
    flags: i32,
    house_system: u8,
) -> Result<RawChart, ChartError> {
    let bodies = Body::TRACKED
        .iter()
        .map(|&body| {
            let result = ephemeris.body_position(day, body, flags);
            if let Err(e) = &result {
                error!("Ephemeris error calculating {}: {}", body.name(), e);
            }
            (body, result)
        })
        .collect();

    let houses = ephemeris
        .house_cusps(day, flags, location, house_system)
        .inspect_err(|e| error!("Ephemeris error calculating houses: {}", e))?;

    Ok(RawChart { bodies, houses })
}

/// Successful bodies in chart order, then Ascendant and Midheaven.
pub fn tracked_points(raw: &RawChart) -> Vec<TrackedPoint> {
    raw.bodies
        .iter()
        .filter_map(|(body, result)| {
            result
                .as_ref()
                .ok()
                .map(|position| TrackedPoint::from_body(*body, position))
        })
        .chain([
            TrackedPoint::ascendant(raw.houses.ascendant),
            TrackedPoint::midheaven(raw.houses.midheaven),
        ])
        .collect()
}

/// The pure half of the pipeline: no I/O, no suspension.
pub fn interpret(
    birth: &BirthData,
    resolved: &ResolvedTime,
    raw: &RawChart,
    table: &AspectTable,
) -> ChartSnapshot {
    let points = tracked_points(raw);
    let aspects = AspectCalculator::new(table).find_aspects(&points);
    assemble(birth, resolved, raw, aspects)
}
