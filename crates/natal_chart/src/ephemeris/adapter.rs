use crate::ephemeris::bodies::Body;
use crate::ephemeris::types::{BodyPosition, GeoLocation, HouseCusps};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use swisseph::swe::{calc_ut, houses_ex, julday, revjul};
use swisseph::{AscMc, Cusp};
use thiserror::Error;

/// Use the Swiss Ephemeris data files
pub const FLG_SWIEPH: i32 = 2;
/// Fill in the speed components
pub const FLG_SPEED: i32 = 256;

/// Tropical, geocentric, with speeds.
pub const DEFAULT_FLAGS: i32 = FLG_SWIEPH | FLG_SPEED;

const GREG_CAL: i32 = 1;

/// Errors that can occur during ephemeris calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Invalid house system: {system}. Valid systems: {valid:?}")]
    InvalidHouseSystem { system: String, valid: Vec<String> },
    #[error("Failed to convert {year:04}-{month:02}-{day:02} {hour:.4}h UTC to a Julian day")]
    DayConversionFailed {
        year: i32,
        month: u32,
        day: u32,
        hour: f64,
    },
    #[error("Failed to calculate position for {body} at JD {day}: {message}")]
    CalculationFailed {
        body: String,
        day: f64,
        message: String,
    },
    #[error("House calculation failed: {message}")]
    HouseCalculationFailed { message: String },
}

/// House system mapping
const HOUSE_SYSTEMS: &[(&str, u8)] = &[
    ("placidus", b'P'),
    ("whole_sign", b'W'),
    ("koch", b'K'),
    ("equal", b'E'),
    ("regiomontanus", b'R'),
    ("campanus", b'C'),
    ("alcabitius", b'A'),
    ("morinus", b'M'),
    ("porphyry", b'O'),
];

/// Convert house system string to the single-letter Swiss code
pub fn house_system_code(house_system: &str) -> Result<u8, EphemerisError> {
    HOUSE_SYSTEMS
        .iter()
        .find(|(name, _)| *name == house_system.to_lowercase())
        .map(|(_, byte)| *byte)
        .ok_or_else(|| EphemerisError::InvalidHouseSystem {
            system: house_system.to_string(),
            valid: HOUSE_SYSTEMS.iter().map(|(name, _)| name.to_string()).collect(),
        })
}

fn check_path(ephemeris_path: &Path) -> Result<(), EphemerisError> {
    if !ephemeris_path.exists() {
        return Err(EphemerisError::FileNotFound {
            path: ephemeris_path.display().to_string(),
            message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
        });
    }
    Ok(())
}

/// Point libswe at `ephemeris_path` through `SE_EPHE_PATH`.
///
/// Writes the process environment, so it must run while the process is
/// still single-threaded: before the async runtime or any worker pool
/// starts.
pub fn set_ephemeris_path(ephemeris_path: &Path) -> Result<(), EphemerisError> {
    check_path(ephemeris_path)?;
    env::set_var("SE_EPHE_PATH", ephemeris_path);
    Ok(())
}

/// Astronomical computations the chart pipeline needs.
///
/// Implementations return structured records; nothing above this trait sees
/// the underlying library's array layout.
pub trait EphemerisAdapter: Send + Sync {
    /// UTC calendar fields to a Julian day number (UT).
    fn julian_day(&self, year: i32, month: u32, day: u32, hour_utc: f64)
        -> Result<f64, EphemerisError>;

    fn body_position(&self, day: f64, body: Body, flags: i32)
        -> Result<BodyPosition, EphemerisError>;

    fn house_cusps(
        &self,
        day: f64,
        flags: i32,
        location: GeoLocation,
        house_system: u8,
    ) -> Result<HouseCusps, EphemerisError>;
}

/// Swiss Ephemeris adapter implementation
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
    // libswe keeps process-global state; one caller at a time.
    lock: Mutex<()>,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter reading data files from `ephemeris_path`
    ///
    /// Does not touch the process environment; call [`set_ephemeris_path`]
    /// first so libswe finds the same directory.
    pub fn new(ephemeris_path: &Path) -> Result<Self, EphemerisError> {
        check_path(ephemeris_path)?;

        Ok(Self {
            ephemeris_path: ephemeris_path.to_path_buf(),
            lock: Mutex::new(()),
        })
    }

    pub fn ephemeris_path(&self) -> &Path {
        &self.ephemeris_path
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        // A panic inside a previous call leaves no partial state we rely on
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EphemerisAdapter for SwissEphemerisAdapter {
    fn julian_day(
        &self,
        year: i32,
        month: u32,
        day: u32,
        hour_utc: f64,
    ) -> Result<f64, EphemerisError> {
        let failed = || EphemerisError::DayConversionFailed {
            year,
            month,
            day,
            hour: hour_utc,
        };
        if !(0.0..24.0).contains(&hour_utc) {
            return Err(failed());
        }

        let _guard = self.guard();
        let jd = julday(year, month as i32, day as i32, hour_utc, GREG_CAL);
        if !jd.is_finite() {
            return Err(failed());
        }

        // julday silently rolls invalid dates over; reject anything that does
        // not come back as the same calendar day.
        let (y, m, d, _) = revjul(jd, GREG_CAL);
        if (y, m, d) != (year, month as i32, day as i32) {
            return Err(failed());
        }

        Ok(jd)
    }

    fn body_position(
        &self,
        day: f64,
        body: Body,
        flags: i32,
    ) -> Result<BodyPosition, EphemerisError> {
        let result = {
            let _guard = self.guard();
            calc_ut(day, body.swiss_id(), flags as u32)
        }
        .map_err(|e| EphemerisError::CalculationFailed {
            body: body.name().to_string(),
            day,
            message: format!("Swiss Ephemeris error: {}", e),
        })?;

        let out = result.out;
        Ok(BodyPosition {
            longitude: out[0],
            latitude: out[1],
            distance: out[2],
            speed_longitude: out[3],
            speed_latitude: out[4],
            speed_distance: out[5],
        })
    }

    fn house_cusps(
        &self,
        day: f64,
        flags: i32,
        location: GeoLocation,
        house_system: u8,
    ) -> Result<HouseCusps, EphemerisError> {
        if !(-90.0..=90.0).contains(&location.lat) || !(-180.0..=180.0).contains(&location.lon) {
            return Err(EphemerisError::HouseCalculationFailed {
                message: format!("coordinate out of range: {}, {}", location.lat, location.lon),
            });
        }

        let (c, a) = {
            let _guard = self.guard();
            houses_ex(day, flags, location.lat, location.lon, house_system as i32)
        };
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);

        let cusps = [
            cusps.first, cusps.second, cusps.third, cusps.fourth,
            cusps.fifth, cusps.sixth, cusps.seventh, cusps.eighth,
            cusps.ninth, cusps.tenth, cusps.eleventh, cusps.twelfth,
        ];
        let houses = HouseCusps {
            cusps,
            ascendant: ascmc.ascendant,
            midheaven: ascmc.mc,
        };

        validate_house_cusps(&houses)?;
        Ok(houses)
    }
}

/// Reject cusp sets the house assigner cannot partition.
pub fn validate_house_cusps(houses: &HouseCusps) -> Result<(), EphemerisError> {
    let all_values = houses
        .cusps
        .iter()
        .chain([&houses.ascendant, &houses.midheaven]);
    if all_values.clone().any(|v| !v.is_finite()) {
        return Err(EphemerisError::HouseCalculationFailed {
            message: "non-finite cusp or angle".to_string(),
        });
    }
    if houses.cusps.iter().all(|c| *c == houses.cusps[0]) {
        return Err(EphemerisError::HouseCalculationFailed {
            message: format!("all cusps collapsed to {}", houses.cusps[0]),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_house_system_code() {
        assert_eq!(house_system_code("placidus").unwrap(), b'P');
        assert_eq!(house_system_code("Koch").unwrap(), b'K');
        assert!(matches!(
            house_system_code("topocentricish"),
            Err(EphemerisError::InvalidHouseSystem { .. })
        ));
    }

    #[test]
    fn test_missing_ephemeris_path() {
        let result = SwissEphemerisAdapter::new(Path::new("/definitely/not/here/swisseph"));
        assert!(matches!(result, Err(EphemerisError::FileNotFound { .. })));
    }

    #[test]
    fn test_missing_path_is_not_exported() {
        let result = set_ephemeris_path(Path::new("/definitely/not/here/swisseph"));
        assert!(matches!(result, Err(EphemerisError::FileNotFound { .. })));
    }

    #[test]
    fn test_new_leaves_environment_alone() {
        let before = env::var_os("SE_EPHE_PATH");
        let adapter = SwissEphemerisAdapter::new(&env::temp_dir()).unwrap();
        assert_eq!(adapter.ephemeris_path(), env::temp_dir().as_path());
        assert_eq!(env::var_os("SE_EPHE_PATH"), before);
    }

    #[test]
    fn test_validate_house_cusps() {
        let good = HouseCusps {
            cusps: [0.0, 30.0, 60.0, 90.0, 120.0, 150.0, 180.0, 210.0, 240.0, 270.0, 300.0, 330.0],
            ascendant: 0.0,
            midheaven: 270.0,
        };
        assert!(validate_house_cusps(&good).is_ok());

        let collapsed = HouseCusps { cusps: [0.0; 12], ..good };
        assert!(validate_house_cusps(&collapsed).is_err());

        let nan = HouseCusps { ascendant: f64::NAN, ..good };
        assert!(validate_house_cusps(&nan).is_err());
    }
}
