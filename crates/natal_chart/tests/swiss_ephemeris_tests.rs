use natal_chart::ephemeris::{
    house_system_code, set_ephemeris_path, Body, EphemerisAdapter, GeoLocation, SwissEphemerisAdapter,
    DEFAULT_FLAGS,
};
use natal_chart::houses::house_of;
use natal_chart::zodiac::{sign_of, ZodiacSign};
use std::path::PathBuf;

fn adapter() -> SwissEphemerisAdapter {
    let path = std::env::var("SWISS_EPHEMERIS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/usr/local/share/swisseph"));
    set_ephemeris_path(&path).unwrap();
    SwissEphemerisAdapter::new(&path).unwrap()
}

#[test]
#[ignore] // Requires Swiss Ephemeris files
fn test_j2000_day_number() {
    let day = adapter().julian_day(2000, 1, 1, 12.0).unwrap();
    assert!((day - 2_451_545.0).abs() < 1e-9);
}

#[test]
#[ignore] // Requires Swiss Ephemeris files
fn test_invalid_calendar_date_rejected() {
    assert!(adapter().julian_day(2001, 2, 30, 0.0).is_err());
}

#[test]
#[ignore] // Requires Swiss Ephemeris files
fn test_sun_at_j2000_in_capricorn() {
    let adapter = adapter();
    let sun = adapter
        .body_position(2_451_545.0, Body::Sun, DEFAULT_FLAGS)
        .unwrap();
    assert!((sun.longitude - 280.37).abs() < 0.05);
    assert!(sun.speed_longitude > 0.9 && sun.speed_longitude < 1.1);
    assert_eq!(sign_of(sun.longitude).sign, ZodiacSign::Capricorn);
}

#[test]
#[ignore] // Requires Swiss Ephemeris files
fn test_every_tracked_body_resolves() {
    let adapter = adapter();
    for body in Body::TRACKED {
        let position = adapter.body_position(2_451_545.0, body, DEFAULT_FLAGS);
        assert!(position.is_ok(), "{} failed: {:?}", body.name(), position);
    }
}

#[test]
#[ignore] // Requires Swiss Ephemeris files
fn test_placidus_houses_partition() {
    let adapter = adapter();
    let placidus = house_system_code("placidus").unwrap();
    let recife = GeoLocation {
        lat: -8.05,
        lon: -34.88,
    };
    let houses = adapter
        .house_cusps(2_451_545.0, DEFAULT_FLAGS, recife, placidus)
        .unwrap();

    assert!((houses.cusps[0] - houses.ascendant).abs() < 1e-6);
    assert!((houses.cusps[9] - houses.midheaven).abs() < 1e-6);
    for lon in (0..360).map(|d| d as f64 + 0.5) {
        assert!(house_of(lon, &houses.cusps).is_some());
    }
}
