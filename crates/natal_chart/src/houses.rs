//! House membership for a longitude given the twelve cusps.

use crate::zodiac::normalize;

/// Find the house (1..=12) containing `longitude`.
///
/// Cusp `i` opens house `i + 1` and the next cusp closes it; an arc whose
/// closing cusp is numerically lower wraps through 0° Aries. Returns `None`
/// only when the cusps do not form a circular partition, which means the
/// ephemeris handed back inconsistent data.
pub fn house_of(longitude: f64, cusps: &[f64; 12]) -> Option<u8> {
    let lon = normalize(longitude);
    let cusps = cusps.map(normalize);

    for i in 0..12 {
        let lower = cusps[i];
        let upper = cusps[(i + 1) % 12];

        let inside = if lower < upper {
            lon >= lower && lon < upper
        } else {
            lon >= lower || lon < upper
        };

        if inside {
            return Some(i as u8 + 1);
        }
    }

    None
}
