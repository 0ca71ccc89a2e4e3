use crate::aspects::types::{AspectDefinition, AspectMatch, AspectTable, TrackedPoint};
use crate::ephemeris::PointCategory;
use crate::zodiac::normalize;

/// Deviation below which an aspect is flagged exact
const EXACT_THRESHOLD: f64 = 0.1;

/// Relative speeds below this (degrees per day) count as stationary
const STATIONARY_SPEED: f64 = 0.01;

/// Aspect calculator
pub struct AspectCalculator<'a> {
    table: &'a AspectTable,
}

impl<'a> AspectCalculator<'a> {
    pub fn new(table: &'a AspectTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &AspectTable {
        self.table
    }

    /// Orb for `aspect` between `a` and `b`.
    ///
    /// The luminary and angle factors compound: a Sun-Ascendant pair gets
    /// both.
    pub fn effective_orb(&self, aspect: &AspectDefinition, a: &TrackedPoint, b: &TrackedPoint) -> f64 {
        let involves = |category: PointCategory| a.category == category || b.category == category;

        let mut orb = aspect.base_orb;
        if involves(PointCategory::Luminary) {
            orb *= self.table.luminary_factor;
        }
        if involves(PointCategory::Angle) {
            orb *= self.table.angle_factor;
        }
        orb
    }

    /// Every aspect between every unordered pair of `points`.
    ///
    /// Output is ordered by pair (`(0,1), (0,2), .., (1,2), ..`) and then by
    /// the table's definition order. A pair may match several aspects when
    /// widened orbs overlap; all of them are reported.
    pub fn find_aspects(&self, points: &[TrackedPoint]) -> Vec<AspectMatch> {
        #[cfg(feature = "parallel")]
        {
            self.find_aspects_parallel(points)
        }
        #[cfg(not(feature = "parallel"))]
        {
            let mut matches = Vec::new();
            for i in 0..points.len() {
                for j in (i + 1)..points.len() {
                    matches.extend(self.aspects_between(&points[i], &points[j]));
                }
            }
            matches
        }
    }

    #[cfg(feature = "parallel")]
    fn find_aspects_parallel(&self, points: &[TrackedPoint]) -> Vec<AspectMatch> {
        use rayon::prelude::*;

        let pairs: Vec<(usize, usize)> = (0..points.len())
            .flat_map(|i| ((i + 1)..points.len()).map(move |j| (i, j)))
            .collect();

        let mut indexed: Vec<(usize, Vec<AspectMatch>)> = pairs
            .par_iter()
            .enumerate()
            .map(|(pair_index, &(i, j))| (pair_index, self.aspects_between(&points[i], &points[j])))
            .collect();

        indexed.sort_by_key(|(pair_index, _)| *pair_index);
        indexed.into_iter().flat_map(|(_, matches)| matches).collect()
    }

    /// All aspects the pair forms, in table order.
    pub fn aspects_between(&self, a: &TrackedPoint, b: &TrackedPoint) -> Vec<AspectMatch> {
        let separation = angular_separation(a.longitude, b.longitude);

        self.table
            .definitions()
            .iter()
            .filter_map(|aspect| {
                let orb_used = self.effective_orb(aspect, a, b);
                let orb_delta = (separation - aspect.exact_angle).abs();
                if orb_delta > orb_used {
                    return None;
                }
                Some(AspectMatch {
                    point_a: a.id.clone(),
                    point_b: b.id.clone(),
                    aspect: aspect.kind,
                    exact_angle: aspect.exact_angle,
                    separation,
                    orb_used,
                    orb_delta,
                    applying: is_applying(a, b, aspect.exact_angle, separation),
                    exact: orb_delta < EXACT_THRESHOLD,
                })
            })
            .collect()
    }
}

/// Shortest arc between two longitudes, in `[0, 180]`. Inputs may lie
/// anywhere on the real line.
pub fn angular_separation(lon_a: f64, lon_b: f64) -> f64 {
    let raw_diff = (normalize(lon_a) - normalize(lon_b)).abs();
    if raw_diff > 180.0 {
        360.0 - raw_diff
    } else {
        raw_diff
    }
}

/// Determine if an aspect is applying (approaching exact) or separating
fn is_applying(a: &TrackedPoint, b: &TrackedPoint, aspect_angle: f64, current_angle: f64) -> bool {
    let relative_speed = a.speed_longitude - b.speed_longitude;
    if relative_speed.abs() < STATIONARY_SPEED {
        return false;
    }

    let signed_diff = wrap_signed(a.longitude - b.longitude);

    // Project forward a small amount to see if we're getting closer to exact
    let time_step = 0.1;
    let future_angle = wrap_signed(signed_diff + relative_speed * time_step).abs();

    let current_distance = (current_angle - aspect_angle).abs();
    let future_distance = (future_angle - aspect_angle).abs();
    future_distance < current_distance
}

/// Fold any difference into `[-180, 180)`.
fn wrap_signed(diff: f64) -> f64 {
    (diff + 180.0).rem_euclid(360.0) - 180.0
}
