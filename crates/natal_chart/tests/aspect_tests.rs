use natal_chart::aspects::{AspectCalculator, AspectKind, AspectMatch, AspectTable, TrackedPoint};
use natal_chart::ephemeris::PointCategory;
use proptest::prelude::*;

fn point(id: &str, category: PointCategory, lon: f64) -> TrackedPoint {
    TrackedPoint::new(id, id, category, lon)
}

fn sun(lon: f64) -> TrackedPoint {
    point("sun", PointCategory::Luminary, lon)
}

fn planet(id: &str, lon: f64) -> TrackedPoint {
    point(id, PointCategory::Planet, lon)
}

fn ascendant(lon: f64) -> TrackedPoint {
    TrackedPoint::ascendant(lon)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_standard_table() {
    let table = AspectTable::standard();
    assert_eq!(table.definitions().len(), 9);
    let trine = table.get(AspectKind::Trine).unwrap();
    assert_eq!((trine.exact_angle, trine.base_orb), (120.0, 7.0));
    let semisextile = table.get(AspectKind::Semisextile).unwrap();
    assert_eq!((semisextile.exact_angle, semisextile.base_orb), (30.0, 2.0));
    assert!(table
        .definitions()
        .iter()
        .all(|d| (0.0..=180.0).contains(&d.exact_angle)));
}

#[test]
fn test_effective_orb_luminary() {
    let table = AspectTable::standard();
    let calc = AspectCalculator::new(&table);
    let conj = table.get(AspectKind::Conjunction).unwrap();
    assert!(approx(calc.effective_orb(conj, &sun(0.0), &planet("mercury", 0.0)), 12.0));
}

#[test]
fn test_effective_orb_angle() {
    let table = AspectTable::standard();
    let calc = AspectCalculator::new(&table);
    let square = table.get(AspectKind::Square).unwrap();
    assert!(approx(calc.effective_orb(square, &ascendant(0.0), &planet("mars", 0.0)), 8.4));
}

#[test]
fn test_effective_orb_compounds() {
    let table = AspectTable::standard();
    let calc = AspectCalculator::new(&table);
    let opposition = table.get(AspectKind::Opposition).unwrap();
    assert!(approx(calc.effective_orb(opposition, &sun(0.0), &ascendant(0.0)), 14.4));
    // Two luminaries still widen only once
    let moon = point("moon", PointCategory::Luminary, 0.0);
    assert!(approx(calc.effective_orb(opposition, &sun(0.0), &moon), 12.0));
}

#[test]
fn test_node_gets_base_orb() {
    let table = AspectTable::standard();
    let calc = AspectCalculator::new(&table);
    let trine = table.get(AspectKind::Trine).unwrap();
    let node = point("true_node", PointCategory::NodeOrPoint, 0.0);
    assert!(approx(calc.effective_orb(trine, &node, &planet("venus", 0.0)), 7.0));
}

#[test]
fn test_exact_trine() {
    let table = AspectTable::standard();
    let calc = AspectCalculator::new(&table);
    let found = calc.find_aspects(&[planet("a", 10.0), planet("b", 130.0)]);
    assert_eq!(found.len(), 1);
    let m = &found[0];
    assert_eq!(m.aspect, AspectKind::Trine);
    assert_eq!(m.aspect.name(), "trine");
    assert_eq!(m.separation, 120.0);
    assert_eq!(m.orb_delta, 0.0);
    assert_eq!(m.exact_angle, 120.0);
    assert!(m.exact);
}

#[test]
fn test_opposition_across_zero() {
    let table = AspectTable::standard();
    let calc = AspectCalculator::new(&table);
    let found = calc.find_aspects(&[planet("a", 100.0), planet("b", 278.0)]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].aspect, AspectKind::Opposition);
    assert!(approx(found[0].orb_delta, 2.0));

    let found = calc.find_aspects(&[planet("a", 355.0), planet("b", 3.0)]);
    assert_eq!(found[0].aspect, AspectKind::Conjunction);
    assert!(approx(found[0].separation, 8.0));
}

#[test]
fn test_orb_edge_is_inclusive() {
    let table = AspectTable::standard();
    let calc = AspectCalculator::new(&table);
    // Square with base orb 7: 97° separation is right on the edge
    let found = calc.find_aspects(&[planet("a", 0.0), planet("b", 97.0)]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].aspect, AspectKind::Square);

    let found = calc.find_aspects(&[planet("a", 0.0), planet("b", 97.5)]);
    assert!(found.iter().all(|m| m.aspect != AspectKind::Square));
}

#[test]
fn test_overlapping_orbs_report_every_match() {
    let table = AspectTable::standard();
    let calc = AspectCalculator::new(&table);
    // Sun-Ascendant orbs are widened 1.8x: sextile 10.8, semisquare 5.4
    let found = calc.find_aspects(&[sun(0.0), ascendant(50.0)]);
    let kinds: Vec<AspectKind> = found.iter().map(|m| m.aspect).collect();
    assert_eq!(kinds, vec![AspectKind::Sextile, AspectKind::Semisquare]);
    assert!(found.iter().all(|m| m.point_a == "sun" && m.point_b == "ascendant"));
}

#[test]
fn test_no_self_or_duplicate_pairs() {
    let table = AspectTable::standard();
    let calc = AspectCalculator::new(&table);
    // Three points all conjunct
    let points = [planet("a", 10.0), planet("b", 11.0), planet("c", 12.0)];
    let found = calc.find_aspects(&points);
    let pairs: Vec<(&str, &str)> = found
        .iter()
        .map(|m| (m.point_a.as_str(), m.point_b.as_str()))
        .collect();
    assert_eq!(pairs, vec![("a", "b"), ("a", "c"), ("b", "c")]);
}

#[test]
fn test_output_order_follows_input_order() {
    let table = AspectTable::standard();
    let calc = AspectCalculator::new(&table);
    let points: Vec<TrackedPoint> = (0..12)
        .map(|i| planet(&format!("p{}", i), i as f64 * 30.0))
        .collect();

    let first = calc.find_aspects(&points);
    let second = calc.find_aspects(&points);
    assert_eq!(first, second);

    let index = |id: &str| id[1..].parse::<usize>().unwrap();
    let keys: Vec<(usize, usize)> = first
        .iter()
        .map(|m| (index(&m.point_a), index(&m.point_b)))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_too_few_points() {
    let table = AspectTable::standard();
    let calc = AspectCalculator::new(&table);
    assert!(calc.find_aspects(&[]).is_empty());
    assert!(calc.find_aspects(&[planet("a", 10.0)]).is_empty());
}

#[test]
fn test_custom_table_is_respected() {
    let table = AspectTable::new(
        vec![natal_chart::aspects::AspectDefinition {
            kind: AspectKind::Trine,
            exact_angle: 120.0,
            base_orb: 1.0,
        }],
        1.0,
        1.0,
    );
    let calc = AspectCalculator::new(&table);
    assert!(calc.find_aspects(&[sun(0.0), planet("b", 122.0)]).is_empty());
    assert_eq!(calc.find_aspects(&[sun(0.0), planet("b", 120.5)]).len(), 1);
}

fn swapped(m: &AspectMatch) -> (String, String, AspectKind) {
    (m.point_b.clone(), m.point_a.clone(), m.aspect)
}

fn category() -> impl Strategy<Value = PointCategory> {
    prop_oneof![
        Just(PointCategory::Luminary),
        Just(PointCategory::Planet),
        Just(PointCategory::NodeOrPoint),
        Just(PointCategory::Angle),
    ]
}

proptest! {
    #[test]
    fn prop_detection_is_symmetric(
        lon_a in 0.0f64..360.0,
        lon_b in 0.0f64..360.0,
        cat_a in category(),
        cat_b in category(),
        speed_a in -1.0f64..14.0,
        speed_b in -1.0f64..14.0,
    ) {
        let table = AspectTable::standard();
        let calc = AspectCalculator::new(&table);
        let a = point("a", cat_a, lon_a).with_speed(speed_a);
        let b = point("b", cat_b, lon_b).with_speed(speed_b);

        let ab = calc.find_aspects(&[a.clone(), b.clone()]);
        let ba = calc.find_aspects(&[b, a]);

        prop_assert_eq!(ab.len(), ba.len());
        for (x, y) in ab.iter().zip(ba.iter()) {
            prop_assert_eq!(swapped(x), (y.point_a.clone(), y.point_b.clone(), y.aspect));
            prop_assert_eq!(x.separation, y.separation);
            prop_assert_eq!(x.orb_used, y.orb_used);
            prop_assert_eq!(x.applying, y.applying);
        }
    }

    #[test]
    fn prop_separation_folded(lon_a in -720.0f64..720.0, lon_b in -720.0f64..720.0) {
        let sep = natal_chart::aspects::angular_separation(
            natal_chart::zodiac::normalize(lon_a),
            natal_chart::zodiac::normalize(lon_b),
        );
        prop_assert!((0.0..=180.0).contains(&sep));
    }
}
