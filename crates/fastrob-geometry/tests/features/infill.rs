use approx::assert_relative_eq;
use fastrob_geometry::{
    group_by_count, CavalierGeometry, InfillParams, Region, Ring, ZigZagInfill,
};
use proptest::prelude::*;

fn params(angle_deg: f64, spacing: f64, continuous: bool) -> InfillParams {
    InfillParams {
        angle_deg,
        spacing,
        continuous,
    }
}

fn square() -> Region {
    Region::from_outer(Ring::rectangle(0.0, 0.0, 10.0, 10.0))
}

fn square_with_hole() -> Region {
    Region::new(
        Ring::rectangle(0.0, 0.0, 10.0, 10.0),
        vec![Ring::rectangle(3.0, 3.0, 7.0, 7.0)],
    )
}

#[test]
fn test_square_gives_one_serpentine() {
    let geometry = CavalierGeometry::new();
    let result = ZigZagInfill::new(&geometry, params(0.0, 2.0, true)).generate(&[square()]);

    let lines = &result.hatch_lines;
    assert!(lines.len() == 5 || lines.len() == 6);
    assert!(lines.iter().all(|l| l.segment_count() == 1));

    // Evenly spaced
    let step = lines[1].y - lines[0].y;
    for pair in lines.windows(2) {
        assert_relative_eq!(pair[1].y - pair[0].y, step, epsilon = 1e-9);
    }

    // Every segment spans the full width
    for line in lines {
        let s = line.segments[0];
        assert_relative_eq!(s.start.x.min(s.end.x), 0.0, epsilon = 1e-9);
        assert_relative_eq!(s.start.x.max(s.end.x), 10.0, epsilon = 1e-9);
    }

    assert_eq!(result.groups, vec![vec![fastrob_geometry::HatchGroup {
        count: 1,
        start: 0,
        len: lines.len(),
    }]]);
    assert_eq!(result.polylines.len(), 1);
    assert_eq!(result.polylines[0].len(), 2 * lines.len());
}

#[test]
fn test_serpentine_alternates_direction() {
    let geometry = CavalierGeometry::new();
    let result = ZigZagInfill::new(&geometry, params(0.0, 2.0, true)).generate(&[square()]);
    let path = &result.polylines[0];

    // Segment ends and the next segment's start share an x, so connectors are vertical
    for k in 0..(path.len() / 2 - 1) {
        let end = path[2 * k + 1];
        let next = path[2 * k + 2];
        assert_relative_eq!(end.x, next.x, epsilon = 1e-9);
    }
    assert!(path[1].x > path[0].x);
    assert!(path[3].x < path[2].x);
}

#[test]
fn test_non_continuous_emits_separate_segments() {
    let geometry = CavalierGeometry::new();
    let result = ZigZagInfill::new(&geometry, params(0.0, 2.0, false)).generate(&[square()]);

    assert_eq!(result.polylines.len(), result.hatch_lines.len());
    assert!(result.polylines.iter().all(|p| p.len() == 2));
    // Even segments run backwards
    assert!(result.polylines[0][0].x > result.polylines[0][1].x);
    assert!(result.polylines[1][0].x < result.polylines[1][1].x);
}

#[test]
fn test_hole_splits_into_three_groups() {
    let geometry = CavalierGeometry::new();
    let result =
        ZigZagInfill::new(&geometry, params(0.0, 2.0, true)).generate(&[square_with_hole()]);

    let counts: Vec<usize> = result.hatch_lines.iter().map(|l| l.segment_count()).collect();
    assert!(counts.contains(&2));

    let groups = &result.groups[0];
    assert!(groups.len() >= 3);
    assert_eq!(groups.first().map(|g| g.count), Some(1));
    assert_eq!(groups.last().map(|g| g.count), Some(1));
    assert!(groups.iter().any(|g| g.count == 2));

    // The two-segment group yields one track per side of the hole
    let expected: usize = groups.iter().map(|g| g.count).sum();
    assert_eq!(result.polylines.len(), expected);
}

#[test]
fn test_rotated_hatch_covers_square() {
    let geometry = CavalierGeometry::new();
    let result = ZigZagInfill::new(&geometry, params(90.0, 2.0, true)).generate(&[square()]);

    assert_eq!(result.polylines.len(), 1);
    for line in &result.hatch_lines {
        let s = line.segments[0];
        assert_relative_eq!(s.start.x, s.end.x, epsilon = 1e-9);
        assert_relative_eq!(s.length(), 10.0, epsilon = 1e-9);
    }
}

#[test]
fn test_islands_are_filled_independently() {
    let geometry = CavalierGeometry::new();
    let islands = vec![
        square(),
        Region::from_outer(Ring::rectangle(20.0, 0.0, 30.0, 10.0)),
    ];
    let result = ZigZagInfill::new(&geometry, params(0.0, 2.0, true)).generate(&islands);

    assert_eq!(result.groups.len(), 2);
    assert_eq!(result.polylines.len(), 2);
    assert!(result.polylines[1].iter().all(|p| p.x >= 20.0 - 1e-9));
}

#[test]
fn test_thin_island_gets_single_centred_line() {
    let geometry = CavalierGeometry::new();
    let strip = Region::from_outer(Ring::rectangle(0.0, 0.0, 10.0, 1.0));
    let result = ZigZagInfill::new(&geometry, params(0.0, 6.0, true)).generate(&[strip]);

    assert_eq!(result.hatch_lines.len(), 1);
    assert_relative_eq!(result.hatch_lines[0].y, 0.5, epsilon = 1e-9);
}

#[test]
fn test_vanishing_island_contributes_nothing() {
    let geometry = CavalierGeometry::new();
    let speck = Region::from_outer(Ring::rectangle(0.0, 0.0, 0.1, 0.1));
    let result = ZigZagInfill::new(&geometry, params(0.0, 2.0, true)).generate(&[speck]);

    assert!(result.is_empty());
    assert!(result.hatch_lines.is_empty());
}

#[test]
fn test_paths_are_lifted_to_layer_height() {
    let geometry = CavalierGeometry::new();
    let result = ZigZagInfill::new(&geometry, params(0.0, 2.0, true)).generate(&[square()]);
    let paths = result.paths(4.0);
    assert_eq!(paths.len(), 1);
    assert!(paths[0].iter().all(|p| p.z == 4.0));
}

proptest! {
    #[test]
    fn prop_grouping_preserves_order_and_counts(counts in prop::collection::vec(0usize..4, 0..60)) {
        let groups = group_by_count(&counts);

        let mut rebuilt = Vec::new();
        for group in &groups {
            prop_assert!(group.len >= 1);
            prop_assert_eq!(group.start, rebuilt.len());
            for index in group.range() {
                prop_assert_eq!(counts[index], group.count);
                rebuilt.push(counts[index]);
            }
        }
        prop_assert_eq!(rebuilt, counts);

        for pair in groups.windows(2) {
            prop_assert_ne!(pair[0].count, pair[1].count);
        }
    }
}
