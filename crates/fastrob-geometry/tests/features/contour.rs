use approx::assert_relative_eq;
use fastrob_core::GeometryError;
use fastrob_geometry::{
    offset_increments, offset_shells, shell_paths, CavalierGeometry, Region, Ring,
};

fn square(size: f64) -> Region {
    Region::from_outer(Ring::rectangle(0.0, 0.0, size, size))
}

#[test]
fn test_two_perimeters_give_two_walls_and_fill() {
    let geometry = CavalierGeometry::new();
    let section = vec![square(20.0)];
    let increments = offset_increments(2, 2.0);

    let shells = offset_shells(&geometry, &section, &increments);
    assert_eq!(shells.walls.len(), 2);
    assert!(shells.truncated.is_none());

    assert_relative_eq!(shells.walls[0][0].area(), 18.0 * 18.0, epsilon = 1e-6);
    assert_relative_eq!(shells.walls[1][0].area(), 14.0 * 14.0, epsilon = 1e-6);

    let fill = shells.fill_boundary.expect("fill boundary");
    assert_eq!(fill.len(), 1);
    assert_relative_eq!(fill[0].area(), 12.0 * 12.0, epsilon = 1e-6);
}

#[test]
fn test_consumed_section_falls_back_to_outline() {
    let geometry = CavalierGeometry::new();
    let section = vec![square(1.0)];

    let shells = offset_shells(&geometry, &section, &offset_increments(1, 6.0));
    assert!(shells.fill_boundary.is_none());
    assert_eq!(shells.walls, vec![section]);
    assert!(matches!(shells.truncated, Some(GeometryError::Empty { .. })));
}

#[test]
fn test_sequence_stops_at_first_empty_offset() {
    let geometry = CavalierGeometry::new();
    let section = vec![square(10.0)];

    // 1 and 3 survive, 6 consumes the square
    let shells = offset_shells(&geometry, &section, &[1.0, 2.0, 3.0, 1.0]);
    assert_eq!(shells.walls.len(), 1);
    assert!(shells.fill_boundary.is_some());
    match shells.truncated {
        Some(GeometryError::Empty { distance }) => assert_relative_eq!(distance, 6.0),
        other => panic!("unexpected truncation: {:?}", other),
    }
}

#[test]
fn test_zero_first_increment_keeps_section() {
    let geometry = CavalierGeometry::new();
    let section = vec![square(10.0)];

    let shells = offset_shells(&geometry, &section, &[0.0, 2.0, 1.0]);
    assert_eq!(shells.walls.len(), 2);
    assert_eq!(shells.walls[0], section);
}

#[test]
fn test_holes_become_wall_paths() {
    let geometry = CavalierGeometry::new();
    let section = vec![Region::new(
        Ring::rectangle(0.0, 0.0, 30.0, 30.0),
        vec![Ring::rectangle(10.0, 10.0, 20.0, 20.0)],
    )];

    let shells = offset_shells(&geometry, &section, &offset_increments(1, 2.0));
    assert_eq!(shells.walls.len(), 1);
    let fill = shells.fill_boundary.expect("fill boundary");
    assert_eq!(fill[0].holes().len(), 1);

    let paths = shell_paths(&fill, 3.0);
    assert_eq!(paths.len(), 2);
    for path in &paths {
        assert!(path.is_closed());
        assert!(path.iter().all(|p| p.z == 3.0));
    }
}
