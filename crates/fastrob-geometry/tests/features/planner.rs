use fastrob_geometry::{CavalierGeometry, Mesh3D, PlannerParams, ToolpathPlanner};
use nalgebra::Point3;

fn params() -> PlannerParams {
    PlannerParams {
        layer_height: 2.0,
        line_width: 2.0,
        perimeters: 1,
        fill_angle: 0.0,
        fill_density: 100.0,
        continuous: true,
    }
}

#[test]
fn test_plan_block_walls_then_infill() {
    let mesh = Mesh3D::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(20.0, 20.0, 5.0));
    let geometry = CavalierGeometry::new();
    let plan = ToolpathPlanner::new(&geometry, params()).process_mesh(&mesh);

    assert_eq!(plan.document.len(), 2);
    assert_eq!(plan.layers.len(), 2);
    assert!(plan.document.is_z_monotonic());

    for (layer_plan, layer) in plan.layers.iter().zip(plan.document.iter()) {
        assert_eq!(&layer_plan.layer, layer);
        assert_eq!(layer_plan.shells.walls.len(), 1);
        assert!(layer.paths()[0].is_closed());
        assert!(layer_plan.shells.fill_boundary.is_some());
        assert!(!layer_plan.infill.is_empty());
        assert!(layer.iter().flat_map(|p| p.iter()).all(|p| p.z == layer_plan.z));
    }
}

#[test]
fn test_two_perimeters_emit_closed_walls_first() {
    let mesh = Mesh3D::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(20.0, 20.0, 3.0));
    let geometry = CavalierGeometry::new();
    let plan = ToolpathPlanner::new(
        &geometry,
        PlannerParams {
            perimeters: 2,
            ..params()
        },
    )
    .process_mesh(&mesh);

    let layer = &plan.document.layers()[0];
    assert!(layer.paths()[0].is_closed());
    assert!(!layer.paths().last().map(|p| p.is_closed()).unwrap_or(true));
}

#[test]
fn test_zero_density_skips_infill() {
    let mesh = Mesh3D::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(20.0, 20.0, 3.0));
    let geometry = CavalierGeometry::new();
    let plan = ToolpathPlanner::new(
        &geometry,
        PlannerParams {
            perimeters: 2,
            fill_density: 0.0,
            ..params()
        },
    )
    .process_mesh(&mesh);

    assert!(plan.layers[0].infill.is_empty());
    assert!(plan.document.layers()[0].iter().all(|p| p.is_closed()));
}

#[test]
fn test_empty_mesh_gives_empty_document() {
    let geometry = CavalierGeometry::new();
    let plan = ToolpathPlanner::new(&geometry, params()).process_mesh(&Mesh3D::new(Vec::new()));
    assert!(plan.document.is_empty());
    assert!(plan.layers.is_empty());
}
