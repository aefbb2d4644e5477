use approx::assert_relative_eq;
use fastrob_core::GeometryError;
use fastrob_geometry::{CavalierGeometry, GeometryCollaborator, Mesh3D, Model3DImporter};
use nalgebra::Point3;
use std::io::Write;

const TETRAHEDRON_STL: &str = "solid tetra
facet normal 0 0 -1
  outer loop
    vertex 0 0 0
    vertex 0 10 0
    vertex 10 0 0
  endloop
endfacet
facet normal 0 -1 0
  outer loop
    vertex 0 0 0
    vertex 10 0 0
    vertex 0 0 10
  endloop
endfacet
facet normal -1 0 0
  outer loop
    vertex 0 0 0
    vertex 0 0 10
    vertex 0 10 0
  endloop
endfacet
facet normal 1 1 1
  outer loop
    vertex 10 0 0
    vertex 0 10 0
    vertex 0 0 10
  endloop
endfacet
endsolid tetra
";

#[test]
fn test_cube_slice_is_one_square() {
    let mesh = Mesh3D::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0));
    let geometry = CavalierGeometry::new();

    let regions = geometry.slice_plane(&mesh, 5.0);
    assert_eq!(regions.len(), 1);
    assert!(regions[0].holes().is_empty());
    assert_relative_eq!(regions[0].area(), 100.0, epsilon = 1e-9);
    assert!(regions[0].outer().is_ccw());
}

#[test]
fn test_slice_outside_mesh_is_empty() {
    let mesh = Mesh3D::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0));
    let geometry = CavalierGeometry::new();

    assert!(geometry.slice_plane(&mesh, 12.0).is_empty());
    assert!(geometry.slice_plane(&mesh, -1.0).is_empty());
}

#[test]
fn test_cube_layer_heights() {
    let mesh = Mesh3D::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 6.0));
    let heights = mesh.layer_heights(2.0);
    assert_eq!(heights.len(), 3);
    assert_relative_eq!(heights[0], 2.0);
    assert_relative_eq!(heights[2], 6.0);
}

#[test]
fn test_import_ascii_stl() {
    let mut file = tempfile::Builder::new().suffix(".stl").tempfile().unwrap();
    file.write_all(TETRAHEDRON_STL.as_bytes()).unwrap();
    file.flush().unwrap();

    let mesh = Model3DImporter::new().import_file(file.path()).unwrap();
    assert_eq!(mesh.triangles.len(), 4);
    assert_relative_eq!(mesh.bounds_max.x, 10.0, epsilon = 1e-6);
    assert_relative_eq!(mesh.bounds_max.z, 10.0, epsilon = 1e-6);

    // Cross-section at half height is a right triangle with legs of 5
    let geometry = CavalierGeometry::new();
    let regions = geometry.slice_plane(&mesh, 5.0);
    assert_eq!(regions.len(), 1);
    assert_relative_eq!(regions[0].area(), 12.5, epsilon = 1e-4);
}

#[test]
fn test_import_scaled_and_centered() {
    let mesh = Model3DImporter::new()
        .with_scale(2.0)
        .with_centering(true)
        .import_stl_data(TETRAHEDRON_STL.as_bytes())
        .unwrap();
    assert_relative_eq!(mesh.bounds_min.z, 0.0, epsilon = 1e-6);
    assert_relative_eq!(mesh.bounds_max.z, 20.0, epsilon = 1e-6);
    assert_relative_eq!(mesh.bounds_min.x, -10.0, epsilon = 1e-6);
}

#[test]
fn test_import_missing_file_is_invalid_mesh() {
    let dir = tempfile::tempdir().unwrap();
    let result = Model3DImporter::new().import_file(&dir.path().join("absent.stl"));
    assert!(matches!(
        result,
        Err(GeometryError::InvalidMesh { reason }) if reason.starts_with("Failed to open STL file")
    ));
}

#[test]
fn test_import_without_faces_is_invalid_mesh() {
    let importer = Model3DImporter::new();
    assert!(matches!(
        importer.import_stl_data(b"solid empty\nendsolid empty\n"),
        Err(GeometryError::InvalidMesh { .. })
    ));
    assert!(matches!(
        importer.import_stl_data(&[0u8; 12]),
        Err(GeometryError::InvalidMesh { .. })
    ));
    assert!(matches!(
        Model3DImporter::new()
            .with_scale(0.0)
            .import_stl_data(TETRAHEDRON_STL.as_bytes()),
        Err(GeometryError::InvalidMesh { reason }) if reason.contains("scale")
    ));
}
