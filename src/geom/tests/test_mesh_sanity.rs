use crate::geom::{
    GeomMesh, Point3, Tolerance, Topology, Transform, Vec3, concat_meshes, surfaces, tessellate,
    weld_mesh,
};

fn triangle() -> GeomMesh {
    GeomMesh::new(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        vec![[0, 1, 2]],
    )
}

#[test]
fn validate_rejects_bad_buffers() {
    triangle().validate().expect("triangle is valid");

    let mut dangling = triangle();
    dangling.faces.push([0, 1, 3]);
    assert!(dangling.validate().is_err());

    let mut nan = triangle();
    nan.positions[1][2] = f64::NAN;
    assert!(nan.validate().is_err());
}

#[test]
fn append_offsets_indices() {
    let mut mesh = triangle();
    mesh.append(&triangle());
    assert_eq!(mesh.vertex_count(), 6);
    assert_eq!(mesh.faces, vec![[0, 1, 2], [3, 4, 5]]);

    let joined = concat_meshes([&triangle(), &triangle(), &triangle()]);
    assert_eq!(joined.faces[2], [6, 7, 8]);
}

#[test]
fn flat_buffers_follow_vertex_order() {
    let mesh = triangle();
    assert_eq!(mesh.positions_flat(), vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    assert_eq!(mesh.indices_flat(), vec![0, 1, 2]);
}

#[test]
fn transformed_moves_positions_only() {
    let moved = triangle().transformed(Transform::translate(Vec3::new(0.0, 0.0, 2.0)));
    assert_eq!(moved.faces, triangle().faces);
    assert_eq!(moved.point(1), Point3::new(1.0, 0.0, 2.0));
}

#[test]
fn weld_collapses_sphere_poles() {
    let mesh = tessellate(4, 6, &surfaces::sphere, Topology::Open);
    assert_eq!(mesh.vertex_count(), 30);
    assert_eq!(mesh.triangle_count(), 48);

    let (welded, merged) = weld_mesh(&mesh, Tolerance::WELD);
    // Each pole row of six samples becomes one vertex.
    assert_eq!(merged, 10);
    assert_eq!(welded.vertex_count(), 20);
    // The pole fan keeps one triangle per quad.
    assert_eq!(welded.triangle_count(), 36);
    welded.validate().expect("welded mesh valid");
}

#[test]
fn weld_leaves_distinct_vertices_alone() {
    let (welded, merged) = weld_mesh(&triangle(), Tolerance::WELD);
    assert_eq!(merged, 0);
    assert_eq!(welded, triangle());

    let (same, merged) = weld_mesh(&triangle(), Tolerance::new(0.0));
    assert_eq!(merged, 0);
    assert_eq!(same, triangle());
}
