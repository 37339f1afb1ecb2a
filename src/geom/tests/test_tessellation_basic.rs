use std::f64::consts::{PI, TAU};

use crate::geom::{
    BicubicPatch, GeomMesh, Point3, Tolerance, Topology, Transform, mesh_patches, multi_surface,
    surfaces, tessellate,
};

fn param_probe(theta: f64, phi: f64) -> Point3 {
    Point3::new(theta, phi, 0.0)
}

fn assert_indices_in_range(mesh: &GeomMesh) {
    assert!(
        mesh.faces
            .iter()
            .flatten()
            .all(|i| (*i as usize) < mesh.vertex_count()),
        "dangling face index"
    );
}

#[test]
fn open_topology_counts() {
    for slices in 1..8 {
        for stacks in 1..8 {
            let mesh = tessellate(slices, stacks, &param_probe, Topology::Open);
            assert_eq!(mesh.vertex_count(), (slices + 1) * stacks);
            assert_eq!(mesh.triangle_count(), 2 * slices * stacks);
            assert_indices_in_range(&mesh);
        }
    }
}

#[test]
fn closed_topology_counts() {
    for slices in 1..8 {
        for stacks in 1..8 {
            let mesh = tessellate(slices, stacks, &param_probe, Topology::Closed);
            assert_eq!(mesh.vertex_count(), slices * stacks);
            assert_eq!(mesh.triangle_count(), 2 * slices * stacks);
            assert_indices_in_range(&mesh);
        }
    }
}

#[test]
fn samples_follow_angular_grid() {
    let slices = 4;
    let stacks = 6;
    let mesh = tessellate(slices, stacks, &param_probe, Topology::Open);
    let tol = Tolerance::new(1e-12);

    for i in 0..=slices {
        for j in 0..stacks {
            let p = mesh.point(i * stacks + j);
            assert!(tol.approx_eq_f64(p.x, i as f64 * PI / slices as f64));
            assert!(tol.approx_eq_f64(p.y, j as f64 * TAU / stacks as f64));
        }
    }

    // Open rows reach θ = π; closed rows stop one slice short.
    let last = mesh.point(mesh.vertex_count() - 1);
    assert!(tol.approx_eq_f64(last.x, PI));
    let closed = tessellate(slices, stacks, &param_probe, Topology::Closed);
    let last = closed.point(closed.vertex_count() - 1);
    assert!(tol.approx_eq_f64(last.x, PI * (slices - 1) as f64 / slices as f64));
}

#[test]
fn closed_torus_has_no_open_rows() {
    let mesh = tessellate(40, 10, &surfaces::torus(8.0, 2.0), Topology::Closed);
    assert_eq!(mesh.vertex_count(), 400);
    assert_eq!(mesh.triangle_count(), 800);
    mesh.validate().expect("torus mesh valid");

    // Every vertex is used by exactly six triangles on a fully periodic grid.
    let mut valence = vec![0usize; mesh.vertex_count()];
    for i in mesh.faces.iter().flatten() {
        valence[*i as usize] += 1;
    }
    assert!(valence.iter().all(|&v| v == 6));
}

#[test]
fn closed_sphere_keeps_count_formula() {
    // Poles are not special-cased: the closing strip stretches across them.
    let mesh = tessellate(8, 8, &surfaces::sphere, Topology::Closed);
    assert_eq!(mesh.vertex_count(), 64);
    assert_eq!(mesh.triangle_count(), 128);
}

#[test]
fn zero_resolution_yields_empty_mesh() {
    assert!(tessellate(0, 4, &param_probe, Topology::Open).is_empty());
    assert!(tessellate(4, 0, &param_probe, Topology::Closed).is_empty());
}

#[test]
fn builtin_surfaces_are_finite() {
    for mesh in [
        tessellate(12, 12, &surfaces::sphere, Topology::Open),
        tessellate(12, 12, &surfaces::klein, Topology::Closed),
        tessellate(12, 12, &surfaces::mobius, Topology::Closed),
    ] {
        mesh.validate().expect("finite mesh");
    }
}

#[test]
fn multi_surface_offsets_face_indices() {
    let shifted = |dx: f64| move |theta: f64, phi: f64| Point3::new(theta + dx, phi, 0.0);
    let pieces = [shifted(0.0), shifted(10.0), shifted(20.0)];
    let slices = 3;
    let stacks = 4;

    let mesh = multi_surface(slices, stacks, &pieces);
    let per_vertex = (slices + 1) * stacks;
    let per_tri = 2 * slices * stacks;

    assert_eq!(mesh.vertex_count(), 3 * per_vertex);
    assert_eq!(mesh.triangle_count(), 3 * per_tri);
    assert_indices_in_range(&mesh);

    let single = tessellate(slices, stacks, &pieces[0], Topology::Open);
    for (k, face) in mesh.faces.iter().enumerate() {
        let local = single.faces[k % per_tri];
        let offset = (k / per_tri * per_vertex) as u32;
        assert_eq!(*face, [local[0] + offset, local[1] + offset, local[2] + offset]);
    }

    // Second piece starts right after the first one's vertices.
    assert_eq!(mesh.point(per_vertex).x, 10.0);
}

#[test]
fn mesh_patches_samples_unit_square() {
    let flat = flat_patch();
    let mesh = mesh_patches(4, 3, &[flat, flat]);

    assert_eq!(mesh.vertex_count(), 2 * 5 * 4);
    assert_eq!(mesh.triangle_count(), 2 * 2 * 4 * 3);
    assert_indices_in_range(&mesh);

    let tol = Tolerance::new(1e-9);
    assert!(tol.approx_eq_point3(mesh.point(0), Point3::new(0.0, 0.0, 0.0)));
    assert!(tol.approx_eq_point3(mesh.point(19), Point3::new(3.0, 3.0, 0.0)));
}

fn flat_patch() -> BicubicPatch {
    let mut points = [Point3::ORIGIN; 16];
    for (i, p) in points.iter_mut().enumerate() {
        *p = Point3::new((i / 4) as f64, (i % 4) as f64, 0.0);
    }
    BicubicPatch::new(&points, Transform::identity())
}
