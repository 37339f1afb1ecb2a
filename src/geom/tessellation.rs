//! Grid tessellation of parametric position functions.
//!
//! A position function maps two parameters to a point. [`tessellate`] samples
//! it on the angular grid `θ = i·π/slices`, `φ = j·2π/stacks` (φ periodic) and
//! stitches the samples into triangles according to a [`Topology`]:
//!
//! ```
//! use procgeo_engine::geom::{Topology, surfaces, tessellate};
//!
//! let torus = surfaces::torus(8.0, 2.0);
//! let mesh = tessellate(40, 10, &torus, Topology::Closed);
//! assert_eq!(mesh.vertex_count(), 40 * 10);
//! ```
//!
//! Bicubic patches live on the unit square instead; [`mesh_patches`] samples
//! `u, v ∈ [0, 1]` inclusive without wrapping.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::core::Point3;
use super::mesh::{GeomMesh, concat_meshes};
use super::triangulation::{GridStitch, triangulate_rows};

use std::f64::consts::{PI, TAU};

/// A pure function of two parameters returning a point.
pub trait PositionFn {
    fn point_at(&self, s: f64, t: f64) -> Point3;
}

impl<F> PositionFn for F
where
    F: Fn(f64, f64) -> Point3,
{
    fn point_at(&self, s: f64, t: f64) -> Point3 {
        self(s, t)
    }
}

/// Row topology along the primary (θ) parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Topology {
    /// `slices + 1` rows from θ = 0 to θ = π inclusive; first and last rows
    /// stay unconnected.
    #[default]
    Open,
    /// `slices` rows; the last row is stitched back to row 0.
    ///
    /// Meant for surfaces periodic in both parameters (torus, Klein bottle).
    /// Surfaces with poles still get the closing strip, which stretches the
    /// mesh across the poles.
    Closed,
}

impl Topology {
    #[must_use]
    pub const fn row_count(self, slices: usize) -> usize {
        match self {
            Topology::Open => slices + 1,
            Topology::Closed => slices,
        }
    }

    const fn stitch(self) -> GridStitch {
        match self {
            Topology::Open => GridStitch::OPEN,
            Topology::Closed => GridStitch::CLOSED,
        }
    }
}

/// Sample `position` on the angular grid and stitch it per `topology`.
///
/// Produces `row_count · stacks` vertices and `2 · slices · stacks`
/// triangles. A zero `slices` or `stacks` yields an empty mesh.
#[must_use]
pub fn tessellate(
    slices: usize,
    stacks: usize,
    position: &impl PositionFn,
    topology: Topology,
) -> GeomMesh {
    if slices == 0 || stacks == 0 {
        return GeomMesh::default();
    }

    let rows = topology.row_count(slices);
    let mut positions = Vec::with_capacity(rows * stacks);
    for i in 0..rows {
        let theta = i as f64 * PI / slices as f64;
        for j in 0..stacks {
            let phi = j as f64 * TAU / stacks as f64;
            positions.push(position.point_at(theta, phi).to_array());
        }
    }

    let mesh = GeomMesh::new(positions, triangulate_rows(rows, stacks, topology.stitch()));
    debug_assert!(mesh.has_valid_indices(), "tessellation produced dangling indices");
    mesh
}

/// Tessellate every function with [`Topology::Open`] and concatenate the
/// results, offsetting face indices by the running vertex count.
///
/// Seams between the pieces are not welded.
#[must_use]
pub fn multi_surface<P>(slices: usize, stacks: usize, positions: &[P]) -> GeomMesh
where
    P: PositionFn + Sync,
{
    let pieces = tessellate_each(positions, |p| tessellate(slices, stacks, p, Topology::Open));
    concat_meshes(&pieces)
}

/// Sample each patch over the closed unit square and concatenate the results.
///
/// Every patch contributes `(u_segments + 1) · (v_segments + 1)` vertices and
/// `2 · u_segments · v_segments` triangles. Rows run along `u`.
#[must_use]
pub fn mesh_patches<P>(u_segments: usize, v_segments: usize, patches: &[P]) -> GeomMesh
where
    P: PositionFn + Sync,
{
    let pieces = tessellate_each(patches, |p| unit_grid(u_segments, v_segments, p));
    concat_meshes(&pieces)
}

fn unit_grid(u_segments: usize, v_segments: usize, position: &impl PositionFn) -> GeomMesh {
    if u_segments == 0 || v_segments == 0 {
        return GeomMesh::default();
    }

    let (rows, cols) = (u_segments + 1, v_segments + 1);
    let mut positions = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        let u = i as f64 / u_segments as f64;
        for j in 0..cols {
            let v = j as f64 / v_segments as f64;
            positions.push(position.point_at(u, v).to_array());
        }
    }

    let mesh = GeomMesh::new(positions, triangulate_rows(rows, cols, GridStitch::PLANAR));
    debug_assert!(mesh.has_valid_indices(), "patch grid produced dangling indices");
    mesh
}

#[cfg(feature = "parallel")]
fn tessellate_each<P, F>(items: &[P], f: F) -> Vec<GeomMesh>
where
    P: PositionFn + Sync,
    F: Fn(&P) -> GeomMesh + Sync + Send,
{
    items.par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn tessellate_each<P, F>(items: &[P], f: F) -> Vec<GeomMesh>
where
    P: PositionFn + Sync,
    F: Fn(&P) -> GeomMesh + Sync + Send,
{
    items.iter().map(f).collect()
}
