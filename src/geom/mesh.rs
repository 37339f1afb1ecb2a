use std::collections::HashMap;

use serde::Serialize;

use super::{Point3, Tolerance, Transform};

/// Indexed triangle mesh.
///
/// Vertices are not required to be unique; seams and pole rows produced by
/// grid tessellation are left in place until [`weld_mesh`] runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GeomMesh {
    pub positions: Vec<[f64; 3]>,
    pub faces: Vec<[u32; 3]>,
}

impl GeomMesh {
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, faces: Vec<[u32; 3]>) -> Self {
        Self { positions, faces }
    }

    #[must_use]
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(triangle_count),
        }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.faces.is_empty()
    }

    #[must_use]
    pub fn point(&self, index: usize) -> Point3 {
        Point3::from_array(self.positions[index])
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
    }

    /// Returns true if all face indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len() as u64;
        self.faces.iter().flatten().all(|&i| u64::from(i) < n)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        Ok(())
    }

    /// Append `other`, shifting its face indices past the current vertices.
    pub fn append(&mut self, other: &GeomMesh) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| [f[0] + offset, f[1] + offset, f[2] + offset]),
        );
    }

    /// Copy of this mesh with every vertex mapped through `transform`.
    #[must_use]
    pub fn transformed(&self, transform: Transform) -> Self {
        Self {
            positions: self
                .positions
                .iter()
                .map(|p| transform.apply_point(Point3::from_array(*p)).to_array())
                .collect(),
            faces: self.faces.clone(),
        }
    }

    /// Returns the position buffer as a flat list: `[x0, y0, z0, x1, ...]`.
    #[must_use]
    pub fn positions_flat(&self) -> Vec<f64> {
        self.positions.iter().flatten().copied().collect()
    }

    /// Returns the face buffer as a flat list: `[a0, b0, c0, a1, ...]`.
    #[must_use]
    pub fn indices_flat(&self) -> Vec<u32> {
        self.faces.iter().flatten().copied().collect()
    }
}

/// Concatenate meshes, offsetting face indices by the running vertex count.
#[must_use]
pub fn concat_meshes<'a>(meshes: impl IntoIterator<Item = &'a GeomMesh>) -> GeomMesh {
    let mut out = GeomMesh::default();
    for mesh in meshes {
        out.append(mesh);
    }
    out
}

/// Merge vertices closer than `tol` and re-index faces.
///
/// The first vertex seen in a cluster is kept. Faces that collapse to fewer
/// than three distinct vertices are dropped. Returns the welded mesh and the
/// number of merged vertices.
#[must_use]
pub fn weld_mesh(mesh: &GeomMesh, tol: Tolerance) -> (GeomMesh, usize) {
    if !tol.eps.is_finite() || tol.eps <= 0.0 {
        return (mesh.clone(), 0);
    }

    let inv = 1.0 / tol.eps;

    /// Quantize a coordinate value to a grid cell index.
    /// Returns None for non-finite values so they never weld.
    fn quantize(value: f64, inv: f64) -> Option<i64> {
        if !value.is_finite() {
            return None;
        }
        let q = (value * inv).floor();
        Some(q.clamp(i64::MIN as f64, i64::MAX as f64) as i64)
    }

    let mut buckets: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    let mut remap: Vec<u32> = Vec::with_capacity(mesh.positions.len());
    let mut out_points: Vec<[f64; 3]> = Vec::with_capacity(mesh.positions.len());

    for p in mesh.positions.iter().copied() {
        let key = match (quantize(p[0], inv), quantize(p[1], inv), quantize(p[2], inv)) {
            (Some(kx), Some(ky), Some(kz)) => Some((kx, ky, kz)),
            _ => None,
        };

        let found = key.and_then(|key| {
            let point = Point3::from_array(p);
            neighbour_cells(key).find_map(|cell| {
                buckets.get(&cell).and_then(|candidates| {
                    candidates.iter().copied().find(|&cand| {
                        tol.approx_eq_point3(Point3::from_array(out_points[cand as usize]), point)
                    })
                })
            })
        });

        let out_idx = match found {
            Some(existing) => existing,
            None => {
                let new_idx = out_points.len() as u32;
                out_points.push(p);
                if let Some(key) = key {
                    buckets.entry(key).or_default().push(new_idx);
                }
                new_idx
            }
        };
        remap.push(out_idx);
    }

    let merged = mesh.positions.len() - out_points.len();
    let faces = mesh
        .faces
        .iter()
        .map(|f| [remap[f[0] as usize], remap[f[1] as usize], remap[f[2] as usize]])
        .filter(|f| f[0] != f[1] && f[1] != f[2] && f[0] != f[2])
        .collect();

    (GeomMesh::new(out_points, faces), merged)
}

fn neighbour_cells(key: (i64, i64, i64)) -> impl Iterator<Item = (i64, i64, i64)> {
    (-1i64..=1).flat_map(move |dx| {
        (-1i64..=1).flat_map(move |dy| {
            (-1i64..=1).map(move |dz| {
                (
                    key.0.saturating_add(dx),
                    key.1.saturating_add(dy),
                    key.2.saturating_add(dz),
                )
            })
        })
    })
}
