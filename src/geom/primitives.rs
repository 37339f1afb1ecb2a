//! Primitive meshes and the placement of shape instances into one mesh.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use serde::Serialize;

use super::core::Transform;
use super::mesh::GeomMesh;

/// A named shape placed in the world by a transform.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeInstance {
    pub shape: String,
    pub transform: Transform,
}

impl ShapeInstance {
    #[must_use]
    pub fn new(shape: impl Into<String>, transform: Transform) -> Self {
        Self {
            shape: shape.into(),
            transform,
        }
    }
}

/// Serializable form of a [`ShapeInstance`] with the matrix as rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeInstanceExport {
    pub shape: String,
    pub transform: [[f64; 4]; 4],
}

impl From<&ShapeInstance> for ShapeInstanceExport {
    fn from(instance: &ShapeInstance) -> Self {
        Self {
            shape: instance.shape.clone(),
            transform: *instance.transform.as_matrix(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("no primitive registered for shape `{name}`")]
    UnknownShape { name: String },
}

/// Axis-aligned cube of side 1 centred on the origin.
#[must_use]
pub fn unit_box() -> GeomMesh {
    let mut positions = Vec::with_capacity(8);
    for i in 0..8u32 {
        let x = if i & 1 == 0 { -0.5 } else { 0.5 };
        let y = if i & 2 == 0 { -0.5 } else { 0.5 };
        let z = if i & 4 == 0 { -0.5 } else { 0.5 };
        positions.push([x, y, z]);
    }

    // Outward winding, two triangles per face.
    let faces = vec![
        [0, 2, 1], [1, 2, 3], // -z
        [4, 5, 6], [5, 7, 6], // +z
        [0, 1, 4], [1, 5, 4], // -y
        [2, 6, 3], [3, 6, 7], // +y
        [0, 4, 2], [2, 4, 6], // -x
        [1, 3, 5], [3, 7, 5], // +x
    ];

    GeomMesh::new(positions, faces)
}

/// Capped cylinder of radius 0.5 and height 1 along Y, centred on the origin.
#[must_use]
pub fn unit_cylinder(segments: usize) -> GeomMesh {
    let segments = segments.max(3);
    let mut mesh = GeomMesh::with_capacity(2 * segments + 2, 4 * segments);

    for ring in [-0.5, 0.5] {
        for j in 0..segments {
            let a = j as f64 * TAU / segments as f64;
            mesh.positions.push([0.5 * a.cos(), ring, 0.5 * a.sin()]);
        }
    }
    let bottom_center = mesh.positions.len() as u32;
    mesh.positions.push([0.0, -0.5, 0.0]);
    let top_center = bottom_center + 1;
    mesh.positions.push([0.0, 0.5, 0.0]);

    let n = segments as u32;
    for j in 0..n {
        let next = (j + 1) % n;
        mesh.faces.push([j, n + j, next]);
        mesh.faces.push([next, n + j, n + next]);
        mesh.faces.push([bottom_center, j, next]);
        mesh.faces.push([top_center, n + next, n + j]);
    }

    mesh
}

/// Shape name to primitive mesh lookup used by [`place_instances`].
#[derive(Debug, Clone, Default)]
pub struct ShapeLibrary {
    shapes: BTreeMap<String, GeomMesh>,
}

impl ShapeLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, mesh: GeomMesh) -> &mut Self {
        self.shapes.insert(name.into(), mesh);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GeomMesh> {
        self.shapes.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Transform the primitive of every instance and concatenate the results in
/// instance order.
pub fn place_instances(
    instances: &[ShapeInstance],
    library: &ShapeLibrary,
) -> Result<GeomMesh, PlacementError> {
    let mut out = GeomMesh::default();
    for instance in instances {
        let primitive = library
            .get(&instance.shape)
            .ok_or_else(|| PlacementError::UnknownShape {
                name: instance.shape.clone(),
            })?;
        out.append(&primitive.transformed(instance.transform));
    }
    log::debug!(
        "placed {} instances: {} vertices, {} triangles",
        instances.len(),
        out.vertex_count(),
        out.triangle_count()
    );
    Ok(out)
}
