mod core;
mod mesh;
mod patch;
pub mod primitives;
pub mod surfaces;
mod tessellation;
mod triangulation;

pub use core::{Point3, Tolerance, Transform, Vec3};
pub use mesh::{GeomMesh, concat_meshes, weld_mesh};
pub use patch::{BicubicPatch, PATCH_CONTROL_POINTS, PatchBasis};
pub use primitives::{
    PlacementError, ShapeInstance, ShapeInstanceExport, ShapeLibrary, place_instances, unit_box,
    unit_cylinder,
};
pub use tessellation::{PositionFn, Topology, mesh_patches, multi_surface, tessellate};
pub use triangulation::{GridStitch, triangulate_rows};

#[cfg(test)]
mod tests;
