mod test_mesh_sanity;
mod test_tessellation_basic;
