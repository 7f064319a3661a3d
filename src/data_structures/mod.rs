//! Engine data structures shared by scenes, the utility layer and 3D GUI controls.
//!
//! - `instance` holds local/world transforms (position, rotation, scale)
//! - `mesh` contains pickable triangle meshes and their GPU vertex layout
//! - `ray` has rays and the nearest-hit picking result

pub mod instance;
pub mod mesh;
pub mod ray;
