//! Triangle meshes that live in a scene and can be hit-tested.
//!
//! Meshes keep their vertices on the CPU so picking is a plain ray/triangle
//! test; the same vertex data is `Pod` and can be uploaded to the GPU as is
//! (see [`crate::utility_layer::UtilityLayerRenderer::write_to_buffers`]).

use std::sync::atomic::{AtomicU32, Ordering};

use crate::data_structures::{
    instance::Instance,
    ray::{PickingInfo, Ray},
};

static NEXT_MESH_ID: AtomicU32 = AtomicU32::new(1);

/// Unique identity of a mesh across all scenes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u32);

impl MeshId {
    pub(crate) fn next() -> Self {
        Self(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

pub struct PickMesh {
    id: MeshId,
    pub name: String,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
    /// (local, world)
    pub transform: (Instance, Instance),
    pub is_pickable: bool,
    pub is_visible: bool,
    pub emissive: [f32; 3],
}

impl PickMesh {
    pub fn new(name: &str, vertices: Vec<MeshVertex>, indices: Vec<u16>) -> Self {
        Self {
            id: MeshId::next(),
            name: name.to_string(),
            vertices,
            indices,
            transform: (Instance::default(), Instance::default()),
            is_pickable: true,
            is_visible: true,
            emissive: [0.0; 3],
        }
    }

    /// A `width` x `height` quad in the XY plane facing +Z, centred on the origin.
    pub fn plane(name: &str, width: f32, height: f32) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let normal = [0.0, 0.0, 1.0];
        let vertices = [[-hw, -hh], [hw, -hh], [hw, hh], [-hw, hh]]
            .into_iter()
            .map(|[x, y]| MeshVertex {
                position: [x, y, 0.0],
                normal,
            })
            .collect();
        Self::new(name, vertices, vec![0, 1, 2, 0, 2, 3])
    }

    /// Axis-aligned box centred on the origin; each face has its own four vertices.
    pub fn cuboid(name: &str, width: f32, height: f32, depth: f32) -> Self {
        let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);
        // normal, then the face's corners in counter-clockwise order seen from outside
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([0.0, 0.0, 1.0], [[-hw, -hh, hd], [hw, -hh, hd], [hw, hh, hd], [-hw, hh, hd]]),
            ([0.0, 0.0, -1.0], [[hw, -hh, -hd], [-hw, -hh, -hd], [-hw, hh, -hd], [hw, hh, -hd]]),
            ([1.0, 0.0, 0.0], [[hw, -hh, hd], [hw, -hh, -hd], [hw, hh, -hd], [hw, hh, hd]]),
            ([-1.0, 0.0, 0.0], [[-hw, -hh, -hd], [-hw, -hh, hd], [-hw, hh, hd], [-hw, hh, -hd]]),
            ([0.0, 1.0, 0.0], [[-hw, hh, hd], [hw, hh, hd], [hw, hh, -hd], [-hw, hh, -hd]]),
            ([0.0, -1.0, 0.0], [[-hw, -hh, -hd], [hw, -hh, -hd], [hw, -hh, hd], [-hw, -hh, hd]]),
        ];
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (face_idx, (normal, corners)) in faces.into_iter().enumerate() {
            let base = (face_idx * 4) as u16;
            vertices.extend(corners.into_iter().map(|position| MeshVertex { position, normal }));
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self::new(name, vertices, indices)
    }

    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn world_transform(&self) -> &Instance {
        &self.transform.1
    }

    pub fn set_local_transform(&mut self, instance: Instance) {
        self.transform.0 = instance;
        self.transform.1 = instance;
    }

    pub fn update_world_transform(&mut self, parent: &Instance) {
        self.transform.1 = parent * &self.transform.0;
    }

    /// Nearest intersection of `ray` with this mesh in world space.
    pub fn intersect(&self, ray: &Ray) -> Option<PickingInfo> {
        let world = &self.transform.1;
        let nearest = self
            .indices
            .chunks_exact(3)
            .filter_map(|tri| {
                let corner = |i: u16| {
                    self.vertices
                        .get(i as usize)
                        .map(|v| world.transform_point(v.position.into()))
                };
                let (a, b, c) = (corner(tri[0])?, corner(tri[1])?, corner(tri[2])?);
                ray.intersect_triangle(a, b, c)
            })
            .min_by(|lhs, rhs| lhs.total_cmp(rhs))?;
        Some(PickingInfo {
            picked_mesh: self.id,
            distance: nearest,
            picked_point: ray.at(nearest),
        })
    }
}

impl std::fmt::Debug for PickMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickMesh")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("triangles", &(self.indices.len() / 3))
            .field("is_pickable", &self.is_pickable)
            .field("is_visible", &self.is_visible)
            .finish()
    }
}
