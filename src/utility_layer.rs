//! The utility layer: an overlay scene for 3D GUI geometry.
//!
//! The layer owns its own [`Scene`] so GUI meshes are hit-tested (and, by the
//! renderer, drawn) independently of the main scene's depth buffer. By default
//! it follows the host scene's pointer camera.

use std::collections::HashMap;

use cgmath::Rotation;
use wgpu::util::DeviceExt;

use crate::{
    camera::SceneCamera,
    data_structures::mesh::{MeshId, MeshVertex},
    scene::Scene,
};

/// GPU buffers of one overlay mesh, with vertices baked into world space.
#[derive(Debug)]
pub struct MeshBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    num_vertices: usize,
}

#[derive(Debug)]
pub struct UtilityLayerRenderer {
    scene: Scene,
    /// Copy the host's pointer camera into the overlay before every pick.
    pub use_host_camera: bool,
    /// When false, `write_to_buffers` leaves the GPU side untouched.
    pub should_render: bool,
    buffers: HashMap<MeshId, MeshBuffers>,
    disposed: bool,
}

impl UtilityLayerRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new("UtilityLayer"),
            use_host_camera: true,
            should_render: true,
            buffers: HashMap::new(),
            disposed: false,
        }
    }

    pub fn utility_layer_scene(&self) -> &Scene {
        &self.scene
    }

    pub fn utility_layer_scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn sync_camera(&mut self, host_camera: Option<SceneCamera>) {
        if self.use_host_camera {
            self.scene.active_camera = host_camera;
        }
    }

    pub fn buffers(&self, id: MeshId) -> Option<&MeshBuffers> {
        self.buffers.get(&id)
    }

    /// Creates or refreshes the vertex/index buffers of every overlay mesh.
    ///
    /// Buffers of meshes that left the overlay are dropped. Vertex buffers are
    /// rewritten in place unless the vertex count changed.
    pub fn write_to_buffers(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if self.disposed || !self.should_render {
            return;
        }
        let scene = &self.scene;
        self.buffers.retain(|id, _| scene.mesh(*id).is_some());

        for mesh in scene.meshes().iter().filter(|mesh| mesh.is_visible) {
            let world = mesh.world_transform();
            let vertices: Vec<MeshVertex> = mesh
                .vertices
                .iter()
                .map(|vertex| MeshVertex {
                    position: world.transform_point(vertex.position.into()).into(),
                    normal: world
                        .rotation
                        .rotate_vector(cgmath::Vector3::from(vertex.normal))
                        .into(),
                })
                .collect();

            match self.buffers.get(&mesh.id()) {
                Some(buffers) if buffers.num_vertices == vertices.len() => {
                    queue.write_buffer(&buffers.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
                }
                _ => {
                    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("{} Vertex Buffer", mesh.name)),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    });
                    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("{} Index Buffer", mesh.name)),
                        contents: bytemuck::cast_slice(&mesh.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    });
                    self.buffers.insert(
                        mesh.id(),
                        MeshBuffers {
                            vertex_buffer,
                            index_buffer,
                            num_elements: mesh.indices.len() as u32,
                            num_vertices: vertices.len(),
                        },
                    );
                }
            }
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        log::debug!("Disposing utility layer");
        self.buffers.clear();
        self.scene.dispose();
    }
}

impl Default for UtilityLayerRenderer {
    fn default() -> Self {
        Self::new()
    }
}
