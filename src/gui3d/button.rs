use crate::{
    data_structures::mesh::{MeshId, PickMesh},
    gui3d::control::{Control3D, ControlState},
    scene::Scene,
};

/// A pressable box.
///
/// Hovering tints the box with `hover_colour`, pressing shrinks it by
/// `press_scale` until the pointer is released.
#[derive(Debug)]
pub struct Button3D {
    state: ControlState,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub base_colour: [f32; 3],
    pub hover_colour: [f32; 3],
    pub press_scale: f32,
    mesh: Option<MeshId>,
    shrunk: bool,
}

impl Button3D {
    pub fn new(name: &str) -> Self {
        Self {
            state: ControlState::new(name),
            width: 1.0,
            height: 1.0,
            depth: 0.08,
            base_colour: [0.0, 0.0, 0.0],
            hover_colour: [1.0, 0.0, 0.0],
            press_scale: 0.95,
            mesh: None,
            shrunk: false,
        }
    }

    pub fn mesh(&self) -> Option<MeshId> {
        self.mesh
    }

    fn mesh_in<'a>(&self, scene: &'a mut Scene) -> Option<&'a mut PickMesh> {
        scene.mesh_mut(self.mesh?)
    }

    fn rescale(&mut self, scene: &mut Scene, factor: f32) {
        let Some(mesh) = self.mesh_in(scene) else {
            return;
        };
        // The mesh sits at the control's origin, so scaling local and world alike is exact.
        mesh.transform.0.scale *= factor;
        mesh.transform.1.scale *= factor;
    }
}

impl Control3D for Button3D {
    fn state(&self) -> &ControlState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ControlState {
        &mut self.state
    }

    fn class_name(&self) -> &'static str {
        "Button3D"
    }

    fn create_meshes(&mut self, scene: &mut Scene) -> Vec<MeshId> {
        let mut mesh = PickMesh::cuboid(
            &format!("{}_rootMesh", self.state.name),
            self.width,
            self.height,
            self.depth,
        );
        mesh.emissive = self.base_colour;
        let id = scene.add_mesh(mesh);
        self.mesh = Some(id);
        self.shrunk = false;
        vec![id]
    }

    fn pointer_enter_animation(&mut self, scene: &mut Scene) {
        if let Some(mesh) = self.mesh_in(scene) {
            mesh.emissive = self.hover_colour;
        }
    }

    fn pointer_out_animation(&mut self, scene: &mut Scene) {
        if let Some(mesh) = self.mesh_in(scene) {
            mesh.emissive = self.base_colour;
        }
    }

    fn pointer_down_animation(&mut self, scene: &mut Scene) {
        if self.shrunk {
            return;
        }
        self.rescale(scene, self.press_scale);
        self.shrunk = true;
    }

    fn pointer_up_animation(&mut self, scene: &mut Scene) {
        if !self.shrunk {
            return;
        }
        self.rescale(scene, 1.0 / self.press_scale);
        self.shrunk = false;
    }
}
