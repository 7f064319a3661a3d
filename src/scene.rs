//! Scenes: pickable meshes, cameras, pointer state and input observables.
//!
//! A [`Scene`] is the host of pointer input. Every pointer event goes through
//! two stages:
//!
//! 1. `on_pre_pointer_observable` receives a [`PointerInfoPre`]. Observers
//!    (e.g. the 3D GUI manager) may set `skip_on_pointer_observable` to claim
//!    the event.
//! 2. Unless claimed, `on_pointer_observable` receives a [`PointerInfo`]
//!    with the main scene's own pick result.
//!
//! The observables are shared as `Rc` handles so subscribers can detach from
//! them without holding on to the scene itself.

use std::{collections::HashSet, rc::Rc};

use winit::event::WindowEvent;

use crate::{
    camera::SceneCamera,
    data_structures::{
        mesh::{MeshId, PickMesh},
        ray::PickingInfo,
    },
    observable::Observable,
    pointer::{PointerEvent, PointerEventType, PointerId, PointerTranslator},
};

/// Snapshot of the scene's pointer state taken when an event is dispatched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePointerState {
    pub pointer_x: f32,
    pub pointer_y: f32,
    /// Whether the event's pointer is captured by an exclusive handler.
    pub pointer_captured: bool,
    /// `camera_to_use_for_pointers`, falling back to `active_camera`.
    pub camera: Option<SceneCamera>,
}

#[derive(Clone, Debug)]
pub struct PointerInfoPre {
    pub kind: PointerEventType,
    pub event: PointerEvent,
    pub scene: ScenePointerState,
    pub skip_on_pointer_observable: bool,
}

#[derive(Clone, Debug)]
pub struct PointerInfo {
    pub kind: PointerEventType,
    pub event: PointerEvent,
    pub pick_info: Option<PickingInfo>,
}

#[derive(Debug)]
pub struct Scene {
    pub name: String,
    pub active_camera: Option<SceneCamera>,
    pub camera_to_use_for_pointers: Option<SceneCamera>,
    pub on_pre_pointer_observable: Rc<Observable<PointerInfoPre>>,
    pub on_pointer_observable: Rc<Observable<PointerInfo>>,
    pub on_dispose_observable: Rc<Observable<()>>,
    pointer_x: f32,
    pointer_y: f32,
    captured_pointers: HashSet<PointerId>,
    meshes: Vec<PickMesh>,
    translator: PointerTranslator,
    disposed: bool,
}

impl Scene {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            active_camera: None,
            camera_to_use_for_pointers: None,
            on_pre_pointer_observable: Rc::new(Observable::new()),
            on_pointer_observable: Rc::new(Observable::new()),
            on_dispose_observable: Rc::new(Observable::new()),
            pointer_x: 0.0,
            pointer_y: 0.0,
            captured_pointers: HashSet::new(),
            meshes: Vec::new(),
            translator: PointerTranslator::new(),
            disposed: false,
        }
    }

    pub fn with_camera(name: &str, camera: SceneCamera) -> Self {
        let mut scene = Self::new(name);
        scene.active_camera = Some(camera);
        scene
    }

    pub fn pointer_x(&self) -> f32 {
        self.pointer_x
    }

    pub fn pointer_y(&self) -> f32 {
        self.pointer_y
    }

    pub fn pointer_camera(&self) -> Option<SceneCamera> {
        self.camera_to_use_for_pointers.or(self.active_camera)
    }

    pub fn capture_pointer(&mut self, pointer_id: PointerId) {
        self.captured_pointers.insert(pointer_id);
    }

    pub fn release_pointer(&mut self, pointer_id: PointerId) {
        self.captured_pointers.remove(&pointer_id);
    }

    pub fn is_pointer_captured(&self, pointer_id: PointerId) -> bool {
        self.captured_pointers.contains(&pointer_id)
    }

    pub fn add_mesh(&mut self, mesh: PickMesh) -> MeshId {
        let id = mesh.id();
        self.meshes.push(mesh);
        id
    }

    pub fn remove_mesh(&mut self, id: MeshId) -> Option<PickMesh> {
        let idx = self.meshes.iter().position(|mesh| mesh.id() == id)?;
        Some(self.meshes.remove(idx))
    }

    pub fn mesh(&self, id: MeshId) -> Option<&PickMesh> {
        self.meshes.iter().find(|mesh| mesh.id() == id)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut PickMesh> {
        self.meshes.iter_mut().find(|mesh| mesh.id() == id)
    }

    pub fn meshes(&self) -> &[PickMesh] {
        &self.meshes
    }

    pub fn clear_meshes(&mut self) {
        self.meshes.clear();
    }

    /// Nearest-hit pick through the pixel `(x, y)` of the active camera.
    ///
    /// Only meshes that are both pickable and visible take part.
    pub fn pick(&self, x: f32, y: f32) -> Option<PickingInfo> {
        let camera = self.active_camera?;
        let ray = camera.ray_from_screen(x, y);
        self.meshes
            .iter()
            .filter(|mesh| mesh.is_pickable && mesh.is_visible)
            .filter_map(|mesh| mesh.intersect(&ray))
            .min_by(|lhs, rhs| lhs.distance.total_cmp(&rhs.distance))
    }

    /// Dispatches one pointer event through the pre-pointer and pointer stages.
    ///
    /// Returns whether the main `on_pointer_observable` received the event,
    /// i.e. false if a pre-pointer observer claimed it.
    pub fn process_pointer(&mut self, kind: PointerEventType, event: PointerEvent) -> bool {
        if self.disposed {
            log::debug!("Scene {} is disposed, dropping pointer event", self.name);
            return false;
        }
        self.pointer_x = event.x;
        self.pointer_y = event.y;

        let mut pre = PointerInfoPre {
            kind,
            event,
            scene: ScenePointerState {
                pointer_x: self.pointer_x,
                pointer_y: self.pointer_y,
                pointer_captured: self.is_pointer_captured(event.id_or_default()),
                camera: self.pointer_camera(),
            },
            skip_on_pointer_observable: false,
        };
        self.on_pre_pointer_observable.notify_observers(&mut pre);
        if pre.skip_on_pointer_observable {
            return false;
        }

        let mut info = PointerInfo {
            kind,
            event,
            pick_info: self.pick(self.pointer_x, self.pointer_y),
        };
        self.on_pointer_observable.notify_observers(&mut info);
        true
    }

    /// Translates a winit window event and dispatches it if it is pointer input.
    ///
    /// Returns `None` for non-pointer events, otherwise the result of
    /// [`Scene::process_pointer`].
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Option<bool> {
        let (kind, pointer_event) = self.translator.translate(event)?;
        Some(self.process_pointer(kind, pointer_event))
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Notifies dispose observers once, then drops every observer and mesh.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        log::debug!("Disposing scene {}", self.name);
        self.on_dispose_observable.notify_observers(&mut ());
        self.on_dispose_observable.clear();
        self.on_pre_pointer_observable.clear();
        self.on_pointer_observable.clear();
        self.meshes.clear();
        self.captured_pointers.clear();
    }
}
