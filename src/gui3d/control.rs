//! Interactive 3D controls.
//!
//! A control is a node of the 3D GUI tree that owns zero or more meshes in the
//! utility layer. The pointer-state bookkeeping (enter/down counters, the set
//! of pressing pointers, the observables) lives in [`ControlState`]; concrete
//! controls only decide which meshes they create and how they react visually
//! through the `*_animation` hooks.

use std::{
    collections::HashSet,
    sync::atomic::{AtomicU32, Ordering},
};

use crate::{
    data_structures::{instance::Instance, mesh::MeshId},
    observable::Observable,
    pointer::PointerId,
    scene::Scene,
};

static NEXT_CONTROL_ID: AtomicU32 = AtomicU32::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(u32);

impl ControlId {
    fn next() -> Self {
        Self(NEXT_CONTROL_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// World-space location of a pointer interaction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerPoint {
    pub point: cgmath::Point3<f32>,
    pub pointer_id: PointerId,
    pub button_index: i32,
}

pub struct ControlState {
    id: ControlId,
    pub name: String,
    /// Transform relative to the parent control.
    pub transform: Instance,
    pub is_visible: bool,
    /// Non-interactive controls still block the main scene but never react.
    pub is_interactive: bool,
    pub(crate) world: Instance,
    pub(crate) world_visible: bool,
    pub(crate) mesh_ids: Vec<MeshId>,
    enter_count: u32,
    down_count: u32,
    down_pointer_ids: HashSet<PointerId>,
    pub on_pointer_move_observable: Observable<PointerPoint>,
    pub on_pointer_enter_observable: Observable<ControlId>,
    pub on_pointer_out_observable: Observable<ControlId>,
    pub on_pointer_down_observable: Observable<PointerPoint>,
    pub on_pointer_up_observable: Observable<PointerPoint>,
    pub on_pointer_click_observable: Observable<PointerPoint>,
    pub on_dispose_observable: Observable<ControlId>,
}

impl ControlState {
    pub fn new(name: &str) -> Self {
        Self {
            id: ControlId::next(),
            name: name.to_string(),
            transform: Instance::default(),
            is_visible: true,
            is_interactive: true,
            world: Instance::default(),
            world_visible: true,
            mesh_ids: Vec::new(),
            enter_count: 0,
            down_count: 0,
            down_pointer_ids: HashSet::new(),
            on_pointer_move_observable: Observable::new(),
            on_pointer_enter_observable: Observable::new(),
            on_pointer_out_observable: Observable::new(),
            on_pointer_down_observable: Observable::new(),
            on_pointer_up_observable: Observable::new(),
            on_pointer_click_observable: Observable::new(),
            on_dispose_observable: Observable::new(),
        }
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn world_transform(&self) -> &Instance {
        &self.world
    }

    pub fn mesh_ids(&self) -> &[MeshId] {
        &self.mesh_ids
    }

    pub fn is_hovered(&self) -> bool {
        self.enter_count > 0
    }

    pub fn is_pressed(&self) -> bool {
        self.down_count > 0
    }

    pub fn pressing_pointers(&self) -> impl Iterator<Item = PointerId> + '_ {
        self.down_pointer_ids.iter().copied()
    }

    /// False when the control or one of its ancestors is hidden.
    pub fn is_visible_in_tree(&self) -> bool {
        self.world_visible
    }

    pub(crate) fn reset_pointer_state(&mut self) {
        self.enter_count = 0;
        self.down_count = 0;
        self.down_pointer_ids.clear();
    }

    fn clear_observables(&self) {
        self.on_pointer_move_observable.clear();
        self.on_pointer_enter_observable.clear();
        self.on_pointer_out_observable.clear();
        self.on_pointer_down_observable.clear();
        self.on_pointer_up_observable.clear();
        self.on_pointer_click_observable.clear();
        self.on_dispose_observable.clear();
    }
}

impl std::fmt::Debug for ControlState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlState")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("meshes", &self.mesh_ids)
            .field("enter_count", &self.enter_count)
            .field("down_count", &self.down_count)
            .finish()
    }
}

pub trait Control3D {
    fn state(&self) -> &ControlState;

    fn state_mut(&mut self) -> &mut ControlState;

    fn class_name(&self) -> &'static str {
        "Control3D"
    }

    fn id(&self) -> ControlId {
        self.state().id()
    }

    /// Create this control's meshes in the overlay scene and return their ids.
    ///
    /// Called whenever the control is attached to a manager. Meshes are placed
    /// at the control's world transform right after.
    fn create_meshes(&mut self, _scene: &mut Scene) -> Vec<MeshId> {
        Vec::new()
    }

    fn children(&self) -> &[Box<dyn Control3D>] {
        &[]
    }

    /// `Some` for containers.
    fn children_mut(&mut self) -> Option<&mut Vec<Box<dyn Control3D>>> {
        None
    }

    fn pointer_enter_animation(&mut self, _scene: &mut Scene) {}

    fn pointer_out_animation(&mut self, _scene: &mut Scene) {}

    fn pointer_down_animation(&mut self, _scene: &mut Scene) {}

    fn pointer_up_animation(&mut self, _scene: &mut Scene) {}

    fn on_pointer_move(&mut self, mut point: PointerPoint) {
        self.state().on_pointer_move_observable.notify_observers(&mut point);
    }

    /// Returns false if the control was already entered.
    fn on_pointer_enter(&mut self, scene: &mut Scene) -> bool {
        let state = self.state_mut();
        if state.enter_count > 0 {
            return false;
        }
        state.enter_count = 1;
        let mut id = state.id;
        state.on_pointer_enter_observable.notify_observers(&mut id);
        self.pointer_enter_animation(scene);
        true
    }

    fn on_pointer_out(&mut self, scene: &mut Scene) {
        let state = self.state_mut();
        state.enter_count = 0;
        let mut id = state.id;
        state.on_pointer_out_observable.notify_observers(&mut id);
        self.pointer_out_animation(scene);
    }

    /// Returns false if the control is already pressed. The pointer still
    /// counts as pressing it until its own up.
    fn on_pointer_down(&mut self, mut point: PointerPoint, scene: &mut Scene) -> bool {
        let state = self.state_mut();
        state.down_pointer_ids.insert(point.pointer_id);
        if state.down_count != 0 {
            return false;
        }
        state.down_count += 1;
        state.on_pointer_down_observable.notify_observers(&mut point);
        self.pointer_down_animation(scene);
        true
    }

    /// Click fires only if `notify_click` is set and the control is hovered.
    fn on_pointer_up(&mut self, mut point: PointerPoint, notify_click: bool, scene: &mut Scene) {
        let state = self.state_mut();
        state.down_count = 0;
        state.down_pointer_ids.remove(&point.pointer_id);
        if notify_click && state.enter_count > 0 {
            state.on_pointer_click_observable.notify_observers(&mut point);
        }
        state.on_pointer_up_observable.notify_observers(&mut point);
        self.pointer_up_animation(scene);
    }

    /// Releases `pointer_id`, or every pointer currently pressing the control.
    fn force_pointer_up(&mut self, pointer_id: Option<PointerId>, scene: &mut Scene) {
        let pointers: Vec<PointerId> = match pointer_id {
            Some(id) => vec![id],
            None => self.state().pressing_pointers().collect(),
        };
        for pointer_id in pointers {
            let point = PointerPoint {
                point: cgmath::Point3::new(0.0, 0.0, 0.0),
                pointer_id,
                button_index: 0,
            };
            self.on_pointer_up(point, true, scene);
        }
    }

    /// Disposes the children first, then removes this control's meshes and
    /// notifies and clears its observables.
    fn dispose(&mut self, mut scene: Option<&mut Scene>) {
        if let Some(children) = self.children_mut() {
            for mut child in children.drain(..) {
                child.dispose(scene.as_deref_mut());
            }
        }
        let state = self.state_mut();
        for mesh_id in state.mesh_ids.drain(..) {
            if let Some(scene) = scene.as_deref_mut() {
                scene.remove_mesh(mesh_id);
            }
        }
        state.reset_pointer_state();
        let mut id = state.id;
        state.on_dispose_observable.notify_observers(&mut id);
        state.clear_observables();
    }
}

// Dummy impl so controls can be debugged through the tree
impl std::fmt::Debug for dyn Control3D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(self.class_name())
            .field("id", &self.id())
            .field("name", &self.state().name)
            .field("children", &self.children())
            .finish()
    }
}

pub fn find_control<'a>(control: &'a dyn Control3D, id: ControlId) -> Option<&'a dyn Control3D> {
    if control.id() == id {
        return Some(control);
    }
    control
        .children()
        .iter()
        .find_map(|child| find_control(child.as_ref(), id))
}

pub fn find_control_mut<'a>(
    control: &'a mut dyn Control3D,
    id: ControlId,
) -> Option<&'a mut dyn Control3D> {
    if control.id() == id {
        return Some(control);
    }
    control
        .children_mut()?
        .iter_mut()
        .find_map(|child| find_control_mut(child.as_mut(), id))
}

/// Ids of `control` and all its descendants, parents first.
pub fn subtree_ids(control: &dyn Control3D) -> Vec<ControlId> {
    let mut ids = vec![control.id()];
    for child in control.children() {
        ids.extend(subtree_ids(child.as_ref()));
    }
    ids
}
