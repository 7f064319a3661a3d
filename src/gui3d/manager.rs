//! The 3D GUI manager: routes scene pointer input to 3D controls.
//!
//! The manager subscribes to the host scene's pre-pointer stage. For every
//! move/down/up it ray-picks the utility layer, resolves the hit mesh to its
//! control through a side-table and drives the control's pointer callbacks.
//! Any hit on GUI geometry claims the event so the main scene never sees it.
//!
//! Per pointer id the manager remembers which control is hovered and which
//! one is pressed, so multiple pointers (multi-touch) don't interfere.
//!
//! The scene observers only hold a `Weak` reference to the manager state;
//! teardown happens in [`Gui3dManager::dispose`], on scene disposal or when
//! the manager is dropped, whichever comes first.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use anyhow::{anyhow, bail};

use crate::{
    data_structures::{instance::Instance, mesh::MeshId},
    gui3d::{
        container::Container3D,
        control::{Control3D, ControlId, PointerPoint, find_control, find_control_mut, subtree_ids},
    },
    observable::{Observable, Observer},
    pointer::{PointerEvent, PointerEventType, PointerId},
    scene::{PointerInfoPre, Scene},
    utility_layer::UtilityLayerRenderer,
};

/// Hover and press bookkeeping, keyed by pointer id.
#[derive(Debug, Default)]
pub(crate) struct Interactions {
    hovered: HashMap<PointerId, ControlId>,
    pressed: HashMap<PointerId, ControlId>,
    last_picked: Option<ControlId>,
}

impl Interactions {
    fn forget(&mut self, ids: &[ControlId]) {
        self.hovered.retain(|_, control| !ids.contains(control));
        self.pressed.retain(|_, control| !ids.contains(control));
        if self.last_picked.is_some_and(|control| ids.contains(&control)) {
            self.last_picked = None;
        }
    }
}

struct ManagerState {
    root: Container3D,
    utility_layer: Option<UtilityLayerRenderer>,
    mesh_to_control: HashMap<MeshId, ControlId>,
    interactions: Interactions,
    pre_pointer_observable: Rc<Observable<PointerInfoPre>>,
    scene_dispose_observable: Rc<Observable<()>>,
    pointer_observer: Option<Observer>,
    scene_dispose_observer: Option<Observer>,
    disposed: bool,
}

pub struct Gui3dManager {
    state: Rc<RefCell<ManagerState>>,
}

impl Gui3dManager {
    pub fn new(scene: &Scene) -> Self {
        let state = Rc::new(RefCell::new(ManagerState {
            root: Container3D::new("RootContainer"),
            utility_layer: Some(UtilityLayerRenderer::new()),
            mesh_to_control: HashMap::new(),
            interactions: Interactions::default(),
            pre_pointer_observable: scene.on_pre_pointer_observable.clone(),
            scene_dispose_observable: scene.on_dispose_observable.clone(),
            pointer_observer: None,
            scene_dispose_observer: None,
            disposed: false,
        }));

        let weak = Rc::downgrade(&state);
        let scene_dispose_observer = scene.on_dispose_observable.add(move |_, _| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let Ok(mut state) = shared.try_borrow_mut() else {
                log::debug!("GUI3D manager is busy, ignoring scene disposal");
                return;
            };
            // The scene drops its observers right after notifying.
            state.scene_dispose_observer = None;
            state.dispose();
        });

        let weak = Rc::downgrade(&state);
        let pointer_observer = scene.on_pre_pointer_observable.add(move |info, _| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            match shared.try_borrow_mut() {
                Ok(mut state) => state.on_pre_pointer(info),
                Err(_) => log::debug!("GUI3D manager is busy, ignoring re-entrant pointer event"),
            };
        });

        {
            let mut guard = state.borrow_mut();
            guard.scene_dispose_observer = Some(scene_dispose_observer);
            guard.pointer_observer = Some(pointer_observer);
        }

        Self { state }
    }

    /// Adds a control to the root container and creates its meshes in the utility layer.
    pub fn add_control(&self, mut control: Box<dyn Control3D>) -> ControlId {
        let state = &mut *self.state.borrow_mut();
        state.attach(control.as_mut(), &Instance::default(), true);
        state.root.add_control(control)
    }

    /// Adds a control as child of the container `parent` somewhere in the tree.
    pub fn add_control_to(
        &self,
        parent: ControlId,
        mut control: Box<dyn Control3D>,
    ) -> anyhow::Result<ControlId> {
        let state = &mut *self.state.borrow_mut();
        let parent_control = find_control_mut(&mut state.root, parent)
            .ok_or_else(|| anyhow!("No control with id {} in this manager", parent.raw()))?;
        if parent_control.children_mut().is_none() {
            bail!("Control {} is not a container", parent_control.state().name);
        }
        let parent_world = *parent_control.state().world_transform();
        let parent_visible = parent_control.state().world_visible;

        state.attach(control.as_mut(), &parent_world, parent_visible);
        let children = find_control_mut(&mut state.root, parent)
            .and_then(|parent_control| parent_control.children_mut())
            .ok_or_else(|| anyhow!("Container {} vanished while attaching", parent.raw()))?;
        let id = control.id();
        children.push(control);
        Ok(id)
    }

    /// Detaches a direct child of the root container and hands it back.
    ///
    /// The control's meshes leave the utility layer and any hover or press
    /// state that refers to it (or its descendants) is dropped.
    pub fn remove_control(&self, id: ControlId) -> Option<Box<dyn Control3D>> {
        let state = &mut *self.state.borrow_mut();
        let mut control = state.root.remove_control(id)?;
        state.detach(control.as_mut());
        Some(control)
    }

    pub fn contains_control(&self, id: ControlId) -> bool {
        self.state.borrow().root.contains_control(id)
    }

    pub fn root_control_ids(&self) -> Vec<ControlId> {
        self.state
            .borrow()
            .root
            .children()
            .iter()
            .map(|child| child.id())
            .collect()
    }

    /// Scoped access to any control of the tree.
    ///
    /// Changes to `transform` or `is_visible` made here take effect on the
    /// meshes after [`Gui3dManager::refresh`].
    pub fn with_control_mut<R>(
        &self,
        id: ControlId,
        f: impl FnOnce(&mut dyn Control3D) -> R,
    ) -> Option<R> {
        let mut state = self.state.borrow_mut();
        find_control_mut(&mut state.root, id).map(f)
    }

    pub fn set_control_transform(&self, id: ControlId, transform: Instance) -> bool {
        let found = self
            .with_control_mut(id, |control| control.state_mut().transform = transform)
            .is_some();
        if found {
            self.refresh();
        }
        found
    }

    pub fn set_control_visible(&self, id: ControlId, visible: bool) -> bool {
        let found = self
            .with_control_mut(id, |control| control.state_mut().is_visible = visible)
            .is_some();
        if found {
            self.refresh();
        }
        found
    }

    /// Re-applies world transforms and visibility of every control to its meshes.
    pub fn refresh(&self) {
        let state = &mut *self.state.borrow_mut();
        if let Some(layer) = state.utility_layer.as_mut() {
            refresh_node(
                &mut state.root,
                &Instance::default(),
                true,
                layer.utility_layer_scene_mut(),
            );
        }
    }

    pub fn hovered_control(&self, pointer_id: PointerId) -> Option<ControlId> {
        self.state.borrow().interactions.hovered.get(&pointer_id).copied()
    }

    pub fn pressed_control(&self, pointer_id: PointerId) -> Option<ControlId> {
        self.state.borrow().interactions.pressed.get(&pointer_id).copied()
    }

    pub fn last_picked_control(&self) -> Option<ControlId> {
        self.state.borrow().interactions.last_picked
    }

    pub fn control_for_mesh(&self, mesh: MeshId) -> Option<ControlId> {
        self.state.borrow().mesh_to_control.get(&mesh).copied()
    }

    pub fn with_utility_layer<R>(&self, f: impl FnOnce(&UtilityLayerRenderer) -> R) -> Option<R> {
        self.state.borrow().utility_layer.as_ref().map(f)
    }

    pub fn with_utility_layer_mut<R>(
        &self,
        f: impl FnOnce(&mut UtilityLayerRenderer) -> R,
    ) -> Option<R> {
        self.state.borrow_mut().utility_layer.as_mut().map(f)
    }

    pub fn is_disposed(&self) -> bool {
        self.state.borrow().disposed
    }

    /// Disposes every control, detaches from the scene and releases the utility layer.
    ///
    /// Calling it again (or after the scene was disposed) does nothing.
    pub fn dispose(&self) {
        match self.state.try_borrow_mut() {
            Ok(mut state) => state.dispose(),
            Err(_) => log::warn!("Cannot dispose the GUI3D manager while it dispatches an event"),
        }
    }
}

impl Drop for Gui3dManager {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.dispose();
        }
    }
}

impl std::fmt::Debug for Gui3dManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.state.try_borrow() {
            Ok(state) => f
                .debug_struct("Gui3dManager")
                .field("root", &state.root)
                .field("interactions", &state.interactions)
                .field("disposed", &state.disposed)
                .finish(),
            Err(_) => f.write_str("Gui3dManager { <dispatching> }"),
        }
    }
}

impl ManagerState {
    fn attach(&mut self, control: &mut dyn Control3D, parent_world: &Instance, parent_visible: bool) {
        match self.utility_layer.as_mut() {
            Some(layer) => prepare_node(
                control,
                parent_world,
                parent_visible,
                layer.utility_layer_scene_mut(),
                &mut self.mesh_to_control,
            ),
            None => log::warn!(
                "Adding control {} to a disposed GUI3D manager, it won't be pickable",
                control.state().name
            ),
        }
    }

    fn detach(&mut self, control: &mut dyn Control3D) {
        let ids = subtree_ids(control);
        self.interactions.forget(&ids);
        let scene = self
            .utility_layer
            .as_mut()
            .map(|layer| layer.utility_layer_scene_mut());
        release_meshes(control, scene, &mut self.mesh_to_control);
    }

    fn on_pre_pointer(&mut self, info: &mut PointerInfoPre) {
        if info.scene.pointer_captured {
            log::trace!("Pointer {} is captured, skipping", info.event.id_or_default());
            return;
        }
        if !matches!(
            info.kind,
            PointerEventType::Move | PointerEventType::Up | PointerEventType::Down
        ) {
            return;
        }
        let Some(camera) = info.scene.camera else {
            return;
        };
        if let Some(layer) = self.utility_layer.as_mut() {
            layer.sync_camera(Some(camera));
        }
        info.skip_on_pointer_observable = self.do_picking(
            info.kind,
            &info.event,
            info.scene.pointer_x,
            info.scene.pointer_y,
        );
    }

    /// Returns whether the event hit GUI geometry and must not reach the main scene.
    fn do_picking(&mut self, kind: PointerEventType, event: &PointerEvent, x: f32, y: f32) -> bool {
        let Some(layer) = self.utility_layer.as_mut() else {
            return false;
        };
        let scene = layer.utility_layer_scene_mut();
        if scene.active_camera.is_none() {
            return false;
        }

        let pointer_id = event.id_or_default();
        let Some(pick) = scene.pick(x, y) else {
            if let Some(previous) = self.interactions.hovered.remove(&pointer_id) {
                log::trace!("Pointer {} left control {}", pointer_id, previous.raw());
                pointer_out(&mut self.root, previous, scene);
            }
            return false;
        };

        let point = PointerPoint {
            point: pick.picked_point,
            pointer_id,
            button_index: event.button,
        };
        let consumed = match self.mesh_to_control.get(&pick.picked_mesh).copied() {
            Some(control) => {
                log::trace!("Pointer {} hit control {}", pointer_id, control.raw());
                process_observables(
                    &mut self.root,
                    &mut self.interactions,
                    scene,
                    control,
                    kind,
                    point,
                )
            }
            None => {
                log::debug!(
                    "Mesh {} in the utility layer has no control",
                    pick.picked_mesh.raw()
                );
                false
            }
        };

        if !consumed && kind == PointerEventType::Move {
            if let Some(previous) = self.interactions.hovered.remove(&pointer_id) {
                pointer_out(&mut self.root, previous, scene);
            }
        }

        true
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        log::debug!("Disposing GUI3D manager");

        let scene = self
            .utility_layer
            .as_mut()
            .map(|layer| layer.utility_layer_scene_mut());
        self.root.dispose(scene);
        self.mesh_to_control.clear();
        self.interactions = Interactions::default();

        if let Some(observer) = self.pointer_observer.take() {
            self.pre_pointer_observable.remove(&observer);
        }
        if let Some(observer) = self.scene_dispose_observer.take() {
            self.scene_dispose_observable.remove(&observer);
        }
        if let Some(mut layer) = self.utility_layer.take() {
            layer.dispose();
        }
    }
}

/// Drives the pointer callbacks of `control_id` for one event.
///
/// Returns whether the control consumed the event. Controls that are hidden
/// or not interactive decline everything.
fn process_observables(
    root: &mut Container3D,
    interactions: &mut Interactions,
    scene: &mut Scene,
    control_id: ControlId,
    kind: PointerEventType,
    point: PointerPoint,
) -> bool {
    let accepts = find_control(&*root, control_id)
        .is_some_and(|control| control.state().is_interactive && control.state().is_visible);
    if !accepts {
        return false;
    }
    let pointer_id = point.pointer_id;

    match kind {
        PointerEventType::Move => {
            let previous = interactions.hovered.insert(pointer_id, control_id);
            if let Some(previous) = previous.filter(|previous| *previous != control_id) {
                pointer_out(root, previous, scene);
            }
            if let Some(control) = find_control_mut(root, control_id) {
                control.on_pointer_move(point);
                if previous != Some(control_id) {
                    control.on_pointer_enter(scene);
                }
            }
            true
        }
        PointerEventType::Down => {
            if let Some(control) = find_control_mut(root, control_id) {
                control.on_pointer_down(point, scene);
            }
            interactions.pressed.insert(pointer_id, control_id);
            interactions.last_picked = Some(control_id);
            true
        }
        PointerEventType::Up => {
            if let Some(pressed) = interactions.pressed.remove(&pointer_id) {
                if let Some(control) = find_control_mut(root, pressed) {
                    control.on_pointer_up(point, true, scene);
                }
            }
            true
        }
        _ => false,
    }
}

fn pointer_out(root: &mut Container3D, id: ControlId, scene: &mut Scene) {
    match find_control_mut(root, id) {
        Some(control) => control.on_pointer_out(scene),
        None => log::warn!("Hovered control {} is no longer in the tree", id.raw()),
    }
}

/// Creates the meshes of `control` and its descendants and registers them.
fn prepare_node(
    control: &mut dyn Control3D,
    parent_world: &Instance,
    parent_visible: bool,
    scene: &mut Scene,
    mesh_to_control: &mut HashMap<MeshId, ControlId>,
) {
    create_meshes(control, scene, mesh_to_control);
    refresh_node(control, parent_world, parent_visible, scene);
}

fn create_meshes(
    control: &mut dyn Control3D,
    scene: &mut Scene,
    mesh_to_control: &mut HashMap<MeshId, ControlId>,
) {
    let id = control.id();
    let meshes = control.create_meshes(scene);
    mesh_to_control.extend(meshes.iter().map(|mesh| (*mesh, id)));
    control.state_mut().mesh_ids = meshes;
    if let Some(children) = control.children_mut() {
        for child in children.iter_mut() {
            create_meshes(child.as_mut(), scene, mesh_to_control);
        }
    }
}

fn refresh_node(
    control: &mut dyn Control3D,
    parent_world: &Instance,
    parent_visible: bool,
    scene: &mut Scene,
) {
    let state = control.state_mut();
    let world = parent_world * &state.transform;
    let visible = parent_visible && state.is_visible;
    state.world = world;
    state.world_visible = visible;
    for mesh_id in state.mesh_ids.iter() {
        if let Some(mesh) = scene.mesh_mut(*mesh_id) {
            mesh.update_world_transform(&world);
            mesh.is_visible = visible;
        }
    }
    if let Some(children) = control.children_mut() {
        for child in children.iter_mut() {
            refresh_node(child.as_mut(), &world, visible, scene);
        }
    }
}

fn release_meshes(
    control: &mut dyn Control3D,
    mut scene: Option<&mut Scene>,
    mesh_to_control: &mut HashMap<MeshId, ControlId>,
) {
    for mesh_id in control.state_mut().mesh_ids.drain(..) {
        mesh_to_control.remove(&mesh_id);
        if let Some(scene) = scene.as_deref_mut() {
            scene.remove_mesh(mesh_id);
        }
    }
    control.state_mut().reset_pointer_state();
    if let Some(children) = control.children_mut() {
        for child in children.iter_mut() {
            release_meshes(child.as_mut(), scene.as_deref_mut(), mesh_to_control);
        }
    }
}
