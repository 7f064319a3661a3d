use std::{cell::RefCell, rc::Rc};

use flow_gui3d::{
    Deg,
    camera::{Camera, Projection, SceneCamera},
    data_structures::{
        instance::Instance,
        mesh::{MeshId, PickMesh},
    },
    gui3d::{Control3D, ControlState},
    pointer::{PointerEvent, PointerEventType, PointerId},
    scene::Scene,
};

pub(crate) const WIDTH: u32 = 800;
pub(crate) const HEIGHT: u32 = 600;

/// Pixel straight ahead of the camera, on a control placed at the origin.
pub(crate) const CENTER: (f32, f32) = (400.0, 300.0);
/// Pixel on a control placed at `x = 1.5`.
pub(crate) const RIGHT: (f32, f32) = (617.0, 300.0);
/// Pixel far away from any test geometry.
pub(crate) const EMPTY: (f32, f32) = (50.0, 50.0);

pub(crate) type CallLog = Rc<RefCell<Vec<String>>>;

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Looks down -Z from `(0, 0, 5)`.
pub(crate) fn test_camera() -> SceneCamera {
    SceneCamera::new(
        Camera::new((0.0, 0.0, 5.0), Deg(-90.0), Deg(0.0)),
        Projection::new(WIDTH, HEIGHT, Deg(45.0), 0.1, 100.0),
    )
}

pub(crate) fn test_scene() -> Scene {
    init_logger();
    Scene::with_camera("TestScene", test_camera())
}

pub(crate) fn new_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) fn pointer(
    scene: &mut Scene,
    kind: PointerEventType,
    pointer_id: Option<PointerId>,
    (x, y): (f32, f32),
) -> bool {
    let button = match kind {
        PointerEventType::Down | PointerEventType::Up => 0,
        _ => -1,
    };
    scene.process_pointer(kind, PointerEvent::new(pointer_id, button, x, y))
}

/// A 1x1 box that writes every callback it receives into a shared log.
pub(crate) struct RecordingControl {
    state: ControlState,
    log: CallLog,
}

impl RecordingControl {
    pub(crate) fn new(name: &str, log: &CallLog) -> Self {
        let state = ControlState::new(name);
        let record = |event: &'static str| {
            let log = log.clone();
            let name = name.to_string();
            move || log.borrow_mut().push(format!("{event}:{name}"))
        };
        let on_move = record("move");
        state.on_pointer_move_observable.add(move |_, _| on_move());
        let on_enter = record("enter");
        state.on_pointer_enter_observable.add(move |_, _| on_enter());
        let on_out = record("out");
        state.on_pointer_out_observable.add(move |_, _| on_out());
        let on_down = record("down");
        state.on_pointer_down_observable.add(move |_, _| on_down());
        let on_up = record("up");
        state.on_pointer_up_observable.add(move |_, _| on_up());
        let on_click = record("click");
        state.on_pointer_click_observable.add(move |_, _| on_click());
        let on_dispose = record("dispose");
        state.on_dispose_observable.add(move |_, _| on_dispose());
        Self {
            state,
            log: log.clone(),
        }
    }

    pub(crate) fn at(name: &str, log: &CallLog, x: f32) -> Self {
        let mut control = Self::new(name, log);
        control.state.transform = Instance::at(x, 0.0, 0.0);
        control
    }
}

impl Control3D for RecordingControl {
    fn state(&self) -> &ControlState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ControlState {
        &mut self.state
    }

    fn create_meshes(&mut self, scene: &mut Scene) -> Vec<MeshId> {
        self.log
            .borrow_mut()
            .push(format!("create:{}", self.state.name));
        vec![scene.add_mesh(PickMesh::cuboid(&self.state.name, 1.0, 1.0, 0.08))]
    }
}

/// Log entries except mesh creation.
pub(crate) fn calls(log: &CallLog) -> Vec<String> {
    log.borrow()
        .iter()
        .filter(|entry| !entry.starts_with("create:"))
        .cloned()
        .collect()
}
