//! Drives a row of 3D buttons with synthetic pointer input and logs what happens.
//!
//! Run with `RUST_LOG=info cargo run` (or `trace` to see every hit and miss).

use flow_gui3d::{
    Deg,
    camera::{Camera, Projection, SceneCamera},
    data_structures::instance::Instance,
    gui3d::{Button3D, Container3D, Control3D, Gui3dManager},
    node_material::{
        CloudBlock, ConnectionPointType, NodeMaterialBlock, NodeMaterialBuildState,
        NodeMaterialConnectionPoint, connect,
    },
    pointer::{PointerEvent, PointerEventType},
    scene::Scene,
};

fn button(name: &str, x: f32) -> Box<Button3D> {
    let mut button = Button3D::new(name);
    button.state_mut().transform = Instance::at(x, 0.0, 0.0);
    let label = name.to_string();
    button
        .state()
        .on_pointer_click_observable
        .add(move |point, _| log::info!("{label} clicked at {:?}", point.point));
    Box::new(button)
}

fn main() -> anyhow::Result<()> {
    flow_gui3d::init_logger();

    let camera = SceneCamera::new(
        Camera::new((0.0, 0.0, 5.0), Deg(-90.0), Deg(0.0)),
        Projection::new(800, 600, Deg(45.0), 0.1, 100.0),
    );
    let mut scene = Scene::with_camera("Main", camera);
    scene.on_pointer_observable.add(|info, _| {
        log::info!("main scene received {:?}", info.kind);
    });

    let manager = Gui3dManager::new(&scene);
    let toolbar = manager.add_control(Box::new(Container3D::new("toolbar")));
    manager.add_control_to(toolbar, button("left", -1.5))?;
    manager.add_control_to(toolbar, button("middle", 0.0))?;
    manager.add_control_to(toolbar, button("right", 1.5))?;

    let script = [
        (PointerEventType::Move, 400.0, 300.0),
        (PointerEventType::Down, 400.0, 300.0),
        (PointerEventType::Up, 400.0, 300.0),
        (PointerEventType::Move, 617.0, 300.0),
        (PointerEventType::Move, 50.0, 50.0),
        (PointerEventType::Down, 50.0, 50.0),
    ];
    for (kind, x, y) in script {
        let button = if kind == PointerEventType::Move { -1 } else { 0 };
        let reached_scene = scene.process_pointer(kind, PointerEvent::new(None, button, x, y));
        log::info!(
            "{kind:?} at ({x}, {y}): hovered {:?}, reached scene: {reached_scene}",
            manager.hovered_control(0)
        );
    }

    let mut uv = NodeMaterialConnectionPoint::output("uv", ConnectionPointType::Vector2);
    uv.set_associated_variable_name("vUV");
    let mut colour = NodeMaterialConnectionPoint::input("rgb", ConnectionPointType::Color3, false);
    let mut clouds = CloudBlock::new("clouds");
    clouds.octaves = 4.0;
    connect(&mut uv, clouds.seed_mut())?;
    connect(clouds.output_mut(), &mut colour)?;
    let mut state = NodeMaterialBuildState::default();
    state.emit_comments = true;
    clouds.build(&mut state);
    log::info!("generated shader code:\n{}", state.shader_code());

    scene.dispose();
    log::info!("GUI disposed with scene: {}", manager.is_disposed());
    Ok(())
}
