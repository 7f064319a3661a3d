use flow_gui3d::{
    data_structures::{instance::Instance, mesh::PickMesh},
    gui3d::{Button3D, Container3D, Control3D, Gui3dManager},
    pointer::PointerEventType::{Down, Move, Up, Wheel},
    scene::Scene,
};

use crate::common::test_utils::{
    CENTER, EMPTY, RIGHT, RecordingControl, calls, new_log, pointer, test_scene,
};

mod common;

#[test]
fn should_hover_and_leave_control() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    let a = manager.add_control(Box::new(RecordingControl::new("A", &log)));

    let reached_scene = pointer(&mut scene, Move, Some(1), CENTER);
    assert!(!reached_scene);
    assert_eq!(calls(&log), vec!["move:A", "enter:A"]);
    assert_eq!(manager.hovered_control(1), Some(a));

    let reached_scene = pointer(&mut scene, Move, Some(1), EMPTY);
    assert!(reached_scene);
    assert_eq!(calls(&log), vec!["move:A", "enter:A", "out:A"]);
    assert_eq!(manager.hovered_control(1), None);
}

#[test]
fn should_enter_only_once_while_hovering() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    manager.add_control(Box::new(RecordingControl::new("A", &log)));

    pointer(&mut scene, Move, None, CENTER);
    pointer(&mut scene, Move, None, (402.0, 301.0));

    assert_eq!(calls(&log), vec!["move:A", "enter:A", "move:A"]);
}

#[test]
fn should_leave_previous_control_before_entering_next() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    manager.add_control(Box::new(RecordingControl::new("A", &log)));
    let b = manager.add_control(Box::new(RecordingControl::at("B", &log, 1.5)));

    pointer(&mut scene, Move, None, CENTER);
    pointer(&mut scene, Move, None, RIGHT);

    assert_eq!(
        calls(&log),
        vec!["move:A", "enter:A", "out:A", "move:B", "enter:B"]
    );
    assert_eq!(manager.hovered_control(0), Some(b));
}

#[test]
fn should_click_when_released_over_pressed_control() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    let a = manager.add_control(Box::new(RecordingControl::new("A", &log)));

    pointer(&mut scene, Move, None, CENTER);
    assert!(!pointer(&mut scene, Down, None, CENTER));
    assert_eq!(manager.pressed_control(0), Some(a));
    assert!(!pointer(&mut scene, Up, None, CENTER));

    assert_eq!(
        calls(&log),
        vec!["move:A", "enter:A", "down:A", "click:A", "up:A"]
    );
    assert_eq!(manager.pressed_control(0), None);
    assert_eq!(manager.last_picked_control(), Some(a));
}

#[test]
fn should_release_pressed_control_when_pointer_goes_up_elsewhere() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    manager.add_control(Box::new(RecordingControl::new("A", &log)));
    manager.add_control(Box::new(RecordingControl::at("B", &log, 1.5)));

    pointer(&mut scene, Down, None, CENTER);
    pointer(&mut scene, Move, None, RIGHT);
    pointer(&mut scene, Up, None, RIGHT);

    assert_eq!(calls(&log), vec!["down:A", "move:B", "enter:B", "up:A"]);
}

#[test]
fn should_track_pointers_independently() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    let a = manager.add_control(Box::new(RecordingControl::new("A", &log)));
    let b = manager.add_control(Box::new(RecordingControl::at("B", &log, 1.5)));

    pointer(&mut scene, Move, Some(1), CENTER);
    pointer(&mut scene, Move, Some(2), RIGHT);
    assert_eq!(manager.hovered_control(1), Some(a));
    assert_eq!(manager.hovered_control(2), Some(b));

    pointer(&mut scene, Down, Some(1), CENTER);
    pointer(&mut scene, Down, Some(2), RIGHT);
    assert_eq!(manager.pressed_control(1), Some(a));
    assert_eq!(manager.pressed_control(2), Some(b));

    pointer(&mut scene, Up, Some(1), CENTER);
    assert_eq!(manager.pressed_control(1), None);
    assert_eq!(manager.pressed_control(2), Some(b));
    assert_eq!(manager.with_control_mut(b, |b| b.state().is_pressed()), Some(true));
    assert!(calls(&log).contains(&"up:A".to_string()));
    assert!(!calls(&log).contains(&"up:B".to_string()));

    pointer(&mut scene, Move, Some(1), EMPTY);
    assert_eq!(manager.hovered_control(1), None);
    assert_eq!(manager.hovered_control(2), Some(b));
    assert!(calls(&log).contains(&"out:A".to_string()));
    assert!(!calls(&log).contains(&"out:B".to_string()));

    pointer(&mut scene, Up, Some(2), RIGHT);
    assert_eq!(manager.pressed_control(2), None);
    assert!(calls(&log).contains(&"up:B".to_string()));
}

#[test]
fn should_keep_control_pressed_until_each_pointer_is_up() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    let a = manager.add_control(Box::new(RecordingControl::new("A", &log)));

    pointer(&mut scene, Down, Some(1), CENTER);
    pointer(&mut scene, Down, Some(2), CENTER);
    pointer(&mut scene, Up, Some(1), CENTER);

    assert_eq!(manager.pressed_control(2), Some(a));
    let pressing = manager.with_control_mut(a, |a| {
        a.state().pressing_pointers().collect::<Vec<_>>()
    });
    assert_eq!(pressing, Some(vec![2]));

    pointer(&mut scene, Up, Some(2), CENTER);

    assert_eq!(manager.pressed_control(2), None);
    let pressing = manager.with_control_mut(a, |a| a.state().pressing_pointers().count());
    assert_eq!(pressing, Some(0));
    assert_eq!(calls(&log), vec!["down:A", "up:A", "up:A"]);
}

#[test]
fn should_ignore_captured_pointer() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    manager.add_control(Box::new(RecordingControl::new("A", &log)));
    scene.capture_pointer(0);

    assert!(pointer(&mut scene, Move, None, CENTER));
    assert!(pointer(&mut scene, Down, None, CENTER));

    assert!(calls(&log).is_empty());
    assert_eq!(manager.hovered_control(0), None);
    assert_eq!(manager.pressed_control(0), None);

    scene.release_pointer(0);
    assert!(!pointer(&mut scene, Move, None, CENTER));
}

#[test]
fn should_not_consume_without_host_camera() {
    let mut scene = Scene::new("NoCamera");
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    manager.add_control(Box::new(RecordingControl::new("A", &log)));

    assert!(pointer(&mut scene, Move, None, CENTER));
    assert!(calls(&log).is_empty());
}

#[test]
fn should_not_consume_when_overlay_has_no_camera() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    manager.add_control(Box::new(RecordingControl::new("A", &log)));
    manager.with_utility_layer_mut(|layer| layer.use_host_camera = false);

    assert!(pointer(&mut scene, Move, None, CENTER));
    assert!(pointer(&mut scene, Down, None, CENTER));
    assert!(calls(&log).is_empty());
}

#[test]
fn should_use_pointer_camera_over_active_camera() {
    let mut scene = Scene::new("PointerCamera");
    scene.camera_to_use_for_pointers = Some(common::test_utils::test_camera());
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    manager.add_control(Box::new(RecordingControl::new("A", &log)));

    assert!(!pointer(&mut scene, Move, None, CENTER));
    assert_eq!(calls(&log), vec!["move:A", "enter:A"]);
}

#[test]
fn should_ignore_wheel_events() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    manager.add_control(Box::new(RecordingControl::new("A", &log)));

    assert!(pointer(&mut scene, Wheel, None, CENTER));
    assert!(calls(&log).is_empty());
    assert_eq!(manager.hovered_control(0), None);
}

#[test]
fn should_block_scene_input_on_non_interactive_control() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    let mut control = RecordingControl::new("A", &log);
    control.state_mut().is_interactive = false;
    manager.add_control(Box::new(control));

    assert!(!pointer(&mut scene, Move, None, CENTER));
    assert!(!pointer(&mut scene, Down, None, CENTER));
    assert!(calls(&log).is_empty());
    assert_eq!(manager.hovered_control(0), None);
    assert_eq!(manager.pressed_control(0), None);
}

#[test]
fn should_leave_control_that_stops_accepting_moves() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    let a = manager.add_control(Box::new(RecordingControl::new("A", &log)));

    pointer(&mut scene, Move, None, CENTER);
    manager.with_control_mut(a, |control| control.state_mut().is_interactive = false);
    assert!(!pointer(&mut scene, Move, None, CENTER));

    assert_eq!(calls(&log), vec!["move:A", "enter:A", "out:A"]);
    assert_eq!(manager.hovered_control(0), None);
}

#[test]
fn should_consume_hit_on_mesh_without_control() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    manager.with_utility_layer_mut(|layer| {
        layer
            .utility_layer_scene_mut()
            .add_mesh(PickMesh::plane("stray", 1.0, 1.0))
    });

    assert!(!pointer(&mut scene, Move, None, CENTER));
    assert_eq!(manager.hovered_control(0), None);
}

#[test]
fn should_forget_removed_control() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    let a = manager.add_control(Box::new(RecordingControl::new("A", &log)));
    pointer(&mut scene, Move, None, CENTER);
    pointer(&mut scene, Down, None, CENTER);

    let removed = manager.remove_control(a);

    assert!(removed.is_some());
    assert!(!manager.contains_control(a));
    assert_eq!(manager.hovered_control(0), None);
    assert_eq!(manager.pressed_control(0), None);
    assert_eq!(manager.last_picked_control(), None);
    assert_eq!(
        manager.with_utility_layer(|layer| layer.utility_layer_scene().meshes().len()),
        Some(0)
    );
    assert!(pointer(&mut scene, Move, None, CENTER));
    assert_eq!(calls(&log), vec!["move:A", "enter:A", "down:A"]);
}

#[test]
fn should_pick_readded_control_again() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    let a = manager.add_control(Box::new(RecordingControl::new("A", &log)));
    pointer(&mut scene, Move, None, CENTER);

    let removed = manager.remove_control(a).expect("control was added");
    manager.add_control(removed);
    pointer(&mut scene, Move, None, (401.0, 300.0));

    assert_eq!(
        calls(&log),
        vec!["move:A", "enter:A", "move:A", "enter:A"]
    );
    assert!(manager.contains_control(a));
}

#[test]
fn should_place_nested_controls_relative_to_parent() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    let mut panel = Container3D::new("panel");
    panel.state_mut().transform = Instance::at(1.5, 0.0, 0.0);
    let panel = manager.add_control(Box::new(panel));

    let a = manager
        .add_control_to(panel, Box::new(RecordingControl::new("A", &log)))
        .expect("panel is a container");

    assert!(pointer(&mut scene, Move, None, CENTER));
    assert!(!pointer(&mut scene, Move, None, RIGHT));
    assert_eq!(manager.hovered_control(0), Some(a));
    assert!(!manager.contains_control(a));
}

#[test]
fn should_refuse_adding_to_non_container() {
    let scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    let a = manager.add_control(Box::new(RecordingControl::new("A", &log)));

    let err = manager.add_control_to(a, Box::new(RecordingControl::new("B", &log)));
    assert!(err.is_err());

    manager.remove_control(a);
    let err = manager.add_control_to(a, Box::new(RecordingControl::new("C", &log)));
    assert!(err.is_err());
}

#[test]
fn should_move_meshes_with_control_transform() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    let a = manager.add_control(Box::new(RecordingControl::new("A", &log)));

    assert!(manager.set_control_transform(a, Instance::at(1.5, 0.0, 0.0)));

    assert!(pointer(&mut scene, Move, None, CENTER));
    assert!(!pointer(&mut scene, Move, None, RIGHT));
}

#[test]
fn should_not_pick_hidden_subtree() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    let panel = manager.add_control(Box::new(Container3D::new("panel")));
    manager
        .add_control_to(panel, Box::new(RecordingControl::new("A", &log)))
        .expect("panel is a container");

    assert!(manager.set_control_visible(panel, false));
    assert!(pointer(&mut scene, Move, None, CENTER));

    assert!(manager.set_control_visible(panel, true));
    assert!(!pointer(&mut scene, Move, None, CENTER));
}

#[test]
fn should_highlight_and_press_button() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let button = manager.add_control(Box::new(Button3D::new("ok")));
    let mesh = manager
        .with_control_mut(button, |control| control.state().mesh_ids()[0])
        .expect("button is in the tree");
    let emissive = |manager: &Gui3dManager| {
        manager
            .with_utility_layer(|layer| layer.utility_layer_scene().mesh(mesh).map(|m| m.emissive))
            .flatten()
    };
    let scale = |manager: &Gui3dManager| {
        manager
            .with_utility_layer(|layer| {
                layer
                    .utility_layer_scene()
                    .mesh(mesh)
                    .map(|m| m.world_transform().scale.x)
            })
            .flatten()
            .unwrap_or_default()
    };

    pointer(&mut scene, Move, None, CENTER);
    assert_eq!(emissive(&manager), Some([1.0, 0.0, 0.0]));

    pointer(&mut scene, Down, None, CENTER);
    assert!((scale(&manager) - 0.95).abs() < 1e-6);

    pointer(&mut scene, Up, None, CENTER);
    assert!((scale(&manager) - 1.0).abs() < 1e-6);

    pointer(&mut scene, Move, None, EMPTY);
    assert_eq!(emissive(&manager), Some([0.0, 0.0, 0.0]));
}

#[test]
fn should_dispose_controls_and_detach_once() {
    let scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    let panel = manager.add_control(Box::new(Container3D::new("panel")));
    manager
        .add_control_to(panel, Box::new(RecordingControl::new("A", &log)))
        .expect("panel is a container");
    assert_eq!(scene.on_pre_pointer_observable.len(), 1);
    assert_eq!(scene.on_dispose_observable.len(), 1);

    manager.dispose();
    manager.dispose();

    assert!(manager.is_disposed());
    assert!(manager.root_control_ids().is_empty());
    assert!(scene.on_pre_pointer_observable.is_empty());
    assert!(scene.on_dispose_observable.is_empty());
    assert!(manager.with_utility_layer(|_| ()).is_none());
    assert_eq!(calls(&log), vec!["dispose:A"]);
}

#[test]
fn should_add_nested_control_without_meshes_after_dispose() {
    let scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    let panel = manager.add_control(Box::new(Container3D::new("panel")));
    manager
        .add_control_to(panel, Box::new(RecordingControl::new("A", &log)))
        .expect("panel is a container");
    assert_eq!(*log.borrow(), vec!["create:A"]);

    manager.dispose();
    let panel = manager.add_control(Box::new(Container3D::new("panel")));
    let b = manager
        .add_control_to(panel, Box::new(RecordingControl::new("B", &log)))
        .expect("panel is a container");

    assert!(manager.with_control_mut(b, |_| ()).is_some());
    assert!(!log.borrow().contains(&"create:B".to_string()));
    assert!(manager.with_utility_layer(|_| ()).is_none());
}

#[test]
fn should_dispose_with_scene() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    manager.add_control(Box::new(RecordingControl::new("A", &log)));

    scene.dispose();
    manager.dispose();

    assert!(manager.is_disposed());
    assert_eq!(calls(&log), vec!["dispose:A"]);
    assert!(!pointer(&mut scene, Move, None, CENTER));
}

#[test]
fn should_detach_observers_when_dropped() {
    let mut scene = test_scene();
    let log = new_log();
    {
        let manager = Gui3dManager::new(&scene);
        manager.add_control(Box::new(RecordingControl::new("A", &log)));
    }

    assert!(scene.on_pre_pointer_observable.is_empty());
    assert!(scene.on_dispose_observable.is_empty());
    assert!(pointer(&mut scene, Move, None, CENTER));
    assert_eq!(calls(&log), vec!["dispose:A"]);
}

#[test]
fn should_keep_scene_input_below_gui() {
    let mut scene = test_scene();
    let manager = Gui3dManager::new(&scene);
    let log = new_log();
    manager.add_control(Box::new(RecordingControl::new("A", &log)));
    let main_hits = new_log();
    let recorder = main_hits.clone();
    scene.on_pointer_observable.add(move |info, _| {
        recorder.borrow_mut().push(format!("{:?}", info.kind));
    });

    pointer(&mut scene, Move, None, CENTER);
    pointer(&mut scene, Move, None, EMPTY);
    pointer(&mut scene, Down, None, EMPTY);

    assert_eq!(*main_hits.borrow(), vec!["Move", "Down"]);
}
