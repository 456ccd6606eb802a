//! Integration tests driving the workspace through screen-space input.

use desk_core::harness::TestHarness;
use desk_core::{EditorError, KeyCommand, ShellEvent};

#[test]
fn test_harness_starts_with_cube() {
    let h = TestHarness::new();
    assert_eq!(h.object_count(), 1);
    let id = h.object_ids()[0];
    let cube = h.object(id).unwrap();
    assert!((cube.position.y - 0.735).abs() < 1e-12);
    assert!(h.selected().is_none());
}

#[test]
fn test_click_selects() {
    let mut h = TestHarness::new();
    let id = h.object_ids()[0];
    assert_eq!(h.click_object(id), Some(id));
    assert_eq!(h.selected(), Some(id));
    assert_eq!(
        h.take_events(),
        vec![
            ShellEvent::OrbitEnabled(false),
            ShellEvent::SelectionChanged(Some(id)),
            ShellEvent::OrbitEnabled(true),
        ]
    );
}

const TWO_CUBES: &str = r#"{
    "desk": {"width": 1.2, "depth": 0.6},
    "objects": [
        {"position": {"x": -0.3, "y": 0.735, "z": 0.0}, "rotationY": 0.0,
         "scale": {"x": 1, "y": 1, "z": 1}, "baseSize": {"w": 0.05, "h": 0.05, "d": 0.05},
         "color": 4883176},
        {"position": {"x": 0.3, "y": 0.735, "z": 0.0}, "rotationY": 0.0,
         "scale": {"x": 1, "y": 1, "z": 1}, "baseSize": {"w": 0.05, "h": 0.05, "d": 0.05},
         "color": 2236962}
    ]
}"#;

#[test]
fn test_clicking_other_object_switches_selection() {
    let mut h = TestHarness::new();
    h.load_json(TWO_CUBES).unwrap();
    let ids = h.object_ids();
    let (left, right) = (ids[0], ids[1]);

    h.click_object(left);
    h.take_events();

    assert_eq!(h.click_object(right), Some(right));
    assert_eq!(
        h.take_events(),
        vec![
            ShellEvent::SelectionChanged(None),
            ShellEvent::OrbitEnabled(false),
            ShellEvent::SelectionChanged(Some(right)),
            ShellEvent::OrbitEnabled(true),
        ]
    );
    assert_eq!(h.selected(), Some(right));
}

#[test]
fn test_small_drag_moves_freely() {
    let mut h = TestHarness::new();
    let id = h.object_ids()[0];
    let before = h.object(id).unwrap().position;
    assert!(h.drag_object(id, &[(5.0, 0.0), (10.0, 5.0)]));
    let after = h.object(id).unwrap().position;
    assert_ne!(after.x, before.x);
    assert_eq!(after.y, before.y);

    let bounds = h.workspace.surface().bounds(0.025, 0.025, 0.05).unwrap();
    assert!(after.x > bounds.min_x && after.x < bounds.max_x);
    assert!(after.z > bounds.min_z && after.z < bounds.max_z);
}

#[test]
fn test_far_drag_stops_at_desk_edge() {
    let mut h = TestHarness::new();
    let id = h.object_ids()[0];
    assert!(h.drag_object(id, &[(100.0, 0.0), (200.0, 0.0), (300.0, 0.0)]));

    let pos = h.object(id).unwrap().position;
    let bounds = h.workspace.surface().bounds(0.025, 0.025, 0.05).unwrap();
    // Dragging right on screen heads towards -z from the default view
    assert!((pos.z - bounds.min_z).abs() < 1e-12);
    assert!(pos.x <= bounds.max_x);
    assert!((pos.y - 0.735).abs() < 1e-12);
}

#[test]
fn test_orbit_restored_after_every_gesture() {
    let mut h = TestHarness::new();
    let id = h.object_ids()[0];
    h.drag_object(id, &[(3.0, 3.0)]);
    assert!(h.workspace.camera.orbit_enabled);
    h.workspace.on_pointer_cancel();
    assert!(h.workspace.camera.orbit_enabled);
}

#[test]
fn test_delete_key_clears_selection() {
    let mut h = TestHarness::new();
    let cube = h.object_ids()[0];
    let book = h.add("book-vertical").unwrap();
    h.click_object(cube);

    h.key(KeyCommand::DeleteSelected);
    assert_eq!(h.object_ids(), vec![book]);
    assert!(h.selected().is_none());
}

#[test]
fn test_empty_harness_rejects_add() {
    let mut h = TestHarness::empty();
    assert_eq!(h.add("default-cube"), Err(EditorError::NoSurface));
    assert_eq!(h.object_count(), 0);
    assert_eq!(h.export_json(), Err(EditorError::NoSurface));
}

#[test]
fn test_rescale_scenario() {
    let mut h = TestHarness::new();
    let id = h.object_ids()[0];
    h.click_object(id);
    assert_eq!(h.workspace.rescale_selected(0.10, 0.20, 0.15), Ok(true));
    let cube = h.object(id).unwrap();
    assert!((cube.scale.x - 2.0).abs() < 1e-12);
    assert!((cube.scale.y - 4.0).abs() < 1e-12);
    assert!((cube.scale.z - 3.0).abs() < 1e-12);
    assert!((cube.position.y - 0.81).abs() < 1e-12);
}
