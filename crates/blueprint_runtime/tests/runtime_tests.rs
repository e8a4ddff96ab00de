//! Integration tests for blueprint_runtime
//!
//! Imports a small crane model, then starts synchronization sessions
//! against matching and edited model sources and drives signals through
//! the step loop.

use approx::assert_relative_eq;
use glam::{DQuat, DVec3, EulerRot};

use blueprint_import::*;
use blueprint_model::prelude::*;
use blueprint_runtime::*;
use blueprint_sim::prelude::*;

const CRANE: &str = r#"{
    "models": {
        "crane": {
            "root": {
                "kind": "group",
                "children": [
                    {
                        "name": "tower", "kind": "body", "motion_control": "statics",
                        "children": [
                            { "name": "top", "kind": "attachment", "position": [0.0, 3.0, 0.0] }
                        ]
                    },
                    {
                        "name": "jib", "kind": "body", "mass": 25.0,
                        "position": [2.0, 3.0, 0.0],
                        "children": [
                            { "name": "hub", "kind": "attachment" }
                        ]
                    }
                ],
                "connectors": [
                    {
                        "name": "slew", "kind": "hinge",
                        "attachment1": "jib.hub", "attachment2": "tower.top",
                        "main_interaction": {
                            "stiffness": { "around_normal": 2000.0 },
                            "damping": { "around_normal": 20.0 }
                        },
                        "interactions": [
                            { "name": "drive", "kind": "motor", "speed": 0.0, "enabled": true },
                            { "name": "hold", "kind": "lock" },
                            { "name": "brake", "kind": "friction", "coefficient": 0.4 }
                        ]
                    }
                ]
            },
            "inputs": [
                { "name": "slew_speed", "target": "slew.drive", "kind": "motor_speed" },
                { "name": "hold_at", "target": "slew.hold", "kind": "lock_position" },
                { "name": "jib_velocity", "target": "jib", "kind": "body_velocity" },
                { "name": "jib_pose", "target": "jib", "kind": "body_pose" }
            ],
            "outputs": [
                { "name": "slew_angle", "target": "slew", "kind": "angle" },
                { "name": "slew_rate", "target": "slew", "kind": "speed" },
                { "name": "jib_position", "target": "jib", "kind": "body_position" },
                { "name": "jib_rotation", "target": "jib", "kind": "body_rotation" },
                { "name": "jib_frame", "target": "jib", "kind": "body_pose" },
                { "name": "jib_motion", "target": "jib", "kind": "body_velocity" },
                { "name": "jib_spin", "target": "jib", "kind": "body_angular_velocity" }
            ]
        }
    }
}"#;

/// The crane after an edit renaming `jib` to `boom`, signals untouched.
const STALE: &str = r#"{
    "models": {
        "crane": {
            "root": {
                "kind": "group",
                "children": [
                    {
                        "name": "tower", "kind": "body", "motion_control": "statics",
                        "children": [
                            { "name": "top", "kind": "attachment", "position": [0.0, 3.0, 0.0] }
                        ]
                    },
                    {
                        "name": "boom", "kind": "body", "mass": 25.0,
                        "position": [2.0, 3.0, 0.0],
                        "children": [
                            { "name": "hub", "kind": "attachment" }
                        ]
                    }
                ],
                "connectors": [
                    {
                        "name": "slew", "kind": "hinge",
                        "attachment1": "boom.hub", "attachment2": "tower.top",
                        "main_interaction": {
                            "stiffness": { "around_normal": 2000.0 },
                            "damping": { "around_normal": 20.0 }
                        },
                        "interactions": [
                            { "name": "drive", "kind": "motor", "speed": 0.0, "enabled": true },
                            { "name": "hold", "kind": "lock" },
                            { "name": "brake", "kind": "friction", "coefficient": 0.4 }
                        ]
                    }
                ]
            },
            "inputs": [
                { "name": "slew_speed", "target": "slew.drive", "kind": "motor_speed" },
                { "name": "hold_at", "target": "slew.hold", "kind": "lock_position" },
                { "name": "jib_velocity", "target": "jib", "kind": "body_velocity" },
                { "name": "jib_pose", "target": "jib", "kind": "body_pose" }
            ],
            "outputs": [
                { "name": "slew_angle", "target": "slew", "kind": "angle" },
                { "name": "slew_rate", "target": "slew", "kind": "speed" },
                { "name": "jib_position", "target": "jib", "kind": "body_position" },
                { "name": "jib_rotation", "target": "jib", "kind": "body_rotation" },
                { "name": "jib_frame", "target": "jib", "kind": "body_pose" },
                { "name": "jib_motion", "target": "jib", "kind": "body_velocity" },
                { "name": "jib_spin", "target": "jib", "kind": "body_angular_velocity" }
            ]
        }
    }
}"#;

/// The crane after an edit demoting `jib` from a body to a plain group.
const REGROUPED: &str = r#"{
    "models": {
        "crane": {
            "root": {
                "kind": "group",
                "children": [
                    {
                        "name": "tower", "kind": "body", "motion_control": "statics",
                        "children": [
                            { "name": "top", "kind": "attachment", "position": [0.0, 3.0, 0.0] }
                        ]
                    },
                    {
                        "name": "jib", "kind": "group",
                        "position": [2.0, 3.0, 0.0],
                        "children": [
                            { "name": "hub", "kind": "attachment" }
                        ]
                    }
                ],
                "connectors": [
                    {
                        "name": "slew", "kind": "hinge",
                        "attachment1": "jib.hub", "attachment2": "tower.top",
                        "main_interaction": {
                            "stiffness": { "around_normal": 2000.0 },
                            "damping": { "around_normal": 20.0 }
                        },
                        "interactions": [
                            { "name": "drive", "kind": "motor", "speed": 0.0, "enabled": true },
                            { "name": "hold", "kind": "lock" },
                            { "name": "brake", "kind": "friction", "coefficient": 0.4 }
                        ]
                    }
                ]
            },
            "inputs": [
                { "name": "slew_speed", "target": "slew.drive", "kind": "motor_speed" },
                { "name": "hold_at", "target": "slew.hold", "kind": "lock_position" },
                { "name": "jib_velocity", "target": "jib", "kind": "body_velocity" },
                { "name": "jib_pose", "target": "jib", "kind": "body_pose" }
            ],
            "outputs": [
                { "name": "slew_angle", "target": "slew", "kind": "angle" },
                { "name": "slew_rate", "target": "slew", "kind": "speed" },
                { "name": "jib_position", "target": "jib", "kind": "body_position" }
            ]
        }
    }
}"#;

/// The crane with an auxiliary interaction this version does not
/// recognize, plus an input targeting it.
const EXOTIC: &str = r#"{
    "models": {
        "crane": {
            "root": {
                "kind": "group",
                "children": [
                    {
                        "name": "tower", "kind": "body", "motion_control": "statics",
                        "children": [
                            { "name": "top", "kind": "attachment", "position": [0.0, 3.0, 0.0] }
                        ]
                    },
                    {
                        "name": "jib", "kind": "body", "mass": 25.0,
                        "position": [2.0, 3.0, 0.0],
                        "children": [
                            { "name": "hub", "kind": "attachment" }
                        ]
                    }
                ],
                "connectors": [
                    {
                        "name": "slew", "kind": "hinge",
                        "attachment1": "jib.hub", "attachment2": "tower.top",
                        "main_interaction": {
                            "stiffness": { "around_normal": 2000.0 },
                            "damping": { "around_normal": 20.0 }
                        },
                        "interactions": [
                            { "name": "drive", "kind": "motor", "speed": 0.0, "enabled": true },
                            { "name": "hold", "kind": "lock" },
                            { "name": "brake", "kind": "friction", "coefficient": 0.4 },
                            { "name": "glue", "kind": "magnetic" }
                        ]
                    }
                ]
            },
            "inputs": [
                { "name": "slew_speed", "target": "slew.drive", "kind": "motor_speed" },
                { "name": "glue_speed", "target": "slew.glue", "kind": "motor_speed" },
                { "name": "jib_velocity", "target": "jib", "kind": "body_velocity" }
            ],
            "outputs": [
                { "name": "slew_angle", "target": "slew", "kind": "angle" }
            ]
        }
    }
}"#;

fn start_session(text: &str) -> (Simulation, ImportedScene, Bridge) {
    let component = parse_component(text, "crane", &LoaderConfig::default()).expect("load");
    let mut simulation = Simulation::default();
    let imported = import_component(&component, simulation.world_mut()).expect("import");
    let bridge = Bridge::start(
        &ModelSource::Text(text.to_string()),
        "crane",
        &LoaderConfig::default(),
        &imported.scene,
    )
    .expect("start");
    (simulation, imported, bridge)
}

fn restart_against(scene: &Scene, text: &str) -> Bridge {
    Bridge::start(
        &ModelSource::Text(text.to_string()),
        "crane",
        &LoaderConfig::default(),
        scene,
    )
    .expect("start")
}

fn body_handle(scene: &Scene, path: &str) -> BodyHandle {
    match scene.find(path).expect("scene object").target {
        SceneTarget::Body(handle) => handle,
        ref other => panic!("not a body: {other:?}"),
    }
}

fn constraint_handle(scene: &Scene, path: &str) -> ConstraintHandle {
    match scene.find(path).expect("scene object").target {
        SceneTarget::Constraint(handle) => handle,
        ref other => panic!("not a constraint: {other:?}"),
    }
}

#[test]
fn test_session_binds_the_imported_scene() {
    let (_simulation, imported, bridge) = start_session(CRANE);
    assert_eq!(imported.scene.len(), 6);
    assert_eq!(bridge.bound_bodies(), 2);
    assert_eq!(bridge.bound_interactions(), 4);
    assert_eq!(bridge.input_names().count(), 4);
    assert_eq!(bridge.output_names().count(), 7);
}

#[test]
fn test_stale_paths_are_skipped_at_start() {
    let (_simulation, imported, _bridge) = start_session(CRANE);

    let mut bridge = restart_against(&imported.scene, STALE);
    assert_eq!(bridge.bound_bodies(), 1);
    assert_eq!(bridge.bound_interactions(), 4);

    let mut inputs: Vec<&str> = bridge.input_names().collect();
    inputs.sort_unstable();
    assert_eq!(inputs, ["hold_at", "slew_speed"]);
    let mut outputs: Vec<&str> = bridge.output_names().collect();
    outputs.sort_unstable();
    assert_eq!(outputs, ["slew_angle", "slew_rate"]);

    assert!(bridge
        .raise_input("slew_speed", SignalValue::Scalar(1.0))
        .is_ok());
    let err = bridge
        .raise_input("jib_velocity", SignalValue::Vector(DVec3::ONE))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownInput(_)));
}

#[test]
fn test_type_changes_are_skipped_at_start() {
    let (_simulation, imported, _bridge) = start_session(CRANE);

    let bridge = restart_against(&imported.scene, REGROUPED);
    assert_eq!(bridge.bound_bodies(), 1);
    assert_eq!(bridge.bound_interactions(), 4);
    assert_eq!(bridge.input_names().count(), 2);
    assert_eq!(bridge.output_names().count(), 2);
}

#[test]
fn test_unrecognized_aux_interactions_never_bind() {
    let (_simulation, _imported, mut bridge) = start_session(EXOTIC);
    assert_eq!(bridge.bound_interactions(), 4);
    assert!(bridge.input_names().all(|name| name != "glue_speed"));

    let err = bridge
        .raise_input("glue_speed", SignalValue::Scalar(1.0))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownInput(_)));
}

#[test]
fn test_motor_speed_input_reaches_the_drive_controller() {
    let (mut simulation, imported, mut bridge) = start_session(CRANE);
    bridge
        .raise_input("slew_speed", SignalValue::Scalar(1.2))
        .expect("raise");
    simulation.step_with(&mut [&mut bridge]);

    let slew = constraint_handle(&imported.scene, "crane.slew");
    let constraint = simulation.world().constraint(slew).expect("live");
    let block = constraint
        .controllers(ControllerAxis::Rotational)
        .expect("block");
    assert_relative_eq!(block.target_speed.speed, 1.2);

    // raised values are consumed: a raise-less step leaves engine edits alone
    simulation
        .world_mut()
        .constraint_mut(slew)
        .expect("live")
        .controllers_mut(ControllerAxis::Rotational)
        .expect("block")
        .target_speed
        .speed = 0.25;
    simulation.step_with(&mut [&mut bridge]);
    let constraint = simulation.world().constraint(slew).expect("live");
    let block = constraint
        .controllers(ControllerAxis::Rotational)
        .expect("block");
    assert_relative_eq!(block.target_speed.speed, 0.25);
}

#[test]
fn test_lock_position_input_reaches_the_hold_controller() {
    let (mut simulation, imported, mut bridge) = start_session(CRANE);
    bridge
        .raise_input("hold_at", SignalValue::Scalar(0.6))
        .expect("raise");
    simulation.step_with(&mut [&mut bridge]);

    let slew = constraint_handle(&imported.scene, "crane.slew");
    let constraint = simulation.world().constraint(slew).expect("live");
    let block = constraint
        .controllers(ControllerAxis::Rotational)
        .expect("block");
    assert_relative_eq!(block.lock.position, 0.6);
}

#[test]
fn test_body_inputs_cross_the_handedness_boundary() {
    let (mut simulation, imported, mut bridge) = start_session(CRANE);
    bridge
        .raise_input("jib_velocity", SignalValue::Vector(DVec3::new(1.0, 2.0, 3.0)))
        .expect("raise");
    simulation.step_with(&mut [&mut bridge]);

    let jib = body_handle(&imported.scene, "crane.jib");
    let body = simulation.world().body(jib).expect("live");
    assert_eq!(body.velocity, DVec3::new(-1.0, 2.0, 3.0));
}

#[test]
fn test_pose_input_round_trips_through_the_outputs() {
    let (mut simulation, imported, mut bridge) = start_session(CRANE);
    let position = DVec3::new(1.0, 2.0, 3.0);
    let rotation = DQuat::from_euler(EulerRot::XYZ, 0.3, -0.6, 0.9);
    bridge
        .raise_input("jib_pose", SignalValue::Pose { position, rotation })
        .expect("raise");
    simulation.step_with(&mut [&mut bridge]);

    let jib = body_handle(&imported.scene, "crane.jib");
    let engine_position = simulation.world().body(jib).expect("live").pose.position;
    assert_relative_eq!(engine_position.x, -1.0);

    match bridge.poll_output("jib_position").expect("poll") {
        SignalValue::Vector(v) => {
            assert_relative_eq!(v.x, 1.0);
            assert_relative_eq!(v.y, 2.0);
            assert_relative_eq!(v.z, 3.0);
        }
        other => panic!("unexpected layout: {other:?}"),
    }
    match bridge.poll_output("jib_rotation").expect("poll") {
        SignalValue::Quaternion(q) => {
            assert_relative_eq!(q.x, rotation.x, epsilon = 1.0e-12);
            assert_relative_eq!(q.y, rotation.y, epsilon = 1.0e-12);
            assert_relative_eq!(q.z, rotation.z, epsilon = 1.0e-12);
            assert_relative_eq!(q.w, rotation.w, epsilon = 1.0e-12);
        }
        other => panic!("unexpected layout: {other:?}"),
    }
    match bridge.poll_output("jib_frame").expect("poll") {
        SignalValue::Pose {
            position: out_position,
            rotation: out_rotation,
        } => {
            assert_relative_eq!(out_position.x, position.x);
            assert_relative_eq!(out_rotation.w, rotation.w, epsilon = 1.0e-12);
        }
        other => panic!("unexpected layout: {other:?}"),
    }
}

#[test]
fn test_constraint_outputs_follow_engine_state() {
    let (mut simulation, imported, mut bridge) = start_session(CRANE);
    let tower = body_handle(&imported.scene, "crane.tower");
    {
        let body = simulation.world_mut().body_mut(tower).expect("live");
        body.pose.rotation = DQuat::from_rotation_z(0.3);
        body.angular_velocity = DVec3::new(0.0, 0.0, 1.5);
    }
    simulation.step_with(&mut [&mut bridge]);

    match bridge.poll_output("slew_angle").expect("poll") {
        SignalValue::Scalar(angle) => assert_relative_eq!(angle, 0.3, epsilon = 1.0e-12),
        other => panic!("unexpected layout: {other:?}"),
    }
    match bridge.poll_output("slew_rate").expect("poll") {
        SignalValue::Scalar(speed) => assert_relative_eq!(speed, 1.5, epsilon = 1.0e-12),
        other => panic!("unexpected layout: {other:?}"),
    }
}

#[test]
fn test_body_outputs_convert_back_to_the_model_frame() {
    let (mut simulation, imported, mut bridge) = start_session(CRANE);
    let jib = body_handle(&imported.scene, "crane.jib");
    {
        let body = simulation.world_mut().body_mut(jib).expect("live");
        body.velocity = DVec3::new(-1.0, 2.0, 3.0);
        body.angular_velocity = DVec3::new(-0.5, 0.25, 0.0);
    }
    simulation.step_with(&mut [&mut bridge]);

    assert_eq!(
        bridge.poll_output("jib_motion").expect("poll"),
        SignalValue::Vector(DVec3::new(1.0, 2.0, 3.0))
    );
    assert_eq!(
        bridge.poll_output("jib_spin").expect("poll"),
        SignalValue::Vector(DVec3::new(0.5, 0.25, 0.0))
    );
    assert_eq!(
        bridge.poll_output("jib_position").expect("poll"),
        SignalValue::Vector(DVec3::new(2.0, 3.0, 0.0))
    );
}

#[test]
fn test_wire_buffers_cross_the_bridge() {
    let (mut simulation, _imported, mut bridge) = start_session(CRANE);
    bridge
        .raise_input_wire("jib_velocity", &[1.0, 2.0, 3.0])
        .expect("raise");
    simulation.step_with(&mut [&mut bridge]);

    let mut wire = Vec::new();
    bridge
        .poll_output_wire("jib_motion", &mut wire)
        .expect("poll");
    assert_eq!(wire, vec![1.0, 2.0, 3.0]);

    wire.clear();
    bridge
        .poll_output_wire("slew_angle", &mut wire)
        .expect("poll");
    assert_eq!(wire.len(), 1);

    let err = bridge.raise_input_wire("jib_pose", &[1.0, 2.0]).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Model(ModelError::WireShape { expected: 7, got: 2 })
    ));
}

#[test]
fn test_destroyed_objects_skip_without_aborting_the_step() {
    let (mut simulation, imported, mut bridge) = start_session(CRANE);
    simulation.step_with(&mut [&mut bridge]);
    assert_eq!(
        bridge.poll_output("jib_position").expect("poll"),
        SignalValue::Vector(DVec3::new(2.0, 3.0, 0.0))
    );

    let jib = body_handle(&imported.scene, "crane.jib");
    let slew = constraint_handle(&imported.scene, "crane.slew");
    simulation.world_mut().destroy_constraint(slew);
    simulation.world_mut().destroy_body(jib);

    bridge
        .raise_input("jib_velocity", SignalValue::Vector(DVec3::ONE))
        .expect("raise");
    bridge
        .raise_input("slew_speed", SignalValue::Scalar(2.0))
        .expect("raise");
    simulation.step_with(&mut [&mut bridge]);

    // the last refreshed values survive the staleness
    assert_eq!(
        bridge.poll_output("jib_position").expect("poll"),
        SignalValue::Vector(DVec3::new(2.0, 3.0, 0.0))
    );
}
