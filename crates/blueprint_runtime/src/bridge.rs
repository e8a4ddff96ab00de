//! The runtime synchronization session
//!
//! A session never trusts import-time lookups: it re-parses the model
//! from its source and pairs the scene's recorded paths with the fresh
//! tree. Paths that no longer resolve, or resolve to a different type,
//! are skipped with a warning so one stale entry never blocks the rest.
//! Bound signals then flow through the step loop: inputs raised since
//! the last step are pushed into the engine before the solve, outputs
//! are refreshed from finalized state after it.

use std::collections::HashMap;
use std::mem;

use blueprint_import::controller_map::slot_for;
use blueprint_import::scene::{Scene, SceneObject, SceneTarget};
use blueprint_model::graph::{
    AxisVariant, Component, Connector, InteractionId, InteractionKind, NodeId, Resolved,
    SignalTarget, CONNECTOR_TAG,
};
use blueprint_model::loader::{LoaderConfig, ModelSource};
use blueprint_model::signals::{InputKind, OutputKind, SignalLayout, SignalValue};
use blueprint_sim::body::{BodyHandle, RigidBody};
use blueprint_sim::constraint::{ConstraintHandle, ControllerBlock};
use blueprint_sim::convert::{convert_isometry, convert_quat, convert_vector};
use blueprint_sim::math::Isometry;
use blueprint_sim::simulation::StepListener;
use blueprint_sim::world::SimWorld;
use log::{error, warn};

use crate::error::{Result, RuntimeError};

/// Engine destination of one bound signal
#[derive(Debug, Clone, Copy)]
enum SignalRoute {
    /// A rigid body
    Body(BodyHandle),
    /// A constraint, addressed through the controller slot the authored
    /// interaction names, or the constraint's primary slot when `axis`
    /// is `None`
    Interaction {
        constraint: ConstraintHandle,
        axis: Option<AxisVariant>,
    },
}

#[derive(Debug, Clone, Copy)]
struct InputBinding {
    kind: InputKind,
    layout: SignalLayout,
    route: SignalRoute,
}

#[derive(Debug, Clone, Copy)]
struct OutputBinding {
    kind: OutputKind,
    route: SignalRoute,
    /// Last refreshed value; layout-neutral until the first step
    value: SignalValue,
}

/// A live synchronization session between a model source and an
/// imported scene.
///
/// [`Bridge::start`] re-parses the model and resolves every
/// synchronized scene path against the fresh tree, so the only state
/// carried over from import time is the scene's paths and type tags.
/// The session implements [`StepListener`]; register it on the step
/// loop to have raised inputs applied before each solve and outputs
/// refreshed after it.
pub struct Bridge {
    bodies: HashMap<NodeId, BodyHandle>,
    interactions: HashMap<InteractionId, ConstraintHandle>,
    inputs: HashMap<String, InputBinding>,
    outputs: HashMap<String, OutputBinding>,
    /// Inputs raised since the last step, one value per name
    raised: HashMap<String, SignalValue>,
}

impl Bridge {
    /// Start a session: re-parse the named model from `source` and bind
    /// every synchronized scene object and declared signal against the
    /// fresh tree.
    ///
    /// Only a model that fails to load is an error. Stale paths, type
    /// changes and unresolvable signal targets are logged and skipped,
    /// and the session starts with the bindings that remain.
    pub fn start(
        source: &ModelSource,
        model_name: &str,
        config: &LoaderConfig,
        scene: &Scene,
    ) -> Result<Self> {
        let component = source.load(model_name, config)?;
        let mut bridge = Self {
            bodies: HashMap::new(),
            interactions: HashMap::new(),
            inputs: HashMap::new(),
            outputs: HashMap::new(),
            raised: HashMap::new(),
        };
        for object in scene.synchronized() {
            bridge.bind_object(&component, object);
        }
        bridge.bind_signals(&component);
        Ok(bridge)
    }

    /// Number of body bindings established at start.
    pub fn bound_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// Number of interaction bindings established at start.
    pub fn bound_interactions(&self) -> usize {
        self.interactions.len()
    }

    /// Names of the inputs that bound, in no particular order.
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.keys().map(String::as_str)
    }

    /// Names of the outputs that bound, in no particular order.
    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.outputs.keys().map(String::as_str)
    }

    /// Raise an input value for the next step. Raising the same input
    /// again before the step replaces the value.
    pub fn raise_input(&mut self, name: &str, value: SignalValue) -> Result<()> {
        let binding = self
            .inputs
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownInput(name.to_string()))?;
        if value.layout() != binding.layout {
            return Err(RuntimeError::SignalShape {
                name: name.to_string(),
                expected: binding.layout,
                got: value.layout(),
            });
        }
        self.raised.insert(name.to_string(), value);
        Ok(())
    }

    /// Decode a wire buffer against the input's declared layout and
    /// raise the value.
    pub fn raise_input_wire(&mut self, name: &str, data: &[f64]) -> Result<()> {
        let layout = self
            .inputs
            .get(name)
            .map(|binding| binding.layout)
            .ok_or_else(|| RuntimeError::UnknownInput(name.to_string()))?;
        let value = SignalValue::read_wire(layout, data)?;
        self.raise_input(name, value)
    }

    /// Last refreshed value of an output, layout-neutral before the
    /// first step.
    pub fn poll_output(&self, name: &str) -> Result<SignalValue> {
        self.outputs
            .get(name)
            .map(|binding| binding.value)
            .ok_or_else(|| RuntimeError::UnknownOutput(name.to_string()))
    }

    /// Append an output's last refreshed value to a wire buffer.
    pub fn poll_output_wire(&self, name: &str, out: &mut Vec<f64>) -> Result<()> {
        self.poll_output(name)?.append_wire(out);
        Ok(())
    }

    fn bind_object(&mut self, component: &Component, object: &SceneObject) {
        let Some(resolved) = component.resolve(&object.path) else {
            warn!(
                "scene object {:?} no longer resolves in the model; skipping",
                object.path
            );
            return;
        };
        let fresh_tag = match resolved {
            Resolved::Node(node) => node.kind.type_tag(),
            Resolved::Connector(_) => CONNECTOR_TAG,
        };
        if fresh_tag != object.type_tag {
            warn!(
                "scene object {:?} changed type from {:?} to {:?}; skipping",
                object.path, object.type_tag, fresh_tag
            );
            return;
        }
        match (object.target, resolved) {
            (SceneTarget::Body(handle), Resolved::Node(node)) => {
                self.bodies.insert(node.id, handle);
            }
            (SceneTarget::Constraint(handle), Resolved::Connector(connector)) => {
                self.bind_connector(connector, handle, &object.path);
            }
            // groups, shapes and visuals carry no runtime signals
            _ => {}
        }
    }

    /// The main interaction and every recognized auxiliary interaction
    /// all bind to the one constraint the connector became.
    fn bind_connector(&mut self, connector: &Connector, handle: ConstraintHandle, path: &str) {
        self.interactions
            .insert(connector.main_interaction.id, handle);
        for interaction in &connector.interactions {
            if matches!(interaction.kind, InteractionKind::Unknown) {
                error!(
                    "interaction {:?} on {:?} is neither a main interaction nor a recognized controller; skipping",
                    interaction.name, path
                );
                continue;
            }
            self.interactions.insert(interaction.id, handle);
        }
    }

    fn bind_signals(&mut self, component: &Component) {
        for def in component.inputs() {
            let Some(layout) = def.kind.layout() else {
                warn!("input {:?} has an unrecognized kind; skipping", def.name);
                continue;
            };
            let Some(route) = self.resolve_route(component, &def.name, &def.target) else {
                continue;
            };
            if !input_route_fits(def.kind, route) {
                warn!("input {:?} cannot drive {:?}; skipping", def.name, def.target);
                continue;
            }
            self.inputs.insert(
                def.name.clone(),
                InputBinding {
                    kind: def.kind,
                    layout,
                    route,
                },
            );
        }
        for def in component.outputs() {
            let Some(layout) = def.kind.layout() else {
                warn!("output {:?} has an unrecognized kind; skipping", def.name);
                continue;
            };
            let Some(route) = self.resolve_route(component, &def.name, &def.target) else {
                continue;
            };
            if !output_route_fits(def.kind, route) {
                warn!(
                    "output {:?} cannot observe {:?}; skipping",
                    def.name, def.target
                );
                continue;
            }
            self.outputs.insert(
                def.name.clone(),
                OutputBinding {
                    kind: def.kind,
                    route,
                    value: SignalValue::zero(layout),
                },
            );
        }
    }

    /// Resolve a signal target path to its engine destination. `None`
    /// logs the reason and leaves the signal unbound.
    fn resolve_route(
        &self,
        component: &Component,
        signal: &str,
        target: &str,
    ) -> Option<SignalRoute> {
        let Some(resolved) = component.resolve_signal_target(target) else {
            warn!(
                "signal {:?} targets unknown path {:?}; skipping",
                signal, target
            );
            return None;
        };
        let route = match resolved {
            SignalTarget::Body(node) => self.bodies.get(&node.id).copied().map(SignalRoute::Body),
            SignalTarget::MainInteraction(connector) => self
                .interactions
                .get(&connector.main_interaction.id)
                .copied()
                .map(|constraint| SignalRoute::Interaction {
                    constraint,
                    axis: None,
                }),
            SignalTarget::Interaction(_, interaction) => self
                .interactions
                .get(&interaction.id)
                .copied()
                .map(|constraint| SignalRoute::Interaction {
                    constraint,
                    axis: interaction.axis,
                }),
        };
        if route.is_none() {
            warn!(
                "signal {:?} targets {:?}, which has no engine binding; skipping",
                signal, target
            );
        }
        route
    }
}

impl StepListener for Bridge {
    fn pre_step(&mut self, world: &mut SimWorld) {
        for (name, value) in mem::take(&mut self.raised) {
            let Some(binding) = self.inputs.get(&name) else {
                continue;
            };
            apply_input(world, &name, binding, value);
        }
    }

    fn post_step(&mut self, world: &mut SimWorld) {
        for (name, binding) in self.outputs.iter_mut() {
            if let Some(value) = read_output(world, name, binding) {
                binding.value = value;
            }
        }
    }
}

fn input_route_fits(kind: InputKind, route: SignalRoute) -> bool {
    match kind {
        InputKind::MotorSpeed | InputKind::LockPosition => {
            matches!(route, SignalRoute::Interaction { .. })
        }
        InputKind::BodyVelocity | InputKind::BodyPose => matches!(route, SignalRoute::Body(_)),
        InputKind::Unknown => false,
    }
}

fn output_route_fits(kind: OutputKind, route: SignalRoute) -> bool {
    match kind {
        OutputKind::Angle | OutputKind::Speed => matches!(route, SignalRoute::Interaction { .. }),
        OutputKind::BodyPosition
        | OutputKind::BodyRotation
        | OutputKind::BodyPose
        | OutputKind::BodyVelocity
        | OutputKind::BodyAngularVelocity => matches!(route, SignalRoute::Body(_)),
        OutputKind::Unknown => false,
    }
}

/// Push one raised input into the engine. Stale handles and missing
/// controller slots log and skip; a raised input never aborts the step.
fn apply_input(world: &mut SimWorld, name: &str, binding: &InputBinding, value: SignalValue) {
    match (binding.kind, binding.route, value) {
        (
            InputKind::MotorSpeed,
            SignalRoute::Interaction { constraint, axis },
            SignalValue::Scalar(speed),
        ) => {
            if let Some(block) = controller_block(world, name, constraint, axis) {
                block.target_speed.speed = speed;
            }
        }
        (
            InputKind::LockPosition,
            SignalRoute::Interaction { constraint, axis },
            SignalValue::Scalar(position),
        ) => {
            if let Some(block) = controller_block(world, name, constraint, axis) {
                block.lock.position = position;
            }
        }
        (InputKind::BodyVelocity, SignalRoute::Body(handle), SignalValue::Vector(velocity)) => {
            if let Some(body) = input_body(world, name, handle) {
                body.velocity = convert_vector(velocity);
            }
        }
        (
            InputKind::BodyPose,
            SignalRoute::Body(handle),
            SignalValue::Pose { position, rotation },
        ) => {
            if let Some(body) = input_body(world, name, handle) {
                body.pose = convert_isometry(Isometry::new(position, rotation));
            }
        }
        // other combinations are rejected when binding and raising
        _ => {}
    }
}

fn input_body<'a>(
    world: &'a mut SimWorld,
    name: &str,
    handle: BodyHandle,
) -> Option<&'a mut RigidBody> {
    let body = world.body_mut(handle);
    if body.is_none() {
        warn!("input {:?} drives a body that no longer exists; skipping", name);
    }
    body
}

/// Controller block a bound interaction input addresses, with the
/// stale-handle and missing-slot paths logged.
fn controller_block<'a>(
    world: &'a mut SimWorld,
    name: &str,
    handle: ConstraintHandle,
    axis: Option<AxisVariant>,
) -> Option<&'a mut ControllerBlock> {
    let Some(constraint) = world.constraint_mut(handle) else {
        warn!(
            "input {:?} drives a constraint that no longer exists; skipping",
            name
        );
        return None;
    };
    let Some(slot) = slot_for(constraint.kind, axis) else {
        warn!(
            "input {:?} drives {:?}, which has no primary controller slot; skipping",
            name, constraint.name
        );
        return None;
    };
    if constraint.controllers(slot).is_none() {
        warn!(
            "input {:?} addresses the {:?} controllers of {:?}, which has none; skipping",
            name, slot, constraint.name
        );
        return None;
    }
    constraint.controllers_mut(slot)
}

/// Read one bound output from finalized engine state, converting
/// vector, rotation and pose payloads back into the model's frame.
/// `None` leaves the previous value in place.
fn read_output(world: &SimWorld, name: &str, binding: &OutputBinding) -> Option<SignalValue> {
    match (binding.kind, binding.route) {
        (OutputKind::Angle, SignalRoute::Interaction { constraint, .. }) => {
            match world.constraint_angle(constraint) {
                Ok(angle) => Some(SignalValue::Scalar(angle)),
                Err(err) => {
                    warn!("output {:?} failed to read: {err}; skipping", name);
                    None
                }
            }
        }
        (OutputKind::Speed, SignalRoute::Interaction { constraint, .. }) => {
            match world.constraint_speed(constraint) {
                Ok(speed) => Some(SignalValue::Scalar(speed)),
                Err(err) => {
                    warn!("output {:?} failed to read: {err}; skipping", name);
                    None
                }
            }
        }
        (kind, SignalRoute::Body(handle)) => {
            let Some(body) = world.body(handle) else {
                warn!(
                    "output {:?} observes a body that no longer exists; skipping",
                    name
                );
                return None;
            };
            match kind {
                OutputKind::BodyPosition => {
                    Some(SignalValue::Vector(convert_vector(body.pose.position)))
                }
                OutputKind::BodyRotation => {
                    Some(SignalValue::Quaternion(convert_quat(body.pose.rotation)))
                }
                OutputKind::BodyPose => {
                    let pose = convert_isometry(body.pose);
                    Some(SignalValue::Pose {
                        position: pose.position,
                        rotation: pose.rotation,
                    })
                }
                OutputKind::BodyVelocity => {
                    Some(SignalValue::Vector(convert_vector(body.velocity)))
                }
                OutputKind::BodyAngularVelocity => {
                    Some(SignalValue::Vector(convert_vector(body.angular_velocity)))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_model::error::ModelError;
    use blueprint_sim::body::BodyDesc;
    use blueprint_sim::constraint::{ConstraintDesc, ConstraintKind};
    use glam::DVec3;

    fn hand_built_bridge() -> Bridge {
        let mut world = SimWorld::default();
        let body = world.create_body(BodyDesc::new("b"));
        let constraint = world
            .create_constraint(ConstraintDesc::new("c", ConstraintKind::Hinge, body))
            .expect("constraint");
        let mut bridge = Bridge {
            bodies: HashMap::new(),
            interactions: HashMap::new(),
            inputs: HashMap::new(),
            outputs: HashMap::new(),
            raised: HashMap::new(),
        };
        bridge.inputs.insert(
            "velocity".into(),
            InputBinding {
                kind: InputKind::BodyVelocity,
                layout: SignalLayout::Vector,
                route: SignalRoute::Body(body),
            },
        );
        bridge.inputs.insert(
            "speed".into(),
            InputBinding {
                kind: InputKind::MotorSpeed,
                layout: SignalLayout::Scalar,
                route: SignalRoute::Interaction {
                    constraint,
                    axis: None,
                },
            },
        );
        bridge.outputs.insert(
            "position".into(),
            OutputBinding {
                kind: OutputKind::BodyPosition,
                route: SignalRoute::Body(body),
                value: SignalValue::zero(SignalLayout::Vector),
            },
        );
        bridge
    }

    #[test]
    fn raising_an_unbound_input_is_an_error() {
        let mut bridge = hand_built_bridge();
        let err = bridge
            .raise_input("missing", SignalValue::Scalar(1.0))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownInput(name) if name == "missing"));
    }

    #[test]
    fn raised_layout_must_match_the_declared_input() {
        let mut bridge = hand_built_bridge();
        let err = bridge
            .raise_input("velocity", SignalValue::Scalar(1.0))
            .unwrap_err();
        match err {
            RuntimeError::SignalShape {
                name,
                expected,
                got,
            } => {
                assert_eq!(name, "velocity");
                assert_eq!(expected, SignalLayout::Vector);
                assert_eq!(got, SignalLayout::Scalar);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn raising_again_replaces_the_pending_value() {
        let mut bridge = hand_built_bridge();
        bridge
            .raise_input("speed", SignalValue::Scalar(1.0))
            .expect("raise");
        bridge
            .raise_input("speed", SignalValue::Scalar(2.5))
            .expect("raise");
        assert_eq!(bridge.raised.len(), 1);
        assert_eq!(bridge.raised["speed"], SignalValue::Scalar(2.5));
    }

    #[test]
    fn wire_raise_decodes_against_the_declared_layout() {
        let mut bridge = hand_built_bridge();
        bridge
            .raise_input_wire("velocity", &[1.0, 2.0, 3.0])
            .expect("raise");
        assert_eq!(
            bridge.raised["velocity"],
            SignalValue::Vector(DVec3::new(1.0, 2.0, 3.0))
        );

        let err = bridge.raise_input_wire("velocity", &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Model(ModelError::WireShape { expected: 3, got: 1 })
        ));
    }

    #[test]
    fn outputs_poll_neutral_before_the_first_refresh() {
        let bridge = hand_built_bridge();
        assert_eq!(
            bridge.poll_output("position").expect("poll"),
            SignalValue::Vector(DVec3::ZERO)
        );
        let err = bridge.poll_output("missing").unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownOutput(name) if name == "missing"));
    }
}
