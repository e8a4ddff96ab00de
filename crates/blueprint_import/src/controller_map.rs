//! Auxiliary-interaction mapping onto controller slots
//!
//! Each 1D interaction addresses one controller of one slot: its axis
//! variant picks the slot explicitly, otherwise the joint's primary slot
//! is used. Slot or kind mismatches are logged and skipped so one odd
//! interaction never aborts an import.

use blueprint_model::defaults;
use blueprint_model::graph::{AxisVariant, Interaction, InteractionKind};
use blueprint_sim::constraint::{Constraint, ConstraintKind, ControllerAxis, ControllerBase};
use log::warn;

/// Controller slot an interaction addresses: its explicit axis variant,
/// or the joint's primary slot when it names none.
pub fn slot_for(kind: ConstraintKind, axis: Option<AxisVariant>) -> Option<ControllerAxis> {
    match axis {
        Some(AxisVariant::Translational) => Some(ControllerAxis::Translational),
        Some(AxisVariant::Rotational) => Some(ControllerAxis::Rotational),
        None => kind.primary_axis(),
    }
}

/// Shared controller fields, written in declaration order so the damping
/// write sees a compliance the same interaction may just have set.
fn write_base(base: &mut ControllerBase, interaction: &Interaction, force: bool) {
    if defaults::should_write(force, interaction.enabled) {
        base.enabled = defaults::resolve(interaction.enabled, defaults::ENABLED);
    }
    if defaults::should_write(force, interaction.stiffness) {
        base.compliance = 1.0 / defaults::resolve(interaction.stiffness, defaults::STIFFNESS);
    }
    if defaults::should_write(force, interaction.damping) {
        base.damping = defaults::resolve(interaction.damping, defaults::DAMPING) * base.compliance;
    }
    if defaults::should_write(force, interaction.min_force) {
        base.min_force = defaults::resolve(interaction.min_force, defaults::MIN_FORCE);
    }
    if defaults::should_write(force, interaction.max_force) {
        base.max_force = defaults::resolve(interaction.max_force, defaults::MAX_FORCE);
    }
}

/// Copy one auxiliary interaction onto its controller.
///
/// `force` has the same meaning as for the row mapper: write untouched
/// fields too, or leave engine-side edits alone.
pub fn apply_interaction(constraint: &mut Constraint, interaction: &Interaction, force: bool) {
    if matches!(interaction.kind, InteractionKind::Unknown) {
        warn!(
            "skipping interaction {:?} on {:?}: unrecognized kind",
            interaction.name, constraint.name
        );
        return;
    }
    let Some(axis) = slot_for(constraint.kind, interaction.axis) else {
        warn!(
            "skipping interaction {:?}: {:?} has no primary controller slot",
            interaction.name, constraint.name
        );
        return;
    };
    if constraint.controllers(axis).is_none() {
        warn!(
            "skipping interaction {:?}: {:?} has no {axis:?} controllers",
            interaction.name, constraint.name
        );
        return;
    }
    let rotational = axis == ControllerAxis::Rotational;
    let Some(block) = constraint.controllers_mut(axis) else {
        return;
    };
    match &interaction.kind {
        InteractionKind::Motor {
            speed,
            lock_at_zero_speed,
        } => {
            write_base(&mut block.target_speed.base, interaction, force);
            if defaults::should_write(force, *speed) {
                block.target_speed.speed = defaults::resolve(*speed, defaults::SPEED);
            }
            if defaults::should_write(force, *lock_at_zero_speed) {
                block.target_speed.lock_at_zero_speed =
                    defaults::resolve(*lock_at_zero_speed, defaults::LOCK_AT_ZERO_SPEED);
            }
        }
        InteractionKind::Lock => {
            // The lock target is runtime-driven; only the base fields map.
            write_base(&mut block.lock.base, interaction, force);
        }
        InteractionKind::Range { min, max } => {
            write_base(&mut block.range.base, interaction, force);
            if defaults::should_write(force, *min) {
                let value = defaults::resolve(*min, defaults::RANGE_MIN);
                block.range.min = if rotational { value.to_radians() } else { value };
            }
            if defaults::should_write(force, *max) {
                let value = defaults::resolve(*max, defaults::RANGE_MAX);
                block.range.max = if rotational { value.to_radians() } else { value };
            }
        }
        InteractionKind::Friction { coefficient } => {
            write_base(&mut block.friction.base, interaction, force);
            if defaults::should_write(force, *coefficient) {
                block.friction.coefficient =
                    defaults::resolve(*coefficient, defaults::FRICTION_COEFFICIENT);
            }
        }
        InteractionKind::Unknown => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use blueprint_sim::body::BodyDesc;
    use blueprint_sim::constraint::{ConstraintDesc, ConstraintHandle, DEFAULT_COMPLIANCE};
    use blueprint_sim::world::SimWorld;
    use std::f64::consts::FRAC_PI_2;

    fn world_with_joint(kind: ConstraintKind) -> (SimWorld, ConstraintHandle) {
        let mut world = SimWorld::default();
        let a = world.create_body(BodyDesc::new("a"));
        let b = world.create_body(BodyDesc::new("b"));
        let handle = world
            .create_constraint(ConstraintDesc::new("j", kind, a).with_body2(b))
            .expect("create");
        (world, handle)
    }

    fn interaction(kind: InteractionKind) -> Interaction {
        Interaction {
            name: "aux".to_string(),
            axis: None,
            enabled: Some(true),
            stiffness: None,
            damping: None,
            min_force: None,
            max_force: None,
            kind,
            id: Default::default(),
        }
    }

    #[test]
    fn motor_lands_on_the_primary_slot() {
        let (mut world, handle) = world_with_joint(ConstraintKind::Hinge);
        let mut aux = interaction(InteractionKind::Motor {
            speed: Some(2.5),
            lock_at_zero_speed: Some(true),
        });
        aux.stiffness = Some(100.0);
        aux.damping = Some(5.0);

        let constraint = world.constraint_mut(handle).expect("live");
        apply_interaction(constraint, &aux, false);

        let block = constraint
            .controllers(ControllerAxis::Rotational)
            .expect("block");
        assert!(block.target_speed.base.enabled);
        assert_relative_eq!(block.target_speed.base.compliance, 0.01);
        // Damping multiplies the compliance the same write just set.
        assert_relative_eq!(block.target_speed.base.damping, 0.05);
        assert_relative_eq!(block.target_speed.speed, 2.5);
        assert!(block.target_speed.lock_at_zero_speed);
    }

    #[test]
    fn forced_write_fills_controller_defaults() {
        let (mut world, handle) = world_with_joint(ConstraintKind::Hinge);
        let mut aux = interaction(InteractionKind::Motor {
            speed: None,
            lock_at_zero_speed: None,
        });
        aux.enabled = None;

        let constraint = world.constraint_mut(handle).expect("live");
        apply_interaction(constraint, &aux, true);

        let block = constraint
            .controllers(ControllerAxis::Rotational)
            .expect("block");
        assert!(!block.target_speed.base.enabled);
        assert_relative_eq!(block.target_speed.base.compliance, 1.0e-8);
        assert_relative_eq!(block.target_speed.base.damping, 0.03);
        assert_eq!(block.target_speed.base.min_force, f64::NEG_INFINITY);
        assert_eq!(block.target_speed.base.max_force, f64::INFINITY);
        assert_relative_eq!(block.target_speed.speed, 0.0);
        assert!(!block.target_speed.lock_at_zero_speed);
    }

    #[test]
    fn rotational_range_converts_degrees_to_radians() {
        let (mut world, handle) = world_with_joint(ConstraintKind::Hinge);
        let aux = interaction(InteractionKind::Range {
            min: Some(-90.0),
            max: Some(90.0),
        });
        let constraint = world.constraint_mut(handle).expect("live");
        apply_interaction(constraint, &aux, false);

        let block = constraint
            .controllers(ControllerAxis::Rotational)
            .expect("block");
        assert_relative_eq!(block.range.min, -FRAC_PI_2);
        assert_relative_eq!(block.range.max, FRAC_PI_2);
    }

    #[test]
    fn translational_range_keeps_authored_units() {
        let (mut world, handle) = world_with_joint(ConstraintKind::Prismatic);
        let aux = interaction(InteractionKind::Range {
            min: Some(-0.5),
            max: Some(0.5),
        });
        let constraint = world.constraint_mut(handle).expect("live");
        apply_interaction(constraint, &aux, false);

        let block = constraint
            .controllers(ControllerAxis::Translational)
            .expect("block");
        assert_relative_eq!(block.range.min, -0.5);
        assert_relative_eq!(block.range.max, 0.5);
    }

    #[test]
    fn unbounded_rotational_range_stays_unbounded() {
        let (mut world, handle) = world_with_joint(ConstraintKind::Hinge);
        let aux = interaction(InteractionKind::Range {
            min: None,
            max: None,
        });
        let constraint = world.constraint_mut(handle).expect("live");
        apply_interaction(constraint, &aux, true);

        let block = constraint
            .controllers(ControllerAxis::Rotational)
            .expect("block");
        assert_eq!(block.range.min, f64::NEG_INFINITY);
        assert_eq!(block.range.max, f64::INFINITY);
    }

    #[test]
    fn explicit_axis_overrides_the_primary_slot() {
        let (mut world, handle) = world_with_joint(ConstraintKind::Cylindrical);
        let mut aux = interaction(InteractionKind::Friction {
            coefficient: Some(0.3),
        });
        aux.axis = Some(AxisVariant::Rotational);

        let constraint = world.constraint_mut(handle).expect("live");
        apply_interaction(constraint, &aux, false);

        let rotational = constraint
            .controllers(ControllerAxis::Rotational)
            .expect("block");
        assert_relative_eq!(rotational.friction.coefficient, 0.3);
        // Cylindrical joints default to the translational slot; it is
        // untouched here.
        let translational = constraint
            .controllers(ControllerAxis::Translational)
            .expect("block");
        assert!(!translational.friction.base.enabled);
    }

    #[test]
    fn missing_slot_is_skipped_without_panic() {
        let (mut world, handle) = world_with_joint(ConstraintKind::Hinge);
        let mut aux = interaction(InteractionKind::Motor {
            speed: Some(1.0),
            lock_at_zero_speed: None,
        });
        aux.axis = Some(AxisVariant::Translational);

        let constraint = world.constraint_mut(handle).expect("live");
        apply_interaction(constraint, &aux, true);

        // Hinges carry no translational slot; the rotational one is
        // untouched.
        let block = constraint
            .controllers(ControllerAxis::Rotational)
            .expect("block");
        assert!(!block.target_speed.base.enabled);
        assert_relative_eq!(block.target_speed.speed, 0.0);
    }

    #[test]
    fn slotless_joint_skips_primary_addressing() {
        let (mut world, handle) = world_with_joint(ConstraintKind::Ball);
        let aux = interaction(InteractionKind::Lock);
        let constraint = world.constraint_mut(handle).expect("live");
        apply_interaction(constraint, &aux, true);
        assert!(constraint.controllers(ControllerAxis::Rotational).is_none());
        assert!(constraint
            .controllers(ControllerAxis::Translational)
            .is_none());
    }

    #[test]
    fn unknown_kind_leaves_the_controller_untouched() {
        let (mut world, handle) = world_with_joint(ConstraintKind::Hinge);
        let aux = interaction(InteractionKind::Unknown);
        let constraint = world.constraint_mut(handle).expect("live");
        apply_interaction(constraint, &aux, true);

        let block = constraint
            .controllers(ControllerAxis::Rotational)
            .expect("block");
        assert!(!block.target_speed.base.enabled);
        assert_relative_eq!(block.target_speed.base.compliance, DEFAULT_COMPLIANCE);
    }
}
