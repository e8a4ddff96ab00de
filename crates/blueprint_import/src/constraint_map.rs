//! Main-interaction mapping onto constraint rows
//!
//! A connector's main interaction authors per-DOF stiffness and damping.
//! The engine speaks compliance (1/stiffness) and a relaxation time
//! (damping/stiffness), so both writes divide by the stiffness, and a
//! compliance write rescales the row's current damping so its relaxation
//! time survives the stiffness change.

use blueprint_model::defaults;
use blueprint_model::graph::MainInteraction;
use blueprint_sim::constraint::{Constraint, ConstraintKind, Dof};

/// The rows a joint kind constrains, in mapping order: translational
/// before rotational, the joint's free axes left out.
pub fn constrained_dofs(kind: ConstraintKind) -> &'static [Dof] {
    use Dof::*;
    match kind {
        ConstraintKind::Lock => &Dof::ALL,
        ConstraintKind::Hinge => &[
            TranslationalX,
            TranslationalY,
            TranslationalZ,
            RotationalX,
            RotationalY,
        ],
        ConstraintKind::Prismatic => &[
            TranslationalX,
            TranslationalY,
            RotationalX,
            RotationalY,
            RotationalZ,
        ],
        ConstraintKind::Cylindrical => {
            &[TranslationalX, TranslationalY, RotationalX, RotationalY]
        }
        ConstraintKind::Ball => &[TranslationalX, TranslationalY, TranslationalZ],
        // Springs keep all rows free; their values land on the lock
        // controller instead.
        ConstraintKind::Distance => &[],
    }
}

/// Write a main interaction onto the rows of `constraint`.
///
/// With `force` every constrained row is written whether authored or
/// not; without it only authored values land and engine-side edits to
/// the rest survive.
pub fn apply_main_interaction(constraint: &mut Constraint, main: &MainInteraction, force: bool) {
    if constraint.kind == ConstraintKind::Distance {
        apply_spring(constraint, main);
        return;
    }
    let stiffness = main.stiffness.values();
    let damping = main.damping.values();
    for &dof in constrained_dofs(constraint.kind) {
        if defaults::should_write(force, stiffness[dof.index()]) {
            let value = defaults::resolve(stiffness[dof.index()], defaults::STIFFNESS);
            constraint.set_compliance(dof, 1.0 / value);
            let rescaled = constraint.damping(dof) / value;
            constraint.set_damping(dof, rescaled);
        }
    }
    for &dof in constrained_dofs(constraint.kind) {
        if defaults::should_write(force, damping[dof.index()]) {
            let value = defaults::resolve(damping[dof.index()], defaults::DAMPING);
            let compliance = constraint.compliance(dof);
            constraint.set_damping(dof, value * compliance);
        }
    }
}

/// Spring stiffness and damping drive the distance joint's lock
/// controller along the tangent axis, defaults filled in either way.
fn apply_spring(constraint: &mut Constraint, main: &MainInteraction) {
    let stiffness = defaults::resolve(main.stiffness.along_tangent, defaults::STIFFNESS);
    let damping = defaults::resolve(main.damping.along_tangent, defaults::DAMPING);
    let Some(axis) = constraint.kind.primary_axis() else {
        return;
    };
    let Some(block) = constraint.controllers_mut(axis) else {
        return;
    };
    block.lock.base.compliance = 1.0 / stiffness;
    block.lock.base.damping = damping / stiffness;
}
