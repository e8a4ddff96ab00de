//! Constraints, elementary rows and controllers
//!
//! A constraint joins one body to another body or to the world through
//! two attachment frames. Its six canonical rows carry per-DOF
//! compliance and damping; one or two controller blocks (translational,
//! rotational) expose the drivable secondary behavior: target speed,
//! lock, range and friction.

use crate::body::BodyHandle;
use crate::math::Isometry;
use crate::store::StoreKey;

/// Engine default row and controller compliance
pub const DEFAULT_COMPLIANCE: f64 = 1.0e-8;
/// Engine default row and controller damping, seconds
pub const DEFAULT_DAMPING: f64 = 1.0 / 30.0;

/// Handle to a constraint in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintHandle(pub(crate) StoreKey<Constraint>);

/// Canonical degrees of freedom of a constraint, expressed in the first
/// attachment frame. The frame's Z axis is the constraint axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dof {
    TranslationalX,
    TranslationalY,
    TranslationalZ,
    RotationalX,
    RotationalY,
    RotationalZ,
}

impl Dof {
    pub const ALL: [Dof; 6] = [
        Dof::TranslationalX,
        Dof::TranslationalY,
        Dof::TranslationalZ,
        Dof::RotationalX,
        Dof::RotationalY,
        Dof::RotationalZ,
    ];

    pub fn index(self) -> usize {
        match self {
            Dof::TranslationalX => 0,
            Dof::TranslationalY => 1,
            Dof::TranslationalZ => 2,
            Dof::RotationalX => 3,
            Dof::RotationalY => 4,
            Dof::RotationalZ => 5,
        }
    }

    pub fn is_rotational(self) -> bool {
        matches!(self, Dof::RotationalX | Dof::RotationalY | Dof::RotationalZ)
    }
}

/// Which controller block a caller addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerAxis {
    Translational,
    Rotational,
}

/// One elementary constraint row
#[derive(Debug, Clone, Copy)]
pub struct ConstraintRow {
    pub compliance: f64,
    pub damping: f64,
}

impl Default for ConstraintRow {
    fn default() -> Self {
        Self {
            compliance: DEFAULT_COMPLIANCE,
            damping: DEFAULT_DAMPING,
        }
    }
}

/// Fields shared by every controller
#[derive(Debug, Clone, Copy)]
pub struct ControllerBase {
    pub enabled: bool,
    pub compliance: f64,
    pub damping: f64,
    pub min_force: f64,
    pub max_force: f64,
}

impl Default for ControllerBase {
    fn default() -> Self {
        Self {
            enabled: false,
            compliance: DEFAULT_COMPLIANCE,
            damping: DEFAULT_DAMPING,
            min_force: f64::NEG_INFINITY,
            max_force: f64::INFINITY,
        }
    }
}

/// Drives the constraint axis at a target speed
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetSpeedController {
    pub base: ControllerBase,
    pub speed: f64,
    pub lock_at_zero_speed: bool,
}

/// Holds the constraint axis at a position
#[derive(Debug, Clone, Copy, Default)]
pub struct LockController {
    pub base: ControllerBase,
    pub position: f64,
}

/// Limits the constraint axis to a range
#[derive(Debug, Clone, Copy)]
pub struct RangeController {
    pub base: ControllerBase,
    /// Radians for rotational axes
    pub min: f64,
    pub max: f64,
}

impl Default for RangeController {
    fn default() -> Self {
        Self {
            base: ControllerBase::default(),
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }
}

/// Dry friction along the constraint axis
#[derive(Debug, Clone, Copy)]
pub struct FrictionController {
    pub base: ControllerBase,
    pub coefficient: f64,
}

impl Default for FrictionController {
    fn default() -> Self {
        Self {
            base: ControllerBase::default(),
            coefficient: 0.5,
        }
    }
}

/// The four controllers of one constraint axis
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerBlock {
    pub target_speed: TargetSpeedController,
    pub lock: LockController,
    pub range: RangeController,
    pub friction: FrictionController,
}

/// Constraint kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// One free rotation around the axis
    Hinge,
    /// One free translation along the axis
    Prismatic,
    /// All six DOFs constrained
    Lock,
    /// Rotations free, translations constrained
    Ball,
    /// Spring-like distance link along the axis
    Distance,
    /// Free translation and rotation along/around the axis
    Cylindrical,
}

impl ConstraintKind {
    /// Does this kind carry a translational controller block?
    pub fn has_translational_controllers(self) -> bool {
        matches!(
            self,
            ConstraintKind::Prismatic | ConstraintKind::Distance | ConstraintKind::Cylindrical
        )
    }

    /// Does this kind carry a rotational controller block?
    pub fn has_rotational_controllers(self) -> bool {
        matches!(self, ConstraintKind::Hinge | ConstraintKind::Cylindrical)
    }

    /// Block addressed when a caller names no axis. `None` for kinds
    /// without controllers.
    pub fn primary_axis(self) -> Option<ControllerAxis> {
        match self {
            ConstraintKind::Hinge => Some(ControllerAxis::Rotational),
            ConstraintKind::Prismatic | ConstraintKind::Distance | ConstraintKind::Cylindrical => {
                Some(ControllerAxis::Translational)
            }
            ConstraintKind::Lock | ConstraintKind::Ball => None,
        }
    }
}

/// A constraint between a body and another body or the world
#[derive(Debug, Clone)]
pub struct Constraint {
    pub name: String,
    pub kind: ConstraintKind,
    pub body1: BodyHandle,
    pub body2: Option<BodyHandle>,
    /// Attachment frame in body1's local frame
    pub frame1: Isometry,
    /// Attachment frame in body2's local frame, or a world pose when
    /// unattached
    pub frame2: Isometry,
    rows: [ConstraintRow; 6],
    translational: Option<ControllerBlock>,
    rotational: Option<ControllerBlock>,
}

impl Constraint {
    pub(crate) fn new(
        name: String,
        kind: ConstraintKind,
        body1: BodyHandle,
        body2: Option<BodyHandle>,
        frame1: Isometry,
        frame2: Isometry,
    ) -> Self {
        Self {
            name,
            kind,
            body1,
            body2,
            frame1,
            frame2,
            rows: [ConstraintRow::default(); 6],
            translational: kind
                .has_translational_controllers()
                .then(ControllerBlock::default),
            rotational: kind
                .has_rotational_controllers()
                .then(ControllerBlock::default),
        }
    }

    pub fn compliance(&self, dof: Dof) -> f64 {
        self.rows[dof.index()].compliance
    }

    pub fn set_compliance(&mut self, dof: Dof, value: f64) {
        self.rows[dof.index()].compliance = value;
    }

    pub fn damping(&self, dof: Dof) -> f64 {
        self.rows[dof.index()].damping
    }

    pub fn set_damping(&mut self, dof: Dof, value: f64) {
        self.rows[dof.index()].damping = value;
    }

    /// Controller block for an axis, `None` when the kind has none.
    pub fn controllers(&self, axis: ControllerAxis) -> Option<&ControllerBlock> {
        match axis {
            ControllerAxis::Translational => self.translational.as_ref(),
            ControllerAxis::Rotational => self.rotational.as_ref(),
        }
    }

    pub fn controllers_mut(&mut self, axis: ControllerAxis) -> Option<&mut ControllerBlock> {
        match axis {
            ControllerAxis::Translational => self.translational.as_mut(),
            ControllerAxis::Rotational => self.rotational.as_mut(),
        }
    }
}

/// Description for creating a constraint. Frames are world poses; the
/// world converts them to body-local frames at creation.
#[derive(Debug, Clone)]
pub struct ConstraintDesc {
    pub name: String,
    pub kind: ConstraintKind,
    pub body1: BodyHandle,
    pub body2: Option<BodyHandle>,
    pub frame1: Isometry,
    pub frame2: Isometry,
}

impl ConstraintDesc {
    pub fn new(name: impl Into<String>, kind: ConstraintKind, body1: BodyHandle) -> Self {
        Self {
            name: name.into(),
            kind,
            body1,
            body2: None,
            frame1: Isometry::IDENTITY,
            frame2: Isometry::IDENTITY,
        }
    }

    pub fn with_body2(mut self, body2: BodyHandle) -> Self {
        self.body2 = Some(body2);
        self
    }

    pub fn with_frames(mut self, frame1: Isometry, frame2: Isometry) -> Self {
        self.frame1 = frame1;
        self.frame2 = frame2;
        self
    }
}
