//! Signal declarations and wire values
//!
//! Inputs push authored values into live engine state before a step,
//! outputs pull engine state back out after it. Values cross process
//! boundaries as flat `f64` wire buffers with a fixed per-layout width.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Input signal declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputDef {
    pub name: String,
    /// Root-relative path of the driven body or interaction
    pub target: String,
    #[serde(flatten)]
    pub kind: InputKind,
}

/// What an input drives. `Unknown` kinds are skipped with a warning at
/// runtime, never treated as load errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputKind {
    /// Target speed of a motor interaction
    MotorSpeed,
    /// Commanded position of a lock interaction
    LockPosition,
    /// Linear velocity of a body
    BodyVelocity,
    /// Full pose of a body
    BodyPose,
    #[serde(other)]
    Unknown,
}

impl InputKind {
    /// Wire layout of this input, `None` for unrecognized kinds.
    pub fn layout(self) -> Option<SignalLayout> {
        match self {
            InputKind::MotorSpeed | InputKind::LockPosition => Some(SignalLayout::Scalar),
            InputKind::BodyVelocity => Some(SignalLayout::Vector),
            InputKind::BodyPose => Some(SignalLayout::Pose),
            InputKind::Unknown => None,
        }
    }
}

/// Output signal declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputDef {
    pub name: String,
    /// Root-relative path of the observed body or interaction
    pub target: String,
    #[serde(flatten)]
    pub kind: OutputKind,
}

/// What an output observes. `Unknown` kinds are skipped with a warning at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputKind {
    /// Current angle of a rotational interaction, radians
    Angle,
    /// Current speed along or around an interaction's axis
    Speed,
    BodyPosition,
    BodyRotation,
    BodyPose,
    BodyVelocity,
    BodyAngularVelocity,
    #[serde(other)]
    Unknown,
}

impl OutputKind {
    /// Wire layout of this output, `None` for unrecognized kinds.
    pub fn layout(self) -> Option<SignalLayout> {
        match self {
            OutputKind::Angle | OutputKind::Speed => Some(SignalLayout::Scalar),
            OutputKind::BodyPosition
            | OutputKind::BodyVelocity
            | OutputKind::BodyAngularVelocity => Some(SignalLayout::Vector),
            OutputKind::BodyRotation => Some(SignalLayout::Quaternion),
            OutputKind::BodyPose => Some(SignalLayout::Pose),
            OutputKind::Unknown => None,
        }
    }
}

/// Shape of a signal on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalLayout {
    Scalar,
    Vector,
    Quaternion,
    Pose,
}

impl SignalLayout {
    /// Number of `f64` fields this layout occupies on the wire.
    pub fn width(self) -> usize {
        match self {
            SignalLayout::Scalar => 1,
            SignalLayout::Vector => 3,
            SignalLayout::Quaternion => 4,
            SignalLayout::Pose => 7,
        }
    }
}

/// A typed signal value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalValue {
    Scalar(f64),
    Vector(DVec3),
    Quaternion(DQuat),
    Pose { position: DVec3, rotation: DQuat },
}

impl SignalValue {
    /// Neutral value for a layout.
    pub fn zero(layout: SignalLayout) -> Self {
        match layout {
            SignalLayout::Scalar => SignalValue::Scalar(0.0),
            SignalLayout::Vector => SignalValue::Vector(DVec3::ZERO),
            SignalLayout::Quaternion => SignalValue::Quaternion(DQuat::IDENTITY),
            SignalLayout::Pose => SignalValue::Pose {
                position: DVec3::ZERO,
                rotation: DQuat::IDENTITY,
            },
        }
    }

    /// Layout of this value.
    pub fn layout(&self) -> SignalLayout {
        match self {
            SignalValue::Scalar(_) => SignalLayout::Scalar,
            SignalValue::Vector(_) => SignalLayout::Vector,
            SignalValue::Quaternion(_) => SignalLayout::Quaternion,
            SignalValue::Pose { .. } => SignalLayout::Pose,
        }
    }

    /// Append this value to a wire buffer. Vectors write `[x, y, z]`,
    /// quaternions `[x, y, z, w]`, poses position then rotation.
    pub fn append_wire(&self, out: &mut Vec<f64>) {
        match *self {
            SignalValue::Scalar(v) => out.push(v),
            SignalValue::Vector(v) => out.extend_from_slice(&[v.x, v.y, v.z]),
            SignalValue::Quaternion(q) => out.extend_from_slice(&[q.x, q.y, q.z, q.w]),
            SignalValue::Pose { position, rotation } => {
                out.extend_from_slice(&[
                    position.x, position.y, position.z, rotation.x, rotation.y, rotation.z,
                    rotation.w,
                ]);
            }
        }
    }

    /// Decode a value of `layout` from the front of a wire buffer.
    pub fn read_wire(layout: SignalLayout, data: &[f64]) -> Result<Self> {
        let expected = layout.width();
        if data.len() < expected {
            return Err(ModelError::WireShape {
                expected,
                got: data.len(),
            });
        }
        Ok(match layout {
            SignalLayout::Scalar => SignalValue::Scalar(data[0]),
            SignalLayout::Vector => SignalValue::Vector(DVec3::new(data[0], data[1], data[2])),
            SignalLayout::Quaternion => {
                SignalValue::Quaternion(DQuat::from_xyzw(data[0], data[1], data[2], data[3]))
            }
            SignalLayout::Pose => SignalValue::Pose {
                position: DVec3::new(data[0], data[1], data[2]),
                rotation: DQuat::from_xyzw(data[3], data[4], data[5], data[6]),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_widths_match_wire_contract() {
        assert_eq!(SignalLayout::Scalar.width(), 1);
        assert_eq!(SignalLayout::Vector.width(), 3);
        assert_eq!(SignalLayout::Quaternion.width(), 4);
        assert_eq!(SignalLayout::Pose.width(), 7);
    }

    #[test]
    fn pose_wire_round_trip() {
        let value = SignalValue::Pose {
            position: DVec3::new(1.0, 2.0, 3.0),
            rotation: DQuat::from_xyzw(0.0, 1.0, 0.0, 0.0),
        };
        let mut wire = Vec::new();
        value.append_wire(&mut wire);
        assert_eq!(wire.len(), 7);
        let back = SignalValue::read_wire(SignalLayout::Pose, &wire).expect("decode");
        assert_eq!(back, value);
    }

    #[test]
    fn short_wire_buffer_is_rejected() {
        let err = SignalValue::read_wire(SignalLayout::Quaternion, &[1.0, 2.0]).unwrap_err();
        match err {
            ModelError::WireShape { expected, got } => {
                assert_eq!(expected, 4);
                assert_eq!(got, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_output_kind_parses_and_has_no_layout() {
        let json = r#"{ "name": "o", "target": "a.b", "kind": "contact_force" }"#;
        let def: OutputDef = serde_json::from_str(json).expect("parse");
        assert_eq!(def.kind, OutputKind::Unknown);
        assert!(def.kind.layout().is_none());
    }

    #[test]
    fn motor_speed_input_parses_with_scalar_layout() {
        let json = r#"{ "name": "drive", "target": "rig.joint.motor", "kind": "motor_speed" }"#;
        let def: InputDef = serde_json::from_str(json).expect("parse");
        assert_eq!(def.kind, InputKind::MotorSpeed);
        assert_eq!(def.kind.layout(), Some(SignalLayout::Scalar));
    }
}
