//! The simulation world
//!
//! Owns every engine object in generational stores and hands out typed
//! handles. Creation validates referenced handles; lookups on destroyed
//! handles read as absent.

use glam::DVec3;

use crate::body::{BodyDesc, BodyHandle, RigidBody};
use crate::config::SimConfig;
use crate::constraint::{Constraint, ConstraintDesc, ConstraintHandle, ConstraintKind};
use crate::error::{Result, SimError};
use crate::material::{
    ContactMaterial, ContactMaterialDesc, ContactMaterialHandle, FrictionModel,
    FrictionModelHandle, Material, MaterialDesc, MaterialHandle,
};
use crate::math::Isometry;
use crate::shape::{Shape, ShapeDesc, ShapeHandle};
use crate::store::Store;
use crate::visual::{Visual, VisualDesc, VisualHandle};

/// Container for all engine objects
pub struct SimWorld {
    config: SimConfig,
    bodies: Store<RigidBody>,
    shapes: Store<Shape>,
    constraints: Store<Constraint>,
    visuals: Store<Visual>,
    materials: Store<Material>,
    contact_materials: Store<ContactMaterial>,
    friction_models: Store<FrictionModel>,
}

impl SimWorld {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            bodies: Store::new(),
            shapes: Store::new(),
            constraints: Store::new(),
            visuals: Store::new(),
            materials: Store::new(),
            contact_materials: Store::new(),
            friction_models: Store::new(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    // --- bodies ---

    pub fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        BodyHandle(self.bodies.insert(RigidBody::from_desc(desc)))
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle.0)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle.0)
    }

    pub fn destroy_body(&mut self, handle: BodyHandle) -> bool {
        if self.bodies.remove(handle.0).is_none() {
            log::debug!("destroy on stale body handle {handle:?}");
            return false;
        }
        true
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // --- shapes ---

    pub fn create_shape(&mut self, desc: ShapeDesc) -> Result<ShapeHandle> {
        if let Some(body) = desc.body {
            if !self.bodies.contains(body.0) {
                return Err(SimError::BodyNotFound(body));
            }
        }
        if let Some(material) = desc.material {
            if !self.materials.contains(material.0) {
                return Err(SimError::MaterialNotFound(material));
            }
        }
        Ok(ShapeHandle(self.shapes.insert(Shape::from_desc(desc))))
    }

    pub fn shape(&self, handle: ShapeHandle) -> Option<&Shape> {
        self.shapes.get(handle.0)
    }

    pub fn shape_mut(&mut self, handle: ShapeHandle) -> Option<&mut Shape> {
        self.shapes.get_mut(handle.0)
    }

    pub fn destroy_shape(&mut self, handle: ShapeHandle) -> bool {
        if self.shapes.remove(handle.0).is_none() {
            log::debug!("destroy on stale shape handle {handle:?}");
            return false;
        }
        true
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    // --- constraints ---

    /// Create a constraint from world-space attachment frames. The frames
    /// are rebased into the bodies' local frames, so they track the bodies
    /// from here on.
    pub fn create_constraint(&mut self, desc: ConstraintDesc) -> Result<ConstraintHandle> {
        let body1 = self
            .bodies
            .get(desc.body1.0)
            .ok_or(SimError::BodyNotFound(desc.body1))?;
        let frame1 = body1.pose.inverse() * desc.frame1;
        let frame2 = match desc.body2 {
            Some(handle) => {
                let body2 = self
                    .bodies
                    .get(handle.0)
                    .ok_or(SimError::BodyNotFound(handle))?;
                body2.pose.inverse() * desc.frame2
            }
            None => desc.frame2,
        };
        let constraint = Constraint::new(
            desc.name, desc.kind, desc.body1, desc.body2, frame1, frame2,
        );
        Ok(ConstraintHandle(self.constraints.insert(constraint)))
    }

    pub fn constraint(&self, handle: ConstraintHandle) -> Option<&Constraint> {
        self.constraints.get(handle.0)
    }

    pub fn constraint_mut(&mut self, handle: ConstraintHandle) -> Option<&mut Constraint> {
        self.constraints.get_mut(handle.0)
    }

    pub fn destroy_constraint(&mut self, handle: ConstraintHandle) -> bool {
        if self.constraints.remove(handle.0).is_none() {
            log::debug!("destroy on stale constraint handle {handle:?}");
            return false;
        }
        true
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Current world poses of both attachment frames.
    pub fn constraint_frames_world(
        &self,
        handle: ConstraintHandle,
    ) -> Result<(Isometry, Isometry)> {
        let constraint = self
            .constraints
            .get(handle.0)
            .ok_or(SimError::ConstraintNotFound(handle))?;
        self.frames_world(constraint)
    }

    fn frames_world(&self, constraint: &Constraint) -> Result<(Isometry, Isometry)> {
        let body1 = self
            .bodies
            .get(constraint.body1.0)
            .ok_or(SimError::BodyNotFound(constraint.body1))?;
        let world1 = body1.pose * constraint.frame1;
        let world2 = match constraint.body2 {
            Some(handle) => {
                let body2 = self
                    .bodies
                    .get(handle.0)
                    .ok_or(SimError::BodyNotFound(handle))?;
                body2.pose * constraint.frame2
            }
            None => constraint.frame2,
        };
        Ok((world1, world2))
    }

    /// Current angle of the constraint: the rotation around the axis for
    /// hinge/cylindrical, the displacement along the axis for
    /// prismatic/distance, zero for lock/ball.
    pub fn constraint_angle(&self, handle: ConstraintHandle) -> Result<f64> {
        let constraint = self
            .constraints
            .get(handle.0)
            .ok_or(SimError::ConstraintNotFound(handle))?;
        let (world1, world2) = self.frames_world(constraint)?;
        Ok(match constraint.kind {
            ConstraintKind::Hinge | ConstraintKind::Cylindrical => {
                let rel = world1.rotation.inverse() * world2.rotation;
                wrap_angle(2.0 * rel.z.atan2(rel.w))
            }
            ConstraintKind::Prismatic | ConstraintKind::Distance => {
                let axis = world1.rotation * DVec3::Z;
                (world2.position - world1.position).dot(axis)
            }
            ConstraintKind::Lock | ConstraintKind::Ball => 0.0,
        })
    }

    /// Current speed of the constraint along/around its axis.
    pub fn constraint_speed(&self, handle: ConstraintHandle) -> Result<f64> {
        let constraint = self
            .constraints
            .get(handle.0)
            .ok_or(SimError::ConstraintNotFound(handle))?;
        let (world1, _) = self.frames_world(constraint)?;
        let axis = world1.rotation * DVec3::Z;
        let body1 = self
            .bodies
            .get(constraint.body1.0)
            .ok_or(SimError::BodyNotFound(constraint.body1))?;
        let (velocity2, angular2) = match constraint.body2 {
            Some(handle) => {
                let body2 = self
                    .bodies
                    .get(handle.0)
                    .ok_or(SimError::BodyNotFound(handle))?;
                (body2.velocity, body2.angular_velocity)
            }
            None => (DVec3::ZERO, DVec3::ZERO),
        };
        Ok(match constraint.kind {
            ConstraintKind::Hinge | ConstraintKind::Cylindrical => {
                (angular2 - body1.angular_velocity).dot(axis)
            }
            ConstraintKind::Prismatic | ConstraintKind::Distance => {
                (velocity2 - body1.velocity).dot(axis)
            }
            ConstraintKind::Lock | ConstraintKind::Ball => 0.0,
        })
    }

    // --- visuals ---

    pub fn create_visual(&mut self, desc: VisualDesc) -> Result<VisualHandle> {
        if let Some(body) = desc.body {
            if !self.bodies.contains(body.0) {
                return Err(SimError::BodyNotFound(body));
            }
        }
        Ok(VisualHandle(self.visuals.insert(Visual::from_desc(desc))))
    }

    pub fn visual(&self, handle: VisualHandle) -> Option<&Visual> {
        self.visuals.get(handle.0)
    }

    pub fn destroy_visual(&mut self, handle: VisualHandle) -> bool {
        if self.visuals.remove(handle.0).is_none() {
            log::debug!("destroy on stale visual handle {handle:?}");
            return false;
        }
        true
    }

    pub fn visual_count(&self) -> usize {
        self.visuals.len()
    }

    // --- materials ---

    pub fn create_material(&mut self, desc: MaterialDesc) -> MaterialHandle {
        MaterialHandle(self.materials.insert(Material::from_desc(desc)))
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle.0)
    }

    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(handle.0)
    }

    /// Look a material up by name.
    pub fn find_material(&self, name: &str) -> Option<MaterialHandle> {
        self.materials
            .iter()
            .find(|(_, material)| material.name == name)
            .map(|(key, _)| MaterialHandle(key))
    }

    pub fn destroy_material(&mut self, handle: MaterialHandle) -> bool {
        if self.materials.remove(handle.0).is_none() {
            log::debug!("destroy on stale material handle {handle:?}");
            return false;
        }
        true
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn create_contact_material(
        &mut self,
        desc: ContactMaterialDesc,
    ) -> Result<ContactMaterialHandle> {
        for material in [desc.material1, desc.material2] {
            if !self.materials.contains(material.0) {
                return Err(SimError::MaterialNotFound(material));
            }
        }
        Ok(ContactMaterialHandle(
            self.contact_materials
                .insert(ContactMaterial::from_desc(desc)),
        ))
    }

    pub fn contact_material(&self, handle: ContactMaterialHandle) -> Option<&ContactMaterial> {
        self.contact_materials.get(handle.0)
    }

    pub fn contact_material_mut(
        &mut self,
        handle: ContactMaterialHandle,
    ) -> Option<&mut ContactMaterial> {
        self.contact_materials.get_mut(handle.0)
    }

    pub fn destroy_contact_material(&mut self, handle: ContactMaterialHandle) -> bool {
        if self.contact_materials.remove(handle.0).is_none() {
            log::debug!("destroy on stale contact material handle {handle:?}");
            return false;
        }
        true
    }

    pub fn contact_material_count(&self) -> usize {
        self.contact_materials.len()
    }

    pub fn create_friction_model(&mut self, model: FrictionModel) -> FrictionModelHandle {
        FrictionModelHandle(self.friction_models.insert(model))
    }

    pub fn friction_model(&self, handle: FrictionModelHandle) -> Option<&FrictionModel> {
        self.friction_models.get(handle.0)
    }

    pub fn friction_model_mut(&mut self, handle: FrictionModelHandle) -> Option<&mut FrictionModel> {
        self.friction_models.get_mut(handle.0)
    }

    pub fn destroy_friction_model(&mut self, handle: FrictionModelHandle) -> bool {
        if self.friction_models.remove(handle.0).is_none() {
            log::debug!("destroy on stale friction model handle {handle:?}");
            return false;
        }
        true
    }

    pub fn friction_model_count(&self) -> usize {
        self.friction_models.len()
    }
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

/// Wrap an angle into (-pi, pi].
fn wrap_angle(angle: f64) -> f64 {
    use std::f64::consts::PI;
    let mut wrapped = angle;
    if wrapped > PI {
        wrapped -= 2.0 * PI;
    }
    if wrapped <= -PI {
        wrapped += 2.0 * PI;
    }
    wrapped
}
