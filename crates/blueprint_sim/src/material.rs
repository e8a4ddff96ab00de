//! Materials, contact materials and friction models

use crate::store::StoreKey;

/// Handle to a shape material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub(crate) StoreKey<Material>);

/// Handle to a contact material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactMaterialHandle(pub(crate) StoreKey<ContactMaterial>);

/// Handle to a friction model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrictionModelHandle(pub(crate) StoreKey<FrictionModel>);

/// Shape material
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    /// kg/m^3, drives computed mass properties
    pub density: f64,
    pub youngs_modulus: f64,
    pub viscosity: f64,
}

/// Description for creating a shape material
#[derive(Debug, Clone)]
pub struct MaterialDesc {
    pub name: String,
    pub density: f64,
    pub youngs_modulus: f64,
    pub viscosity: f64,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            name: String::new(),
            density: 1000.0,
            youngs_modulus: 2.0e8,
            viscosity: 5.0e-9,
        }
    }
}

impl MaterialDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }
}

impl Material {
    pub(crate) fn from_desc(desc: MaterialDesc) -> Self {
        Self {
            name: desc.name,
            density: desc.density,
            youngs_modulus: desc.youngs_modulus,
            viscosity: desc.viscosity,
        }
    }
}

/// Contact material for a pair of shape materials
#[derive(Debug, Clone)]
pub struct ContactMaterial {
    pub name: String,
    pub material1: MaterialHandle,
    pub material2: MaterialHandle,
    pub youngs_modulus: f64,
    pub restitution: f64,
    /// Seconds; relaxation time of the contact
    pub damping: f64,
    pub primary_friction: f64,
    pub secondary_friction: f64,
    pub primary_viscosity: f64,
    pub secondary_viscosity: f64,
    pub adhesive_force: f64,
    pub adhesive_overlap: f64,
    pub friction_model: Option<FrictionModelHandle>,
}

/// Description for creating a contact material
#[derive(Debug, Clone)]
pub struct ContactMaterialDesc {
    pub name: String,
    pub material1: MaterialHandle,
    pub material2: MaterialHandle,
    pub youngs_modulus: f64,
    pub restitution: f64,
    pub damping: f64,
    pub primary_friction: f64,
    pub secondary_friction: f64,
    pub primary_viscosity: f64,
    pub secondary_viscosity: f64,
    pub adhesive_force: f64,
    pub adhesive_overlap: f64,
    pub friction_model: Option<FrictionModelHandle>,
}

impl ContactMaterialDesc {
    pub fn new(
        name: impl Into<String>,
        material1: MaterialHandle,
        material2: MaterialHandle,
    ) -> Self {
        Self {
            name: name.into(),
            material1,
            material2,
            youngs_modulus: 2.0e8,
            restitution: 0.0,
            damping: 0.075,
            primary_friction: 0.5,
            secondary_friction: 0.5,
            primary_viscosity: 5.0e-9,
            secondary_viscosity: 5.0e-9,
            adhesive_force: 0.0,
            adhesive_overlap: 0.0,
            friction_model: None,
        }
    }
}

impl ContactMaterial {
    pub(crate) fn from_desc(desc: ContactMaterialDesc) -> Self {
        Self {
            name: desc.name,
            material1: desc.material1,
            material2: desc.material2,
            youngs_modulus: desc.youngs_modulus,
            restitution: desc.restitution,
            damping: desc.damping,
            primary_friction: desc.primary_friction,
            secondary_friction: desc.secondary_friction,
            primary_viscosity: desc.primary_viscosity,
            secondary_viscosity: desc.secondary_viscosity,
            adhesive_force: desc.adhesive_force,
            adhesive_overlap: desc.adhesive_overlap,
            friction_model: desc.friction_model,
        }
    }
}

/// Friction approximation used by a contact material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrictionModelKind {
    /// Friction box scaled by the normal force
    ScaleBox,
    /// Friction box oriented by a reference frame
    OrientedBox,
}

/// How the friction rows are solved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolveKind {
    #[default]
    Split,
    Direct,
    Iterative,
}

/// Friction model instance
#[derive(Debug, Clone)]
pub struct FrictionModel {
    pub name: String,
    pub kind: FrictionModelKind,
    pub solve: SolveKind,
}

impl FrictionModel {
    pub fn new(name: impl Into<String>, kind: FrictionModelKind) -> Self {
        Self {
            name: name.into(),
            kind,
            solve: SolveKind::default(),
        }
    }

    pub fn with_solve(mut self, solve: SolveKind) -> Self {
        self.solve = solve;
        self
    }
}
