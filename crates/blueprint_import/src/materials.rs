//! Materials pass: declared materials into engine objects
//!
//! Runs before the walker so shapes can bind materials by name during
//! traversal. Shape materials deduplicate by name keeping the first
//! declaration; contact materials deduplicate keeping the engine object
//! and rewriting every property from the last declaration.

use std::collections::HashMap;

use blueprint_model::graph::{Component, ContactMaterialDef};
use blueprint_sim::material::{
    ContactMaterialDesc, ContactMaterialHandle, FrictionModel, FrictionModelHandle,
    FrictionModelKind, MaterialDesc, MaterialHandle, SolveKind,
};
use blueprint_sim::world::SimWorld;

use crate::error::{ImportError, Result};

/// Name-keyed registry of the engine materials built from one model.
#[derive(Debug, Default)]
pub struct MaterialCatalog {
    materials: HashMap<String, MaterialHandle>,
    contact_materials: HashMap<String, ContactMaterialHandle>,
    friction_models: HashMap<String, FrictionModelHandle>,
}

impl MaterialCatalog {
    /// Build every declared material in the world. On failure the
    /// engine objects created so far are destroyed again.
    pub fn build(component: &Component, world: &mut SimWorld) -> Result<Self> {
        let mut catalog = Self::default();
        match catalog.fill(component, world) {
            Ok(()) => Ok(catalog),
            Err(err) => {
                catalog.destroy_all(world);
                Err(err)
            }
        }
    }

    pub fn material(&self, name: &str) -> Option<MaterialHandle> {
        self.materials.get(name).copied()
    }

    pub fn contact_material(&self, name: &str) -> Option<ContactMaterialHandle> {
        self.contact_materials.get(name).copied()
    }

    pub fn friction_model(&self, name: &str) -> Option<FrictionModelHandle> {
        self.friction_models.get(name).copied()
    }

    /// Destroy every engine object this catalog created and empty it.
    pub fn destroy_all(&mut self, world: &mut SimWorld) {
        for (_, handle) in self.contact_materials.drain() {
            world.destroy_contact_material(handle);
        }
        for (_, handle) in self.friction_models.drain() {
            world.destroy_friction_model(handle);
        }
        for (_, handle) in self.materials.drain() {
            world.destroy_material(handle);
        }
    }

    fn fill(&mut self, component: &Component, world: &mut SimWorld) -> Result<()> {
        for def in component.materials() {
            if self.materials.contains_key(&def.name) {
                log::debug!("duplicate material {:?} keeps its first declaration", def.name);
                continue;
            }
            let handle =
                world.create_material(MaterialDesc::new(def.name.clone()).with_density(def.density));
            self.materials.insert(def.name.clone(), handle);
        }
        for def in component.contact_materials() {
            self.build_contact_material(def, world)?;
        }
        Ok(())
    }

    fn build_contact_material(&mut self, def: &ContactMaterialDef, world: &mut SimWorld) -> Result<()> {
        let material1 = self
            .material(&def.material1)
            .ok_or_else(|| ImportError::UnknownMaterial(def.name.clone(), def.material1.clone()))?;
        let material2 = self
            .material(&def.material2)
            .ok_or_else(|| ImportError::UnknownMaterial(def.name.clone(), def.material2.clone()))?;

        let kind = if def.friction_reference.is_some() {
            FrictionModelKind::OrientedBox
        } else {
            FrictionModelKind::ScaleBox
        };
        let friction_model = self.ensure_friction_model(world, format!("fm_{}", def.name), kind);

        if let Some(&existing) = self.contact_materials.get(&def.name) {
            // Last declaration wins but the engine object is kept.
            if let Some(contact) = world.contact_material_mut(existing) {
                contact.material1 = material1;
                contact.material2 = material2;
                contact.youngs_modulus = def.youngs_modulus;
                contact.restitution = def.restitution;
                contact.damping = def.damping / def.youngs_modulus;
                contact.primary_friction = def.primary_friction_coefficient;
                contact.secondary_friction = def.secondary_friction_coefficient;
                contact.primary_viscosity = def.surface_viscosity;
                contact.secondary_viscosity = def.surface_viscosity;
                contact.adhesive_force = def.adhesive_force;
                contact.adhesive_overlap = def.adhesive_overlap;
                contact.friction_model = Some(friction_model);
            }
            return Ok(());
        }

        let mut desc = ContactMaterialDesc::new(def.name.clone(), material1, material2);
        desc.youngs_modulus = def.youngs_modulus;
        desc.restitution = def.restitution;
        // Authored damping is spring-like; the engine wants a relaxation time.
        desc.damping = def.damping / def.youngs_modulus;
        desc.primary_friction = def.primary_friction_coefficient;
        desc.secondary_friction = def.secondary_friction_coefficient;
        desc.primary_viscosity = def.surface_viscosity;
        desc.secondary_viscosity = def.surface_viscosity;
        desc.adhesive_force = def.adhesive_force;
        desc.adhesive_overlap = def.adhesive_overlap;
        desc.friction_model = Some(friction_model);
        let handle = world.create_contact_material(desc)?;
        self.contact_materials.insert(def.name.clone(), handle);
        Ok(())
    }

    fn ensure_friction_model(
        &mut self,
        world: &mut SimWorld,
        name: String,
        kind: FrictionModelKind,
    ) -> FrictionModelHandle {
        if let Some(&handle) = self.friction_models.get(&name) {
            if let Some(model) = world.friction_model_mut(handle) {
                model.kind = kind;
                model.solve = SolveKind::Direct;
            }
            return handle;
        }
        let handle =
            world.create_friction_model(FrictionModel::new(name.clone(), kind).with_solve(SolveKind::Direct));
        self.friction_models.insert(name, handle);
        handle
    }
}
