//! Connector resolution: queued connectors into engine constraints
//!
//! Runs after the walk so forward references into not-yet-visited
//! subtrees resolve like any other. Explicit connectors go first and
//! stay synchronized; expanded sub-connectors follow and are marked as
//! runtime-only.

use blueprint_model::graph::{Connector, ConnectorKind, CONNECTOR_TAG};
use blueprint_sim::constraint::{ConstraintDesc, ConstraintKind};
use blueprint_sim::error::SimError;
use blueprint_sim::world::SimWorld;

use crate::constraint_map::apply_main_interaction;
use crate::controller_map::apply_interaction;
use crate::error::{ImportError, Result};
use crate::importer::{CreatedObject, Importer, QueuedConnector};
use crate::scene::{SceneObject, SceneTarget};

fn constraint_kind(connector: &Connector) -> Result<ConstraintKind> {
    match connector.kind {
        ConnectorKind::Hinge => Ok(ConstraintKind::Hinge),
        ConnectorKind::Prismatic => Ok(ConstraintKind::Prismatic),
        ConnectorKind::Lock => Ok(ConstraintKind::Lock),
        ConnectorKind::Ball => Ok(ConstraintKind::Ball),
        ConnectorKind::Spring => Ok(ConstraintKind::Distance),
        ConnectorKind::Cylindrical => Ok(ConstraintKind::Cylindrical),
        ConnectorKind::Unknown => Err(ImportError::UnknownConnectorKind(connector.name.clone())),
    }
}

impl<'a> Importer<'a> {
    pub(crate) fn resolve_queues(&mut self, world: &mut SimWorld) -> Result<()> {
        let explicit = std::mem::take(&mut self.explicit);
        for queued in &explicit {
            self.resolve_connector(world, queued, true)?;
        }
        let implicit = std::mem::take(&mut self.implicit);
        for queued in &implicit {
            self.resolve_connector(world, queued, false)?;
        }
        Ok(())
    }

    fn resolve_connector(
        &mut self,
        world: &mut SimWorld,
        queued: &QueuedConnector<'a>,
        synchronize: bool,
    ) -> Result<()> {
        let connector = queued.connector;
        let kind = constraint_kind(connector)?;

        let anchor1 = self.attachment_map.get(&connector.attachment1_id).ok_or_else(|| {
            ImportError::UnresolvedAttachment(connector.name.clone(), connector.attachment1.clone())
        })?;
        let anchor2 = self.attachment_map.get(&connector.attachment2_id).ok_or_else(|| {
            ImportError::UnresolvedAttachment(connector.name.clone(), connector.attachment2.clone())
        })?;
        let frame1 = anchor1.pose;
        let frame2 = anchor2.pose;

        // The first attachment must sit under a body; the second may be
        // bodiless, anchoring the constraint to the world.
        let body1 = anchor1
            .body
            .and_then(|id| self.body_map.get(&id).copied())
            .ok_or_else(|| {
                ImportError::UnresolvedBody(connector.name.clone(), connector.attachment1.clone())
            })?;
        let body2 = match anchor2.body {
            None => None,
            Some(id) => Some(self.body_map.get(&id).copied().ok_or_else(|| {
                ImportError::UnresolvedBody(connector.name.clone(), connector.attachment2.clone())
            })?),
        };

        let mut desc =
            ConstraintDesc::new(connector.name.clone(), kind, body1).with_frames(frame1, frame2);
        if let Some(body2) = body2 {
            desc = desc.with_body2(body2);
        }
        let handle = world.create_constraint(desc)?;
        self.created.push(CreatedObject::Constraint(handle));

        self.scene.push(SceneObject {
            path: format!("{}.{}", queued.parent_path, connector.name),
            type_tag: CONNECTOR_TAG.to_string(),
            synchronize,
            target: SceneTarget::Constraint(handle),
        });

        let constraint = world
            .constraint_mut(handle)
            .ok_or(SimError::ConstraintNotFound(handle))?;
        apply_main_interaction(constraint, &connector.main_interaction, true);
        for interaction in &connector.interactions {
            apply_interaction(constraint, interaction, true);
        }
        Ok(())
    }
}
