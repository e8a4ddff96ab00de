//! The built scene: engine objects paired with their declarative paths
//!
//! Every walked node and every resolved connector leaves one
//! [`SceneObject`] behind. The path and type tag are the durable half of
//! the record; a later session re-parses the model and uses them to find
//! the declarative counterpart of each engine object again.

use blueprint_sim::body::BodyHandle;
use blueprint_sim::constraint::ConstraintHandle;
use blueprint_sim::shape::ShapeHandle;
use blueprint_sim::visual::VisualHandle;

/// What a scene object is backed by in the engine world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTarget {
    /// Grouping node with no engine-side object
    Group,
    Body(BodyHandle),
    Shape(ShapeHandle),
    Visual(VisualHandle),
    Constraint(ConstraintHandle),
}

/// One engine object and the declarative identity it was built from.
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Dot-joined path from the model root, root segment included
    pub path: String,
    /// Declarative subtype tag of the source object
    pub type_tag: String,
    /// Whether a runtime session keeps this object in sync with the
    /// re-parsed model. Expanded sub-connectors opt out.
    pub synchronize: bool,
    pub target: SceneTarget,
}

/// All objects built by one import, in creation order.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Look an object up by its full path.
    pub fn find(&self, path: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.path == path)
    }

    /// Objects a runtime session should keep in sync with the model.
    pub fn synchronized(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(|object| object.synchronize)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub(crate) fn push(&mut self, object: SceneObject) {
        self.objects.push(object);
    }
}
