//! Model file loading and sealing
//!
//! A model file declares one or more named models. Loading picks one,
//! stamps the model key onto the root node and seals the tree: ids are
//! assigned in pre-order, multi-attachment connectors are expanded,
//! attachment ownership is inferred, names and values are validated and
//! connector references are resolved to ids. Trimesh payloads load on a
//! background thread and are awaited where the geometry is built.

use std::cell::OnceCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crossbeam_channel::{bounded, Receiver};
use glam::DVec3;
use serde::Deserialize;

use crate::error::{ModelError, Result};
use crate::graph::{
    resolve_in, Component, Connector, ContactMaterialDef, GeometryShape, Interaction,
    MainInteraction, MaterialDef, MultiConnector, Node, NodeId, NodeKind, Resolved,
};
use crate::signals::{InputDef, OutputDef};

/// Loader settings
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    module_paths: Vec<PathBuf>,
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module directory, searched for relative payload sources after
    /// the model file's own directory.
    pub fn with_module_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.module_paths.push(path.into());
        self
    }
}

/// Where a model document comes from
#[derive(Debug, Clone)]
pub enum ModelSource {
    /// A model file on disk
    File(PathBuf),
    /// An in-memory model document
    Text(String),
}

impl ModelSource {
    /// Load and seal the named model from this source.
    pub fn load(&self, model_name: &str, config: &LoaderConfig) -> Result<Component> {
        match self {
            ModelSource::File(path) => load_component(path, model_name, config),
            ModelSource::Text(text) => parse_component(text, model_name, config),
        }
    }
}

/// Load and seal the named model from a file on disk.
pub fn load_component(
    path: impl AsRef<Path>,
    model_name: &str,
    config: &LoaderConfig,
) -> Result<Component> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ModelError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ModelError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse_component_at(&text, path, path.parent(), model_name, config)
}

/// Load and seal the named model from an in-memory document. Relative
/// trimesh sources resolve against the configured search paths only.
pub fn parse_component(text: &str, model_name: &str, config: &LoaderConfig) -> Result<Component> {
    parse_component_at(text, Path::new("<memory>"), None, model_name, config)
}

#[derive(Deserialize)]
struct ModelFile {
    models: BTreeMap<String, ModelDef>,
}

#[derive(Deserialize)]
struct ModelDef {
    root: Node,
    #[serde(default)]
    materials: Vec<MaterialDef>,
    #[serde(default)]
    contact_materials: Vec<ContactMaterialDef>,
    #[serde(default)]
    inputs: Vec<InputDef>,
    #[serde(default)]
    outputs: Vec<OutputDef>,
}

fn parse_component_at(
    text: &str,
    origin: &Path,
    base_dir: Option<&Path>,
    model_name: &str,
    config: &LoaderConfig,
) -> Result<Component> {
    let mut file: ModelFile = serde_json::from_str(text).map_err(|source| ModelError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;
    let mut def = file
        .models
        .remove(model_name)
        .ok_or_else(|| ModelError::ModelNotFound {
            name: model_name.to_string(),
            path: origin.to_path_buf(),
        })?;
    def.root.name = model_name.to_string();
    seal(def, base_dir, config)
}

/// Seal phases: assign ids, expand and validate (mutable walk); resolve
/// connector references (immutable walk); write resolved ids back.
fn seal(mut def: ModelDef, base_dir: Option<&Path>, config: &LoaderConfig) -> Result<Component> {
    for material in &def.materials {
        if material.density <= 0.0 {
            return Err(ModelError::InvalidValue {
                what: format!("density of material {:?}", material.name),
                value: material.density,
            });
        }
    }
    for contact in &def.contact_materials {
        if contact.youngs_modulus <= 0.0 {
            return Err(ModelError::InvalidValue {
                what: format!("Young's modulus of contact material {:?}", contact.name),
                value: contact.youngs_modulus,
            });
        }
    }

    let mut state = SealState::default();
    seal_node(&mut def.root, "", &mut state)?;
    let refs = collect_refs(&def.root)?;
    apply_refs(&mut def.root, &refs);

    let mut meshes = HashMap::new();
    spawn_meshes(&def.root, base_dir, config, &mut meshes);

    Ok(Component {
        root: def.root,
        materials: def.materials,
        contact_materials: def.contact_materials,
        inputs: def.inputs,
        outputs: def.outputs,
        meshes,
    })
}

#[derive(Default)]
struct SealState {
    next_node: u32,
    next_interaction: u32,
    body_stack: Vec<NodeId>,
}

impl SealState {
    fn alloc_node(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    fn alloc_interaction(&mut self) -> crate::graph::InteractionId {
        let id = crate::graph::InteractionId(self.next_interaction);
        self.next_interaction += 1;
        id
    }
}

/// Pre-order: the node itself, its connectors (explicit first, then
/// expanded), then its children.
fn seal_node(node: &mut Node, parent_path: &str, state: &mut SealState) -> Result<()> {
    validate_name(&node.name, parent_path)?;
    node.id = state.alloc_node();
    let path = join_path(parent_path, &node.name);

    for multi in &mut node.multi_connectors {
        validate_name(&multi.name, &path)?;
        expand_multi(multi, &path)?;
    }

    let mut seen = HashSet::new();
    for child in &node.children {
        note_sibling(&mut seen, &child.name, &path)?;
    }
    for connector in &node.connectors {
        note_sibling(&mut seen, &connector.name, &path)?;
    }
    for multi in &node.multi_connectors {
        for connector in &multi.expanded {
            note_sibling(&mut seen, &connector.name, &path)?;
        }
    }

    for connector in &mut node.connectors {
        seal_connector(connector, &path, state)?;
    }
    for multi in &mut node.multi_connectors {
        for connector in &mut multi.expanded {
            seal_connector(connector, &path, state)?;
        }
    }

    let is_body = matches!(node.kind, NodeKind::Body(_));
    if is_body {
        state.body_stack.push(node.id);
    }
    if let NodeKind::Attachment(def) = &mut node.kind {
        def.body = state.body_stack.last().copied();
    }
    for child in &mut node.children {
        seal_node(child, &path, state)?;
    }
    if is_body {
        state.body_stack.pop();
    }
    Ok(())
}

fn seal_connector(connector: &mut Connector, parent_path: &str, state: &mut SealState) -> Result<()> {
    validate_name(&connector.name, parent_path)?;
    connector.id = state.alloc_node();
    connector.main_interaction.id = state.alloc_interaction();
    let path = format!("{parent_path}.{}", connector.name);
    validate_main(&connector.main_interaction, &path)?;
    let mut seen = HashSet::new();
    for aux in &mut connector.interactions {
        validate_name(&aux.name, &path)?;
        note_sibling(&mut seen, &aux.name, &path)?;
        aux.id = state.alloc_interaction();
        validate_interaction(aux, &path)?;
    }
    Ok(())
}

/// Expand an n-attachment connector into n-1 pairwise links named
/// `<name>_<i>`.
fn expand_multi(multi: &mut MultiConnector, parent_path: &str) -> Result<()> {
    if multi.attachments.len() < 2 {
        return Err(ModelError::Structure {
            path: format!("{parent_path}.{}", multi.name),
            reason: format!(
                "multi connector needs at least 2 attachments, has {}",
                multi.attachments.len()
            ),
        });
    }
    multi.expanded = multi
        .attachments
        .windows(2)
        .enumerate()
        .map(|(i, pair)| Connector {
            name: format!("{}_{}", multi.name, i),
            kind: multi.kind,
            attachment1: pair[0].clone(),
            attachment2: pair[1].clone(),
            main_interaction: multi.main_interaction.clone(),
            interactions: multi.interactions.clone(),
            id: NodeId::UNSET,
            attachment1_id: NodeId::UNSET,
            attachment2_id: NodeId::UNSET,
        })
        .collect();
    Ok(())
}

fn validate_name(name: &str, parent: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(ModelError::InvalidName {
            name: name.to_string(),
            reason: if parent.is_empty() {
                reason.to_string()
            } else {
                format!("{reason} (under {parent:?})")
            },
        })
    };
    if name.is_empty() {
        return reject("name is empty");
    }
    if name.contains('.') {
        return reject("name contains '.'");
    }
    if !name.is_ascii() {
        return reject("name contains non-ASCII characters");
    }
    Ok(())
}

fn note_sibling(seen: &mut HashSet<String>, name: &str, parent: &str) -> Result<()> {
    if !seen.insert(name.to_string()) {
        return Err(ModelError::DuplicateName {
            name: name.to_string(),
            parent: parent.to_string(),
        });
    }
    Ok(())
}

fn validate_main(main: &MainInteraction, connector_path: &str) -> Result<()> {
    for value in main.stiffness.values().into_iter().flatten() {
        if value <= 0.0 {
            return Err(ModelError::InvalidValue {
                what: format!("stiffness of {connector_path}"),
                value,
            });
        }
    }
    for value in main.damping.values().into_iter().flatten() {
        if value < 0.0 {
            return Err(ModelError::InvalidValue {
                what: format!("damping of {connector_path}"),
                value,
            });
        }
    }
    Ok(())
}

fn validate_interaction(aux: &Interaction, connector_path: &str) -> Result<()> {
    if let Some(value) = aux.stiffness {
        if value <= 0.0 {
            return Err(ModelError::InvalidValue {
                what: format!("stiffness of {connector_path}.{}", aux.name),
                value,
            });
        }
    }
    if let Some(value) = aux.damping {
        if value < 0.0 {
            return Err(ModelError::InvalidValue {
                what: format!("damping of {connector_path}.{}", aux.name),
                value,
            });
        }
    }
    Ok(())
}

fn collect_refs(root: &Node) -> Result<HashMap<u32, (NodeId, NodeId)>> {
    let mut map = HashMap::new();
    collect_refs_in(root, root, "", &mut map)?;
    Ok(map)
}

fn collect_refs_in(
    root: &Node,
    node: &Node,
    parent_path: &str,
    map: &mut HashMap<u32, (NodeId, NodeId)>,
) -> Result<()> {
    let path = join_path(parent_path, &node.name);
    for connector in node
        .connectors
        .iter()
        .chain(node.multi_connectors.iter().flat_map(|m| m.expanded.iter()))
    {
        let connector_path = format!("{path}.{}", connector.name);
        let a1 = resolve_attachment(root, &connector.attachment1, &connector_path)?;
        let a2 = resolve_attachment(root, &connector.attachment2, &connector_path)?;
        map.insert(connector.id.raw(), (a1, a2));
    }
    for child in &node.children {
        collect_refs_in(root, child, &path, map)?;
    }
    Ok(())
}

fn resolve_attachment(root: &Node, path: &str, connector_path: &str) -> Result<NodeId> {
    match resolve_in(root, path) {
        Some(Resolved::Node(node)) if matches!(node.kind, NodeKind::Attachment(_)) => Ok(node.id),
        _ => Err(ModelError::UnresolvedReference {
            connector: connector_path.to_string(),
            path: path.to_string(),
        }),
    }
}

fn apply_refs(node: &mut Node, map: &HashMap<u32, (NodeId, NodeId)>) {
    for connector in node.connectors.iter_mut().chain(
        node.multi_connectors
            .iter_mut()
            .flat_map(|m| m.expanded.iter_mut()),
    ) {
        if let Some(&(a1, a2)) = map.get(&connector.id.raw()) {
            connector.attachment1_id = a1;
            connector.attachment2_id = a2;
        }
    }
    for child in &mut node.children {
        apply_refs(child, map);
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn spawn_meshes(
    node: &Node,
    base_dir: Option<&Path>,
    config: &LoaderConfig,
    out: &mut HashMap<NodeId, MeshSlot>,
) {
    if let NodeKind::Geometry(def) = &node.kind {
        if let GeometryShape::Trimesh { source } = &def.shape {
            let resolved = resolve_source(source, base_dir, config);
            out.insert(node.id, MeshSlot::spawn(resolved));
        }
    }
    for child in &node.children {
        spawn_meshes(child, base_dir, config, out);
    }
}

/// Resolve a trimesh source against the model file's directory and the
/// configured search paths. Falls back to the first candidate so the load
/// error names a concrete path.
fn resolve_source(source: &str, base_dir: Option<&Path>, config: &LoaderConfig) -> PathBuf {
    let raw = Path::new(source);
    if raw.is_absolute() {
        return raw.to_path_buf();
    }
    let mut candidates = Vec::new();
    if let Some(dir) = base_dir {
        candidates.push(dir.join(raw));
    }
    for root in &config.module_paths {
        candidates.push(root.join(raw));
    }
    if let Some(found) = candidates.iter().find(|c| c.exists()) {
        return found.clone();
    }
    candidates
        .into_iter()
        .next()
        .unwrap_or_else(|| raw.to_path_buf())
}

/// Triangle mesh payload for a trimesh geometry
#[derive(Debug, Clone, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<DVec3>,
    #[serde(default)]
    pub indices: Vec<[u32; 3]>,
}

/// Handle to a trimesh load running on a background thread. The result is
/// awaited with a blocking [`wait`](Self::wait) and cached for later reads.
#[derive(Debug)]
pub struct MeshSlot {
    source: PathBuf,
    rx: Receiver<std::result::Result<MeshData, String>>,
    loaded: OnceCell<std::result::Result<MeshData, String>>,
}

impl MeshSlot {
    pub(crate) fn spawn(source: PathBuf) -> Self {
        let (tx, rx) = bounded(1);
        let path = source.clone();
        std::thread::spawn(move || {
            let _ = tx.send(load_mesh(&path));
        });
        Self {
            source,
            rx,
            loaded: OnceCell::new(),
        }
    }

    /// Path the payload is loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Block until the background load finishes and return the payload.
    pub fn wait(&self) -> Result<&MeshData> {
        let loaded = self.loaded.get_or_init(|| {
            self.rx
                .recv()
                .unwrap_or_else(|_| Err("loader thread terminated".to_string()))
        });
        match loaded {
            Ok(mesh) => Ok(mesh),
            Err(reason) => Err(ModelError::MeshLoad {
                source_path: self.source.display().to_string(),
                reason: reason.clone(),
            }),
        }
    }
}

fn load_mesh(path: &Path) -> std::result::Result<MeshData, String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    parse_mesh(&text)
}

/// Mesh payloads are JSON documents of `vertices` (triples) and `indices`
/// (index triples into the vertex list).
fn parse_mesh(text: &str) -> std::result::Result<MeshData, String> {
    let mesh: MeshData = serde_json::from_str(text).map_err(|e| e.to_string())?;
    if mesh.vertices.is_empty() {
        return Err("no vertices".to_string());
    }
    let count = mesh.vertices.len();
    for (i, triangle) in mesh.indices.iter().enumerate() {
        if let Some(&index) = triangle.iter().find(|&&v| v as usize >= count) {
            return Err(format!(
                "triangle {i} references vertex {index}, payload has {count}"
            ));
        }
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SignalTarget;

    const RIG: &str = r#"{
        "models": {
            "rig": {
                "root": {
                    "kind": "group",
                    "children": [
                        {
                            "name": "base", "kind": "body", "mass": 10.0,
                            "children": [ { "name": "frame", "kind": "attachment" } ]
                        },
                        { "name": "anchor", "kind": "attachment" }
                    ],
                    "connectors": [
                        {
                            "name": "joint", "kind": "hinge",
                            "attachment1": "base.frame", "attachment2": "anchor"
                        }
                    ]
                }
            }
        }
    }"#;

    fn load_rig() -> Component {
        parse_component(RIG, "rig", &LoaderConfig::default()).expect("load")
    }

    #[test]
    fn seal_assigns_preorder_ids() {
        let component = load_rig();
        let root = component.root();
        assert_eq!(root.id.raw(), 0);
        assert_eq!(root.connectors[0].id.raw(), 1);
        assert_eq!(root.connectors[0].main_interaction.id.raw(), 0);
        assert_eq!(root.children[0].id.raw(), 2);
        assert_eq!(root.children[0].children[0].id.raw(), 3);
        assert_eq!(root.children[1].id.raw(), 4);
    }

    #[test]
    fn seal_is_deterministic_across_parses() {
        let a = load_rig();
        let b = load_rig();
        assert_eq!(a.root().children[0].id, b.root().children[0].id);
        assert_eq!(a.root().connectors[0].id, b.root().connectors[0].id);
    }

    #[test]
    fn root_takes_model_key_name() {
        let component = load_rig();
        assert_eq!(component.root().name, "rig");
        assert!(matches!(
            component.resolve("rig.base"),
            Some(Resolved::Node(_))
        ));
    }

    #[test]
    fn attachment_ownership_follows_enclosing_body() {
        let component = load_rig();
        let root = component.root();
        let base_id = root.children[0].id;
        match &root.children[0].children[0].kind {
            NodeKind::Attachment(def) => assert_eq!(def.body, Some(base_id)),
            other => panic!("unexpected kind: {other:?}"),
        }
        match &root.children[1].kind {
            NodeKind::Attachment(def) => assert_eq!(def.body, None),
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn connector_references_resolve_to_ids() {
        let component = load_rig();
        let root = component.root();
        let connector = &root.connectors[0];
        assert_eq!(connector.attachment1_id, root.children[0].children[0].id);
        assert_eq!(connector.attachment2_id, root.children[1].id);
    }

    #[test]
    fn signal_target_resolution_distinguishes_body_and_connector() {
        let component = load_rig();
        match component.resolve_signal_target("base") {
            Some(SignalTarget::Body(node)) => assert_eq!(node.name, "base"),
            other => panic!("unexpected target: {other:?}"),
        }
        assert!(matches!(
            component.resolve_signal_target("joint"),
            Some(SignalTarget::MainInteraction(_))
        ));
        assert!(component.resolve_signal_target("anchor").is_none());
    }

    #[test]
    fn multi_connector_expands_pairwise() {
        let text = r#"{
            "models": {
                "chain": {
                    "root": {
                        "kind": "group",
                        "children": [
                            { "name": "a", "kind": "body",
                              "children": [ { "name": "f", "kind": "attachment" } ] },
                            { "name": "b", "kind": "body",
                              "children": [ { "name": "f", "kind": "attachment" } ] },
                            { "name": "c", "kind": "body",
                              "children": [ { "name": "f", "kind": "attachment" } ] }
                        ],
                        "multi_connectors": [
                            { "name": "links", "kind": "lock",
                              "attachments": ["a.f", "b.f", "c.f"] }
                        ]
                    }
                }
            }
        }"#;
        let component = parse_component(text, "chain", &LoaderConfig::default()).expect("load");
        let multi = &component.root().multi_connectors[0];
        assert_eq!(multi.expanded.len(), 2);
        assert_eq!(multi.expanded[0].name, "links_0");
        assert_eq!(multi.expanded[1].name, "links_1");
        assert_eq!(multi.expanded[0].attachment1, "a.f");
        assert_eq!(multi.expanded[0].attachment2, "b.f");
        assert!(matches!(
            component.resolve("chain.links_1"),
            Some(Resolved::Connector(_))
        ));
    }

    #[test]
    fn single_attachment_multi_connector_is_rejected() {
        let text = r#"{
            "models": {
                "m": {
                    "root": {
                        "kind": "group",
                        "children": [ { "name": "a", "kind": "attachment" } ],
                        "multi_connectors": [
                            { "name": "links", "kind": "lock", "attachments": ["a"] }
                        ]
                    }
                }
            }
        }"#;
        let err = parse_component(text, "m", &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, ModelError::Structure { .. }), "{err}");
    }

    #[test]
    fn zero_stiffness_is_rejected() {
        let text = r#"{
            "models": {
                "m": {
                    "root": {
                        "kind": "group",
                        "children": [ { "name": "a", "kind": "attachment" } ],
                        "connectors": [
                            { "name": "j", "kind": "hinge",
                              "attachment1": "a", "attachment2": "a",
                              "main_interaction": { "stiffness": { "along_normal": 0.0 } } }
                        ]
                    }
                }
            }
        }"#;
        let err = parse_component(text, "m", &LoaderConfig::default()).unwrap_err();
        match err {
            ModelError::InvalidValue { what, value } => {
                assert!(what.contains("m.j"), "{what}");
                assert_eq!(value, 0.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_controller_damping_is_rejected() {
        let text = r#"{
            "models": {
                "m": {
                    "root": {
                        "kind": "group",
                        "children": [ { "name": "a", "kind": "attachment" } ],
                        "connectors": [
                            { "name": "j", "kind": "hinge",
                              "attachment1": "a", "attachment2": "a",
                              "interactions": [
                                  { "name": "drive", "kind": "motor", "damping": -1.0 }
                              ] }
                        ]
                    }
                }
            }
        }"#;
        let err = parse_component(text, "m", &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidValue { .. }), "{err}");
    }

    #[test]
    fn duplicate_sibling_names_are_rejected() {
        let text = r#"{
            "models": {
                "m": {
                    "root": {
                        "kind": "group",
                        "children": [
                            { "name": "a", "kind": "group" },
                            { "name": "a", "kind": "group" }
                        ]
                    }
                }
            }
        }"#;
        let err = parse_component(text, "m", &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateName { .. }), "{err}");
    }

    #[test]
    fn unresolved_attachment_reference_is_rejected() {
        let text = r#"{
            "models": {
                "m": {
                    "root": {
                        "kind": "group",
                        "children": [ { "name": "a", "kind": "attachment" } ],
                        "connectors": [
                            { "name": "j", "kind": "hinge",
                              "attachment1": "a", "attachment2": "nowhere" }
                        ]
                    }
                }
            }
        }"#;
        let err = parse_component(text, "m", &LoaderConfig::default()).unwrap_err();
        match err {
            ModelError::UnresolvedReference { connector, path } => {
                assert_eq!(connector, "m.j");
                assert_eq!(path, "nowhere");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_model_name_errors() {
        let err = parse_component(RIG, "other", &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, ModelError::ModelNotFound { .. }), "{err}");
    }

    #[test]
    fn mesh_payload_parses_vertices_and_indices() {
        let text = r#"{
            "vertices": [[0, 0, 0], [1, 0, 0], [1, 1, 0]],
            "indices": [[0, 1, 2]]
        }"#;
        let mesh = parse_mesh(text).expect("parse");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.vertices[1], DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.indices, vec![[0, 1, 2]]);
    }

    #[test]
    fn mesh_payload_rejects_dangling_index() {
        let text = r#"{
            "vertices": [[0, 0, 0], [1, 0, 0]],
            "indices": [[0, 1, 2]]
        }"#;
        let err = parse_mesh(text).unwrap_err();
        assert!(err.contains("references vertex 2"), "{err}");
    }

    #[test]
    fn empty_mesh_payload_is_rejected() {
        let err = parse_mesh(r#"{ "vertices": [] }"#).unwrap_err();
        assert!(err.contains("no vertices"), "{err}");
    }

    #[test]
    fn mesh_slot_reports_missing_file() {
        let slot = MeshSlot::spawn(PathBuf::from("/nonexistent/payload.obj"));
        let err = slot.wait().unwrap_err();
        assert!(matches!(err, ModelError::MeshLoad { .. }), "{err}");
        // second wait hits the cached result
        assert!(slot.wait().is_err());
    }
}
