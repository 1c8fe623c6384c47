// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory address-space store: the registry all other components query.

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashSet;

use aspace_schema::{ids, ModelChangeVerb, NodeClass, NodeId};

use crate::changes::{ChangeSubscriber, ModelChangeRecord};
use crate::hierarchy::HierarchyError;
use crate::node::Node;
use crate::reference::Reference;

/// Error returned by structural mutations of [`AddressSpace`].
// Display/Error are hand-written: thiserror would treat the `source` field of
// `DuplicateReference` as an error source, which `NodeId` cannot be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A node with the same identity is already registered.
    DuplicateNodeId(NodeId),
    /// The named node does not exist in the store.
    NodeNotFound(NodeId),
    /// The reference type of an edge is not a registered ReferenceType node.
    UnknownReferenceType(NodeId),
    /// An edge with the same `(direction, type, target)` key already exists.
    DuplicateReference {
        /// Source node of the rejected edge.
        source: NodeId,
        /// Reference type of the rejected edge.
        reference_type: NodeId,
        /// Target node of the rejected edge.
        target: NodeId,
    },
    /// A node may have at most one direct supertype; a second HasSubtype
    /// pointing at it is a malformed model and is rejected at mutation time.
    AmbiguousSupertype {
        /// The would-be subtype.
        node: NodeId,
        /// Its already-registered supertype.
        existing: NodeId,
    },
    /// Self-referencing edges are never valid in an information model.
    SelfReference(NodeId),
    /// The operation requires a Variable or VariableType node.
    NotAVariable(NodeId),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNodeId(id) => write!(f, "duplicate node id: {id}"),
            Self::NodeNotFound(id) => write!(f, "node not found: {id}"),
            Self::UnknownReferenceType(id) => write!(f, "unknown reference type: {id}"),
            Self::DuplicateReference {
                source,
                reference_type,
                target,
            } => write!(f, "duplicate reference {reference_type} from {source} to {target}"),
            Self::AmbiguousSupertype { node, existing } => {
                write!(f, "node {node} already has supertype {existing}")
            }
            Self::SelfReference(id) => write!(f, "self reference on {id}"),
            Self::NotAVariable(id) => write!(f, "node {id} is not a variable"),
        }
    }
}

impl std::error::Error for GraphError {}

/// The global registry mapping node identity to node, plus the per-node
/// forward/inverse reference lists.
///
/// Storage is a `BTreeMap` so iteration order is deterministic; hot
/// membership checks go through `FxHashSet` indexes built on demand.
///
/// # Concurrency
/// Single-writer, synchronous. Read queries lazily fill the per-node subtype
/// caches without synchronization, so the store is `!Sync` by construction;
/// the surrounding server must serialize access to one address space.
pub struct AddressSpace {
    pub(crate) nodes: BTreeMap<NodeId, Node>,
    /// Epoch counter; bumped on every mutation that can change a subtype
    /// closure (ReferenceType registration, HasSubtype edges, type deletion).
    pub(crate) generation: u64,
    /// Namespace used for minted instance ids.
    pub(crate) mint_ns: u16,
    pub(crate) next_minted: u32,
    pub(crate) tx_depth: u32,
    pub(crate) pending: Vec<ModelChangeRecord>,
    pub(crate) subscribers: Vec<Option<ChangeSubscriber>>,
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressSpace")
            .field("nodes", &self.nodes.len())
            .field("generation", &self.generation)
            .field("tx_depth", &self.tx_depth)
            .finish_non_exhaustive()
    }
}

impl AddressSpace {
    /// Creates an empty address space. Minted instance ids land in
    /// namespace 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            generation: 0,
            mint_ns: 1,
            next_minted: 1,
            tx_depth: 0,
            pending: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// Sets the namespace index used for minted node ids.
    pub fn set_mint_namespace(&mut self, ns: u16) {
        self.mint_ns = ns;
    }

    /// Current cache-invalidation epoch.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when no nodes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by identity.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// `true` if a node with this identity is registered.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Iterate over all nodes in deterministic (id) order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Mints a fresh numeric node id in the mint namespace.
    ///
    /// Skips identities that are already registered, so loader-assigned ids
    /// in the same namespace cannot collide with minted ones.
    pub fn mint_node_id(&mut self) -> NodeId {
        loop {
            let id = NodeId::numeric(self.mint_ns, self.next_minted);
            self.next_minted = self.next_minted.wrapping_add(1);
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    /// Registers a node.
    ///
    /// # Errors
    /// [`GraphError::DuplicateNodeId`] when the identity is already taken.
    pub fn register(&mut self, node: Node) -> Result<(), GraphError> {
        if self.nodes.contains_key(node.node_id()) {
            return Err(GraphError::DuplicateNodeId(node.node_id().clone()));
        }
        if node.node_class() == NodeClass::ReferenceType {
            self.generation += 1;
        }
        self.nodes.insert(node.node_id().clone(), node);
        Ok(())
    }

    /// Adds a typed edge, inserting the forward view on `source` and the
    /// inverse view on `target`.
    ///
    /// Emits `ReferenceAdded` model-change records per the version-tracking
    /// rules; outside a transaction the records flush immediately as one
    /// batch.
    ///
    /// # Errors
    /// - [`GraphError::NodeNotFound`] when either endpoint is unregistered.
    /// - [`GraphError::UnknownReferenceType`] when `reference_type` is not a
    ///   registered ReferenceType node.
    /// - [`GraphError::SelfReference`] when `source == target`.
    /// - [`GraphError::DuplicateReference`] when the edge already exists.
    /// - [`GraphError::AmbiguousSupertype`] when a HasSubtype edge would give
    ///   `target` a second supertype (malformed model, spec'd as a hard error
    ///   at mutation time rather than a traversal-time assertion).
    pub fn add_reference(
        &mut self,
        source: &NodeId,
        reference_type: &NodeId,
        target: &NodeId,
    ) -> Result<(), GraphError> {
        if source == target {
            return Err(GraphError::SelfReference(source.clone()));
        }
        match self.nodes.get(reference_type) {
            Some(rt) if rt.node_class() == NodeClass::ReferenceType => {}
            _ => return Err(GraphError::UnknownReferenceType(reference_type.clone())),
        }
        let src = self
            .nodes
            .get(source)
            .ok_or_else(|| GraphError::NodeNotFound(source.clone()))?;
        let tgt = self
            .nodes
            .get(target)
            .ok_or_else(|| GraphError::NodeNotFound(target.clone()))?;
        if src.has_reference(true, reference_type, target)
            || tgt.has_reference(false, reference_type, source)
        {
            return Err(GraphError::DuplicateReference {
                source: source.clone(),
                reference_type: reference_type.clone(),
                target: target.clone(),
            });
        }
        if *reference_type == ids::HAS_SUBTYPE {
            if let Some(existing) = tgt.supertype() {
                return Err(GraphError::AmbiguousSupertype {
                    node: target.clone(),
                    existing: existing.clone(),
                });
            }
            self.generation += 1;
        }

        // Both lookups re-done mutably; the immutable borrows above are gone.
        if let Some(src) = self.nodes.get_mut(source) {
            src.push_reference(Reference::new(reference_type.clone(), target.clone(), true));
        }
        if let Some(tgt) = self.nodes.get_mut(target) {
            tgt.push_reference(Reference::new(reference_type.clone(), source.clone(), false));
        }

        self.note_reference_change(source, target, ModelChangeVerb::ReferenceAdded);
        self.flush_if_idle();
        Ok(())
    }

    /// Finds reference views on `source` matching direction and type.
    ///
    /// With `include_subtypes` the requested reference type matches itself or
    /// any of its subtypes, resolved through the type-hierarchy index — this
    /// is what lets an "all Aggregates" query follow HasComponent and
    /// HasProperty edges. An unregistered `source` yields an empty list.
    ///
    /// # Errors
    /// [`HierarchyError`] when `include_subtypes` is set and the requested
    /// reference type cannot be resolved as a type node.
    pub fn find_references(
        &self,
        source: &NodeId,
        reference_type: &NodeId,
        forward: bool,
        include_subtypes: bool,
    ) -> Result<Vec<&Reference>, HierarchyError> {
        let Some(node) = self.nodes.get(source) else {
            return Ok(Vec::new());
        };
        if include_subtypes {
            let index = self.subtype_index(reference_type)?;
            Ok(node
                .references()
                .iter()
                .filter(|r| r.is_forward() == forward && index.contains(r.reference_type()))
                .collect())
        } else {
            Ok(node
                .references()
                .iter()
                .filter(|r| r.is_forward() == forward && r.reference_type() == reference_type)
                .collect())
        }
    }

    /// Deletes a node and every edge referencing it in either direction.
    ///
    /// Emits `ReferenceDeleted` records for each hierarchical parent edge and
    /// a final `NodeDeleted`, gated on version-tracked ancestors exactly as
    /// additions are; outside a transaction the records flush immediately.
    ///
    /// # Errors
    /// [`GraphError::NodeNotFound`] when the node does not exist.
    pub fn delete_node(&mut self, id: &NodeId) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        let node_class = node.node_class();
        let node_tracked = node.node_version().is_some();
        let node_type = node.type_definition().cloned();
        let refs: Vec<Reference> = node.references().to_vec();

        if self.has_subscribers() {
            // Walk *all* hierarchical inverse references, not just the first
            // parent, before the graph loses them.
            for r in &refs {
                if r.is_forward() || !self.is_hierarchical(r.reference_type()) {
                    continue;
                }
                let parent = r.target().clone();
                if self.nearest_tracked_ancestor(&parent, true).is_some() {
                    let parent_type = self.nodes.get(&parent).and_then(|n| n.type_definition().cloned());
                    self.collect_change(ModelChangeRecord {
                        affected: parent,
                        affected_type: parent_type,
                        verb: ModelChangeVerb::ReferenceDeleted,
                    });
                }
                if node_tracked {
                    self.collect_change(ModelChangeRecord {
                        affected: id.clone(),
                        affected_type: node_type.clone(),
                        verb: ModelChangeVerb::ReferenceDeleted,
                    });
                }
            }
            if self.nearest_tracked_ancestor(id, true).is_some() {
                self.collect_change(ModelChangeRecord {
                    affected: id.clone(),
                    affected_type: node_type.clone(),
                    verb: ModelChangeVerb::NodeDeleted,
                });
            }
        }

        // Unlink the opposite view of every edge. Both views of one logical
        // edge live in this node's list plus the other endpoint's, so the own
        // list is the complete incident-edge set.
        for r in &refs {
            if let Some(other) = self.nodes.get_mut(r.target()) {
                other.remove_reference(!r.is_forward(), r.reference_type(), id);
            }
        }
        self.nodes.remove(id);

        if node_class == NodeClass::ReferenceType
            || refs.iter().any(|r| *r.reference_type() == ids::HAS_SUBTYPE)
        {
            self.generation += 1;
        }

        self.flush_if_idle();
        Ok(())
    }

    /// Changes a variable's declared data type, emitting `DataTypeChanged`
    /// when a version-tracked ancestor exists.
    ///
    /// # Errors
    /// - [`GraphError::NodeNotFound`] when the node does not exist.
    /// - [`GraphError::NotAVariable`] for non-variable node classes.
    pub fn set_data_type(&mut self, variable: &NodeId, data_type: NodeId) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get(variable)
            .ok_or_else(|| GraphError::NodeNotFound(variable.clone()))?;
        if !matches!(
            node.node_class(),
            NodeClass::Variable | NodeClass::VariableType
        ) {
            return Err(GraphError::NotAVariable(variable.clone()));
        }
        let affected_type = node.type_definition().cloned();
        if let Some(node) = self.nodes.get_mut(variable) {
            node.set_data_type(data_type);
        }
        if self.has_subscribers() && self.nearest_tracked_ancestor(variable, true).is_some() {
            self.collect_change(ModelChangeRecord {
                affected: variable.clone(),
                affected_type,
                verb: ModelChangeVerb::DataTypeChanged,
            });
        }
        self.flush_if_idle();
        Ok(())
    }

    /// `true` when the reference type is a subtype of HierarchicalReferences.
    ///
    /// Graphs without the standard nucleus have no hierarchy to speak of;
    /// everything is treated as non-hierarchical there.
    pub(crate) fn is_hierarchical(&self, reference_type: &NodeId) -> bool {
        self.subtype_index(&ids::HIERARCHICAL_REFERENCES)
            .is_ok_and(|index| index.contains(reference_type))
    }

    /// Finds the nearest version-tracked node walking up hierarchical
    /// inverse references (breadth-first, so "nearest" is by hop count).
    pub(crate) fn nearest_tracked_ancestor(
        &self,
        start: &NodeId,
        include_self: bool,
    ) -> Option<NodeId> {
        let mut queue = std::collections::VecDeque::new();
        let mut visited = FxHashSet::default();
        if include_self {
            queue.push_back(start.clone());
        } else if let Some(node) = self.nodes.get(start) {
            for r in node.references() {
                if !r.is_forward() && self.is_hierarchical(r.reference_type()) {
                    queue.push_back(r.target().clone());
                }
            }
        }
        while let Some(id) = queue.pop_front() {
            if !visited.insert(id.clone()) {
                continue;
            }
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if node.node_version().is_some() {
                return Some(id);
            }
            for r in node.references() {
                if !r.is_forward() && self.is_hierarchical(r.reference_type()) {
                    queue.push_back(r.target().clone());
                }
            }
        }
        None
    }

    fn note_reference_change(&mut self, source: &NodeId, target: &NodeId, verb: ModelChangeVerb) {
        if !self.has_subscribers() {
            return;
        }
        if self.nearest_tracked_ancestor(source, true).is_some() {
            let affected_type = self.nodes.get(source).and_then(|n| n.type_definition().cloned());
            self.collect_change(ModelChangeRecord {
                affected: source.clone(),
                affected_type,
                verb,
            });
        }
        // Bidirectional edge: report the reverse direction when the child
        // itself tracks versions.
        if self
            .nodes
            .get(target)
            .is_some_and(|n| n.node_version().is_some())
        {
            let affected_type = self.nodes.get(target).and_then(|n| n.type_definition().cloned());
            self.collect_change(ModelChangeRecord {
                affected: target.clone(),
                affected_type,
                verb,
            });
        }
    }
}
