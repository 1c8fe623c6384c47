// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Node records: vertices of the address-space graph.

use std::cell::RefCell;

use aspace_schema::{ids, ModellingRule, NodeClass, NodeId, QualifiedName};

use crate::reference::Reference;

/// Cached subtype closure of a type node.
///
/// Valid only while `generation` equals the address space's current
/// generation counter; stale entries are recomputed on the next query, never
/// cleared explicitly.
#[derive(Debug, Clone)]
pub(crate) struct SubtypeCache {
    pub(crate) generation: u64,
    pub(crate) closure: Vec<NodeId>,
}

/// A vertex of the address-space graph.
///
/// Carries the attributes the engine reasons about: identity, browse name,
/// node class (fixed at construction), abstractness, the modelling rule for
/// type-level children, the declared data type for variables, and the
/// combined forward/inverse reference list. The node's lifetime is owned by
/// the [`crate::AddressSpace`] that registered it; nodes never own other
/// nodes, only reference edges by identity.
///
/// Invariants
/// - `browse_name` is unique among siblings reached from one parent via the
///   same reference, not globally.
/// - At most one inverse `HasSubtype` reference (a single direct supertype);
///   [`crate::AddressSpace::add_reference`] enforces this.
/// - `modelling_rule` is resolved once at construction; the engine never
///   re-parses rule objects during filtering.
#[derive(Debug)]
pub struct Node {
    node_id: NodeId,
    browse_name: QualifiedName,
    node_class: NodeClass,
    is_abstract: bool,
    modelling_rule: Option<ModellingRule>,
    data_type: Option<NodeId>,
    node_version: Option<String>,
    references: Vec<Reference>,
    subtype_cache: RefCell<Option<SubtypeCache>>,
}

impl Node {
    /// Constructs a node with the given identity, browse name, and class.
    #[must_use]
    pub fn new(node_id: NodeId, browse_name: QualifiedName, node_class: NodeClass) -> Self {
        Self {
            node_id,
            browse_name,
            node_class,
            is_abstract: false,
            modelling_rule: None,
            data_type: None,
            node_version: None,
            references: Vec::new(),
            subtype_cache: RefCell::new(None),
        }
    }

    /// Marks the node abstract (type nodes only; ignored elsewhere).
    #[must_use]
    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    /// Attaches a modelling rule (type-level children only).
    #[must_use]
    pub fn with_modelling_rule(mut self, rule: ModellingRule) -> Self {
        self.modelling_rule = Some(rule);
        self
    }

    /// Sets the declared data type (variables only).
    #[must_use]
    pub fn with_data_type(mut self, data_type: NodeId) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Populates the NodeVersion property, making the node version-tracked
    /// for model-change reporting.
    #[must_use]
    pub fn with_node_version(mut self, version: impl Into<String>) -> Self {
        self.node_version = Some(version.into());
        self
    }

    /// Node identity.
    #[must_use]
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Namespace-qualified browse name.
    #[must_use]
    pub fn browse_name(&self) -> &QualifiedName {
        &self.browse_name
    }

    /// Node-class discriminant.
    #[must_use]
    pub fn node_class(&self) -> NodeClass {
        self.node_class
    }

    /// `true` for abstract type nodes.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Modelling rule, if the node is a type-level child.
    #[must_use]
    pub fn modelling_rule(&self) -> Option<ModellingRule> {
        self.modelling_rule
    }

    /// Declared data type, if the node is a variable.
    #[must_use]
    pub fn data_type(&self) -> Option<&NodeId> {
        self.data_type.as_ref()
    }

    /// NodeVersion property value; `Some` means the node is version-tracked.
    #[must_use]
    pub fn node_version(&self) -> Option<&str> {
        self.node_version.as_deref()
    }

    /// All reference views held by this node (forward and inverse).
    #[must_use]
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// The unique direct supertype: target of the inverse HasSubtype view.
    #[must_use]
    pub fn supertype(&self) -> Option<&NodeId> {
        self.references
            .iter()
            .find(|r| !r.is_forward() && *r.reference_type() == ids::HAS_SUBTYPE)
            .map(Reference::target)
    }

    /// The type definition: target of the forward HasTypeDefinition view.
    #[must_use]
    pub fn type_definition(&self) -> Option<&NodeId> {
        self.references
            .iter()
            .find(|r| r.is_forward() && *r.reference_type() == ids::HAS_TYPE_DEFINITION)
            .map(Reference::target)
    }

    /// Copies the static attributes into a fresh node under a new identity.
    ///
    /// References and the subtype cache are never carried over; the
    /// instantiation engine reconstructs edges explicitly.
    #[must_use]
    pub(crate) fn clone_definition(&self, node_id: NodeId, copy_modelling_rule: bool) -> Self {
        Self {
            node_id,
            browse_name: self.browse_name.clone(),
            node_class: self.node_class,
            is_abstract: self.is_abstract,
            modelling_rule: if copy_modelling_rule {
                self.modelling_rule
            } else {
                None
            },
            data_type: self.data_type.clone(),
            node_version: self.node_version.clone(),
            references: Vec::new(),
            subtype_cache: RefCell::new(None),
        }
    }

    pub(crate) fn push_reference(&mut self, reference: Reference) {
        self.references.push(reference);
    }

    pub(crate) fn has_reference(
        &self,
        is_forward: bool,
        reference_type: &NodeId,
        target: &NodeId,
    ) -> bool {
        self.references
            .iter()
            .any(|r| r.matches(is_forward, reference_type, target))
    }

    /// Removes the view matching the identity key; returns `true` if present.
    pub(crate) fn remove_reference(
        &mut self,
        is_forward: bool,
        reference_type: &NodeId,
        target: &NodeId,
    ) -> bool {
        let before = self.references.len();
        self.references
            .retain(|r| !r.matches(is_forward, reference_type, target));
        self.references.len() != before
    }

    pub(crate) fn set_data_type(&mut self, data_type: NodeId) {
        self.data_type = Some(data_type);
    }

    /// Returns the cached closure when stamped with the current generation.
    pub(crate) fn cached_subtypes(&self, generation: u64) -> Option<Vec<NodeId>> {
        self.subtype_cache
            .borrow()
            .as_ref()
            .filter(|c| c.generation == generation)
            .map(|c| c.closure.clone())
    }

    pub(crate) fn store_subtype_cache(&self, generation: u64, closure: Vec<NodeId>) {
        *self.subtype_cache.borrow_mut() = Some(SubtypeCache {
            generation,
            closure,
        });
    }
}
