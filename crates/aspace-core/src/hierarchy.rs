// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Type-hierarchy index: subtype reasoning over HasSubtype edges.
//!
//! Closures are memoized per type node, stamped with the address space's
//! generation counter. A stale stamp means some ReferenceType/HasSubtype
//! mutation happened since the closure was computed and the entry is
//! recomputed on the next query — callers never invalidate anything
//! explicitly.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use thiserror::Error;

use aspace_schema::{ids, NodeClass, NodeId};

use crate::graph::AddressSpace;

/// Error returned by type-hierarchy queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// The queried node does not exist in the graph.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
    /// Hierarchy queries are defined on type nodes only; asking with an
    /// instance is a programming error, signaled immediately.
    #[error("node {node} is {class:?}, not a type node")]
    NotATypeNode {
        /// The offending node.
        node: NodeId,
        /// Its actual class.
        class: NodeClass,
    },
    /// A HasSubtype cycle was found. Conformant models are acyclic; rather
    /// than hang, traversal fails fast at the first revisited node.
    #[error("subtype cycle through {0}")]
    SubtypeCycle(NodeId),
}

impl AddressSpace {
    /// Is `node` equal to or a transitive subtype of `candidate_super`?
    ///
    /// Walks the (unique) supertype chain upward from `node`.
    ///
    /// # Errors
    /// - [`HierarchyError::NotATypeNode`] when either argument is not a type
    ///   node.
    /// - [`HierarchyError::NodeNotFound`] when an id cannot be resolved.
    /// - [`HierarchyError::SubtypeCycle`] on a cyclic chain.
    pub fn is_subtype_of(
        &self,
        node: &NodeId,
        candidate_super: &NodeId,
    ) -> Result<bool, HierarchyError> {
        let start = self.require_type_node(node)?;
        self.require_type_node(candidate_super)?;
        if node == candidate_super {
            return Ok(true);
        }
        let mut visited: FxHashSet<NodeId> = FxHashSet::default();
        let mut current = start;
        loop {
            let Some(sup) = current.supertype() else {
                return Ok(false);
            };
            if sup == candidate_super {
                return Ok(true);
            }
            if !visited.insert(sup.clone()) {
                return Err(HierarchyError::SubtypeCycle(sup.clone()));
            }
            current = self
                .node(sup)
                .ok_or_else(|| HierarchyError::NodeNotFound(sup.clone()))?;
        }
    }

    /// The closure of `root` and all its transitive subtypes.
    ///
    /// Order is breadth-first over the registered reference order: stable
    /// across calls as long as the graph does not mutate. The result is
    /// memoized on the root node keyed by the current generation.
    ///
    /// # Errors
    /// Same conditions as [`Self::is_subtype_of`].
    pub fn all_subtypes(&self, root: &NodeId) -> Result<Vec<NodeId>, HierarchyError> {
        let root_node = self.require_type_node(root)?;
        if let Some(cached) = root_node.cached_subtypes(self.generation) {
            return Ok(cached);
        }

        let mut out = Vec::new();
        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        seen.insert(root.clone());
        queue.push_back(root.clone());
        while let Some(id) = queue.pop_front() {
            let node = self
                .node(&id)
                .ok_or_else(|| HierarchyError::NodeNotFound(id.clone()))?;
            out.push(id);
            for r in node.references() {
                if r.is_forward() && *r.reference_type() == ids::HAS_SUBTYPE {
                    // Single-supertype invariant makes the subtype graph a
                    // forest; a revisit can only mean a cycle.
                    if !seen.insert(r.target().clone()) {
                        return Err(HierarchyError::SubtypeCycle(r.target().clone()));
                    }
                    queue.push_back(r.target().clone());
                }
            }
        }

        root_node.store_subtype_cache(self.generation, out.clone());
        Ok(out)
    }

    /// The subtype closure as a set, for O(1) membership tests.
    ///
    /// # Errors
    /// Same conditions as [`Self::all_subtypes`].
    pub fn subtype_index(&self, root: &NodeId) -> Result<FxHashSet<NodeId>, HierarchyError> {
        Ok(self.all_subtypes(root)?.into_iter().collect())
    }

    fn require_type_node(&self, id: &NodeId) -> Result<&crate::node::Node, HierarchyError> {
        let node = self
            .node(id)
            .ok_or_else(|| HierarchyError::NodeNotFound(id.clone()))?;
        if !node.node_class().is_type() {
            return Err(HierarchyError::NotATypeNode {
                node: id.clone(),
                class: node.node_class(),
            });
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::node::Node;
    use aspace_schema::QualifiedName;

    fn ref_type(id: NodeId, name: &str) -> Node {
        Node::new(id, QualifiedName::new(0, name), NodeClass::ReferenceType)
    }

    fn chain_space() -> AddressSpace {
        let mut space = AddressSpace::new();
        space.register(ref_type(ids::HAS_SUBTYPE, "HasSubtype")).unwrap();
        space.register(ref_type(ids::HAS_CHILD, "HasChild")).unwrap();
        space.register(ref_type(ids::AGGREGATES, "Aggregates")).unwrap();
        space.register(ref_type(ids::HAS_COMPONENT, "HasComponent")).unwrap();
        space
            .add_reference(&ids::HAS_CHILD, &ids::HAS_SUBTYPE, &ids::AGGREGATES)
            .unwrap();
        space
            .add_reference(&ids::AGGREGATES, &ids::HAS_SUBTYPE, &ids::HAS_COMPONENT)
            .unwrap();
        space
    }

    #[test]
    fn subtype_walk_reaches_transitive_ancestors() {
        let space = chain_space();
        assert!(space.is_subtype_of(&ids::HAS_COMPONENT, &ids::HAS_CHILD).unwrap());
        assert!(space.is_subtype_of(&ids::HAS_COMPONENT, &ids::HAS_COMPONENT).unwrap());
        assert!(!space.is_subtype_of(&ids::HAS_CHILD, &ids::HAS_COMPONENT).unwrap());
    }

    #[test]
    fn non_type_nodes_are_rejected_immediately() {
        let mut space = chain_space();
        let obj = NodeId::numeric(1, 5);
        space
            .register(Node::new(obj.clone(), QualifiedName::new(1, "Obj"), NodeClass::Object))
            .unwrap();
        let err = space.is_subtype_of(&obj, &ids::HAS_CHILD).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::NotATypeNode {
                node: obj,
                class: NodeClass::Object,
            }
        );
    }

    #[test]
    fn closure_is_memoized_until_generation_moves() {
        let mut space = chain_space();
        let first = space.all_subtypes(&ids::HAS_CHILD).unwrap();
        assert_eq!(first.len(), 3);

        // Register a new subtype; the stale cache must be ignored without any
        // explicit invalidation call.
        let has_property = ids::HAS_PROPERTY;
        space.register(ref_type(has_property.clone(), "HasProperty")).unwrap();
        space
            .add_reference(&ids::AGGREGATES, &ids::HAS_SUBTYPE, &has_property)
            .unwrap();
        let second = space.all_subtypes(&ids::HAS_CHILD).unwrap();
        assert_eq!(second.len(), 4);
        assert!(second.contains(&has_property));
    }

    #[test]
    fn cycles_fail_fast() {
        let mut space = AddressSpace::new();
        space.register(ref_type(ids::HAS_SUBTYPE, "HasSubtype")).unwrap();
        let a = NodeId::numeric(1, 1);
        let b = NodeId::numeric(1, 2);
        space.register(ref_type(a.clone(), "A")).unwrap();
        space.register(ref_type(b.clone(), "B")).unwrap();
        space.add_reference(&a, &ids::HAS_SUBTYPE, &b).unwrap();
        // b -> a would give `a` a supertype; `a` has none yet, so the edge is
        // accepted and the result is a two-node cycle.
        space.add_reference(&b, &ids::HAS_SUBTYPE, &a).unwrap();

        assert!(matches!(
            space.all_subtypes(&a).unwrap_err(),
            HierarchyError::SubtypeCycle(_)
        ));
        assert!(matches!(
            space.is_subtype_of(&a, &ids::HAS_SUBTYPE).unwrap_err(),
            HierarchyError::SubtypeCycle(_)
        ));
    }
}
