// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reference records: typed directed edges between node identities.

use aspace_schema::NodeId;

/// One directional view of a typed edge between two nodes.
///
/// The forward view lives in the source node's reference list, the inverse
/// view in the target's; both describe the same logical edge. A reference is
/// immutable after construction and owns no nodes, only identities.
///
/// Invariants
/// - Identity of a reference within one node's list is
///   `(is_forward, reference_type, target)`; [`crate::AddressSpace`] rejects
///   duplicates by that key.
/// - `reference_type` names a registered ReferenceType node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reference {
    reference_type: NodeId,
    target: NodeId,
    is_forward: bool,
}

impl Reference {
    /// Constructs a reference view.
    #[must_use]
    pub fn new(reference_type: NodeId, target: NodeId, is_forward: bool) -> Self {
        Self {
            reference_type,
            target,
            is_forward,
        }
    }

    /// The reference-type id of this edge.
    #[must_use]
    pub fn reference_type(&self) -> &NodeId {
        &self.reference_type
    }

    /// The node on the other end of this view.
    #[must_use]
    pub fn target(&self) -> &NodeId {
        &self.target
    }

    /// `true` for the forward view, `false` for the inverse view.
    #[must_use]
    pub fn is_forward(&self) -> bool {
        self.is_forward
    }

    /// Returns `true` when this view matches the given identity key.
    pub(crate) fn matches(&self, is_forward: bool, reference_type: &NodeId, target: &NodeId) -> bool {
        self.is_forward == is_forward
            && self.reference_type == *reference_type
            && self.target == *target
    }
}

impl core::fmt::Display for Reference {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let arrow = if self.is_forward { "->" } else { "<-" };
        write!(f, "[{}] {} {}", self.reference_type, arrow, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aspace_schema::ids;

    #[test]
    fn identity_key_matching() {
        let r = Reference::new(ids::HAS_COMPONENT, NodeId::numeric(2, 10), true);
        assert!(r.matches(true, &ids::HAS_COMPONENT, &NodeId::numeric(2, 10)));
        assert!(!r.matches(false, &ids::HAS_COMPONENT, &NodeId::numeric(2, 10)));
        assert!(!r.matches(true, &ids::HAS_PROPERTY, &NodeId::numeric(2, 10)));
        assert!(!r.matches(true, &ids::HAS_COMPONENT, &NodeId::numeric(2, 11)));
    }

    #[test]
    fn display_direction() {
        let fwd = Reference::new(ids::HAS_SUBTYPE, NodeId::numeric(0, 61), true);
        let inv = Reference::new(ids::HAS_SUBTYPE, NodeId::numeric(0, 58), false);
        assert_eq!(fwd.to_string(), "[ns=0;i=45] -> ns=0;i=61");
        assert_eq!(inv.to_string(), "[ns=0;i=45] <- ns=0;i=58");
    }
}
