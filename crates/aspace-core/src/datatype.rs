// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Data-type compatibility: is a runtime value's type assignable to a
//! declared data type?

use thiserror::Error;

use aspace_schema::{ids, NodeClass, NodeId};

use crate::graph::AddressSpace;
use crate::hierarchy::HierarchyError;

/// Error returned by [`AddressSpace::is_assignable`].
///
/// Incompatible combinations are a `false` result, never an error; errors
/// mean the declared side of the check cannot be resolved at all (graph
/// corruption).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataTypeError {
    /// The declared data type is not a registered DataType node.
    #[error("unknown data type: {0}")]
    UnknownDataType(NodeId),
    /// A hierarchy query on the declared type failed underneath.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

impl AddressSpace {
    /// May a value of runtime data type `actual` be written where `declared`
    /// is the declared data type?
    ///
    /// `actual` is the id of the value's data type; [`NodeId::null`] stands
    /// for a Null value and is accepted iff `allow_null`. Declared types
    /// reduce to their nearest built-in ancestor unless abstract (abstract
    /// declarations like `Number` are matched directly); enumeration
    /// subtypes accept only the integer transport types; `Structure`
    /// subtypes accept any structured actual — structure-shape checking
    /// belongs to the encoder, not this core.
    ///
    /// # Errors
    /// [`DataTypeError::UnknownDataType`] when `declared` is not a
    /// registered DataType node; mismatches on the actual side are `Ok(false)`.
    pub fn is_assignable(
        &self,
        declared: &NodeId,
        actual: &NodeId,
        allow_null: bool,
    ) -> Result<bool, DataTypeError> {
        if actual.is_null() {
            return Ok(allow_null);
        }
        let declared_node = self
            .node(declared)
            .filter(|n| n.node_class() == NodeClass::DataType)
            .ok_or_else(|| DataTypeError::UnknownDataType(declared.clone()))?;

        // The actual side never errors: an unresolvable or non-data-type
        // actual is simply not assignable.
        let actual_ok = self
            .node(actual)
            .is_some_and(|n| n.node_class() == NodeClass::DataType);
        if !actual_ok {
            return Ok(false);
        }
        let Some(actual_builtin) = self.builtin_ancestor(actual)? else {
            return Ok(false);
        };

        // Generic structured payloads are accepted against any Structure
        // subtype unconditionally.
        if self.is_subtype_of(declared, &ids::STRUCTURE)? && actual_builtin == ids::STRUCTURE {
            return Ok(true);
        }

        let reduced = if declared_node.is_abstract() {
            declared.clone()
        } else {
            self.builtin_ancestor(declared)?.unwrap_or_else(|| {
                tracing::debug!(
                    node = %declared,
                    "declared data type has no built-in ancestor; matching directly"
                );
                declared.clone()
            })
        };

        // Standard enumerations travel as Int32; accept the integer kinds.
        if self.is_subtype_of(declared, &ids::ENUMERATION)? {
            return Ok(ids::ENUMERATION_TRANSPORT_TYPES.contains(&actual_builtin));
        }

        Ok(self.is_subtype_of(&actual_builtin, &reduced)?)
    }

    /// Walks the supertype chain from `id` (inclusive) to the nearest
    /// built-in data type, `None` when the chain holds none.
    fn builtin_ancestor(&self, id: &NodeId) -> Result<Option<NodeId>, DataTypeError> {
        let mut current = id.clone();
        let mut hops = 0usize;
        loop {
            if ids::BUILTIN_DATA_TYPES.contains(&current) {
                return Ok(Some(current));
            }
            let node = self
                .node(&current)
                .ok_or_else(|| DataTypeError::UnknownDataType(current.clone()))?;
            match node.supertype() {
                Some(s) => current = s.clone(),
                None => return Ok(None),
            }
            hops += 1;
            if hops > self.len() {
                return Err(HierarchyError::SubtypeCycle(current).into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::standard;

    fn space() -> AddressSpace {
        let mut space = AddressSpace::new();
        standard::bootstrap(&mut space).unwrap();
        space
    }

    #[test]
    fn builtin_reduction_stops_at_the_first_builtin() {
        let space = space();
        assert_eq!(
            space.builtin_ancestor(&ids::DOUBLE).unwrap(),
            Some(ids::DOUBLE)
        );
        // Abstract categories above the builtins reduce to nothing.
        assert_eq!(space.builtin_ancestor(&ids::NUMBER).unwrap(), None);
    }

    #[test]
    fn unknown_declared_type_is_an_error() {
        let space = space();
        let bogus = NodeId::numeric(9, 999);
        assert!(matches!(
            space.is_assignable(&bogus, &ids::INT32, false),
            Err(DataTypeError::UnknownDataType(_))
        ));
        // An unknown *actual* is a mismatch, not an error.
        assert_eq!(space.is_assignable(&ids::INT32, &bogus, false), Ok(false));
    }
}
