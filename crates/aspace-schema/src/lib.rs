// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! aspace-schema: shared vocabulary for the OPC UA information-model engine.
//!
//! Pure data: node identities, browse names, node classes, modelling rules,
//! model-change verbs, and the well-known numeric ids of the standard
//! namespace. No graph logic lives here; `aspace-core` consumes these types.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]

pub mod ids;

use core::fmt;

/// Identifier payload of a [`NodeId`].
///
/// OPC UA permits numeric, string, GUID, and opaque (byte-string)
/// identifiers; GUIDs are carried here as opaque bytes since the engine never
/// inspects their structure.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Identifier {
    /// Numeric identifier (the standard namespace uses these exclusively).
    Numeric(u32),
    /// String identifier.
    String(String),
    /// Opaque byte-string identifier (includes GUIDs).
    Opaque(Vec<u8>),
}

/// Globally unique node identity within one address space.
///
/// Equality is value equality, never pointer identity. `NodeId` is immutable;
/// every edge in the graph refers to its endpoints through these values.
///
/// # Invariants
/// - `ns=0;i=0` is the canonical *null* id ([`NodeId::null`]) and never names
///   a registered node. The assignability checker uses it as the "Null"
///   actual data type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId {
    /// Namespace index.
    pub ns: u16,
    /// Identifier payload.
    pub id: Identifier,
}

impl NodeId {
    /// Constructs a numeric node id.
    #[must_use]
    pub const fn numeric(ns: u16, value: u32) -> Self {
        Self {
            ns,
            id: Identifier::Numeric(value),
        }
    }

    /// Constructs a string node id.
    #[must_use]
    pub fn string(ns: u16, value: impl Into<String>) -> Self {
        Self {
            ns,
            id: Identifier::String(value.into()),
        }
    }

    /// Constructs an opaque node id from raw bytes.
    #[must_use]
    pub fn opaque(ns: u16, value: impl Into<Vec<u8>>) -> Self {
        Self {
            ns,
            id: Identifier::Opaque(value.into()),
        }
    }

    /// The canonical null id (`ns=0;i=0`).
    #[must_use]
    pub const fn null() -> Self {
        Self::numeric(0, 0)
    }

    /// Returns `true` for the canonical null id.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.ns == 0 && matches!(self.id, Identifier::Numeric(0))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Identifier::Numeric(v) => write!(f, "ns={};i={v}", self.ns),
            Identifier::String(v) => write!(f, "ns={};s={v}", self.ns),
            Identifier::Opaque(v) => write!(f, "ns={};b={}B", self.ns, v.len()),
        }
    }
}

/// Namespace-qualified browse name.
///
/// Unique among the siblings reached from one parent via the same reference,
/// not globally; sibling dedup during instantiation compares these values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualifiedName {
    /// Namespace index of the name.
    pub ns: u16,
    /// The name itself.
    pub name: String,
}

impl QualifiedName {
    /// Constructs a qualified name.
    #[must_use]
    pub fn new(ns: u16, name: impl Into<String>) -> Self {
        Self {
            ns,
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ns, self.name)
    }
}

/// Node-class discriminant, fixed at node construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeClass {
    /// Concrete object instance.
    Object,
    /// Concrete variable instance.
    Variable,
    /// Callable method.
    Method,
    /// Object type definition.
    ObjectType,
    /// Variable type definition.
    VariableType,
    /// Reference type definition (edge vocabulary).
    ReferenceType,
    /// Data type definition.
    DataType,
    /// Browse view.
    View,
}

impl NodeClass {
    /// Returns `true` for the four type-definition classes.
    #[must_use]
    pub const fn is_type(self) -> bool {
        matches!(
            self,
            Self::ObjectType | Self::VariableType | Self::ReferenceType | Self::DataType
        )
    }

    /// Returns `true` for instance classes (Object/Variable/Method).
    #[must_use]
    pub const fn is_instance(self) -> bool {
        matches!(self, Self::Object | Self::Variable | Self::Method)
    }
}

/// Modelling rule attached to a type-level child.
///
/// Resolved once when a node is constructed, from the standard rule-object
/// id; the engine never re-parses rule names during filtering. Children with
/// no rule (or an unrecognized one) carry `None` and are never instantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModellingRule {
    /// Always cloned onto instances.
    Mandatory,
    /// Cloned only when requested (by path or copy-all).
    Optional,
    /// Template for user-created, dynamically named children; never
    /// auto-cloned.
    OptionalPlaceholder,
}

impl ModellingRule {
    /// Maps a standard rule-object id to a rule, `None` for anything
    /// unrecognized.
    #[must_use]
    pub fn from_rule_object(id: &NodeId) -> Option<Self> {
        if *id == ids::MODELLING_RULE_MANDATORY {
            Some(Self::Mandatory)
        } else if *id == ids::MODELLING_RULE_OPTIONAL {
            Some(Self::Optional)
        } else if *id == ids::MODELLING_RULE_OPTIONAL_PLACEHOLDER {
            Some(Self::OptionalPlaceholder)
        } else {
            None
        }
    }
}

/// Verb of a model-change record.
///
/// Values are bitmask-compatible with the wire-level change-structure verb
/// mask; each record carries exactly one verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelChangeVerb {
    /// A node was added.
    NodeAdded,
    /// A node was deleted.
    NodeDeleted,
    /// A reference was added.
    ReferenceAdded,
    /// A reference was deleted.
    ReferenceDeleted,
    /// A variable's data type changed.
    DataTypeChanged,
}

impl ModelChangeVerb {
    /// Bitmask value of this verb.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::NodeAdded => 1,
            Self::NodeDeleted => 2,
            Self::ReferenceAdded => 4,
            Self::ReferenceDeleted => 8,
            Self::DataTypeChanged => 16,
        }
    }
}
