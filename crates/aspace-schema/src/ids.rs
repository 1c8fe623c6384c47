// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Well-known numeric ids of the standard namespace (ns 0).
//!
//! These are the protocol-assigned identifiers from the OPC UA standard
//! nodeset; only the subset the engine reasons about is listed. The ids are
//! wire constants and must never change.

use crate::NodeId;

// ── Reference types ─────────────────────────────────────────────────

/// Root of the reference-type hierarchy.
pub const REFERENCES: NodeId = NodeId::numeric(0, 31);
/// Non-hierarchical reference category.
pub const NON_HIERARCHICAL_REFERENCES: NodeId = NodeId::numeric(0, 32);
/// Hierarchical reference category.
pub const HIERARCHICAL_REFERENCES: NodeId = NodeId::numeric(0, 33);
/// Parent/child references.
pub const HAS_CHILD: NodeId = NodeId::numeric(0, 34);
/// Folder-style organization references.
pub const ORGANIZES: NodeId = NodeId::numeric(0, 35);
/// Event-source hierarchy references.
pub const HAS_EVENT_SOURCE: NodeId = NodeId::numeric(0, 36);
/// Links a node to its modelling-rule object.
pub const HAS_MODELLING_RULE: NodeId = NodeId::numeric(0, 37);
/// Links an instance to its type definition.
pub const HAS_TYPE_DEFINITION: NodeId = NodeId::numeric(0, 40);
/// Structural parent/child category (components + properties).
pub const AGGREGATES: NodeId = NodeId::numeric(0, 44);
/// Forms the type-inheritance graph (supertype → subtype).
pub const HAS_SUBTYPE: NodeId = NodeId::numeric(0, 45);
/// Property parent/child edge.
pub const HAS_PROPERTY: NodeId = NodeId::numeric(0, 46);
/// Component parent/child edge.
pub const HAS_COMPONENT: NodeId = NodeId::numeric(0, 47);
/// Ordered component parent/child edge.
pub const HAS_ORDERED_COMPONENT: NodeId = NodeId::numeric(0, 49);

// ── Object and variable types ───────────────────────────────────────

/// Root object type.
pub const BASE_OBJECT_TYPE: NodeId = NodeId::numeric(0, 58);
/// Folder object type.
pub const FOLDER_TYPE: NodeId = NodeId::numeric(0, 61);
/// Root variable type.
pub const BASE_VARIABLE_TYPE: NodeId = NodeId::numeric(0, 62);
/// Data-variable type.
pub const BASE_DATA_VARIABLE_TYPE: NodeId = NodeId::numeric(0, 63);
/// Property variable type.
pub const PROPERTY_TYPE: NodeId = NodeId::numeric(0, 68);

// ── Modelling-rule objects ──────────────────────────────────────────

/// The `Mandatory` rule object.
pub const MODELLING_RULE_MANDATORY: NodeId = NodeId::numeric(0, 78);
/// The `Optional` rule object.
pub const MODELLING_RULE_OPTIONAL: NodeId = NodeId::numeric(0, 80);
/// The `OptionalPlaceholder` rule object.
pub const MODELLING_RULE_OPTIONAL_PLACEHOLDER: NodeId = NodeId::numeric(0, 11508);

// ── Data types ──────────────────────────────────────────────────────

/// Abstract root of the data-type hierarchy.
pub const BASE_DATA_TYPE: NodeId = NodeId::numeric(0, 24);
/// Boolean.
pub const BOOLEAN: NodeId = NodeId::numeric(0, 1);
/// Signed 8-bit integer.
pub const SBYTE: NodeId = NodeId::numeric(0, 2);
/// Unsigned 8-bit integer.
pub const BYTE: NodeId = NodeId::numeric(0, 3);
/// Signed 16-bit integer.
pub const INT16: NodeId = NodeId::numeric(0, 4);
/// Unsigned 16-bit integer.
pub const UINT16: NodeId = NodeId::numeric(0, 5);
/// Signed 32-bit integer.
pub const INT32: NodeId = NodeId::numeric(0, 6);
/// Unsigned 32-bit integer.
pub const UINT32: NodeId = NodeId::numeric(0, 7);
/// Signed 64-bit integer.
pub const INT64: NodeId = NodeId::numeric(0, 8);
/// Unsigned 64-bit integer.
pub const UINT64: NodeId = NodeId::numeric(0, 9);
/// 32-bit float.
pub const FLOAT: NodeId = NodeId::numeric(0, 10);
/// 64-bit float.
pub const DOUBLE: NodeId = NodeId::numeric(0, 11);
/// UTF-8 string.
pub const STRING: NodeId = NodeId::numeric(0, 12);
/// Timestamp.
pub const DATE_TIME: NodeId = NodeId::numeric(0, 13);
/// GUID.
pub const GUID: NodeId = NodeId::numeric(0, 14);
/// Byte string.
pub const BYTE_STRING: NodeId = NodeId::numeric(0, 15);
/// XML element.
pub const XML_ELEMENT: NodeId = NodeId::numeric(0, 16);
/// NodeId value.
pub const NODE_ID: NodeId = NodeId::numeric(0, 17);
/// Expanded NodeId value.
pub const EXPANDED_NODE_ID: NodeId = NodeId::numeric(0, 18);
/// Status code.
pub const STATUS_CODE: NodeId = NodeId::numeric(0, 19);
/// Qualified name value.
pub const QUALIFIED_NAME: NodeId = NodeId::numeric(0, 20);
/// Localized text.
pub const LOCALIZED_TEXT: NodeId = NodeId::numeric(0, 21);
/// Abstract root of all structured types.
pub const STRUCTURE: NodeId = NodeId::numeric(0, 22);
/// Data value (value + status + timestamps).
pub const DATA_VALUE: NodeId = NodeId::numeric(0, 23);
/// Diagnostic info.
pub const DIAGNOSTIC_INFO: NodeId = NodeId::numeric(0, 25);
/// Abstract numeric category.
pub const NUMBER: NodeId = NodeId::numeric(0, 26);
/// Abstract signed-integer category.
pub const INTEGER: NodeId = NodeId::numeric(0, 27);
/// Abstract unsigned-integer category.
pub const UINTEGER: NodeId = NodeId::numeric(0, 28);
/// Abstract root of all enumerated types.
pub const ENUMERATION: NodeId = NodeId::numeric(0, 29);

/// The built-in data types a custom DataType reduces to for assignability.
///
/// Abstract categories (`Number`, `Integer`, `UInteger`, `Enumeration`,
/// `BaseDataType`) are deliberately absent: an abstract declared type is used
/// directly instead of reduced.
pub const BUILTIN_DATA_TYPES: [NodeId; 25] = [
    BOOLEAN,
    SBYTE,
    BYTE,
    INT16,
    UINT16,
    INT32,
    UINT32,
    INT64,
    UINT64,
    FLOAT,
    DOUBLE,
    STRING,
    DATE_TIME,
    GUID,
    BYTE_STRING,
    XML_ELEMENT,
    NODE_ID,
    EXPANDED_NODE_ID,
    STATUS_CODE,
    QUALIFIED_NAME,
    LOCALIZED_TEXT,
    STRUCTURE,
    DATA_VALUE,
    DIAGNOSTIC_INFO,
    NodeId::numeric(0, 50), // Decimal
];

/// Integer built-ins accepted as the transport representation of an
/// enumeration value.
pub const ENUMERATION_TRANSPORT_TYPES: [NodeId; 4] = [INT32, UINT32, INT16, UINT16];
