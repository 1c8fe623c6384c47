// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Minimal standard-namespace nucleus.
//!
//! A full server loads the complete standard nodeset from a model file; this
//! module registers just the part the engine itself reasons about — the
//! reference-type tree, the base object/variable types, and the data-type
//! tree — so embedders and tests can start from a working graph without a
//! nodeset loader.

use aspace_schema::{ids, NodeClass, NodeId, QualifiedName};

use crate::graph::{AddressSpace, GraphError};
use crate::node::Node;

fn ns0(name: &str) -> QualifiedName {
    QualifiedName::new(0, name)
}

/// Registers the standard nucleus into `space`.
///
/// Idempotence is not attempted: bootstrapping a space twice fails with
/// [`GraphError::DuplicateNodeId`].
///
/// # Errors
/// Propagates [`GraphError`] from registration; only possible when the space
/// already holds standard ids.
pub fn bootstrap(space: &mut AddressSpace) -> Result<(), GraphError> {
    register_reference_types(space)?;
    register_base_types(space)?;
    register_data_types(space)?;
    Ok(())
}

fn register_reference_types(space: &mut AddressSpace) -> Result<(), GraphError> {
    let types: [(NodeId, &str, bool); 13] = [
        (ids::REFERENCES, "References", true),
        (ids::HIERARCHICAL_REFERENCES, "HierarchicalReferences", true),
        (ids::NON_HIERARCHICAL_REFERENCES, "NonHierarchicalReferences", true),
        (ids::HAS_CHILD, "HasChild", true),
        (ids::AGGREGATES, "Aggregates", true),
        (ids::ORGANIZES, "Organizes", false),
        (ids::HAS_MODELLING_RULE, "HasModellingRule", false),
        (ids::HAS_TYPE_DEFINITION, "HasTypeDefinition", false),
        (ids::HAS_SUBTYPE, "HasSubtype", false),
        (ids::HAS_PROPERTY, "HasProperty", false),
        (ids::HAS_COMPONENT, "HasComponent", false),
        (ids::HAS_ORDERED_COMPONENT, "HasOrderedComponent", false),
        (ids::HAS_EVENT_SOURCE, "HasEventSource", false),
    ];
    for (id, name, is_abstract) in types {
        space.register(
            Node::new(id, ns0(name), NodeClass::ReferenceType).with_abstract(is_abstract),
        )?;
    }
    let edges: [(NodeId, NodeId); 12] = [
        (ids::REFERENCES, ids::HIERARCHICAL_REFERENCES),
        (ids::REFERENCES, ids::NON_HIERARCHICAL_REFERENCES),
        (ids::HIERARCHICAL_REFERENCES, ids::HAS_CHILD),
        (ids::HIERARCHICAL_REFERENCES, ids::ORGANIZES),
        (ids::HIERARCHICAL_REFERENCES, ids::HAS_EVENT_SOURCE),
        (ids::HAS_CHILD, ids::AGGREGATES),
        (ids::HAS_CHILD, ids::HAS_SUBTYPE),
        (ids::AGGREGATES, ids::HAS_PROPERTY),
        (ids::AGGREGATES, ids::HAS_COMPONENT),
        (ids::HAS_COMPONENT, ids::HAS_ORDERED_COMPONENT),
        (ids::NON_HIERARCHICAL_REFERENCES, ids::HAS_MODELLING_RULE),
        (ids::NON_HIERARCHICAL_REFERENCES, ids::HAS_TYPE_DEFINITION),
    ];
    for (sup, sub) in &edges {
        space.add_reference(sup, &ids::HAS_SUBTYPE, sub)?;
    }
    Ok(())
}

fn register_base_types(space: &mut AddressSpace) -> Result<(), GraphError> {
    space.register(Node::new(ids::BASE_OBJECT_TYPE, ns0("BaseObjectType"), NodeClass::ObjectType))?;
    space.register(Node::new(ids::FOLDER_TYPE, ns0("FolderType"), NodeClass::ObjectType))?;
    space.add_reference(&ids::BASE_OBJECT_TYPE, &ids::HAS_SUBTYPE, &ids::FOLDER_TYPE)?;

    space.register(
        Node::new(ids::BASE_VARIABLE_TYPE, ns0("BaseVariableType"), NodeClass::VariableType)
            .with_abstract(true),
    )?;
    space.register(Node::new(
        ids::BASE_DATA_VARIABLE_TYPE,
        ns0("BaseDataVariableType"),
        NodeClass::VariableType,
    ))?;
    space.register(Node::new(ids::PROPERTY_TYPE, ns0("PropertyType"), NodeClass::VariableType))?;
    space.add_reference(&ids::BASE_VARIABLE_TYPE, &ids::HAS_SUBTYPE, &ids::BASE_DATA_VARIABLE_TYPE)?;
    space.add_reference(&ids::BASE_VARIABLE_TYPE, &ids::HAS_SUBTYPE, &ids::PROPERTY_TYPE)?;
    Ok(())
}

fn register_data_types(space: &mut AddressSpace) -> Result<(), GraphError> {
    let decimal = NodeId::numeric(0, 50);
    let abstracts: [(NodeId, &str); 6] = [
        (ids::BASE_DATA_TYPE, "BaseDataType"),
        (ids::NUMBER, "Number"),
        (ids::INTEGER, "Integer"),
        (ids::UINTEGER, "UInteger"),
        (ids::ENUMERATION, "Enumeration"),
        (ids::STRUCTURE, "Structure"),
    ];
    for (id, name) in abstracts {
        space.register(Node::new(id, ns0(name), NodeClass::DataType).with_abstract(true))?;
    }
    let concretes: [(NodeId, &str); 23] = [
        (ids::BOOLEAN, "Boolean"),
        (ids::SBYTE, "SByte"),
        (ids::BYTE, "Byte"),
        (ids::INT16, "Int16"),
        (ids::UINT16, "UInt16"),
        (ids::INT32, "Int32"),
        (ids::UINT32, "UInt32"),
        (ids::INT64, "Int64"),
        (ids::UINT64, "UInt64"),
        (ids::FLOAT, "Float"),
        (ids::DOUBLE, "Double"),
        (ids::STRING, "String"),
        (ids::DATE_TIME, "DateTime"),
        (ids::GUID, "Guid"),
        (ids::BYTE_STRING, "ByteString"),
        (ids::XML_ELEMENT, "XmlElement"),
        (ids::NODE_ID, "NodeId"),
        (ids::EXPANDED_NODE_ID, "ExpandedNodeId"),
        (ids::QUALIFIED_NAME, "QualifiedName"),
        (ids::LOCALIZED_TEXT, "LocalizedText"),
        (ids::STATUS_CODE, "StatusCode"),
        (ids::DATA_VALUE, "DataValue"),
        (ids::DIAGNOSTIC_INFO, "DiagnosticInfo"),
    ];
    for (id, name) in concretes {
        space.register(Node::new(id, ns0(name), NodeClass::DataType))?;
    }
    space.register(Node::new(decimal.clone(), ns0("Decimal"), NodeClass::DataType))?;

    let under_base: [NodeId; 15] = [
        ids::BOOLEAN,
        ids::STRING,
        ids::DATE_TIME,
        ids::GUID,
        ids::BYTE_STRING,
        ids::XML_ELEMENT,
        ids::NODE_ID,
        ids::EXPANDED_NODE_ID,
        ids::QUALIFIED_NAME,
        ids::LOCALIZED_TEXT,
        ids::STATUS_CODE,
        ids::DATA_VALUE,
        ids::DIAGNOSTIC_INFO,
        ids::NUMBER,
        ids::ENUMERATION,
    ];
    for sub in &under_base {
        space.add_reference(&ids::BASE_DATA_TYPE, &ids::HAS_SUBTYPE, sub)?;
    }
    space.add_reference(&ids::BASE_DATA_TYPE, &ids::HAS_SUBTYPE, &ids::STRUCTURE)?;

    let under_number: [NodeId; 4] = [ids::INTEGER, ids::UINTEGER, ids::FLOAT, ids::DOUBLE];
    for sub in &under_number {
        space.add_reference(&ids::NUMBER, &ids::HAS_SUBTYPE, sub)?;
    }
    space.add_reference(&ids::NUMBER, &ids::HAS_SUBTYPE, &decimal)?;

    let signed: [NodeId; 4] = [ids::SBYTE, ids::INT16, ids::INT32, ids::INT64];
    for sub in &signed {
        space.add_reference(&ids::INTEGER, &ids::HAS_SUBTYPE, sub)?;
    }
    let unsigned: [NodeId; 4] = [ids::BYTE, ids::UINT16, ids::UINT32, ids::UINT64];
    for sub in &unsigned {
        space.add_reference(&ids::UINTEGER, &ids::HAS_SUBTYPE, sub)?;
    }
    Ok(())
}
