// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use aspace_core::{
    ids, standard, AddressSpace, ModellingRule, Node, NodeClass, NodeId, QualifiedName,
};

/// A space with the standard nucleus loaded.
pub fn space() -> AddressSpace {
    let mut space = AddressSpace::new();
    standard::bootstrap(&mut space).unwrap();
    space
}

/// Test nodes live in namespace 2; minted instance ids land in namespace 1.
pub fn tid(n: u32) -> NodeId {
    NodeId::numeric(2, n)
}

pub fn qn(name: &str) -> QualifiedName {
    QualifiedName::new(2, name)
}

/// Registers an object type under `supertype`.
pub fn add_object_type(
    space: &mut AddressSpace,
    id: u32,
    name: &str,
    supertype: &NodeId,
) -> NodeId {
    let node_id = tid(id);
    space
        .register(Node::new(node_id.clone(), qn(name), NodeClass::ObjectType))
        .unwrap();
    space
        .add_reference(supertype, &ids::HAS_SUBTYPE, &node_id)
        .unwrap();
    node_id
}

/// Declares a variable child of `parent` via HasComponent, typed as a
/// BaseDataVariable of Double, carrying `rule` (or no rule at all).
pub fn add_declared_variable(
    space: &mut AddressSpace,
    parent: &NodeId,
    id: u32,
    name: &str,
    rule: Option<ModellingRule>,
) -> NodeId {
    let node_id = tid(id);
    let mut node =
        Node::new(node_id.clone(), qn(name), NodeClass::Variable).with_data_type(ids::DOUBLE);
    if let Some(r) = rule {
        node = node.with_modelling_rule(r);
    }
    space.register(node).unwrap();
    space
        .add_reference(parent, &ids::HAS_COMPONENT, &node_id)
        .unwrap();
    space
        .add_reference(&node_id, &ids::HAS_TYPE_DEFINITION, &ids::BASE_DATA_VARIABLE_TYPE)
        .unwrap();
    node_id
}

/// Declares an object child of `parent` via HasComponent (for nested
/// declared subtrees).
pub fn add_declared_object(
    space: &mut AddressSpace,
    parent: &NodeId,
    id: u32,
    name: &str,
    rule: Option<ModellingRule>,
) -> NodeId {
    let node_id = tid(id);
    let mut node = Node::new(node_id.clone(), qn(name), NodeClass::Object);
    if let Some(r) = rule {
        node = node.with_modelling_rule(r);
    }
    space.register(node).unwrap();
    space
        .add_reference(parent, &ids::HAS_COMPONENT, &node_id)
        .unwrap();
    space
        .add_reference(&node_id, &ids::HAS_TYPE_DEFINITION, &ids::BASE_OBJECT_TYPE)
        .unwrap();
    node_id
}

/// Registers a plain object instance typed by `type_definition`.
pub fn add_instance(
    space: &mut AddressSpace,
    id: u32,
    name: &str,
    type_definition: &NodeId,
) -> NodeId {
    let node_id = tid(id);
    space
        .register(Node::new(node_id.clone(), qn(name), NodeClass::Object))
        .unwrap();
    space
        .add_reference(&node_id, &ids::HAS_TYPE_DEFINITION, type_definition)
        .unwrap();
    node_id
}

/// Registers a version-tracked object instance typed by `type_definition`.
pub fn add_tracked_instance(
    space: &mut AddressSpace,
    id: u32,
    name: &str,
    type_definition: &NodeId,
) -> NodeId {
    let node_id = tid(id);
    space
        .register(
            Node::new(node_id.clone(), qn(name), NodeClass::Object).with_node_version("1"),
        )
        .unwrap();
    space
        .add_reference(&node_id, &ids::HAS_TYPE_DEFINITION, type_definition)
        .unwrap();
    node_id
}

/// Browse names of the aggregated children of `parent`, sorted.
pub fn child_names(space: &AddressSpace, parent: &NodeId) -> Vec<String> {
    let mut names: Vec<String> = space
        .find_references(parent, &ids::AGGREGATES, true, true)
        .unwrap()
        .into_iter()
        .filter_map(|r| space.node(r.target()).map(|n| n.browse_name().name.clone()))
        .collect();
    names.sort();
    names
}

/// The aggregated child of `parent` with the given browse name.
pub fn child_by_name(space: &AddressSpace, parent: &NodeId, name: &str) -> Option<NodeId> {
    space
        .find_references(parent, &ids::AGGREGATES, true, true)
        .unwrap()
        .into_iter()
        .find(|r| {
            space
                .node(r.target())
                .is_some_and(|n| n.browse_name().name == name)
        })
        .map(|r| r.target().clone())
}
