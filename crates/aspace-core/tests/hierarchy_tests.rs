// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]

mod common;

use aspace_core::{ids, ModellingRule, Node, NodeClass, NodeId, QualifiedName};
use common::{add_declared_variable, add_object_type, space, tid};

#[test]
fn closure_queries_are_idempotent() {
    let space = space();
    let first = space.all_subtypes(&ids::AGGREGATES).unwrap();
    let second = space.all_subtypes(&ids::AGGREGATES).unwrap();
    assert_eq!(first, second);
    assert!(first.contains(&ids::AGGREGATES));
    assert!(first.contains(&ids::HAS_COMPONENT));
    assert!(first.contains(&ids::HAS_PROPERTY));
    assert!(first.contains(&ids::HAS_ORDERED_COMPONENT));
    assert!(!first.contains(&ids::ORGANIZES));
}

#[test]
fn closures_follow_deletions_without_explicit_invalidation() {
    let mut space = space();
    let custom = NodeId::numeric(2, 500);
    space
        .register(Node::new(
            custom.clone(),
            QualifiedName::new(2, "HasCalibration"),
            NodeClass::ReferenceType,
        ))
        .unwrap();
    space
        .add_reference(&ids::HAS_PROPERTY, &ids::HAS_SUBTYPE, &custom)
        .unwrap();
    assert!(space.all_subtypes(&ids::AGGREGATES).unwrap().contains(&custom));

    space.delete_node(&custom).unwrap();
    assert!(!space.all_subtypes(&ids::AGGREGATES).unwrap().contains(&custom));
}

#[test]
fn reference_queries_respect_the_subtype_switch() {
    let mut space = space();
    let ty = add_object_type(&mut space, 100, "MachineType", &ids::BASE_OBJECT_TYPE);
    add_declared_variable(&mut space, &ty, 101, "Status", Some(ModellingRule::Mandatory));
    // A HasProperty child next to the HasComponent one.
    let prop = tid(102);
    space
        .register(
            Node::new(prop.clone(), QualifiedName::new(2, "Serial"), NodeClass::Variable)
                .with_modelling_rule(ModellingRule::Mandatory),
        )
        .unwrap();
    space.add_reference(&ty, &ids::HAS_PROPERTY, &prop).unwrap();

    let broad = space
        .find_references(&ty, &ids::AGGREGATES, true, true)
        .unwrap();
    assert_eq!(broad.len(), 2);

    let exact = space
        .find_references(&ty, &ids::HAS_COMPONENT, true, false)
        .unwrap();
    assert_eq!(exact.len(), 1);

    // Unregistered sources browse empty rather than failing.
    assert!(space
        .find_references(&NodeId::numeric(9, 9), &ids::AGGREGATES, true, true)
        .unwrap()
        .is_empty());
}

#[test]
fn instance_type_definitions_join_the_type_walk() {
    let mut space = space();
    let base = add_object_type(&mut space, 100, "MachineType", &ids::BASE_OBJECT_TYPE);
    let derived = add_object_type(&mut space, 110, "PumpType", &base);
    assert!(space.is_subtype_of(&derived, &base).unwrap());
    assert!(space.is_subtype_of(&derived, &ids::BASE_OBJECT_TYPE).unwrap());
    assert!(!space.is_subtype_of(&base, &derived).unwrap());
    // Unrelated branches never relate.
    assert!(!space.is_subtype_of(&derived, &ids::FOLDER_TYPE).unwrap());
}
