// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Instantiation engine: materializes concrete instances from type
//! definitions.
//!
//! The engine walks a type's supertype chain from the most derived type
//! toward the top-most base, cloning every Aggregates-direction child the
//! modelling-rule filter keeps, recursing into nested declared subtrees with
//! child-scoped filters. The whole subtree is staged in a local builder and
//! committed to the live graph in one pass inside a single model-change
//! transaction — an error during planning leaves the graph untouched, so
//! there are never partially instantiated subtrees to clean up.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::debug;

use aspace_schema::{ids, ModelChangeVerb, NodeClass, NodeId, QualifiedName};

use crate::changes::ModelChangeRecord;
use crate::filter::CloneFilter;
use crate::graph::{AddressSpace, GraphError};
use crate::hierarchy::HierarchyError;
use crate::node::Node;
use crate::optionals::OptionalsMap;

/// Error returned by [`AddressSpace::instantiate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstantiateError {
    /// A referenced node could not be resolved.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
    /// The instance argument is not an Object/Variable/Method node.
    #[error("node {node} is {class:?}, not an instance")]
    NotAnInstance {
        /// The offending node.
        node: NodeId,
        /// Its actual class.
        class: NodeClass,
    },
    /// The type argument is not an object or variable type.
    #[error("node {node} is {class:?}, not an object or variable type")]
    NotATypeDefinition {
        /// The offending node.
        node: NodeId,
        /// Its actual class.
        class: NodeClass,
    },
    /// The instance carries no HasTypeDefinition reference.
    #[error("instance {0} has no type definition")]
    MissingTypeDefinition(NodeId),
    /// Abstract types cannot be instantiated (caller-contract error).
    #[error("cannot instantiate abstract type {0}")]
    AbstractType(NodeId),
    /// A type's declared supertype chain never reached the top-most type.
    /// The hierarchy is a precondition; this is a broken model, not a
    /// recoverable condition.
    #[error("type {type_node} has no supertype; the walk never reached the top-most type")]
    BrokenTypeChain {
        /// The type whose chain ends prematurely.
        type_node: NodeId,
    },
    /// One type level declares two keepable children with the same browse
    /// name (malformed subtree; exactly one match is expected).
    #[error("type {parent_type} declares more than one keepable child named {name}")]
    DuplicateChildName {
        /// The declaring type-level parent.
        parent_type: NodeId,
        /// The colliding browse name.
        name: QualifiedName,
    },
    /// A requested optional path names no declared child.
    #[error("requested optional {path} does not exist on the type")]
    UnknownOptional {
        /// The dotted path as requested.
        path: String,
    },
    /// A hierarchy query failed underneath.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
    /// A graph mutation failed underneath.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Caller-supplied knobs for one instantiation request.
#[derive(Debug, Clone, Default)]
pub struct InstantiateOptions {
    /// Copy modelling rules onto the created children (used when building
    /// nested type definitions rather than plain instances).
    pub copy_modelling_rules: bool,
    /// Clone every Optional child regardless of the optionals list.
    pub copy_all_optionals: bool,
    /// Dotted paths of the Optional children to materialize.
    pub optionals: Vec<String>,
}

struct StagedNode {
    node: Node,
    parent: NodeId,
    reference_type: NodeId,
    type_definition: Option<NodeId>,
    /// The type-level child this clone was made from.
    origin: NodeId,
}

struct StagedEdge {
    source: NodeId,
    reference_type: NodeId,
    target: NodeId,
}

struct Plan {
    nodes: Vec<StagedNode>,
    edges: Vec<StagedEdge>,
    next_minted: u32,
}

/// Stages the subtree-under-construction without touching the live graph.
struct SubtreeBuilder<'s> {
    space: &'s AddressSpace,
    mint_ns: u16,
    next_minted: u32,
    staged: Vec<StagedNode>,
    edges: Vec<StagedEdge>,
    clone_map: FxHashMap<NodeId, NodeId>,
}

impl<'s> SubtreeBuilder<'s> {
    fn new(space: &'s AddressSpace) -> Self {
        Self {
            space,
            mint_ns: space.mint_ns,
            next_minted: space.next_minted,
            staged: Vec::new(),
            edges: Vec::new(),
            clone_map: FxHashMap::default(),
        }
    }

    fn mint(&mut self) -> NodeId {
        loop {
            let id = NodeId::numeric(self.mint_ns, self.next_minted);
            self.next_minted = self.next_minted.wrapping_add(1);
            if !self.space.contains(&id) {
                return id;
            }
        }
    }

    /// Walks the supertype chain from `start` up to (excluding) `top`,
    /// cloning each level's keepable children onto `instance`. The shared
    /// filter accumulates staged names, so base-type children already
    /// contributed by a more specific subtype are skipped.
    fn populate_chain(
        &mut self,
        instance: &NodeId,
        top: &NodeId,
        start: &NodeId,
        filter: &mut CloneFilter<'_>,
        opts: &InstantiateOptions,
    ) -> Result<(), InstantiateError> {
        let mut current = start.clone();
        let mut visited: FxHashSet<NodeId> = FxHashSet::default();
        while current != *top {
            if !visited.insert(current.clone()) {
                return Err(HierarchyError::SubtypeCycle(current).into());
            }
            self.clone_children(instance, &current, filter, opts)?;
            let node = self
                .space
                .node(&current)
                .ok_or_else(|| InstantiateError::NodeNotFound(current.clone()))?;
            match node.supertype() {
                Some(s) => current = s.clone(),
                None => return Err(InstantiateError::BrokenTypeChain { type_node: current }),
            }
        }
        Ok(())
    }

    /// Clones the keepable Aggregates-direction children of `source_parent`
    /// under `target_parent`, recursing into each clone's declared subtree.
    fn clone_children(
        &mut self,
        target_parent: &NodeId,
        source_parent: &NodeId,
        filter: &mut CloneFilter<'_>,
        opts: &InstantiateOptions,
    ) -> Result<(), InstantiateError> {
        let space = self.space;
        let refs = space.find_references(source_parent, &ids::AGGREGATES, true, true)?;
        let mut kept_here: FxHashSet<QualifiedName> = FxHashSet::default();
        for r in refs {
            let child = space
                .node(r.target())
                .ok_or_else(|| InstantiateError::NodeNotFound(r.target().clone()))?;
            if !filter.should_keep(child) {
                continue;
            }
            let name = child.browse_name().clone();
            if !kept_here.insert(name.clone()) {
                return Err(InstantiateError::DuplicateChildName {
                    parent_type: source_parent.clone(),
                    name,
                });
            }
            let new_id = self.mint();
            let staged = child.clone_definition(new_id.clone(), opts.copy_modelling_rules);
            self.clone_map.insert(child.node_id().clone(), new_id.clone());
            self.staged.push(StagedNode {
                node: staged,
                parent: target_parent.clone(),
                reference_type: r.reference_type().clone(),
                type_definition: child.type_definition().cloned(),
                origin: child.node_id().clone(),
            });
            let mut child_filter = filter.for_child(&name.name);
            self.clone_children(&new_id, child.node_id(), &mut child_filter, opts)?;
            filter.mark_present(name);
        }
        Ok(())
    }

    /// Finishing passes over the staged subtree: re-parent functional-group
    /// Organizes links between cloned members, and rebuild non-hierarchical
    /// references so they point at clones where clones exist.
    fn reconcile(&mut self) -> Result<(), InstantiateError> {
        let space = self.space;
        let mut edge_keys: FxHashSet<(NodeId, NodeId, NodeId)> = FxHashSet::default();
        let pairs: Vec<(NodeId, NodeId)> = self
            .staged
            .iter()
            .map(|s| (s.origin.clone(), s.node.node_id().clone()))
            .collect();
        for (origin, clone) in &pairs {
            for r in space.find_references(origin, &ids::ORGANIZES, true, true)? {
                // Only re-parent links into the cloned subtree; Organizes
                // edges pointing outside it stay type-level metadata.
                let Some(target_clone) = self.clone_map.get(r.target()) else {
                    continue;
                };
                let key = (clone.clone(), r.reference_type().clone(), target_clone.clone());
                if edge_keys.insert(key.clone()) {
                    self.edges.push(StagedEdge {
                        source: key.0,
                        reference_type: key.1,
                        target: key.2,
                    });
                }
            }
            for r in space.find_references(origin, &ids::NON_HIERARCHICAL_REFERENCES, true, true)? {
                let rt = r.reference_type();
                if *rt == ids::HAS_TYPE_DEFINITION || *rt == ids::HAS_MODELLING_RULE {
                    continue;
                }
                let target = match self.clone_map.get(r.target()) {
                    Some(t) => t.clone(),
                    None => {
                        debug!(node = %r.target(), "reconciliation target not cloned; keeping type-level link");
                        r.target().clone()
                    }
                };
                let key = (clone.clone(), rt.clone(), target);
                if edge_keys.insert(key.clone()) {
                    self.edges.push(StagedEdge {
                        source: key.0,
                        reference_type: key.1,
                        target: key.2,
                    });
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Plan {
        Plan {
            nodes: self.staged,
            edges: self.edges,
            next_minted: self.next_minted,
        }
    }
}

impl AddressSpace {
    /// Populates `instance` from its own declared type definition.
    ///
    /// Resolves the instance's HasTypeDefinition target, rejects abstract
    /// types, and drives [`Self::instantiate_from`] with the class-matching
    /// top-most base type (BaseObjectType or BaseVariableType).
    ///
    /// Returns the ids of all created nodes in creation order.
    ///
    /// # Errors
    /// See [`InstantiateError`]; planning errors leave the graph untouched.
    pub fn instantiate(
        &mut self,
        instance: &NodeId,
        options: &InstantiateOptions,
    ) -> Result<Vec<NodeId>, InstantiateError> {
        let inst = self
            .node(instance)
            .ok_or_else(|| InstantiateError::NodeNotFound(instance.clone()))?;
        if !inst.node_class().is_instance() {
            return Err(InstantiateError::NotAnInstance {
                node: instance.clone(),
                class: inst.node_class(),
            });
        }
        let type_id = inst
            .type_definition()
            .cloned()
            .ok_or_else(|| InstantiateError::MissingTypeDefinition(instance.clone()))?;
        let type_node = self
            .node(&type_id)
            .ok_or_else(|| InstantiateError::NodeNotFound(type_id.clone()))?;
        if type_node.is_abstract() {
            return Err(InstantiateError::AbstractType(type_id));
        }
        let top = match type_node.node_class() {
            NodeClass::ObjectType => ids::BASE_OBJECT_TYPE,
            NodeClass::VariableType => ids::BASE_VARIABLE_TYPE,
            class => {
                return Err(InstantiateError::NotATypeDefinition {
                    node: type_id.clone(),
                    class,
                })
            }
        };
        self.instantiate_from(instance, &top, &type_id, options)
    }

    /// Populates `instance` with the aggregated children declared between
    /// `start_type` and `top_most_type` (exclusive).
    ///
    /// This is the raw engine entry point; [`Self::instantiate`] is the
    /// common wrapper. Every mandatory child across the chain ends up present
    /// exactly once, every requested optional exactly once, placeholders and
    /// rule-less children never.
    ///
    /// # Errors
    /// See [`InstantiateError`]; planning errors leave the graph untouched.
    pub fn instantiate_from(
        &mut self,
        instance: &NodeId,
        top_most_type: &NodeId,
        start_type: &NodeId,
        options: &InstantiateOptions,
    ) -> Result<Vec<NodeId>, InstantiateError> {
        let inst = self
            .node(instance)
            .ok_or_else(|| InstantiateError::NodeNotFound(instance.clone()))?;
        if !inst.node_class().is_instance() {
            return Err(InstantiateError::NotAnInstance {
                node: instance.clone(),
                class: inst.node_class(),
            });
        }
        let start = self
            .node(start_type)
            .ok_or_else(|| InstantiateError::NodeNotFound(start_type.clone()))?;
        if !matches!(
            start.node_class(),
            NodeClass::ObjectType | NodeClass::VariableType
        ) {
            return Err(InstantiateError::NotATypeDefinition {
                node: start_type.clone(),
                class: start.node_class(),
            });
        }

        let map = OptionalsMap::from_paths(&options.optionals);
        validate_optionals(self, top_most_type, start_type, &map)?;

        let existing: FxHashSet<QualifiedName> = self
            .find_references(instance, &ids::AGGREGATES, true, true)?
            .into_iter()
            .filter_map(|r| self.node(r.target()).map(|n| n.browse_name().clone()))
            .collect();

        let plan = {
            let mut builder = SubtreeBuilder::new(self);
            let mut filter = CloneFilter::new(existing, &map, options.copy_all_optionals);
            builder.populate_chain(instance, top_most_type, start_type, &mut filter, options)?;
            builder.reconcile()?;
            builder.finish()
        };

        let created: Vec<NodeId> = plan.nodes.iter().map(|s| s.node.node_id().clone()).collect();
        self.run_in_transaction(|space| space.commit_plan(plan))?;
        Ok(created)
    }

    /// Applies a staged plan to the live graph, emitting NodeAdded and
    /// ReferenceAdded records in mutation order.
    fn commit_plan(&mut self, plan: Plan) -> Result<(), InstantiateError> {
        self.next_minted = plan.next_minted;
        for StagedNode {
            node,
            parent,
            reference_type,
            type_definition,
            ..
        } in plan.nodes
        {
            let id = node.node_id().clone();
            self.register(node)?;
            if let Some(td) = &type_definition {
                self.add_reference(&id, &ids::HAS_TYPE_DEFINITION, td)?;
            }
            if self.has_subscribers() && self.nearest_tracked_ancestor(&parent, true).is_some() {
                self.collect_change(ModelChangeRecord {
                    affected: id.clone(),
                    affected_type: type_definition.clone(),
                    verb: ModelChangeVerb::NodeAdded,
                });
            }
            self.add_reference(&parent, &reference_type, &id)?;
        }
        for StagedEdge {
            source,
            reference_type,
            target,
        } in plan.edges
        {
            self.add_reference(&source, &reference_type, &target)?;
        }
        Ok(())
    }
}

/// Checks every requested optional path against the children actually
/// declared across the supertype chain, before any staging happens.
fn validate_optionals(
    space: &AddressSpace,
    top: &NodeId,
    start: &NodeId,
    map: &OptionalsMap,
) -> Result<(), InstantiateError> {
    if map.is_empty() {
        return Ok(());
    }
    // Aggregate declared children over the chain, most-derived-first.
    let mut declared: BTreeMap<String, NodeId> = BTreeMap::new();
    let mut current = start.clone();
    let mut visited: FxHashSet<NodeId> = FxHashSet::default();
    loop {
        if current == *top {
            break;
        }
        if !visited.insert(current.clone()) {
            return Err(HierarchyError::SubtypeCycle(current).into());
        }
        for r in space.find_references(&current, &ids::AGGREGATES, true, true)? {
            if let Some(child) = space.node(r.target()) {
                declared
                    .entry(child.browse_name().name.clone())
                    .or_insert_with(|| r.target().clone());
            }
        }
        match space.node(&current).and_then(Node::supertype) {
            Some(s) => current = s.clone(),
            None => break,
        }
    }
    for (key, sub) in map.iter() {
        let child = declared
            .get(key)
            .ok_or_else(|| InstantiateError::UnknownOptional {
                path: key.to_owned(),
            })?;
        validate_nested(space, child, sub, key)?;
    }
    Ok(())
}

fn validate_nested(
    space: &AddressSpace,
    parent: &NodeId,
    map: &OptionalsMap,
    prefix: &str,
) -> Result<(), InstantiateError> {
    for (key, sub) in map.iter() {
        let mut found = None;
        for r in space.find_references(parent, &ids::AGGREGATES, true, true)? {
            if space
                .node(r.target())
                .is_some_and(|n| n.browse_name().name == key)
            {
                found = Some(r.target().clone());
                break;
            }
        }
        let path = format!("{prefix}.{key}");
        let child = found.ok_or(InstantiateError::UnknownOptional { path: path.clone() })?;
        validate_nested(space, &child, sub, &path)?;
    }
    Ok(())
}
