// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! aspace-core: OPC UA address-space engine.
//!
//! Holds the live graph of typed, named, inter-referenced nodes that make up
//! a server's information model and implements the behaviors layered on top
//! of it: type-hierarchy reasoning with epoch-cached closures, type-based
//! instantiation with modelling-rule filtering, coalesced model-change
//! notification, and data-type assignability checks.
//!
//! The core is synchronous and single-writer: every operation runs to
//! completion on the calling thread, and the lazily filled subtype caches are
//! deliberately not synchronized (the address space is `!Sync`). Wire
//! encoding, session handling, and nodeset loading live in collaborating
//! crates; this one consumes an already populated graph.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::use_self
)]

mod changes;
mod datatype;
mod filter;
mod graph;
mod hierarchy;
mod instantiate;
mod node;
mod optionals;
mod reference;
pub mod standard;

pub use changes::{ModelChangeRecord, SubscriberId};
pub use datatype::DataTypeError;
pub use filter::CloneFilter;
pub use graph::{AddressSpace, GraphError};
pub use hierarchy::HierarchyError;
pub use instantiate::{InstantiateError, InstantiateOptions};
pub use node::Node;
pub use optionals::OptionalsMap;
pub use reference::Reference;

// Re-export the vocabulary crate so downstream users need only one dep.
pub use aspace_schema::{
    ids, Identifier, ModelChangeVerb, ModellingRule, NodeClass, NodeId, QualifiedName,
};
