// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Modelling-rule clone filter: per-child keep/skip decisions during
//! instantiation.

use rustc_hash::FxHashSet;

use aspace_schema::{ModellingRule, QualifiedName};

use crate::node::Node;
use crate::optionals::OptionalsMap;

/// Decides, for one instance-under-construction, whether a candidate
/// type-level child must be cloned.
///
/// Bound to the set of browse names the instance already has via
/// Aggregates-direction children — a child contributed by a more specific
/// subtype blocks same-named children of base types (first-wins,
/// most-derived-wins) — plus the optionals sub-map scoped to this level.
#[derive(Debug)]
pub struct CloneFilter<'a> {
    copy_all_optionals: bool,
    optionals: &'a OptionalsMap,
    existing: FxHashSet<QualifiedName>,
}

impl<'a> CloneFilter<'a> {
    /// Binds a filter to an instance's current child names and one level of
    /// the optionals map.
    #[must_use]
    pub fn new(
        existing: FxHashSet<QualifiedName>,
        optionals: &'a OptionalsMap,
        copy_all_optionals: bool,
    ) -> Self {
        Self {
            copy_all_optionals,
            optionals,
            existing,
        }
    }

    /// Should this type-level child be cloned onto the instance?
    ///
    /// - no modelling rule: never — type-only metadata (state-machine
    ///   internals and the like) is not instantiated;
    /// - Mandatory: always;
    /// - Optional: only when `copy_all_optionals` is set or the browse name
    ///   is requested at this level;
    /// - OptionalPlaceholder: never — templates for user-created children;
    /// - a browse name already present on the instance: never, regardless of
    ///   rule.
    #[must_use]
    pub fn should_keep(&self, candidate: &Node) -> bool {
        if self.existing.contains(candidate.browse_name()) {
            return false;
        }
        match candidate.modelling_rule() {
            Some(ModellingRule::Mandatory) => true,
            Some(ModellingRule::Optional) => {
                self.copy_all_optionals || self.optionals.contains(&candidate.browse_name().name)
            }
            Some(ModellingRule::OptionalPlaceholder) | None => false,
        }
    }

    /// Records a staged sibling so later (more general) supertype levels see
    /// it as already present.
    pub fn mark_present(&mut self, name: QualifiedName) {
        self.existing.insert(name);
    }

    /// A filter scoped to a freshly cloned child: empty sibling set, and only
    /// the optionals nested under the child's browse name. This is what lets
    /// `"Optional1.SubOptional2"` request a nested optional without pulling
    /// in siblings.
    #[must_use]
    pub fn for_child(&self, child_name: &str) -> CloneFilter<'a> {
        CloneFilter {
            copy_all_optionals: self.copy_all_optionals,
            optionals: self
                .optionals
                .child(child_name)
                .unwrap_or(OptionalsMap::empty_ref()),
            existing: FxHashSet::default(),
        }
    }
}
