// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Optionals map: the caller's nested selection of optional children.

use std::collections::BTreeMap;

/// Nested mapping of dotted child-name paths.
///
/// Built once per instantiation call from a flat list of requested paths
/// (`"A.B.C"` keeps `B` under `A` and recurses into `C` under `B`), then
/// consumed read-only during cloning. Not part of the persistent graph.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OptionalsMap {
    children: BTreeMap<String, OptionalsMap>,
}

static EMPTY: OptionalsMap = OptionalsMap {
    children: BTreeMap::new(),
};

impl OptionalsMap {
    /// Builds a map from flat dotted paths. Empty segments are ignored.
    #[must_use]
    pub fn from_paths<S: AsRef<str>>(paths: &[S]) -> Self {
        let mut map = Self::default();
        for path in paths {
            map.insert_path(path.as_ref());
        }
        map
    }

    /// Inserts one dotted path.
    pub fn insert_path(&mut self, path: &str) {
        let mut level = self;
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            level = level.children.entry(segment.to_owned()).or_default();
        }
    }

    /// The sub-map nested under `name`, if requested.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&OptionalsMap> {
        self.children.get(name)
    }

    /// `true` when `name` is a key at this level.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// `true` when nothing was requested at this level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterates keys and sub-maps at this level, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionalsMap)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// A shared empty map, used when scoping into an unrequested child.
    #[must_use]
    pub fn empty_ref() -> &'static OptionalsMap {
        &EMPTY
    }
}
