//! Single-parent hierarchy over IRIs
//!
//! Provides [`Hierarchy`], an arena of nodes addressed by IRI. Each node
//! stores only its parent; the children index is computed on first use.
//! Descendant and ancestor walks are iterative.

use crate::error::{ModelError, ModelResult};
use crate::iri::Iri;
use once_cell::sync::OnceCell;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Tree of IRIs with at most one parent per node
#[derive(Debug, Default)]
pub struct Hierarchy {
    parents: BTreeMap<Iri, Option<Iri>>,
    children: OnceCell<BTreeMap<Iri, BTreeSet<Iri>>>,
}

impl Clone for Hierarchy {
    fn clone(&self) -> Self {
        Self {
            parents: self.parents.clone(),
            children: OnceCell::new(),
        }
    }
}

impl Hierarchy {
    /// Create empty hierarchy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(node, parent)` pairs
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Iri, Option<Iri>)>,
    {
        Self {
            parents: pairs.into_iter().collect(),
            children: OnceCell::new(),
        }
    }

    /// Insert or replace a node
    pub fn insert(&mut self, node: Iri, parent: Option<Iri>) {
        self.parents.insert(node, parent);
        self.children = OnceCell::new();
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Check if node is present
    #[inline]
    #[must_use]
    pub fn contains(&self, node: &str) -> bool {
        self.parents.contains_key(node)
    }

    /// Parent of a node
    #[must_use]
    pub fn parent(&self, node: &str) -> Option<&Iri> {
        self.parents.get(node).and_then(Option::as_ref)
    }

    /// Direct children of a node
    #[must_use]
    pub fn children(&self, node: &str) -> Vec<&Iri> {
        self.children_index()
            .get(node)
            .map(|set| set.iter().collect())
            .unwrap_or_default()
    }

    /// The node followed by all its descendants, breadth first
    ///
    /// Returns an empty list if the node is unknown.
    #[must_use]
    pub fn self_and_descendants(&self, node: &str) -> Vec<Iri> {
        let Some((root, _)) = self.parents.get_key_value(node) else {
            return Vec::new();
        };
        let index = self.children_index();
        let mut out = vec![root.clone()];
        let mut seen: HashSet<&Iri> = HashSet::from([root]);
        let mut cursor = 0;
        while cursor < out.len() {
            if let Some(kids) = index.get(out[cursor].as_str()) {
                for kid in kids {
                    if seen.insert(kid) {
                        out.push(kid.clone());
                    }
                }
            }
            cursor += 1;
        }
        out
    }

    /// Ancestors of a node, nearest first
    ///
    /// # Errors
    /// Returns [`ModelError::HierarchyCycle`] if the parent chain loops
    pub fn ancestors(&self, node: &str) -> ModelResult<Vec<Iri>> {
        let mut out = Vec::new();
        let mut seen: HashSet<&str> = HashSet::from([node]);
        let mut current = self.parent(node);
        while let Some(parent) = current {
            if !seen.insert(parent.as_str()) {
                return Err(ModelError::HierarchyCycle(parent.to_string()));
            }
            out.push(parent.clone());
            current = self.parent(parent.as_str());
        }
        Ok(out)
    }

    /// Check if `ancestor` is a strict ancestor of `node`
    #[must_use]
    pub fn is_ancestor(&self, ancestor: &str, node: &str) -> bool {
        self.ancestors(node)
            .map(|chain| chain.iter().any(|a| a == ancestor))
            .unwrap_or(false)
    }

    /// Nodes without a parent
    #[must_use]
    pub fn roots(&self) -> Vec<&Iri> {
        self.parents
            .iter()
            .filter(|(_, parent)| parent.is_none())
            .map(|(node, _)| node)
            .collect()
    }

    fn children_index(&self) -> &BTreeMap<Iri, BTreeSet<Iri>> {
        self.children.get_or_init(|| {
            let mut index: BTreeMap<Iri, BTreeSet<Iri>> = BTreeMap::new();
            for (node, parent) in &self.parents {
                if let Some(parent) = parent {
                    index.entry(parent.clone()).or_default().insert(node.clone());
                }
            }
            index
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn iri(s: &str) -> Iri {
        Iri::new(s)
    }

    fn sample() -> Hierarchy {
        Hierarchy::from_pairs([
            (iri("root"), None),
            (iri("entity"), Some(iri("root"))),
            (iri("person"), Some(iri("entity"))),
            (iri("employee"), Some(iri("person"))),
            (iri("place"), Some(iri("entity"))),
        ])
    }

    #[test]
    fn descendants_include_self_first() {
        let h = sample();
        let all = h.self_and_descendants("person");
        assert_eq!(all, vec![iri("person"), iri("employee")]);
        assert_eq!(h.self_and_descendants("employee").len(), 1);
        assert_eq!(h.self_and_descendants("root").len(), 5);
        assert!(h.self_and_descendants("missing").is_empty());
    }

    #[test]
    fn ancestors_nearest_first() {
        let h = sample();
        assert_eq!(
            h.ancestors("employee").unwrap(),
            vec![iri("person"), iri("entity"), iri("root")]
        );
        assert!(h.ancestors("root").unwrap().is_empty());
        assert!(h.is_ancestor("entity", "employee"));
        assert!(!h.is_ancestor("place", "employee"));
    }

    #[test]
    fn children_index_refreshes_on_insert() {
        let mut h = sample();
        assert_eq!(h.children("place").len(), 0);
        h.insert(iri("city"), Some(iri("place")));
        assert_eq!(h.children("place"), vec![&iri("city")]);
    }

    #[test]
    fn cycle_detected() {
        let h = Hierarchy::from_pairs([(iri("a"), Some(iri("b"))), (iri("b"), Some(iri("a")))]);
        assert!(matches!(h.ancestors("a"), Err(ModelError::HierarchyCycle(_))));
    }

    #[test]
    fn roots() {
        assert_eq!(sample().roots(), vec![&iri("root")]);
    }

    proptest! {
        #[test]
        fn prop_every_node_reachable_from_root(parents in proptest::collection::vec(0..10usize, 1..30)) {
            // node i's parent is some node with a smaller index, so the result is a tree
            let mut pairs = vec![(iri("n0"), None)];
            for (i, p) in parents.iter().enumerate() {
                let child = i + 1;
                pairs.push((iri(&format!("n{child}")), Some(iri(&format!("n{}", p % child)))));
            }
            let h = Hierarchy::from_pairs(pairs);
            prop_assert_eq!(h.self_and_descendants("n0").len(), h.len());
            for i in 0..h.len() {
                let name = format!("n{i}");
                let chain = h.ancestors(&name).unwrap();
                prop_assert!(chain.last().map_or(i == 0, |last| last == "n0"));
            }
        }
    }
}
