//! Undirected edges between categories of one module.

use serde::{Deserialize, Serialize};

/// Deduplicated, undirected category links in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeList {
    edges: Vec<(usize, usize)>,
}

impl EdgeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn as_slice(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn iter(&self) -> impl Iterator<Item = &(usize, usize)> {
        self.edges.iter()
    }

    /// True when `a` and `b` are linked, in either direction.
    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.edges
            .iter()
            .any(|&(p, q)| (p == a && q == b) || (p == b && q == a))
    }

    /// Link `a` and `b` unless already linked. Returns whether an edge was added.
    pub fn link(&mut self, a: usize, b: usize) -> bool {
        if self.contains(a, b) {
            return false;
        }
        self.edges.push((a, b));
        true
    }

    /// Rewrite endpoints through a pruning remap.
    ///
    /// Edges touching a removed category are dropped.
    pub fn remap(&mut self, remap: &[Option<usize>]) {
        self.edges = self
            .edges
            .iter()
            .filter_map(|&(a, b)| Some((remap[a]?, remap[b]?)))
            .collect();
    }
}
