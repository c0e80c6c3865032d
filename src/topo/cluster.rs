//! Connected components over a category edge list.

/// Disjoint sets with path halving and union by size.
struct DisjointSets {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut a, mut b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
    }
}

/// Partition the categories `0..nodes` into linked clusters.
///
/// Each cluster lists its members in ascending order; clusters are ordered
/// by their smallest member. A category on no edge is its own cluster.
///
/// # Example
///
/// ```rust
/// use resonant::link_clusters;
///
/// let clusters = link_clusters(&[(0, 2), (3, 4)], 5);
/// assert_eq!(clusters, vec![vec![0, 2], vec![1], vec![3, 4]]);
/// ```
pub fn link_clusters(edges: &[(usize, usize)], nodes: usize) -> Vec<Vec<usize>> {
    let mut sets = DisjointSets::new(nodes);
    for &(a, b) in edges {
        assert!(
            a < nodes && b < nodes,
            "Edge ({a}, {b}) outside {nodes} categories"
        );
        sets.union(a, b);
    }

    let mut slot = vec![usize::MAX; nodes];
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for node in 0..nodes {
        let root = sets.find(node);
        if slot[root] == usize::MAX {
            slot[root] = clusters.len();
            clusters.push(Vec::new());
        }
        clusters[slot[root]].push(node);
    }
    clusters
}
