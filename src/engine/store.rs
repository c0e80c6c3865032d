//! Category store: the growable prototype matrix of one module.
//!
//! Rows are stored flat, `width` features per row. The allocation grows by
//! `chunk` rows whenever every allocated row holds a category, and only
//! shrinks on [`CategoryStore::compact`] or a pruning [`CategoryStore::retain`].

use crate::pattern::{abs_delta, Feature, Pattern};
use serde::{Deserialize, Serialize};

/// Weight deltas at or below this absolute sum are not counted as change.
pub const CHANGE_THRESHOLD: f64 = 0.0000001;

/// Prototype matrix plus the per-category usage and change counters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryStore {
    width: usize,
    chunk: usize,
    rows: usize,
    len: usize,
    weights: Vec<Feature>,
    counters: Vec<u32>,
    changes: Vec<u32>,
}

impl CategoryStore {
    /// An empty store with one chunk of rows already allocated.
    pub fn new(width: usize, chunk: usize) -> Self {
        assert!(chunk > 0, "Category chunk must be positive");
        Self {
            width,
            chunk,
            rows: chunk,
            len: 0,
            weights: vec![None; chunk * width],
            counters: vec![0; chunk],
            changes: vec![0; chunk],
        }
    }

    /// Number of committed categories.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn chunk(&self) -> usize {
        self.chunk
    }

    /// Grow every array by one chunk when no free row is left.
    pub fn ensure_capacity(&mut self) {
        if self.len < self.rows {
            return;
        }
        self.resize_rows(self.rows + self.chunk);
    }

    /// Commit `weight` as a new category and return its index.
    ///
    /// The new category starts with one use and one change.
    pub fn push(&mut self, weight: Pattern) -> usize {
        assert_eq!(
            weight.dimensions(),
            self.width,
            "Dimension mismatch in new category"
        );
        self.ensure_capacity();
        let k = self.len;
        self.weights[k * self.width..(k + 1) * self.width].copy_from_slice(weight.data());
        self.len += 1;
        self.counters[k] += 1;
        self.changes[k] += 1;
        k
    }

    /// Prototype row of category `k`.
    pub fn weight(&self, k: usize) -> &[Feature] {
        assert!(k < self.len, "Category {k} out of range ({})", self.len);
        &self.weights[k * self.width..(k + 1) * self.width]
    }

    /// Committed prototype rows in index order.
    pub fn iter(&self) -> impl Iterator<Item = &[Feature]> {
        self.weights.chunks(self.width).take(self.len)
    }

    /// Overwrite row `k`, recording a change if it moved by more than
    /// [`CHANGE_THRESHOLD`]. Returns whether it did.
    pub fn set_weight(&mut self, k: usize, weight: Vec<Feature>) -> bool {
        assert_eq!(weight.len(), self.width, "Dimension mismatch in weight update");
        let changed = abs_delta(self.weight(k), &weight) > CHANGE_THRESHOLD;
        self.weights[k * self.width..(k + 1) * self.width].copy_from_slice(&weight);
        if changed {
            self.changes[k] += 1;
        }
        changed
    }

    /// Usage counters of the committed categories.
    pub fn counters(&self) -> &[u32] {
        &self.counters[..self.len]
    }

    /// Change counters of the committed categories.
    pub fn changes(&self) -> &[u32] {
        &self.changes[..self.len]
    }

    pub fn record_use(&mut self, k: usize) {
        assert!(k < self.len, "Category {k} out of range ({})", self.len);
        self.counters[k] += 1;
    }

    /// Total number of recorded changes.
    pub fn change_total(&self) -> u64 {
        self.changes().iter().map(|&c| u64::from(c)).sum()
    }

    pub fn reset_counters(&mut self) {
        self.counters.iter_mut().for_each(|c| *c = 0);
    }

    pub fn reset_changes(&mut self) {
        self.changes.iter_mut().for_each(|c| *c = 0);
    }

    /// Truncate every array to exactly the committed categories.
    pub fn compact(&mut self) {
        self.subset_rows(self.len);
    }

    /// Keep the first `rows` allocated rows.
    ///
    /// # Panics
    ///
    /// Panics when `rows` exceeds the current allocation.
    pub fn subset_rows(&mut self, rows: usize) {
        assert!(
            rows <= self.rows,
            "Cannot keep {rows} rows of a store with {} allocated",
            self.rows
        );
        self.resize_rows(rows);
        self.len = self.len.min(rows);
    }

    /// Drop every category whose `keep` flag is false.
    ///
    /// Survivors keep their relative order and are re-indexed from zero. The
    /// allocation is rebuilt to the next chunk multiple above the survivor
    /// count. The returned remap gives each old index its new index, or
    /// `None` when it was removed.
    pub fn retain(&mut self, keep: &[bool]) -> Vec<Option<usize>> {
        assert_eq!(keep.len(), self.len, "Dimension mismatch in category retain");
        let survivors = keep.iter().filter(|&&k| k).count();
        let rows = (survivors / self.chunk + 1) * self.chunk;

        let mut weights = vec![None; rows * self.width];
        let mut counters = vec![0; rows];
        let mut changes = vec![0; rows];
        let mut remap = Vec::with_capacity(self.len);
        let mut next = 0;
        for (old, &kept) in keep.iter().enumerate() {
            if !kept {
                remap.push(None);
                continue;
            }
            weights[next * self.width..(next + 1) * self.width].copy_from_slice(self.weight(old));
            counters[next] = self.counters[old];
            changes[next] = self.changes[old];
            remap.push(Some(next));
            next += 1;
        }

        self.weights = weights;
        self.counters = counters;
        self.changes = changes;
        self.rows = rows;
        self.len = survivors;
        remap
    }

    fn resize_rows(&mut self, rows: usize) {
        self.weights.resize(rows * self.width, None);
        self.counters.resize(rows, 0);
        self.changes.resize(rows, 0);
        self.rows = rows;
    }
}
