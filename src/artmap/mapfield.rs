//! Map fields linking module-a categories to targets.

use crate::engine::CHANGE_THRESHOLD;
use crate::pattern::{abs_delta, Feature, Pattern};
use crate::rule::Fuzzy;
use serde::{Deserialize, Serialize};

/// Class label of the simplified ARTMAP.
pub type Label = i64;

// =============================================================================
// Simplified
// =============================================================================

/// The label bound to each module-a category.
///
/// A label is bound once, when its category is created, and never changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMap {
    labels: Vec<Label>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Bind `label` to the freshly created `category`.
    pub fn bind(&mut self, category: usize, label: Label) {
        assert_eq!(
            category,
            self.labels.len(),
            "Labels are bound in category creation order"
        );
        self.labels.push(label);
    }

    pub fn label(&self, category: usize) -> Option<Label> {
        self.labels.get(category).copied()
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }
}

// =============================================================================
// Standard
// =============================================================================

/// Association weights between module-a rows and module-b columns.
///
/// A new row is uncommitted (1.0 in every column) so it passes the
/// map-field test for any module-b winner; a new column starts at 0.
/// Rows learn with the fuzzy update toward the one-hot module-b winner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssociationField {
    vigilance: f64,
    learning_rate: f64,
    a_size: usize,
    b_size: usize,
    /// Row-major `a_size × b_size`.
    weights: Vec<f64>,
    changes: u64,
}

impl AssociationField {
    pub fn new(vigilance: f64, learning_rate: f64) -> Self {
        Self {
            vigilance,
            learning_rate,
            a_size: 0,
            b_size: 0,
            weights: Vec::new(),
            changes: 0,
        }
    }

    pub fn vigilance(&self) -> f64 {
        self.vigilance
    }

    /// Number of module-a rows.
    pub fn a_size(&self) -> usize {
        self.a_size
    }

    /// Number of module-b columns.
    pub fn b_size(&self) -> usize {
        self.b_size
    }

    pub fn row(&self, a: usize) -> &[f64] {
        assert!(a < self.a_size, "Map field row {a} out of range ({})", self.a_size);
        &self.weights[a * self.b_size..(a + 1) * self.b_size]
    }

    /// Append an uncommitted row.
    pub fn add_row(&mut self) {
        self.weights.extend(std::iter::repeat(1.0).take(self.b_size));
        self.a_size += 1;
    }

    /// Append a zero column to every row.
    pub fn add_column(&mut self) {
        let b_size = self.b_size + 1;
        let mut weights = Vec::with_capacity(self.a_size * b_size);
        for a in 0..self.a_size {
            weights.extend_from_slice(&self.weights[a * self.b_size..(a + 1) * self.b_size]);
            weights.push(0.0);
        }
        self.weights = weights;
        self.b_size = b_size;
    }

    /// Fuzzy match of the one-hot `b` against row `a`.
    pub fn match_value(&self, a: usize, b: usize) -> f64 {
        Fuzzy::match_value(self.one_hot(b).data(), &Self::features(self.row(a)))
    }

    /// The map-field vigilance test.
    pub fn passes(&self, a: usize, b: usize) -> bool {
        self.match_value(a, b) >= self.vigilance
    }

    /// Drive row `a` toward the one-hot `b`. Returns whether it moved.
    pub fn update(&mut self, a: usize, b: usize) -> bool {
        let old = Self::features(self.row(a));
        let new = Fuzzy::update(self.learning_rate, self.one_hot(b).data(), &old);
        let changed = abs_delta(&old, &new) > CHANGE_THRESHOLD;
        let row = &mut self.weights[a * self.b_size..(a + 1) * self.b_size];
        for (w, v) in row.iter_mut().zip(new) {
            *w = v.unwrap_or(0.0);
        }
        if changed {
            self.changes += 1;
        }
        changed
    }

    /// First column of row `a` holding exactly 1.0.
    pub fn active_column(&self, a: usize) -> Option<usize> {
        self.row(a).iter().position(|&w| w == 1.0)
    }

    /// Rows that changed this epoch.
    pub fn change_total(&self) -> u64 {
        self.changes
    }

    pub(crate) fn reset_changes(&mut self) {
        self.changes = 0;
    }

    fn one_hot(&self, b: usize) -> Pattern {
        Pattern::one_hot(self.b_size, b)
    }

    fn features(row: &[f64]) -> Vec<Feature> {
        row.iter().copied().map(Some).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_bound_in_order() {
        let mut map = LabelMap::new();
        map.bind(0, 4);
        map.bind(1, -2);
        assert_eq!(map.labels(), &[4, -2]);
        assert_eq!(map.label(1), Some(-2));
        assert_eq!(map.label(2), None);
    }

    #[test]
    #[should_panic(expected = "creation order")]
    fn test_label_rebinding_panics() {
        let mut map = LabelMap::new();
        map.bind(0, 1);
        map.bind(0, 2);
    }

    #[test]
    fn test_grows_rows_and_columns() {
        let mut field = AssociationField::new(0.8, 1.0);
        field.add_column();
        field.add_row();
        assert_eq!(field.row(0), &[1.0]);
        field.add_column();
        field.add_row();
        assert_eq!(field.row(0), &[1.0, 0.0]);
        assert_eq!(field.row(1), &[1.0, 1.0]);
        assert_eq!((field.a_size(), field.b_size()), (2, 2));
    }

    #[test]
    fn test_row_before_column() {
        let mut field = AssociationField::new(0.8, 1.0);
        field.add_row();
        assert_eq!(field.row(0), &[] as &[f64]);
        field.add_column();
        assert_eq!(field.row(0), &[0.0]);
    }

    #[test]
    fn test_uncommitted_row_matches_anything() {
        let mut field = AssociationField::new(0.9, 1.0);
        for _ in 0..3 {
            field.add_column();
        }
        field.add_row();
        assert_eq!(field.match_value(0, 2), 1.0);
        assert!(field.passes(0, 1));
        assert_eq!(field.active_column(0), Some(0));
    }

    #[test]
    fn test_update_commits_row() {
        let mut field = AssociationField::new(0.9, 1.0);
        field.add_column();
        field.add_column();
        field.add_row();
        assert!(field.update(0, 1));
        assert_eq!(field.row(0), &[0.0, 1.0]);
        assert_eq!(field.active_column(0), Some(1));
        assert!(!field.passes(0, 0));
        assert!(!field.update(0, 1));
        assert_eq!(field.change_total(), 1);
        field.reset_changes();
        assert_eq!(field.change_total(), 0);
    }
}
