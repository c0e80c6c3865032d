//! Hypersphere ART.
//!
//! A prototype is a sphere: the first `d` entries of a row are its centre
//! and the last entry is its radius `R`. Similarity is measured against the
//! data-wide bound `R̄`, half the diagonal of the training bounding box.

use super::LearningRule;
use crate::config::ModuleParams;
use crate::pattern::{Feature, Pattern};
use serde::{Deserialize, Serialize};

/// Distances below this leave the centre untouched.
const MIN_DISTANCE: f64 = 0.000001;

/// Hypersphere ART learning rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Hypersphere {
    /// Radius bound `R̄`; zero until fitted.
    r_bar: f64,
}

impl Hypersphere {
    /// An unfitted rule; `R̄` is taken from the first training batch.
    pub fn new() -> Self {
        Self { r_bar: 0.0 }
    }

    /// A rule with a fixed radius bound.
    pub fn with_radius_bound(r_bar: f64) -> Self {
        Self {
            r_bar: r_bar.max(f64::EPSILON),
        }
    }

    pub fn radius_bound(&self) -> f64 {
        self.r_bar
    }

    pub fn is_fitted(&self) -> bool {
        self.r_bar > 0.0
    }

    /// `sqrt(0.5 · Σ (colmax − colmin)²)` over the present values of each column.
    pub fn radius_bound_of(data: &[Pattern]) -> f64 {
        let dims = data.first().map_or(0, Pattern::dimensions);
        let mut sum = 0.0;
        for col in 0..dims {
            let mut lo = f64::INFINITY;
            let mut hi = f64::NEG_INFINITY;
            for v in data.iter().filter_map(|row| row[col]) {
                lo = lo.min(v);
                hi = hi.max(v);
            }
            if lo <= hi {
                sum += (hi - lo).powi(2);
            }
        }
        (0.5 * sum).sqrt()
    }

    /// Euclidean distance over features present in both vectors.
    pub fn distance(x: &[Feature], m: &[Feature]) -> f64 {
        assert_eq!(x.len(), m.len(), "Dimension mismatch in hypersphere distance");
        x.iter()
            .zip(m.iter())
            .filter_map(|(a, b)| Some((a.as_ref()? - b.as_ref()?).powi(2)))
            .sum::<f64>()
            .sqrt()
    }

    fn split(w: &[Feature]) -> (&[Feature], f64) {
        let d = w.len() - 1;
        (&w[..d], w[d].unwrap_or(0.0))
    }
}

impl LearningRule for Hypersphere {
    fn weight_dimension(&self, input_dimension: usize) -> usize {
        input_dimension + 1
    }

    fn new_weight(&self, x: &Pattern) -> Pattern {
        let mut data = x.data().to_vec();
        data.push(Some(0.0));
        Pattern::from_data(data)
    }

    /// `(R̄ − max(R, ‖x − m‖)) / (R̄ − R + α)`
    fn activation(&self, params: &ModuleParams, x: &[Feature], w: &[Feature]) -> f64 {
        let (m, r) = Self::split(w);
        let reach = r.max(Self::distance(x, m));
        (self.r_bar - reach) / (self.r_bar - r + params.alpha)
    }

    /// `1 − max(R, ‖x − m‖) / R̄`
    fn match_score(&self, _params: &ModuleParams, x: &[Feature], w: &[Feature]) -> f64 {
        let (m, r) = Self::split(w);
        1.0 - r.max(Self::distance(x, m)) / self.r_bar
    }

    fn weight_update(&self, learning_rate: f64, x: &[Feature], w: &[Feature]) -> Vec<Feature> {
        let (m, r) = Self::split(w);
        let dis = Self::distance(x, m);
        let mut updated: Vec<Feature> = if dis < MIN_DISTANCE {
            m.to_vec()
        } else {
            let pull = learning_rate / 2.0 * (1.0 - r.min(dis) / dis);
            m.iter()
                .zip(x.iter())
                .map(|(mi, xi)| match (mi, xi) {
                    (Some(mi), Some(xi)) => Some(mi + pull * (xi - mi)),
                    _ => *mi,
                })
                .collect()
        };
        updated.push(Some(r + learning_rate / 2.0 * (r.max(dis) - r)));
        updated
    }

    /// The centre of the sphere.
    fn prototype(&self, w: &[Feature]) -> Pattern {
        Pattern::from_data(Self::split(w).0.to_vec())
    }

    fn fit(&mut self, data: &[Pattern]) {
        if !self.is_fitted() {
            self.r_bar = Self::radius_bound_of(data).max(f64::EPSILON);
        }
    }
}
