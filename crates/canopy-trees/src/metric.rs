//! Impurity metrics for scoring candidate splits.

use canopy_data::DataFrame;

/// How label disorder in a subset is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpurityMetric {
    /// Shannon entropy: `Σ −p·log2(p)` over label probabilities.
    Entropy,
    /// Gini impurity: `1 − Σ p²` over label probabilities.
    Gini,
}

impl ImpurityMetric {
    /// Impurity of a subset's labels. A single-label subset scores `0.0`;
    /// so does an empty one.
    ///
    /// Distinct raw label values always count as distinct classes here,
    /// even when a boolean and an integer would be equivalent at
    /// evaluation time.
    #[must_use]
    pub fn compute(&self, subset: &DataFrame) -> f64 {
        let total = subset.height();
        if total == 0 {
            return 0.0;
        }
        let total = total as f64;
        let probabilities = subset
            .label_counts()
            .into_iter()
            .map(|(_, count)| count as f64 / total);
        match self {
            ImpurityMetric::Entropy => probabilities.map(|p| -p * p.log2()).sum(),
            ImpurityMetric::Gini => 1.0 - probabilities.map(|p| p * p).sum::<f64>(),
        }
    }

    /// Weighted impurity reduction of splitting a parent into `children`.
    ///
    /// Returns `0.0` when `children` is empty (no split to score).
    #[must_use]
    pub fn information_gain(&self, children: &[DataFrame], parent_impurity: f64) -> f64 {
        if children.is_empty() {
            return 0.0;
        }
        let total: usize = children.iter().map(DataFrame::height).sum();
        if total == 0 {
            return 0.0;
        }
        let weighted: f64 = children
            .iter()
            .map(|child| self.compute(child) * child.height() as f64 / total as f64)
            .sum();
        parent_impurity - weighted
    }
}
