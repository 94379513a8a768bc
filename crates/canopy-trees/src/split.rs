//! Candidate split records produced by the split search.

use canopy_data::{DataFrame, Value};

/// One candidate partition of a dataset, scored by information gain.
///
/// A split is binary when it carries a threshold value (its two subsets are
/// the passing and failing sides of an `EqualOrGreater` test) and multiway
/// otherwise (one subset per distinct categorical value, in first-seen
/// order).
#[derive(Debug, Clone)]
pub struct Split {
    feature: String,
    value: Option<Value>,
    subsets: Vec<DataFrame>,
    info_gain: f64,
}

impl Split {
    /// A scored binary split on `feature >= value`.
    #[must_use]
    pub fn binary(
        feature: impl Into<String>,
        value: Value,
        passing: DataFrame,
        failing: DataFrame,
        info_gain: f64,
    ) -> Self {
        Self {
            feature: feature.into(),
            value: Some(value),
            subsets: vec![passing, failing],
            info_gain,
        }
    }

    /// A scored multiway split on `feature`, one subset per distinct value.
    #[must_use]
    pub fn multiway(feature: impl Into<String>, subsets: Vec<DataFrame>, info_gain: f64) -> Self {
        Self {
            feature: feature.into(),
            value: None,
            subsets,
            info_gain,
        }
    }

    /// The zero-gain placeholder a split search starts from. Guarantees a
    /// well-defined incumbent even when no candidate improves on the root
    /// impurity.
    #[must_use]
    pub fn default_for(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            value: None,
            subsets: Vec::new(),
            info_gain: 0.0,
        }
    }

    /// The feature this split partitions on.
    #[must_use]
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// The threshold value, present only for binary splits.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The resulting subsets: [passing, failing] for binary splits, one
    /// per distinct value for multiway splits.
    #[must_use]
    pub fn subsets(&self) -> &[DataFrame] {
        &self.subsets
    }

    /// Consume the split, yielding its subsets.
    #[must_use]
    pub fn into_subsets(self) -> Vec<DataFrame> {
        self.subsets
    }

    /// The information gain this split achieves.
    #[must_use]
    pub fn info_gain(&self) -> f64 {
        self.info_gain
    }

    /// `true` when the split carries a threshold.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.value.is_some()
    }

    /// Strict gain comparison. Ties keep the incumbent, so the first
    /// candidate reaching the maximum gain always wins.
    #[must_use]
    pub fn better_than(&self, other: &Split) -> bool {
        self.info_gain > other.info_gain
    }
}

#[cfg(test)]
mod tests {
    use super::Split;

    #[test]
    fn default_split_has_zero_gain_and_no_threshold() {
        let split = Split::default_for("age");
        assert_eq!(split.info_gain(), 0.0);
        assert!(!split.is_binary());
        assert!(split.subsets().is_empty());
    }

    #[test]
    fn better_than_is_strict() {
        let incumbent = Split::default_for("a");
        let tied = Split::multiway("b", Vec::new(), 0.0);
        let improved = Split::multiway("c", Vec::new(), 0.1);
        assert!(!tied.better_than(&incumbent));
        assert!(improved.better_than(&incumbent));
        assert!(!incumbent.better_than(&improved));
    }
}
