//! Dataset partitioning helpers shared by the split search.

use canopy_data::{DataFrame, Value};

use crate::error::TreesError;
use crate::predicate::Test;

/// Split-construction operations the growers need on top of the plain
/// frame contract.
pub(crate) trait Partition {
    /// Two-way partition into (`feature == value`, `feature != value`).
    fn equal_split(&self, feature: &str, value: &Value) -> (DataFrame, DataFrame);

    /// Two-way partition into (`feature >= value`, everything else).
    fn equal_or_greater_split(&self, feature: &str, value: &Value) -> (DataFrame, DataFrame);

    /// One partition per distinct value of `feature`, in first-seen order.
    /// Every returned subset is non-empty.
    fn multiway_equal_split(&self, feature: &str) -> Vec<(Value, DataFrame)>;

    /// Candidate thresholds for a numeric feature: the feature values
    /// immediately following a label change in feature-sorted order. Only
    /// transition points are worth testing, so the rest are pruned.
    fn threshold_candidates(&self, feature: &str) -> Result<Vec<Value>, TreesError>;
}

impl Partition for DataFrame {
    fn equal_split(&self, feature: &str, value: &Value) -> (DataFrame, DataFrame) {
        let test = Test::equal(feature, value.clone());
        (
            self.filter(|row| test.passed_by(row)),
            self.filter(|row| !test.passed_by(row)),
        )
    }

    fn equal_or_greater_split(&self, feature: &str, value: &Value) -> (DataFrame, DataFrame) {
        let test = Test::equal_or_greater(feature, value.clone());
        (
            self.filter(|row| test.passed_by(row)),
            self.filter(|row| !test.passed_by(row)),
        )
    }

    fn multiway_equal_split(&self, feature: &str) -> Vec<(Value, DataFrame)> {
        let values = match self.column(feature) {
            Some(column) => column.unique(),
            None => return Vec::new(),
        };
        values
            .into_iter()
            .map(|value| {
                let (matching, _) = self.equal_split(feature, &value);
                (value, matching)
            })
            .collect()
    }

    fn threshold_candidates(&self, feature: &str) -> Result<Vec<Value>, TreesError> {
        let order = self.sorted_row_indices_by(feature)?;
        let column = self
            .column(feature)
            .ok_or_else(|| canopy_data::DataError::UnknownColumn {
                name: feature.to_string(),
            })?;
        let labels = self.class_labels();

        let mut thresholds: Vec<Value> = Vec::new();
        for pair in order.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if labels[prev] != labels[next] {
                let value = column.values()[next].clone();
                if !thresholds.contains(&value) {
                    thresholds.push(value);
                }
            }
        }
        Ok(thresholds)
    }
}
