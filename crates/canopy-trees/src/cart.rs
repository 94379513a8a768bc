//! Binary recursive-partitioning tree induction.

use canopy_data::{DataFrame, Value};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::error::TreesError;
use crate::metric::ImpurityMetric;
use crate::node::Node;
use crate::partition::Partition;
use crate::predicate::Test;
use crate::selector::FeatureSelector;
use crate::split::Split;
use crate::tree::TreeGrower;

/// Grows binary trees by recursive partitioning, Gini-driven by default.
///
/// Every committed split is an `EqualOrGreater` test, for categorical
/// features too: the split search partitions those by equality, and the
/// value comparison at classification time encodes the same membership for
/// the values actually present in training data.
#[derive(Debug, Clone)]
pub struct CartGrower {
    selector: FeatureSelector,
    metric: ImpurityMetric,
    rng: ChaCha8Rng,
}

impl CartGrower {
    /// A grower with the default policy: a fresh random feature subspace
    /// per node, scored by Gini impurity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            selector: FeatureSelector::RandomFeatureSubspace,
            metric: ImpurityMetric::Gini,
            rng: ChaCha8Rng::seed_from_u64(42),
        }
    }

    /// Replace the feature-selection policy.
    #[must_use]
    pub fn with_selector(mut self, selector: FeatureSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Replace the impurity metric.
    #[must_use]
    pub fn with_metric(mut self, metric: ImpurityMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Reseed the grower's random source.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    fn grow_node(
        &mut self,
        dataset: &DataFrame,
        selector: &FeatureSelector,
    ) -> Result<Node, TreesError> {
        let best = match self.find_best_split(dataset, selector)? {
            Some(split) => split,
            None => return Node::leaf_of(dataset),
        };
        if best.info_gain() == 0.0 {
            return Node::leaf_of(dataset);
        }
        let feature = best.feature().to_string();
        let value = match best.value() {
            Some(value) => value.clone(),
            None => return Node::leaf_of(dataset),
        };
        debug!(%feature, gain = best.info_gain(), "committing binary split");
        self.branch(dataset, best, feature, value, selector)
    }

    fn branch(
        &mut self,
        dataset: &DataFrame,
        split: Split,
        feature: String,
        value: Value,
        selector: &FeatureSelector,
    ) -> Result<Node, TreesError> {
        let mut subsets = split.into_subsets().into_iter();
        let (passing, failing) = match (subsets.next(), subsets.next()) {
            (Some(passing), Some(failing)) => (passing, failing),
            _ => return Node::leaf_of(dataset),
        };
        let passing = self.grow_node(&passing, selector)?;
        let failing = self.grow_node(&failing, selector)?;
        Ok(Node::Binary {
            test: Test::equal_or_greater(feature, value),
            passing: Box::new(passing),
            failing: Box::new(failing),
        })
    }

    /// Best two-way split over every (candidate feature, distinct value)
    /// pair, starting from a zero-gain incumbent on the first candidate.
    /// Candidates with an empty side are discarded; ties keep the earlier
    /// candidate. `None` when the selector offers no features at all.
    fn find_best_split(
        &mut self,
        dataset: &DataFrame,
        selector: &FeatureSelector,
    ) -> Result<Option<Split>, TreesError> {
        let features = dataset.feature_names();
        let candidates = selector.select(&features, &mut self.rng);
        let first = match candidates.first() {
            Some(feature) => feature.clone(),
            None => return Ok(None),
        };
        let parent_impurity = self.metric.compute(dataset);
        let mut best = Split::default_for(first);

        for feature in &candidates {
            let column = match dataset.column(feature) {
                Some(column) => column,
                None => continue,
            };
            let numeric = column.is_numeric();
            for value in column.unique() {
                let (passing, failing) = if numeric {
                    dataset.equal_or_greater_split(feature, &value)
                } else {
                    dataset.equal_split(feature, &value)
                };
                if passing.is_empty() || failing.is_empty() {
                    continue;
                }
                let children = [passing, failing];
                let gain = self.metric.information_gain(&children, parent_impurity);
                let [passing, failing] = children;
                let candidate = Split::binary(feature.clone(), value, passing, failing, gain);
                if candidate.better_than(&best) {
                    best = candidate;
                }
            }
        }
        Ok(Some(best))
    }
}

impl Default for CartGrower {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeGrower for CartGrower {
    #[instrument(skip_all, fields(rows = dataset.height()))]
    fn grow(&mut self, dataset: &DataFrame) -> Result<Node, TreesError> {
        if dataset.is_empty() {
            return Err(TreesError::EmptyDataset);
        }
        // Each fit starts from the configured policy; selector state never
        // carries over between fits.
        let selector = self.selector.clone();
        self.grow_node(dataset, &selector)
    }

    fn kind(&self) -> &'static str {
        "cart"
    }
}

#[cfg(test)]
mod tests {
    use canopy_data::{Column, DataFrame, Value};

    use super::CartGrower;
    use crate::node::Node;
    use crate::selector::FeatureSelector;
    use crate::tree::TreeGrower;

    fn reptiles() -> DataFrame {
        let lays_eggs = [true, true, false, false, true, false];
        let toxic = [true, false, true, false, true, true];
        let reptile: Vec<bool> = lays_eggs
            .iter()
            .zip(&toxic)
            .map(|(&e, &t)| e && t)
            .collect();
        DataFrame::new(vec![
            Column::new("lays_eggs", lays_eggs.iter().map(|&b| Value::Bool(b)).collect()).unwrap(),
            Column::new("toxic", toxic.iter().map(|&b| Value::Bool(b)).collect()).unwrap(),
            Column::new("reptile", reptile.into_iter().map(Value::Bool).collect()).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn pure_dataset_grows_a_single_leaf() {
        let df = DataFrame::new(vec![
            Column::new("x", vec![Value::Int(1), Value::Int(2)]).unwrap(),
            Column::new("label", vec![Value::from("a"), Value::from("a")]).unwrap(),
        ])
        .unwrap();
        let mut grower = CartGrower::new().with_selector(FeatureSelector::AllFeatures);
        let root = grower.grow(&df).unwrap();
        assert!(matches!(root, Node::Leaf { .. }));
    }

    #[test]
    fn learns_a_conjunction_of_boolean_features() {
        let df = reptiles();
        let mut grower = CartGrower::new().with_selector(FeatureSelector::AllFeatures);
        let root = grower.grow(&df).unwrap();
        for row in df.rows() {
            assert_eq!(&root.classify(&row), row.label());
        }
    }

    #[test]
    fn root_split_separates_numeric_classes() {
        let df = DataFrame::new(vec![
            Column::new(
                "x",
                (0..10).map(|i| Value::Float(f64::from(i))).collect(),
            )
            .unwrap(),
            Column::new(
                "label",
                (0..10)
                    .map(|i| Value::from(if i < 5 { "low" } else { "high" }))
                    .collect(),
            )
            .unwrap(),
        ])
        .unwrap();
        let mut grower = CartGrower::new().with_selector(FeatureSelector::AllFeatures);
        let root = grower.grow(&df).unwrap();
        match &root {
            Node::Binary { test, .. } => {
                assert_eq!(test.feature(), "x");
                assert_eq!(test.value(), &Value::Float(5.0));
            }
            other => panic!("expected a binary root, got {other:?}"),
        }
        for row in df.rows() {
            assert_eq!(&root.classify(&row), row.label());
        }
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let df = reptiles().take(&[]).unwrap();
        let mut grower = CartGrower::new();
        assert!(grower.grow(&df).is_err());
    }

    #[test]
    fn same_seed_grows_the_same_tree() {
        let df = reptiles();
        let grow = |seed| {
            let mut grower = CartGrower::new().with_seed(seed);
            grower.grow(&df).unwrap()
        };
        let predictions = |root: &Node| -> Vec<Value> {
            df.rows().map(|row| root.classify(&row)).collect()
        };
        assert_eq!(predictions(&grow(7)), predictions(&grow(7)));
    }
}
