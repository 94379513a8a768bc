//! Multiway entropy-driven tree induction.

use canopy_data::DataFrame;
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

/// Grows trees with multiway branches on categorical features and
/// threshold branches on numeric ones, entropy-driven by default.
///
/// With the default `MaxOneSplitPerFeature` policy, each feature may win a
/// split only once per fit; numeric features are pruned to thresholds at
/// label transitions in sorted order.
#[derive(Debug, Clone)]
pub struct Id3Grower {
    selector: FeatureSelector,
    metric: ImpurityMetric,
    rng: ChaCha8Rng,
}

impl Id3Grower {
    /// A grower with the default policy: one split per feature, scored by
    /// entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            selector: FeatureSelector::max_one_split_per_feature(),
            metric: ImpurityMetric::Entropy,
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
        parent: Option<&DataFrame>,
        selector: &mut FeatureSelector,
    ) -> Result<Node, TreesError> {
        if dataset.is_empty() {
            // An empty branch of a multiway split one level up predicts
            // the parent's majority label.
            return match parent {
                Some(parent) => Node::leaf_of(parent),
                None => Err(TreesError::EmptyDataset),
            };
        }
        let features = dataset.feature_names();
        let candidates = selector.select(&features, &mut self.rng);
        if dataset.is_pure() || candidates.is_empty() {
            return Node::leaf_of(dataset);
        }

        let best = self.find_best_split(dataset, &candidates)?;
        // The winning feature is spent even when its gain turns out to be
        // zero; exhaustion is permanent for the rest of this fit.
        selector.update(best.feature());

        if best.info_gain() == 0.0 {
            return Node::leaf_of(dataset);
        }
        debug!(
            feature = best.feature(),
            gain = best.info_gain(),
            binary = best.is_binary(),
            "committing split"
        );
        if best.is_binary() {
            self.branch_binary(dataset, best, selector)
        } else {
            self.branch_multiway(dataset, best, selector)
        }
    }

    fn branch_binary(
        &mut self,
        dataset: &DataFrame,
        split: Split,
        selector: &mut FeatureSelector,
    ) -> Result<Node, TreesError> {
        let feature = split.feature().to_string();
        let value = match split.value() {
            Some(value) => value.clone(),
            None => return Node::leaf_of(dataset),
        };
        let mut subsets = split.into_subsets().into_iter();
        let (passing, failing) = match (subsets.next(), subsets.next()) {
            (Some(passing), Some(failing)) => (passing, failing),
            _ => return Node::leaf_of(dataset),
        };
        let passing = self.grow_node(&passing, Some(dataset), selector)?;
        let failing = self.grow_node(&failing, Some(dataset), selector)?;
        Ok(Node::Binary {
            test: Test::equal_or_greater(feature, value),
            passing: Box::new(passing),
            failing: Box::new(failing),
        })
    }

    fn branch_multiway(
        &mut self,
        dataset: &DataFrame,
        split: Split,
        selector: &mut FeatureSelector,
    ) -> Result<Node, TreesError> {
        let feature = split.feature().to_string();
        let mut branches = Vec::new();
        for subset in split.into_subsets() {
            // Multiway subsets are one per distinct value, never empty.
            let value = match subset.column(&feature).and_then(|c| c.first()) {
                Some(value) => value.clone(),
                None => continue,
            };
            let child = self.grow_node(&subset, Some(dataset), selector)?;
            branches.push((Test::equal(feature.clone(), value), child));
        }
        let fallback = dataset.majority_label().ok_or(TreesError::EmptyDataset)?;
        Ok(Node::Multiway { branches, fallback })
    }

    /// Best split across all candidate features: threshold candidates at
    /// label transitions for numeric features, exactly one multiway split
    /// for categorical ones. Ties keep the earlier candidate.
    fn find_best_split(
        &mut self,
        dataset: &DataFrame,
        candidates: &[String],
    ) -> Result<Split, TreesError> {
        let first = match candidates.first() {
            Some(feature) => feature.clone(),
            None => return Err(TreesError::EmptyDataset),
        };
        let parent_impurity = self.metric.compute(dataset);
        let mut best = Split::default_for(first);

        for feature in candidates {
            let numeric = dataset.column(feature).is_some_and(|c| c.is_numeric());
            if numeric {
                for value in dataset.threshold_candidates(feature)? {
                    let (passing, failing) = dataset.equal_or_greater_split(feature, &value);
                    let children = [passing, failing];
                    let gain = self.metric.information_gain(&children, parent_impurity);
                    let [passing, failing] = children;
                    let candidate =
                        Split::binary(feature.clone(), value, passing, failing, gain);
                    if candidate.better_than(&best) {
                        best = candidate;
                    }
                }
            } else {
                let subsets: Vec<DataFrame> = dataset
                    .multiway_equal_split(feature)
                    .into_iter()
                    .map(|(_, subset)| subset)
                    .collect();
                let gain = self.metric.information_gain(&subsets, parent_impurity);
                let candidate = Split::multiway(feature.clone(), subsets, gain);
                if candidate.better_than(&best) {
                    best = candidate;
                }
            }
        }
        Ok(best)
    }
}

impl Default for Id3Grower {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeGrower for Id3Grower {
    #[instrument(skip_all, fields(rows = dataset.height()))]
    fn grow(&mut self, dataset: &DataFrame) -> Result<Node, TreesError> {
        // Each fit starts from the configured policy with a fresh
        // exhaustion set; state never carries over between fits.
        let mut selector = self.selector.clone();
        self.grow_node(dataset, None, &mut selector)
    }

    fn kind(&self) -> &'static str {
        "id3"
    }
}
