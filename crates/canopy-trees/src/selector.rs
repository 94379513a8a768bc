//! Feature-selection policies consulted before each node's split search.

use std::collections::HashSet;

use rand::Rng;

/// Restricts which features a grower may consider at a node.
///
/// A selector belongs to exactly one grower; `MaxOneSplitPerFeature`
/// accumulates private state there and two independently constructed
/// selectors never share it.
#[derive(Debug, Clone)]
pub enum FeatureSelector {
    /// Every feature is always a candidate.
    AllFeatures,
    /// A fresh random half of the features on every call. Each draw is
    /// independent; nothing is cached between calls.
    RandomFeatureSubspace,
    /// Each feature may win a split at most once per grower.
    MaxOneSplitPerFeature {
        /// Features already used by a committed split.
        exhausted: HashSet<String>,
    },
}

impl FeatureSelector {
    /// A fresh `MaxOneSplitPerFeature` selector with nothing exhausted.
    #[must_use]
    pub fn max_one_split_per_feature() -> Self {
        FeatureSelector::MaxOneSplitPerFeature {
            exhausted: HashSet::new(),
        }
    }

    /// Candidate features for the next split search.
    #[must_use]
    pub fn select<R: Rng>(&self, all_features: &[String], rng: &mut R) -> Vec<String> {
        match self {
            FeatureSelector::AllFeatures => all_features.to_vec(),
            FeatureSelector::RandomFeatureSubspace => {
                let k = (all_features.len() as f64 / 2.0).round() as usize;
                subsample(all_features, k, rng)
            }
            FeatureSelector::MaxOneSplitPerFeature { exhausted } => all_features
                .iter()
                .filter(|f| !exhausted.contains(*f))
                .cloned()
                .collect(),
        }
    }

    /// Record that `feature` won a split. Only `MaxOneSplitPerFeature`
    /// reacts; the exhaustion is permanent for this selector's lifetime.
    pub fn update(&mut self, feature: &str) {
        if let FeatureSelector::MaxOneSplitPerFeature { exhausted } = self {
            exhausted.insert(feature.to_string());
        }
    }
}

/// Duplicate-free random subset of size `k`, by partial Fisher-Yates.
fn subsample<R: Rng>(features: &[String], k: usize, rng: &mut R) -> Vec<String> {
    let mut pool = features.to_vec();
    let k = k.min(pool.len());
    for i in 0..k {
        let j = rng.gen_range(i..pool.len());
        pool.swap(i, j);
    }
    pool.truncate(k);
    pool
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::FeatureSelector;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn all_features_passes_input_through() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let all = names(&["a", "b", "c"]);
        let selector = FeatureSelector::AllFeatures;
        assert_eq!(selector.select(&all, &mut rng), all);
    }

    #[test]
    fn subspace_draws_half_without_duplicates() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let all = names(&["a", "b", "c", "d", "e"]);
        let selector = FeatureSelector::RandomFeatureSubspace;
        for _ in 0..50 {
            let picked = selector.select(&all, &mut rng);
            // round(5 / 2) = 3
            assert_eq!(picked.len(), 3);
            let mut dedup = picked.clone();
            dedup.sort();
            dedup.dedup();
            assert_eq!(dedup.len(), 3);
            assert!(picked.iter().all(|f| all.contains(f)));
        }
    }

    #[test]
    fn subspace_redraws_each_call() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let all = names(&["a", "b", "c", "d", "e", "f"]);
        let selector = FeatureSelector::RandomFeatureSubspace;
        let draws: Vec<Vec<String>> = (0..20).map(|_| selector.select(&all, &mut rng)).collect();
        assert!(draws.iter().any(|d| d != &draws[0]));
    }

    #[test]
    fn exhaustion_is_permanent_and_private() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let all = names(&["age", "sex"]);

        let mut selector = FeatureSelector::max_one_split_per_feature();
        selector.update("age");
        assert_eq!(selector.select(&all, &mut rng), names(&["sex"]));

        // An independently constructed selector is unaffected.
        let fresh = FeatureSelector::max_one_split_per_feature();
        assert_eq!(fresh.select(&all, &mut rng), all);
    }

    #[test]
    fn update_is_a_no_op_for_stateless_policies() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let all = names(&["a", "b"]);
        let mut selector = FeatureSelector::AllFeatures;
        selector.update("a");
        assert_eq!(selector.select(&all, &mut rng), all);
    }
}
