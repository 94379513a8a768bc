//! Bootstrap-aggregated tree ensembles and the random forest facade.

use std::fmt;
use std::str::FromStr;

use canopy_data::{DataFrame, Value};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::cart::CartGrower;
use crate::error::TreesError;
use crate::id3::Id3Grower;
use crate::sampling::{accuracy, random_sample, train_test_bootstrap_split};
use crate::tree::Tree;

/// The composition of a tree ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsembleType {
    /// Every tree is CART-grown.
    Cart,
    /// Every tree is ID3-grown.
    Id3,
    /// Per bootstrap sample, the better of a CART and an ID3 tree by
    /// out-of-bag accuracy.
    Hybrid,
}

impl EnsembleType {
    /// The registry name of this ensemble type.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            EnsembleType::Cart => "cart",
            EnsembleType::Id3 => "id3",
            EnsembleType::Hybrid => "hybrid",
        }
    }
}

impl FromStr for EnsembleType {
    type Err = TreesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cart" => Ok(EnsembleType::Cart),
            "id3" => Ok(EnsembleType::Id3),
            "hybrid" => Ok(EnsembleType::Hybrid),
            other => Err(TreesError::UnknownEnsembleType {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for EnsembleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds an ensemble of fitted trees from bootstrap resamples.
pub trait ForestGrower: Send {
    /// Grow `tree_count` fitted trees over `dataset`.
    ///
    /// # Errors
    ///
    /// Returns [`TreesError::EmptyDataset`] when `dataset` has no rows.
    fn grow_forest(
        &mut self,
        dataset: &DataFrame,
        tree_count: usize,
    ) -> Result<Vec<Tree>, TreesError>;
}

/// Resolve an ensemble-type name to its forest grower.
///
/// Unknown names silently fall back to the hybrid grower; strict
/// validation happens in [`RandomForest::new`] instead.
#[must_use]
pub fn grower_for(name: &str, seed: u64) -> Box<dyn ForestGrower> {
    match EnsembleType::from_str(name) {
        Ok(EnsembleType::Cart) => Box::new(CartForestGrower::new(seed)),
        Ok(EnsembleType::Id3) => Box::new(Id3ForestGrower::new(seed)),
        Ok(EnsembleType::Hybrid) | Err(_) => Box::new(HybridForestGrower::new(seed)),
    }
}

/// Per-tree seeds drawn from one master stream, so forests are
/// reproducible while trees stay independent.
fn tree_seeds(rng: &mut ChaCha8Rng, tree_count: usize) -> Vec<u64> {
    (0..tree_count).map(|_| rng.r#gen()).collect()
}

/// Grows a forest of CART trees over same-size bootstrap resamples.
#[derive(Debug)]
pub struct CartForestGrower {
    rng: ChaCha8Rng,
}

impl CartForestGrower {
    /// A grower seeded for reproducible resampling.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl ForestGrower for CartForestGrower {
    #[instrument(skip_all, fields(tree_count, rows = dataset.height()))]
    fn grow_forest(
        &mut self,
        dataset: &DataFrame,
        tree_count: usize,
    ) -> Result<Vec<Tree>, TreesError> {
        let seeds = tree_seeds(&mut self.rng, tree_count);
        seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let sample = random_sample(dataset, dataset.height(), true, &mut rng)?;
                let mut tree = Tree::new(Box::new(CartGrower::new().with_seed(rng.r#gen())));
                tree.fit(&sample)?;
                Ok(tree)
            })
            .collect()
    }
}

/// Grows a forest of ID3 trees over same-size bootstrap resamples.
#[derive(Debug)]
pub struct Id3ForestGrower {
    rng: ChaCha8Rng,
}

impl Id3ForestGrower {
    /// A grower seeded for reproducible resampling.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl ForestGrower for Id3ForestGrower {
    #[instrument(skip_all, fields(tree_count, rows = dataset.height()))]
    fn grow_forest(
        &mut self,
        dataset: &DataFrame,
        tree_count: usize,
    ) -> Result<Vec<Tree>, TreesError> {
        let seeds = tree_seeds(&mut self.rng, tree_count);
        seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let sample = random_sample(dataset, dataset.height(), true, &mut rng)?;
                let mut tree = Tree::new(Box::new(Id3Grower::new().with_seed(rng.r#gen())));
                tree.fit(&sample)?;
                Ok(tree)
            })
            .collect()
    }
}

/// Per bootstrap sample, grows one CART and one ID3 tree on the in-bag
/// rows and keeps whichever scores higher on the out-of-bag rows.
///
/// Ties keep the CART tree, which is always evaluated first.
#[derive(Debug)]
pub struct HybridForestGrower {
    rng: ChaCha8Rng,
}

impl HybridForestGrower {
    /// A grower seeded for reproducible resampling.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn fit_and_score(
        mut tree: Tree,
        in_bag: &DataFrame,
        held_out: &DataFrame,
        held_out_labels: &[Value],
    ) -> Result<(Tree, f64), TreesError> {
        tree.fit(in_bag)?;
        let predictions = tree.predict(held_out)?;
        let score = accuracy(&predictions, held_out_labels);
        Ok((tree, score))
    }
}

impl ForestGrower for HybridForestGrower {
    #[instrument(skip_all, fields(tree_count, rows = dataset.height()))]
    fn grow_forest(
        &mut self,
        dataset: &DataFrame,
        tree_count: usize,
    ) -> Result<Vec<Tree>, TreesError> {
        let seeds = tree_seeds(&mut self.rng, tree_count);
        seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let split = train_test_bootstrap_split(dataset, &mut rng)?;

                let cart = Tree::new(Box::new(CartGrower::new().with_seed(rng.r#gen())));
                let id3 = Tree::new(Box::new(Id3Grower::new().with_seed(rng.r#gen())));

                let (cart, cart_score) = Self::fit_and_score(
                    cart,
                    &split.in_bag,
                    &split.held_out,
                    &split.held_out_labels,
                )?;
                let (id3, id3_score) = Self::fit_and_score(
                    id3,
                    &split.in_bag,
                    &split.held_out,
                    &split.held_out_labels,
                )?;

                debug!(cart_score, id3_score, "scored hybrid candidates out-of-bag");
                // Strictly better replaces; a tie keeps the first-evaluated
                // CART tree.
                if id3_score > cart_score {
                    Ok(id3)
                } else {
                    Ok(cart)
                }
            })
            .collect()
    }
}

/// A bootstrap-aggregated ensemble classifier.
///
/// Prediction is a per-row plurality vote across the fitted trees; the
/// first label to reach the maximum vote count wins.
#[derive(Debug)]
pub struct RandomForest {
    ensemble: EnsembleType,
    tree_count: usize,
    seed: u64,
    forest: Option<Vec<Tree>>,
}

impl RandomForest {
    /// A forest of `tree_count` trees of the given ensemble type.
    ///
    /// # Errors
    ///
    /// Returns [`TreesError::UnknownEnsembleType`] for a type outside
    /// `{cart, id3, hybrid}` and [`TreesError::InvalidTreeCount`] for a
    /// zero tree count.
    pub fn new(tree_count: usize, ensemble_type: &str) -> Result<Self, TreesError> {
        let ensemble = EnsembleType::from_str(ensemble_type)?;
        if tree_count == 0 {
            return Err(TreesError::InvalidTreeCount { n_trees: tree_count });
        }
        Ok(Self {
            ensemble,
            tree_count,
            seed: 42,
            forest: None,
        })
    }

    /// Reseed resampling and tree growth for reproducible forests.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The ensemble type this forest was configured with.
    #[must_use]
    pub fn ensemble_type(&self) -> EnsembleType {
        self.ensemble
    }

    /// The fitted trees, if any.
    #[must_use]
    pub fn trees(&self) -> Option<&[Tree]> {
        self.forest.as_deref()
    }

    /// Fit the ensemble to `dataset` and return `self` for chaining.
    ///
    /// # Errors
    ///
    /// Returns [`TreesError::EmptyDataset`] when `dataset` has no rows.
    #[instrument(skip_all, fields(ensemble = %self.ensemble, tree_count = self.tree_count))]
    pub fn fit(&mut self, dataset: &DataFrame) -> Result<&mut Self, TreesError> {
        let mut grower = grower_for(self.ensemble.name(), self.seed);
        self.forest = Some(grower.grow_forest(dataset, self.tree_count)?);
        info!(tree_count = self.tree_count, "forest fitted");
        Ok(self)
    }

    /// Predict one label per row of `dataset` by majority vote.
    ///
    /// # Errors
    ///
    /// Returns [`TreesError::NotFitted`] when called before
    /// [`RandomForest::fit`].
    pub fn predict(&self, dataset: &DataFrame) -> Result<Vec<Value>, TreesError> {
        let forest = self.forest.as_ref().ok_or(TreesError::NotFitted)?;
        let per_tree: Vec<Vec<Value>> = forest
            .iter()
            .map(|tree| tree.predict(dataset))
            .collect::<Result<_, _>>()?;

        let mut labels = Vec::with_capacity(dataset.height());
        for row in 0..dataset.height() {
            let votes: Vec<&Value> = per_tree.iter().map(|p| &p[row]).collect();
            labels.push(majority_vote(&votes).ok_or(TreesError::NotFitted)?);
        }
        Ok(labels)
    }
}

impl fmt::Display for RandomForest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let forest = match &self.forest {
            Some(forest) => forest,
            None => return write!(f, "empty {} forest", self.ensemble),
        };
        let mut tally: Vec<(&str, usize)> = Vec::new();
        for tree in forest {
            match tally.iter_mut().find(|(kind, _)| *kind == tree.kind()) {
                Some((_, count)) => *count += 1,
                None => tally.push((tree.kind(), 1)),
            }
        }
        write!(f, "{} forest:", self.ensemble)?;
        for (kind, count) in tally {
            write!(f, " {kind}={count}")?;
        }
        Ok(())
    }
}

/// First label to reach the maximum vote count, scanning votes in order.
fn majority_vote(votes: &[&Value]) -> Option<Value> {
    let mut counts: Vec<(&Value, usize)> = Vec::new();
    for &vote in votes {
        match counts.iter_mut().find(|(label, _)| *label == vote) {
            Some((_, count)) => *count += 1,
            None => counts.push((vote, 1)),
        }
    }
    let mut best: Option<(&Value, usize)> = None;
    for (label, count) in counts {
        match best {
            Some((_, max)) if count <= max => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(label, _)| label.clone())
}
