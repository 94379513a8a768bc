//! Decision tree induction and bootstrap-aggregated ensembles.
//!
//! Two growers are provided: [`CartGrower`] builds binary trees by
//! recursive partitioning (Gini-driven by default) and [`Id3Grower`]
//! builds multiway trees (entropy-driven by default). [`RandomForest`]
//! aggregates bootstrap-trained trees of either kind, or of the hybrid
//! strategy that grows both per bootstrap sample and keeps whichever
//! scores better out-of-bag.
//!
//! Randomness is always explicit: growers and forests are seeded, so the
//! same seed over the same data grows the same model.

pub mod cart;
pub mod error;
pub mod forest;
pub mod id3;
pub mod metric;
pub mod node;
mod partition;
pub mod predicate;
pub mod sampling;
pub mod selector;
pub mod split;
pub mod tree;

pub use cart::CartGrower;
pub use error::TreesError;
pub use forest::{
    grower_for, CartForestGrower, EnsembleType, ForestGrower, HybridForestGrower,
    Id3ForestGrower, RandomForest,
};
pub use id3::Id3Grower;
pub use metric::ImpurityMetric;
pub use node::Node;
pub use predicate::{Test, TestKind};
pub use sampling::{
    accuracy, labels_equivalent, random_sample, train_test_bootstrap_split, train_test_split,
    BootstrapSplit,
};
pub use selector::FeatureSelector;
pub use split::Split;
pub use tree::{Tree, TreeGrower};
