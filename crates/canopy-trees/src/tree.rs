//! A single decision tree: one grower plus its fitted root.

use std::fmt;

use canopy_data::{DataFrame, Value};

use crate::cart::CartGrower;
use crate::error::TreesError;
use crate::id3::Id3Grower;
use crate::node::Node;

/// A recursive induction algorithm producing a root node from a dataset.
pub trait TreeGrower: Send + fmt::Debug {
    /// Grow a tree over `dataset`, returning its root.
    ///
    /// # Errors
    ///
    /// Returns [`TreesError::EmptyDataset`] when `dataset` has no rows.
    fn grow(&mut self, dataset: &DataFrame) -> Result<Node, TreesError>;

    /// Short name of the algorithm, `"cart"` or `"id3"`.
    fn kind(&self) -> &'static str;
}

/// A decision tree classifier.
///
/// Fitting replaces any previous root; grower state is private to this
/// tree and never shared with another.
#[derive(Debug)]
pub struct Tree {
    grower: Box<dyn TreeGrower>,
    root: Option<Node>,
}

impl Tree {
    /// A tree using the given grower.
    #[must_use]
    pub fn new(grower: Box<dyn TreeGrower>) -> Self {
        Self { grower, root: None }
    }

    /// A tree with a default CART grower.
    #[must_use]
    pub fn cart() -> Self {
        Self::new(Box::new(CartGrower::new()))
    }

    /// A tree with a default ID3 grower.
    #[must_use]
    pub fn id3() -> Self {
        Self::new(Box::new(Id3Grower::new()))
    }

    /// Short name of this tree's induction algorithm.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.grower.kind()
    }

    /// The fitted root, if any.
    #[must_use]
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Fit this tree to `dataset` and return `self` for chaining.
    ///
    /// # Errors
    ///
    /// Returns [`TreesError::EmptyDataset`] when `dataset` has no rows.
    pub fn fit(&mut self, dataset: &DataFrame) -> Result<&mut Self, TreesError> {
        self.root = Some(self.grower.grow(dataset)?);
        Ok(self)
    }

    /// Predict one label per row of `dataset`, in row order.
    ///
    /// # Errors
    ///
    /// Returns [`TreesError::NotFitted`] when called before [`Tree::fit`].
    pub fn predict(&self, dataset: &DataFrame) -> Result<Vec<Value>, TreesError> {
        let root = self.root.as_ref().ok_or(TreesError::NotFitted)?;
        Ok(dataset.rows().map(|row| root.classify(&row)).collect())
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => root.fmt(f),
            None => writeln!(f, "empty {} tree", self.kind()),
        }
    }
}
