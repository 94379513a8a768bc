//! Tree nodes and recursive classification.

use std::fmt;

use canopy_data::{DataFrame, Instance, Value};

use crate::error::TreesError;
use crate::predicate::Test;

/// One node of a fitted decision tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// Terminal node carrying a single predicted label.
    Leaf {
        /// The label every instance reaching this node receives.
        prediction: Value,
    },
    /// A two-way branch on one test.
    Binary {
        /// The test deciding which child handles an instance.
        test: Test,
        /// Child for instances passing the test.
        passing: Box<Node>,
        /// Child for instances failing the test.
        failing: Box<Node>,
    },
    /// An N-way branch, one test per distinct categorical value.
    ///
    /// Branches are evaluated in insertion order. An instance matching no
    /// branch (an unseen category) receives the stored fallback label.
    Multiway {
        /// Branch tests and their subtrees, in insertion order.
        branches: Vec<(Test, Node)>,
        /// Majority label of the pre-split subset.
        fallback: Value,
    },
}

impl Node {
    /// A leaf predicting the majority label of `subset`.
    ///
    /// # Errors
    ///
    /// Returns [`TreesError::EmptyDataset`] when `subset` has no rows.
    pub fn leaf_of(subset: &DataFrame) -> Result<Node, TreesError> {
        let prediction = subset.majority_label().ok_or(TreesError::EmptyDataset)?;
        Ok(Node::Leaf { prediction })
    }

    /// Classify one instance by walking the tree.
    #[must_use]
    pub fn classify(&self, instance: &Instance<'_>) -> Value {
        match self {
            Node::Leaf { prediction } => prediction.clone(),
            Node::Binary {
                test,
                passing,
                failing,
            } => {
                if test.passed_by(instance) {
                    passing.classify(instance)
                } else {
                    failing.classify(instance)
                }
            }
            Node::Multiway { branches, fallback } => branches
                .iter()
                .find(|(test, _)| test.passed_by(instance))
                .map_or_else(|| fallback.clone(), |(_, child)| child.classify(instance)),
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            Node::Leaf { prediction } => writeln!(f, "{pad}-> {prediction}"),
            Node::Binary {
                test,
                passing,
                failing,
            } => {
                writeln!(f, "{pad}{test}")?;
                passing.fmt_indented(f, depth + 1)?;
                failing.fmt_indented(f, depth + 1)
            }
            Node::Multiway { branches, .. } => {
                for (test, child) in branches {
                    writeln!(f, "{pad}{test}")?;
                    child.fmt_indented(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
