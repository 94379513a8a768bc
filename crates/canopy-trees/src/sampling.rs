//! Bootstrap resampling, held-out splits, and prediction accuracy.

use canopy_data::{DataFrame, Value};
use rand::Rng;
use tracing::debug;

use crate::error::TreesError;

/// A dataset partitioned into training rows and a held-out evaluation set.
///
/// The held-out frame has its label column removed; the labels travel
/// separately so a fitted model can be scored against them.
#[derive(Debug, Clone)]
pub struct BootstrapSplit {
    /// Rows to train on.
    pub in_bag: DataFrame,
    /// Held-out rows, label column dropped.
    pub held_out: DataFrame,
    /// Labels of the held-out rows, in row order.
    pub held_out_labels: Vec<Value>,
}

/// Deterministic held-out split: the first `floor(rows * test_fraction) + 1`
/// rows become the held-out set, the rest train.
///
/// The held-out count is capped at `rows - 1` so at least one row always
/// remains to train on; a single-row frame keeps its row on the training
/// side and holds nothing out.
///
/// # Errors
///
/// Returns [`TreesError::EmptyDataset`] when `dataset` has no rows.
pub fn train_test_split(
    dataset: &DataFrame,
    test_fraction: f64,
) -> Result<BootstrapSplit, TreesError> {
    if dataset.is_empty() {
        return Err(TreesError::EmptyDataset);
    }
    let n = dataset.height();
    let held_out_count = ((n as f64 * test_fraction).floor() as usize + 1).min(n - 1);

    let held_out_indices: Vec<usize> = (0..held_out_count).collect();
    let train_indices: Vec<usize> = (held_out_count..n).collect();

    let held_out_full = dataset.take(&held_out_indices)?;
    let held_out_labels = held_out_full.class_labels();
    let held_out = held_out_full.drop_column(held_out_full.label_name())?;

    Ok(BootstrapSplit {
        in_bag: dataset.take(&train_indices)?,
        held_out,
        held_out_labels,
    })
}

/// Same-size with-replacement bootstrap split: drawn rows train, rows never
/// drawn are held out. When a draw happens to cover every row, falls back
/// to [`train_test_split`] with a 0.2 fraction; only a single-row frame,
/// where every draw covers everything and nothing can be held out, yields
/// an empty held-out set.
///
/// # Errors
///
/// Returns [`TreesError::EmptyDataset`] when `dataset` has no rows.
pub fn train_test_bootstrap_split<R: Rng>(
    dataset: &DataFrame,
    rng: &mut R,
) -> Result<BootstrapSplit, TreesError> {
    if dataset.is_empty() {
        return Err(TreesError::EmptyDataset);
    }
    let n = dataset.height();
    let mut drawn = vec![false; n];
    let mut draws = Vec::with_capacity(n);
    for _ in 0..n {
        let index = rng.gen_range(0..n);
        draws.push(index);
        drawn[index] = true;
    }
    let out_of_bag: Vec<usize> = (0..n).filter(|&i| !drawn[i]).collect();

    if out_of_bag.is_empty() {
        debug!(rows = n, "bootstrap draw covered every row, using held-out split");
        return train_test_split(dataset, 0.2);
    }

    let held_out_full = dataset.take(&out_of_bag)?;
    let held_out_labels = held_out_full.class_labels();
    let held_out = held_out_full.drop_column(held_out_full.label_name())?;

    Ok(BootstrapSplit {
        in_bag: dataset.take(&draws)?,
        held_out,
        held_out_labels,
    })
}

/// Draw a random sample of `size` rows.
///
/// With replacement the sample may repeat rows; without replacement it is a
/// uniform subset in random order.
///
/// # Errors
///
/// Returns [`TreesError::InvalidSampleSize`] for `size < 1` and
/// [`TreesError::SampleTooLarge`] when the rows are not there to draw from.
pub fn random_sample<R: Rng>(
    dataset: &DataFrame,
    size: usize,
    with_replacement: bool,
    rng: &mut R,
) -> Result<DataFrame, TreesError> {
    if size < 1 {
        return Err(TreesError::InvalidSampleSize { size });
    }
    let n = dataset.height();
    if n == 0 || (!with_replacement && size > n) {
        return Err(TreesError::SampleTooLarge {
            size,
            available: n,
        });
    }
    let indices: Vec<usize> = if with_replacement {
        (0..size).map(|_| rng.gen_range(0..n)).collect()
    } else {
        let mut pool: Vec<usize> = (0..n).collect();
        for i in 0..size {
            let j = rng.gen_range(i..n);
            pool.swap(i, j);
        }
        pool.truncate(size);
        pool
    };
    Ok(dataset.take(&indices)?)
}

/// Fraction of predictions matching their actual labels under
/// [`labels_equivalent`]. An empty input scores `0.0`.
#[must_use]
pub fn accuracy(predicted: &[Value], actual: &[Value]) -> f64 {
    if predicted.is_empty() {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(actual)
        .filter(|(p, a)| labels_equivalent(p, a))
        .count();
    correct as f64 / predicted.len() as f64
}

/// Label equality with boolean cross-equivalence: `true` and `1` count as
/// the same label, as do `false` and `0`.
#[must_use]
pub fn labels_equivalent(a: &Value, b: &Value) -> bool {
    a == b || (truthy(a) && truthy(b)) || (falsy(a) && falsy(b))
}

fn truthy(label: &Value) -> bool {
    label == &Value::Bool(true) || label == &Value::Int(1)
}

fn falsy(label: &Value) -> bool {
    label == &Value::Bool(false) || label == &Value::Int(0)
}
