use canopy_data::DataError;

/// Errors from tree and forest operations.
#[derive(Debug, thiserror::Error)]
pub enum TreesError {
    /// Returned when predict is invoked before fit.
    #[error("predict called before fit")]
    NotFitted,

    /// Returned when n_trees is zero.
    #[error("n_trees must be at least 1, got {n_trees}")]
    InvalidTreeCount {
        /// The invalid n_trees value provided.
        n_trees: usize,
    },

    /// Returned when a forest is asked for with an ensemble type outside
    /// `{cart, id3, hybrid}`.
    #[error("unknown ensemble type \"{name}\" (expected cart, id3, or hybrid)")]
    UnknownEnsembleType {
        /// The rejected ensemble type name.
        name: String,
    },

    /// Returned when a sampling request asks for fewer than one row.
    #[error("sample size must be at least 1, got {size}")]
    InvalidSampleSize {
        /// The invalid sample size.
        size: usize,
    },

    /// Returned when a without-replacement sample exceeds the available rows.
    #[error("cannot sample {size} rows without replacement from {available}")]
    SampleTooLarge {
        /// The requested sample size.
        size: usize,
        /// The number of rows available.
        available: usize,
    },

    /// Returned when a grower is handed a dataset with no rows and no
    /// parent to fall back on.
    #[error("cannot grow a tree from an empty dataset")]
    EmptyDataset,

    /// Returned when the underlying data layer rejects an input.
    #[error(transparent)]
    Data(#[from] DataError),
}
