//! Typed tabular data for the canopy classifiers.
//!
//! The central type is [`DataFrame`]: a table of named, uniformly typed
//! columns where the last column holds the class label. Frames are built
//! through [`TableSource`], which accepts row-major records, column-major
//! cell lists, or a CSV file path, and validates shape and types up front
//! so the classifiers never see ragged or mixed-type data.

pub mod error;
pub mod frame;
pub mod input;
pub mod value;

pub use error::DataError;
pub use frame::{Column, DataFrame, Instance};
pub use input::TableSource;
pub use value::{DataType, Value};
