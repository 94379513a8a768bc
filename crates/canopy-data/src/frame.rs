//! Column-oriented data frame with a trailing label column.

use std::cmp::Ordering;

use crate::error::DataError;
use crate::value::{DataType, Value};

/// A named, uniformly typed column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    dtype: DataType,
    values: Vec<Value>,
}

impl Column {
    /// Build a column from its cells, inferring the type.
    ///
    /// Mixed `Int`/`Float` cells widen to `Float`.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`DataError::EmptyInput`] | `values` is empty (no type to infer) |
    /// | [`DataError::MixedTypes`] | cells of incompatible types |
    /// | [`DataError::NonFiniteValue`] | a float cell is NaN or infinite |
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Result<Self, DataError> {
        let name = name.into();
        let mut dtype = match values.first() {
            Some(v) => v.dtype(),
            None => return Err(DataError::EmptyInput),
        };
        for (row, value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(DataError::NonFiniteValue {
                    column: name,
                    row,
                });
            }
            dtype = match dtype.unify(value.dtype()) {
                Some(t) => t,
                None => {
                    return Err(DataError::MixedTypes {
                        column: name,
                        first: dtype,
                        second: value.dtype(),
                    });
                }
            };
        }
        // A widened column stores floats uniformly.
        let values = if dtype == DataType::Float {
            values
                .into_iter()
                .map(|v| match v {
                    Value::Int(i) => Value::Float(i as f64),
                    other => other,
                })
                .collect()
        } else {
            values
        };
        Ok(Self {
            name,
            dtype,
            values,
        })
    }

    /// Build a possibly empty column with a known type.
    pub(crate) fn with_dtype(name: String, dtype: DataType, values: Vec<Value>) -> Self {
        Self {
            name,
            dtype,
            values,
        }
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column type.
    #[must_use]
    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    /// `true` when the column holds `Int` or `Float` cells.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.dtype.is_numeric()
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when the column has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All cells in row order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Cell at `row`, if in bounds.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    /// First cell, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Value> {
        self.values.first()
    }

    /// Distinct cells in first-seen order.
    #[must_use]
    pub fn unique(&self) -> Vec<Value> {
        let mut seen: Vec<Value> = Vec::new();
        for value in &self.values {
            if !seen.contains(value) {
                seen.push(value.clone());
            }
        }
        seen
    }
}

/// A table of named columns; by convention the last column is the label.
///
/// All columns have equal length and a uniform cell type. Frames are cheap
/// to subset: every split operation produces an owned frame over cloned
/// cells, keeping subsets independent of their parent.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    columns: Vec<Column>,
}

impl DataFrame {
    /// Build a frame from columns.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::NoColumns`] for an empty column list,
    /// [`DataError::DuplicateColumn`] for repeated names, and
    /// [`DataError::RaggedColumns`] when lengths differ.
    pub fn new(columns: Vec<Column>) -> Result<Self, DataError> {
        if columns.is_empty() {
            return Err(DataError::NoColumns);
        }
        let expected = columns[0].len();
        for (i, col) in columns.iter().enumerate() {
            if col.len() != expected {
                return Err(DataError::RaggedColumns {
                    name: col.name.clone(),
                    expected,
                    got: col.len(),
                });
            }
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(DataError::DuplicateColumn {
                    name: col.name.clone(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// `true` when the frame has zero rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    /// Number of columns, label included.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// All columns in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Feature column names: every column except the trailing label.
    #[must_use]
    pub fn feature_names(&self) -> Vec<String> {
        self.columns[..self.columns.len() - 1]
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    /// Name of the label column (the last column).
    #[must_use]
    pub fn label_name(&self) -> &str {
        &self.columns[self.columns.len() - 1].name
    }

    /// The label column itself.
    #[must_use]
    pub fn label_column(&self) -> &Column {
        &self.columns[self.columns.len() - 1]
    }

    /// The label of every row, in row order.
    #[must_use]
    pub fn class_labels(&self) -> Vec<Value> {
        self.label_column().values().to_vec()
    }

    /// Per-label counts in first-seen order.
    #[must_use]
    pub fn label_counts(&self) -> Vec<(Value, usize)> {
        let mut counts: Vec<(Value, usize)> = Vec::new();
        for label in self.label_column().values() {
            match counts.iter_mut().find(|(v, _)| v == label) {
                Some((_, n)) => *n += 1,
                None => counts.push((label.clone(), 1)),
            }
        }
        counts
    }

    /// `true` when every row carries the same label.
    ///
    /// An empty frame is not pure: it has no label at all.
    #[must_use]
    pub fn is_pure(&self) -> bool {
        self.label_counts().len() == 1
    }

    /// The first label to reach the maximum count, scanning in
    /// first-seen order. `None` on an empty frame.
    #[must_use]
    pub fn majority_label(&self) -> Option<Value> {
        let counts = self.label_counts();
        let mut best: Option<(Value, usize)> = None;
        for (label, count) in counts {
            match &best {
                Some((_, n)) if count <= *n => {}
                _ => best = Some((label, count)),
            }
        }
        best.map(|(label, _)| label)
    }

    /// Row view with by-name cell access.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<Instance<'_>> {
        if index < self.height() {
            Some(Instance { frame: self, index })
        } else {
            None
        }
    }

    /// Iterate over all rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Instance<'_>> {
        (0..self.height()).map(move |index| Instance { frame: self, index })
    }

    /// New frame holding the given rows, in the given order (repeats
    /// allowed, which is what bootstrap resampling uses).
    ///
    /// # Errors
    ///
    /// Returns [`DataError::RowIndexOutOfBounds`] when an index is past the
    /// last row.
    pub fn take(&self, indices: &[usize]) -> Result<DataFrame, DataError> {
        let height = self.height();
        if let Some(&index) = indices.iter().find(|&&i| i >= height) {
            return Err(DataError::RowIndexOutOfBounds { index, height });
        }
        Ok(self.take_rows(indices))
    }

    /// `take` without the bounds check, for internally generated indices.
    fn take_rows(&self, indices: &[usize]) -> DataFrame {
        let columns = self
            .columns
            .iter()
            .map(|col| {
                let values = indices.iter().map(|&i| col.values[i].clone()).collect();
                Column::with_dtype(col.name.clone(), col.dtype, values)
            })
            .collect();
        DataFrame { columns }
    }

    /// New frame holding the rows the predicate accepts, in order.
    #[must_use]
    pub fn filter<F>(&self, predicate: F) -> DataFrame
    where
        F: Fn(&Instance<'_>) -> bool,
    {
        let indices: Vec<usize> = self
            .rows()
            .filter(|row| predicate(row))
            .map(|row| row.index())
            .collect();
        self.take_rows(&indices)
    }

    /// Concatenate another frame's rows below this one's.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::SchemaMismatch`] when column names differ
    /// positionally.
    pub fn vstack(&self, other: &DataFrame) -> Result<DataFrame, DataError> {
        if self.columns.len() != other.columns.len() {
            return Err(DataError::SchemaMismatch {
                expected: self.columns.last().map(|c| c.name.clone()).unwrap_or_default(),
                got: other.columns.last().map(|c| c.name.clone()).unwrap_or_default(),
            });
        }
        let mut columns = Vec::with_capacity(self.columns.len());
        for (a, b) in self.columns.iter().zip(&other.columns) {
            if a.name != b.name {
                return Err(DataError::SchemaMismatch {
                    expected: a.name.clone(),
                    got: b.name.clone(),
                });
            }
            let mut values = a.values.clone();
            values.extend(b.values.iter().cloned());
            columns.push(Column::with_dtype(a.name.clone(), a.dtype, values));
        }
        Ok(DataFrame { columns })
    }

    /// New frame without the named column.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnknownColumn`] when the column is absent.
    pub fn drop_column(&self, name: &str) -> Result<DataFrame, DataError> {
        if self.column(name).is_none() {
            return Err(DataError::UnknownColumn {
                name: name.to_string(),
            });
        }
        let columns: Vec<Column> = self
            .columns
            .iter()
            .filter(|c| c.name != name)
            .cloned()
            .collect();
        if columns.is_empty() {
            return Err(DataError::NoColumns);
        }
        Ok(DataFrame { columns })
    }

    /// Row indices sorted by the named column (stable, so equal cells keep
    /// their original order). Cells that do not compare sort as equal.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnknownColumn`] when the column is absent.
    pub fn sorted_row_indices_by(&self, name: &str) -> Result<Vec<usize>, DataError> {
        let col = self.column(name).ok_or_else(|| DataError::UnknownColumn {
            name: name.to_string(),
        })?;
        let mut indices: Vec<usize> = (0..self.height()).collect();
        indices.sort_by(|&a, &b| {
            col.values[a]
                .partial_cmp(&col.values[b])
                .unwrap_or(Ordering::Equal)
        });
        Ok(indices)
    }
}

/// A borrowed view of one row.
#[derive(Debug, Clone, Copy)]
pub struct Instance<'a> {
    frame: &'a DataFrame,
    index: usize,
}

impl<'a> Instance<'a> {
    /// Zero-based row index within the frame.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell by column name; `None` for an unknown column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.frame.column(column).and_then(|c| c.get(self.index))
    }

    /// This row's label cell.
    #[must_use]
    pub fn label(&self) -> &'a Value {
        &self.frame.label_column().values()[self.index]
    }
}

#[cfg(test)]
mod tests {
    use super::{Column, DataFrame};
    use crate::error::DataError;
    use crate::value::Value;

    fn animals() -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                "legs",
                vec![Value::Int(4), Value::Int(2), Value::Int(4), Value::Int(2)],
            )
            .unwrap(),
            Column::new(
                "sound",
                vec![
                    Value::from("woof"),
                    Value::from("tweet"),
                    Value::from("meow"),
                    Value::from("tweet"),
                ],
            )
            .unwrap(),
            Column::new(
                "species",
                vec![
                    Value::from("dog"),
                    Value::from("bird"),
                    Value::from("cat"),
                    Value::from("bird"),
                ],
            )
            .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn feature_names_exclude_label() {
        let df = animals();
        assert_eq!(df.feature_names(), vec!["legs", "sound"]);
        assert_eq!(df.label_name(), "species");
    }

    #[test]
    fn label_counts_keep_first_seen_order() {
        let df = animals();
        let counts = df.label_counts();
        assert_eq!(counts[0], (Value::from("dog"), 1));
        assert_eq!(counts[1], (Value::from("bird"), 2));
        assert_eq!(counts[2], (Value::from("cat"), 1));
    }

    #[test]
    fn majority_label_first_wins_on_ties() {
        let df = DataFrame::new(vec![
            Column::new("x", vec![Value::Int(1), Value::Int(2)]).unwrap(),
            Column::new("y", vec![Value::from("a"), Value::from("b")]).unwrap(),
        ])
        .unwrap();
        // One of each: "a" was seen first, so "a" wins.
        assert_eq!(df.majority_label(), Some(Value::from("a")));
    }

    #[test]
    fn purity_requires_exactly_one_label() {
        let pure = DataFrame::new(vec![
            Column::new("x", vec![Value::Int(1), Value::Int(2)]).unwrap(),
            Column::new("y", vec![Value::Bool(true), Value::Bool(true)]).unwrap(),
        ])
        .unwrap();
        assert!(pure.is_pure());
        assert!(!animals().is_pure());
        assert!(!pure.take(&[]).unwrap().is_pure());
    }

    #[test]
    fn take_allows_repeats_and_preserves_dtype() {
        let df = animals();
        let sub = df.take(&[1, 1, 3]).unwrap();
        assert_eq!(sub.height(), 3);
        assert_eq!(sub.class_labels(), vec![
            Value::from("bird"),
            Value::from("bird"),
            Value::from("bird"),
        ]);
        let empty = df.take(&[]).unwrap();
        assert!(empty.is_empty());
        assert!(empty.column("legs").unwrap().is_numeric());
    }

    #[test]
    fn take_rejects_out_of_bounds_index() {
        let df = animals();
        assert!(matches!(
            df.take(&[0, 4]),
            Err(DataError::RowIndexOutOfBounds {
                index: 4,
                height: 4
            })
        ));
    }

    #[test]
    fn filter_keeps_row_order() {
        let df = animals();
        let birds = df.filter(|row| row.label() == &Value::from("bird"));
        assert_eq!(birds.height(), 2);
        assert_eq!(birds.column("legs").unwrap().values(), &[
            Value::Int(2),
            Value::Int(2)
        ]);
    }

    #[test]
    fn vstack_rejects_schema_mismatch() {
        let df = animals();
        let other = df.drop_column("sound").unwrap();
        assert!(matches!(
            df.vstack(&other),
            Err(DataError::SchemaMismatch { .. })
        ));
        let stacked = df.vstack(&df.take(&[0]).unwrap()).unwrap();
        assert_eq!(stacked.height(), 5);
    }

    #[test]
    fn unique_keeps_first_seen_order() {
        let df = animals();
        let uniq = df.column("sound").unwrap().unique();
        assert_eq!(uniq, vec![
            Value::from("woof"),
            Value::from("tweet"),
            Value::from("meow"),
        ]);
    }

    #[test]
    fn sorted_row_indices_is_stable() {
        let df = animals();
        let order = df.sorted_row_indices_by("legs").unwrap();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn ragged_columns_rejected() {
        let err = DataFrame::new(vec![
            Column::new("a", vec![Value::Int(1)]).unwrap(),
            Column::new("b", vec![Value::Int(1), Value::Int(2)]).unwrap(),
        ])
        .unwrap_err();
        assert!(matches!(err, DataError::RaggedColumns { .. }));
    }

    #[test]
    fn mixed_int_float_widens() {
        let col = Column::new("x", vec![Value::Int(1), Value::Float(2.5)]).unwrap();
        assert!(col.is_numeric());
    }

    #[test]
    fn mixed_text_numeric_rejected() {
        let err = Column::new("x", vec![Value::Int(1), Value::from("two")]).unwrap_err();
        assert!(matches!(err, DataError::MixedTypes { .. }));
    }

    #[test]
    fn non_finite_rejected() {
        let err = Column::new("x", vec![Value::Float(f64::NAN)]).unwrap_err();
        assert!(matches!(err, DataError::NonFiniteValue { .. }));
    }
}
