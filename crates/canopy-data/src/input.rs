//! Loading a [`DataFrame`] from records, columns, or a CSV file.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, info, instrument};

use crate::error::DataError;
use crate::frame::{Column, DataFrame};
use crate::value::{DataType, Value};

/// A tabular input that can be turned into a [`DataFrame`].
///
/// Three shapes are accepted, all producing identical frames:
///
/// - [`TableSource::Records`]: one `(name, value)` list per row. The first
///   record fixes the schema; later records must carry the same fields in
///   the same order.
/// - [`TableSource::Columns`]: one `(name, cells)` pair per column.
/// - [`TableSource::CsvPath`]: a CSV file with a required header row. Cell
///   types are inferred per column unless overridden.
#[derive(Debug, Clone)]
pub enum TableSource {
    /// Row-major input, one field list per row.
    Records(Vec<Vec<(String, Value)>>),
    /// Column-major input, one cell list per column.
    Columns(Vec<(String, Vec<Value>)>),
    /// Path to a CSV file with a header row.
    CsvPath(PathBuf),
}

impl TableSource {
    /// Load into a frame with inferred column types.
    ///
    /// # Errors
    ///
    /// See [`TableSource::load_typed`].
    pub fn load(&self) -> Result<DataFrame, DataError> {
        self.load_typed(None)
    }

    /// Load into a frame, forcing the named columns to the given types.
    ///
    /// For CSV input the forced type controls parsing; for in-memory input
    /// `Int` cells coerce to `Float` where the map asks for `Float`, and any
    /// other disagreement is a type error.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DataError::FileNotFound`] | CSV file missing or unreadable |
    /// | [`DataError::CsvParse`] | malformed CSV record |
    /// | [`DataError::EmptyInput`] | zero data rows |
    /// | [`DataError::NoColumns`] | no columns, or a first record with no fields |
    /// | [`DataError::InconsistentRowLength`] | CSV row width differs from header |
    /// | [`DataError::RecordShapeMismatch`] | record fields differ from the first record |
    /// | [`DataError::TypeParse`] | cell does not parse as the forced type |
    /// | [`DataError::UnknownTypeColumn`] | type map names an absent column |
    /// | [`DataError::MixedTypes`] | in-memory column mixes cell types |
    /// | [`DataError::NonFiniteValue`] | float cell is NaN or infinite |
    #[instrument(skip(self, types))]
    pub fn load_typed(
        &self,
        types: Option<&HashMap<String, DataType>>,
    ) -> Result<DataFrame, DataError> {
        let frame = match self {
            TableSource::Records(records) => frame_from_records(records, types),
            TableSource::Columns(columns) => frame_from_columns(columns, types),
            TableSource::CsvPath(path) => frame_from_csv(path, types),
        }?;
        info!(
            rows = frame.height(),
            columns = frame.width(),
            label = frame.label_name(),
            "table loaded"
        );
        Ok(frame)
    }
}

impl From<PathBuf> for TableSource {
    fn from(path: PathBuf) -> Self {
        TableSource::CsvPath(path)
    }
}

fn check_type_map(
    names: &[String],
    types: Option<&HashMap<String, DataType>>,
) -> Result<(), DataError> {
    if let Some(map) = types {
        for column in map.keys() {
            if !names.iter().any(|n| n == column) {
                return Err(DataError::UnknownTypeColumn {
                    column: column.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Coerce an in-memory cell toward a forced type. Only `Int` to `Float`
/// widening is allowed; anything else must already match.
fn coerce(value: Value, column: &str, wanted: DataType) -> Result<Value, DataError> {
    match (&value, wanted) {
        (Value::Int(i), DataType::Float) => Ok(Value::Float(*i as f64)),
        _ if value.dtype() == wanted => Ok(value),
        _ => Err(DataError::TypeParse {
            column: column.to_string(),
            raw: value.to_string(),
            dtype: wanted,
        }),
    }
}

fn frame_from_records(
    records: &[Vec<(String, Value)>],
    types: Option<&HashMap<String, DataType>>,
) -> Result<DataFrame, DataError> {
    let first = records.first().ok_or(DataError::EmptyInput)?;
    if first.is_empty() {
        return Err(DataError::NoColumns);
    }
    let names: Vec<String> = first.iter().map(|(name, _)| name.clone()).collect();
    check_type_map(&names, types)?;

    let mut cells: Vec<Vec<Value>> = vec![Vec::with_capacity(records.len()); names.len()];
    for (record_index, record) in records.iter().enumerate() {
        if record.len() != names.len() {
            return Err(DataError::RecordShapeMismatch {
                record_index,
                field: names[record.len().min(names.len() - 1)].clone(),
            });
        }
        // Field names and order must match the first record exactly.
        for (i, (name, value)) in record.iter().enumerate() {
            if name != &names[i] {
                return Err(DataError::RecordShapeMismatch {
                    record_index,
                    field: name.clone(),
                });
            }
            cells[i].push(value.clone());
        }
    }
    build_frame(names, cells, types)
}

fn frame_from_columns(
    columns: &[(String, Vec<Value>)],
    types: Option<&HashMap<String, DataType>>,
) -> Result<DataFrame, DataError> {
    if columns.is_empty() {
        return Err(DataError::NoColumns);
    }
    let names: Vec<String> = columns.iter().map(|(name, _)| name.clone()).collect();
    check_type_map(&names, types)?;
    let cells: Vec<Vec<Value>> = columns.iter().map(|(_, cells)| cells.clone()).collect();
    build_frame(names, cells, types)
}

fn build_frame(
    names: Vec<String>,
    cells: Vec<Vec<Value>>,
    types: Option<&HashMap<String, DataType>>,
) -> Result<DataFrame, DataError> {
    let mut columns = Vec::with_capacity(names.len());
    for (name, values) in names.into_iter().zip(cells) {
        let values = match types.and_then(|m| m.get(&name)) {
            Some(&wanted) => values
                .into_iter()
                .map(|v| coerce(v, &name, wanted))
                .collect::<Result<Vec<_>, _>>()?,
            None => values,
        };
        columns.push(Column::new(name, values)?);
    }
    DataFrame::new(columns)
}

/// Parse one raw CSV cell with no forced type. Tries `Int`, then `Float`,
/// then `Bool`, falling back to `Text`.
fn infer_cell(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::Float(f);
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Text(raw.to_string()),
    }
}

/// Parse one raw CSV cell as a declared type.
fn parse_cell(raw: &str, column: &str, dtype: DataType) -> Result<Value, DataError> {
    let type_err = || DataError::TypeParse {
        column: column.to_string(),
        raw: raw.to_string(),
        dtype,
    };
    match dtype {
        DataType::Int => raw.parse::<i64>().map(Value::Int).map_err(|_| type_err()),
        DataType::Float => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| type_err()),
        DataType::Bool => match raw {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(type_err()),
        },
        DataType::Text => Ok(Value::Text(raw.to_string())),
    }
}

fn frame_from_csv(
    path: &PathBuf,
    types: Option<&HashMap<String, DataType>>,
) -> Result<DataFrame, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::FileNotFound {
        path: path.clone(),
        source: e,
    })?;

    // flexible(true) lets rows of varying width through to our own
    // InconsistentRowLength check instead of a low-level CsvParse error.
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let header = rdr.headers().map_err(|e| DataError::CsvParse {
        path: path.clone(),
        offset: e.position().map_or(0, |p| p.byte()),
        source: e,
    })?;
    let names: Vec<String> = header.iter().map(str::to_string).collect();
    if names.is_empty() {
        return Err(DataError::NoColumns);
    }
    debug!(columns = names.len(), "read CSV header");
    check_type_map(&names, types)?;

    let mut cells: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    for (row_index, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| DataError::CsvParse {
            path: path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        })?;
        if record.len() != names.len() {
            return Err(DataError::InconsistentRowLength {
                path: path.clone(),
                row_index,
                expected: names.len(),
                got: record.len(),
            });
        }
        for (col_index, raw) in record.iter().enumerate() {
            let name = &names[col_index];
            let value = match types.and_then(|m| m.get(name)) {
                Some(&wanted) => parse_cell(raw, name, wanted)?,
                None => infer_cell(raw),
            };
            cells[col_index].push(value);
        }
    }
    if cells[0].is_empty() {
        return Err(DataError::EmptyInput);
    }

    let mut columns = Vec::with_capacity(names.len());
    for (name, values) in names.into_iter().zip(cells) {
        columns.push(Column::new(name, values)?);
    }
    DataFrame::new(columns)
}

#[cfg(test)]
mod tests {
    use super::{infer_cell, TableSource};
    use crate::error::DataError;
    use crate::value::{DataType, Value};
    use std::collections::HashMap;

    #[test]
    fn infer_prefers_int_then_float_then_bool() {
        assert_eq!(infer_cell("3"), Value::Int(3));
        assert_eq!(infer_cell("3.5"), Value::Float(3.5));
        assert_eq!(infer_cell("true"), Value::Bool(true));
        assert_eq!(infer_cell("True"), Value::from("True"));
        assert_eq!(infer_cell("maybe"), Value::from("maybe"));
    }

    #[test]
    fn records_load_in_field_order() {
        let source = TableSource::Records(vec![
            vec![
                ("temp".to_string(), Value::Int(20)),
                ("label".to_string(), Value::from("warm")),
            ],
            vec![
                ("temp".to_string(), Value::Int(5)),
                ("label".to_string(), Value::from("cold")),
            ],
        ]);
        let df = source.load().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.feature_names(), vec!["temp"]);
        assert_eq!(df.label_name(), "label");
    }

    #[test]
    fn records_with_mismatched_fields_rejected() {
        let source = TableSource::Records(vec![
            vec![
                ("a".to_string(), Value::Int(1)),
                ("label".to_string(), Value::Int(0)),
            ],
            vec![
                ("b".to_string(), Value::Int(2)),
                ("label".to_string(), Value::Int(1)),
            ],
        ]);
        assert!(matches!(
            source.load(),
            Err(DataError::RecordShapeMismatch {
                record_index: 1,
                ..
            })
        ));
    }

    #[test]
    fn type_map_coerces_int_columns_to_float() {
        let source = TableSource::Columns(vec![
            ("x".to_string(), vec![Value::Int(1), Value::Int(2)]),
            ("y".to_string(), vec![Value::Bool(true), Value::Bool(false)]),
        ]);
        let mut types = HashMap::new();
        types.insert("x".to_string(), DataType::Float);
        let df = source.load_typed(Some(&types)).unwrap();
        assert_eq!(df.column("x").unwrap().dtype(), DataType::Float);
        assert_eq!(df.column("x").unwrap().get(0), Some(&Value::Float(1.0)));
    }

    #[test]
    fn type_map_rejects_unknown_column() {
        let source = TableSource::Columns(vec![(
            "x".to_string(),
            vec![Value::Int(1)],
        )]);
        let mut types = HashMap::new();
        types.insert("nope".to_string(), DataType::Int);
        assert!(matches!(
            source.load_typed(Some(&types)),
            Err(DataError::UnknownTypeColumn { .. })
        ));
    }

    #[test]
    fn record_with_no_fields_rejected() {
        // An empty first record fixes no schema at all.
        let source = TableSource::Records(vec![
            Vec::new(),
            vec![("a".to_string(), Value::Int(1))],
        ]);
        assert!(matches!(source.load(), Err(DataError::NoColumns)));

        // An empty later record is a shape mismatch against the first.
        let source = TableSource::Records(vec![
            vec![("a".to_string(), Value::Int(1))],
            Vec::new(),
        ]);
        assert!(matches!(
            source.load(),
            Err(DataError::RecordShapeMismatch {
                record_index: 1,
                ..
            })
        ));
    }

    #[test]
    fn empty_records_rejected() {
        assert!(matches!(
            TableSource::Records(Vec::new()).load(),
            Err(DataError::EmptyInput)
        ));
    }
}
