//! Cell values and column types.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 64-bit signed integers.
    Int,
    /// 64-bit floats (always finite).
    Float,
    /// Booleans.
    Bool,
    /// Free-form strings.
    Text,
}

impl DataType {
    /// Return `true` for `Int` and `Float`.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Int | DataType::Float)
    }

    /// Combine two cell types observed in the same column.
    ///
    /// Equal types unify to themselves; `Int` widens to `Float` when mixed
    /// with it. Any other combination is `None` (mixed column).
    #[must_use]
    pub fn unify(self, other: DataType) -> Option<DataType> {
        match (self, other) {
            (a, b) if a == b => Some(a),
            (DataType::Int, DataType::Float) | (DataType::Float, DataType::Int) => {
                Some(DataType::Float)
            }
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Bool => "bool",
            DataType::Text => "text",
        };
        f.write_str(name)
    }
}

/// A single cell value.
///
/// Numeric variants (`Int`, `Float`) compare and hash by numeric value, so
/// `Value::Int(1) == Value::Float(1.0)`. `Bool` and `Text` only compare
/// within their own kind; cross-kind ordering is undefined (`partial_cmp`
/// returns `None`).
///
/// Floats are kept finite by the loading layer, which makes the manual
/// `Eq`/`Hash` implementations sound.
#[derive(Debug, Clone)]
pub enum Value {
    /// An integer cell.
    Int(i64),
    /// A float cell.
    Float(f64),
    /// A boolean cell.
    Bool(bool),
    /// A text cell.
    Text(String),
}

impl Value {
    /// Return the type of this cell.
    #[must_use]
    pub fn dtype(&self) -> DataType {
        match self {
            Value::Int(_) => DataType::Int,
            Value::Float(_) => DataType::Float,
            Value::Bool(_) => DataType::Bool,
            Value::Text(_) => DataType::Text,
        }
    }

    /// Return `true` for `Int` and `Float` cells.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.dtype().is_numeric()
    }

    /// Return the numeric value of an `Int` or `Float` cell.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Bool(_) | Value::Text(_) => None,
        }
    }

    /// Return `false` only for a non-finite `Float` cell.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Float(f) => f.is_finite(),
            _ => true,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Bool(b) => {
                state.write_u8(0);
                b.hash(state);
            }
            Value::Text(s) => {
                state.write_u8(1);
                s.hash(state);
            }
            Value::Int(_) | Value::Float(_) => {
                state.write_u8(2);
                // Int(1) and Float(1.0) are equal, so they must hash alike;
                // normalize -0.0 for the same reason.
                let mut v = match self {
                    Value::Int(i) => *i as f64,
                    Value::Float(f) => *f,
                    _ => unreachable!(),
                };
                if v == 0.0 {
                    v = 0.0;
                }
                state.write_u64(v.to_bits());
            }
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}
