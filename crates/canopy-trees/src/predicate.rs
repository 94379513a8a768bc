//! Feature test predicates attached to tree branches.

use std::fmt;

use canopy_data::{Instance, Value};

/// How a test compares a feature cell to its reference value.
///
/// Growers only ever construct `Equal` (multiway branches) and
/// `EqualOrGreater` (binary branches); `NotEqual` and `Less` are
/// general-purpose predicates for external callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestKind {
    /// `instance[feature] == value`
    Equal,
    /// `instance[feature] != value`
    NotEqual,
    /// `instance[feature] < value`
    Less,
    /// `instance[feature] >= value`
    EqualOrGreater,
}

impl TestKind {
    fn symbol(self) -> &'static str {
        match self {
            TestKind::Equal => "==",
            TestKind::NotEqual => "!=",
            TestKind::Less => "<",
            TestKind::EqualOrGreater => ">=",
        }
    }
}

/// An immutable predicate over one feature of an instance.
///
/// Equality and hashing cover (kind, feature, value) so tests can key the
/// branch mapping of a multiway node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Test {
    kind: TestKind,
    feature: String,
    value: Value,
}

impl Test {
    /// Build a test of the given kind.
    #[must_use]
    pub fn new(kind: TestKind, feature: impl Into<String>, value: Value) -> Self {
        Self {
            kind,
            feature: feature.into(),
            value,
        }
    }

    /// Shorthand for an `Equal` test.
    #[must_use]
    pub fn equal(feature: impl Into<String>, value: Value) -> Self {
        Self::new(TestKind::Equal, feature, value)
    }

    /// Shorthand for an `EqualOrGreater` test.
    #[must_use]
    pub fn equal_or_greater(feature: impl Into<String>, value: Value) -> Self {
        Self::new(TestKind::EqualOrGreater, feature, value)
    }

    /// The comparison kind.
    #[must_use]
    pub fn kind(&self) -> TestKind {
        self.kind
    }

    /// The feature this test reads.
    #[must_use]
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// The reference value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Evaluate this test against one row. A missing feature, or a cell
    /// that does not compare against the reference value, fails the test.
    #[must_use]
    pub fn passed_by(&self, instance: &Instance<'_>) -> bool {
        let cell = match instance.get(&self.feature) {
            Some(cell) => cell,
            None => return false,
        };
        match self.kind {
            TestKind::Equal => cell == &self.value,
            TestKind::NotEqual => cell != &self.value,
            TestKind::Less => matches!(
                cell.partial_cmp(&self.value),
                Some(std::cmp::Ordering::Less)
            ),
            TestKind::EqualOrGreater => matches!(
                cell.partial_cmp(&self.value),
                Some(std::cmp::Ordering::Equal | std::cmp::Ordering::Greater)
            ),
        }
    }
}

impl fmt::Display for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}?", self.feature, self.kind.symbol(), self.value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use canopy_data::{Column, DataFrame, Value};

    use super::{Test, TestKind};

    fn one_row(feature: &str, value: Value) -> DataFrame {
        DataFrame::new(vec![
            Column::new(feature, vec![value]).unwrap(),
            Column::new("label", vec![Value::from("x")]).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn all_four_kinds_evaluate() {
        let df = one_row("age", Value::Int(30));
        let row = df.row(0).unwrap();
        assert!(Test::new(TestKind::Equal, "age", Value::Int(30)).passed_by(&row));
        assert!(Test::new(TestKind::NotEqual, "age", Value::Int(31)).passed_by(&row));
        assert!(Test::new(TestKind::Less, "age", Value::Int(40)).passed_by(&row));
        assert!(Test::equal_or_greater("age", Value::Int(30)).passed_by(&row));
        assert!(!Test::equal_or_greater("age", Value::Int(31)).passed_by(&row));
    }

    #[test]
    fn missing_feature_fails() {
        let df = one_row("age", Value::Int(30));
        let row = df.row(0).unwrap();
        assert!(!Test::equal("height", Value::Int(30)).passed_by(&row));
    }

    #[test]
    fn incomparable_cell_fails_ordered_kinds() {
        let df = one_row("name", Value::from("ada"));
        let row = df.row(0).unwrap();
        assert!(!Test::new(TestKind::Less, "name", Value::Int(5)).passed_by(&row));
        assert!(!Test::equal_or_greater("name", Value::Int(5)).passed_by(&row));
    }

    #[test]
    fn equal_or_greater_orders_text_and_bool() {
        let df = one_row("sound", Value::from("woof"));
        let row = df.row(0).unwrap();
        assert!(Test::equal_or_greater("sound", Value::from("meow")).passed_by(&row));

        let df = one_row("toxic", Value::Bool(true));
        let row = df.row(0).unwrap();
        assert!(Test::equal_or_greater("toxic", Value::Bool(true)).passed_by(&row));
        assert!(!Test::new(TestKind::Less, "toxic", Value::Bool(false)).passed_by(&row));
    }

    #[test]
    fn tests_key_a_map() {
        let mut map = HashMap::new();
        map.insert(Test::equal("color", Value::from("red")), 1);
        map.insert(Test::equal("color", Value::from("blue")), 2);
        assert_eq!(map.get(&Test::equal("color", Value::from("red"))), Some(&1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn display_reads_as_a_question() {
        let t = Test::equal_or_greater("age", Value::Int(18));
        assert_eq!(t.to_string(), "age >= 18?");
    }
}
