//! Tabular query results.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::sync::Arc;

use crate::value::Value;

/// An ordered set of rows sharing one column list.
///
/// Column order matches the query's projection. Serializes as a sequence
/// of column-to-value maps, ready for tabular-data tooling.
#[derive(Debug, Clone, PartialEq)]
pub struct Rows {
    columns: Arc<[String]>,
    rows: Vec<Vec<Value>>,
}

impl Rows {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.into(),
            rows,
        }
    }

    /// Column names in projection order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row at `index`, if present.
    pub fn get(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// Iterate over the rows in order.
    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }
}

/// One row of a result, with by-name cell access.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// The cell under `column`, if the projection contains it.
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// Cells in projection order.
    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}

impl Serialize for Rows {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.iter() {
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Rows {
        Rows::new(
            vec!["name".into(), "age".into()],
            vec![
                vec![Value::Text("Tom".into()), Value::Integer(9)],
                vec![Value::Text("Jerry".into()), Value::Integer(10)],
            ],
        )
    }

    #[test]
    fn by_name_lookup_follows_projection_order() {
        let rows = sample();
        assert_eq!(rows.columns(), &["name".to_string(), "age".to_string()]);
        let first = rows.get(0).unwrap();
        assert_eq!(first.get("name"), Some(&Value::Text("Tom".into())));
        assert_eq!(first.get("age"), Some(&Value::Integer(9)));
        assert_eq!(first.get("missing"), None);
    }

    #[test]
    fn serializes_as_sequence_of_named_maps() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"name": "Tom", "age": 9},
                {"name": "Jerry", "age": 10}
            ])
        );
    }
}
