//! Lightweight value/table representation routed between operators.
//!
//! Operators never depend on a concrete columnar backend: a `Table` is a list of
//! named columns of `Scalar` cells, and a `Value` is whatever travels along a
//! pipeline edge (a table, a collection of values, or a derived scalar).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::{DataType, Field, Schema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Str(String),
}

impl Scalar {
    pub fn data_type(&self) -> DataType {
        match self {
            Scalar::Null => DataType::Null,
            Scalar::Bool(_) => DataType::Boolean,
            Scalar::I64(_) => DataType::Int64,
            Scalar::F64(_) => DataType::Float64,
            Scalar::Str(_) => DataType::Utf8,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Numeric view used by reductions; `None` for non-numeric cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::I64(i) => Some(*i as f64),
            Scalar::F64(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::I64(i) => write!(f, "{i}"),
            Scalar::F64(v) => write!(f, "{v}"),
            Scalar::Str(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Cell at `row`; rows past the end of this column read as `Null`.
    pub fn get(&self, row: usize) -> &Scalar {
        self.values.get(row).unwrap_or(&NULL_CELL)
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First non-null cell decides the column type; all-null columns are `Null`.
    pub fn data_type(&self) -> DataType {
        self.values
            .iter()
            .find(|v| !v.is_null())
            .map(Scalar::data_type)
            .unwrap_or(DataType::Null)
    }
}

static NULL_CELL: Scalar = Scalar::Null;

/// In-memory table: rows × named columns.
///
/// Columns normally hold the same number of rows. When they don't, the table
/// is as long as its longest column and missing cells read as `Null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn num_rows(&self) -> usize {
        self.columns.iter().map(Column::len).max().unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn schema(&self) -> Schema {
        Schema::new(
            self.columns
                .iter()
                .map(|c| Field::new(c.name.clone(), c.data_type(), c.values.iter().any(Scalar::is_null)))
                .collect(),
        )
    }

    /// First `n` rows of every column.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.values.iter().take(n).cloned().collect()))
                .collect(),
        }
    }

    /// Rows at the given indices, in the given order.
    pub fn take_rows(&self, rows: &[usize]) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), rows.iter().map(|&r| c.get(r).clone()).collect()))
                .collect(),
        }
    }

    /// Partition rows by the values of `key`.
    ///
    /// Returns a `Value::List` of `[key, table]` pairs in order of first
    /// appearance, the stream shape consumed by `Iterate`.
    pub fn group_by(&self, key: &str) -> Result<Value, String> {
        let col = self
            .column(key)
            .ok_or_else(|| format!("group key column '{}' not found", key))?;

        let mut groups: Vec<(Scalar, Vec<usize>)> = Vec::new();
        for row in 0..self.num_rows() {
            let v = col.get(row);
            match groups.iter_mut().find(|(k, _)| k == v) {
                Some((_, rows)) => rows.push(row),
                None => groups.push((v.clone(), vec![row])),
            }
        }

        Ok(Value::List(
            groups
                .into_iter()
                .map(|(k, rows)| Value::pair(Value::Scalar(k), Value::Table(self.take_rows(&rows))))
                .collect(),
        ))
    }

    /// Render up to `max_rows` rows as an aligned text grid.
    pub fn render(&self, max_rows: Option<usize>) -> String {
        let rows = max_rows.map_or(self.num_rows(), |m| m.min(self.num_rows()));
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.name.len()).collect();
        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| (0..rows).map(|r| c.get(r).to_string()).collect())
            .collect();
        for (w, col) in widths.iter_mut().zip(&cells) {
            for cell in col {
                *w = (*w).max(cell.len());
            }
        }

        let mut out = String::new();
        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c.name, w = *w))
            .collect();
        out.push_str(header.join(" | ").trim_end());
        out.push('\n');
        for r in 0..rows {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(col, w)| format!("{:<w$}", col[r], w = *w))
                .collect();
            out.push_str(line.join(" | ").trim_end());
            out.push('\n');
        }
        if rows < self.num_rows() {
            out.push_str(&format!("... {} more row(s)\n", self.num_rows() - rows));
        }
        out
    }
}

/// Anything that flows along a pipeline edge.
///
/// Operators exchange tuples of values (`Vec<Value>`). Composites that collect
/// per-child outputs wrap each child's output tuple in a `List`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Table(Table),
    List(Vec<Value>),
    Scalar(Scalar),
}

impl Value {
    pub fn pair(a: Value, b: Value) -> Value {
        Value::List(vec![a, b])
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short shape summary, e.g. `table[120x4]`, `list[3]`, `scalar(7)`.
    pub fn summary(&self) -> String {
        match self {
            Value::Table(t) => format!("table[{}x{}]", t.num_rows(), t.num_columns()),
            Value::List(items) => format!("list[{}]", items.len()),
            Value::Scalar(s) => format!("scalar({s})"),
        }
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Value::Table(t)
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Table(t) => write!(f, "{}", t.render(None)),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match item {
                        Value::Table(t) => write!(f, "table[{}x{}]", t.num_rows(), t.num_columns())?,
                        other => write!(f, "{other}")?,
                    }
                }
                write!(f, "]")
            }
            Value::Scalar(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vitals() -> Table {
        Table::new(vec![
            Column::new(
                "participant",
                vec![Scalar::Str("p1".into()), Scalar::Str("p2".into()), Scalar::Str("p1".into())],
            ),
            Column::new("hr", vec![Scalar::I64(61), Scalar::I64(72), Scalar::Null]),
        ])
    }

    #[test]
    fn group_by_keeps_first_appearance_order() {
        let grouped = vitals().group_by("participant").unwrap();
        let pairs = grouped.as_list().unwrap();
        assert_eq!(pairs.len(), 2);

        let first = pairs[0].as_list().unwrap();
        assert_eq!(first[0], Value::Scalar(Scalar::Str("p1".into())));
        assert_eq!(first[1].as_table().unwrap().num_rows(), 2);

        let second = pairs[1].as_list().unwrap();
        assert_eq!(second[1].as_table().unwrap().num_rows(), 1);
    }

    #[test]
    fn group_by_missing_column_is_an_error() {
        assert!(vitals().group_by("visit").is_err());
    }

    #[test]
    fn schema_infers_types_and_nullability() {
        let schema = vitals().schema();
        assert_eq!(schema.fields[0].data_type, DataType::Utf8);
        assert!(!schema.fields[0].nullable);
        assert_eq!(schema.fields[1].data_type, DataType::Int64);
        assert!(schema.fields[1].nullable);
    }

    #[test]
    fn render_truncates_rows() {
        let text = vitals().render(Some(1));
        assert!(text.starts_with("participant | hr"));
        assert!(text.contains("... 2 more row(s)"));
    }

    fn ragged() -> Table {
        Table::new(vec![
            Column::new("id", vec![Scalar::I64(1), Scalar::I64(2)]),
            Column::new("hr", vec![Scalar::I64(70)]),
        ])
    }

    #[test]
    fn short_columns_read_as_null() {
        let t = ragged();
        assert_eq!(t.num_rows(), 2);
        assert_eq!(t.columns[1].get(1), &Scalar::Null);

        let text = t.render(None);
        assert!(text.lines().nth(2).unwrap().starts_with("2  | null"));

        let tail = t.take_rows(&[1]);
        assert_eq!(tail.column("hr").unwrap().values, vec![Scalar::Null]);
    }

    #[test]
    fn group_by_on_ragged_table() {
        let grouped = ragged().group_by("hr").unwrap();
        let pairs = grouped.as_list().unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].as_list().unwrap()[0], Value::Scalar(Scalar::Null));
    }

    #[test]
    fn value_summary() {
        assert_eq!(Value::from(vitals()).summary(), "table[3x2]");
        assert_eq!(Value::List(vec![]).summary(), "list[0]");
        assert_eq!(Value::from(Scalar::I64(7)).summary(), "scalar(7)");
    }
}
