//! JSON rendering of pipeline outputs.
//!
//! Tables become arrays of row objects keyed by column name, lists
//! become arrays, scalars map to the matching JSON scalar.

use std::io::Write;

use serde_json::{Map, Value as Json};

use tabflow_core::types::{Scalar, Table, Value};

use crate::error::Result;

pub fn scalar_to_json(v: &Scalar) -> Json {
    match v {
        Scalar::Null => Json::Null,
        Scalar::Bool(b) => Json::Bool(*b),
        Scalar::I64(i) => Json::from(*i),
        Scalar::F64(f) => Json::from(*f),
        Scalar::Str(s) => Json::String(s.clone()),
    }
}

pub fn table_to_json(table: &Table) -> Json {
    let rows = (0..table.num_rows())
        .map(|r| {
            let mut obj = Map::new();
            for col in &table.columns {
                obj.insert(col.name.clone(), scalar_to_json(col.get(r)));
            }
            Json::Object(obj)
        })
        .collect();
    Json::Array(rows)
}

pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Table(t) => table_to_json(t),
        Value::List(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Scalar(s) => scalar_to_json(s),
    }
}

/// Write each table row as one JSON object per line.
pub fn write_jsonl<W: Write>(mut writer: W, table: &Table) -> Result<()> {
    if let Json::Array(rows) = table_to_json(table) {
        for row in rows {
            writeln!(writer, "{}", serde_json::to_string(&row)?)?;
        }
    }
    writer.flush()?;
    Ok(())
}
