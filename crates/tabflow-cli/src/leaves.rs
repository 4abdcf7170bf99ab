//! Generic table leaves available to pipelines run from the command line.

use tabflow_core::prelude::{Column, Error, Table, Value};
use tabflow_operators::{FnOperator, Node};
use tabflow_planner::{PlanError, Registry};

/// Built-in registry plus `select`, `head`, and `group_by`.
pub fn registry() -> Registry {
    let mut reg = Registry::new();
    reg.register("select", |config| {
        let columns: Vec<String> = field(config, "columns")?;
        Ok(table_leaf("select", move |t| select(t, &columns)))
    });
    reg.register("head", |config| {
        let rows: usize = field(config, "rows")?;
        Ok(table_leaf("head", move |t| Ok(Value::Table(t.head(rows)))))
    });
    reg.register("group_by", |config| {
        let key: String = field(config, "key")?;
        Ok(table_leaf("group_by", move |t| {
            t.group_by(&key).map_err(|e| Error::exec("group_by", e))
        }))
    });
    reg
}

fn field<T: serde::de::DeserializeOwned>(config: &serde_json::Value, name: &str) -> Result<T, PlanError> {
    let raw = config
        .get(name)
        .ok_or_else(|| PlanError::Config(format!("missing '{name}' in leaf config")))?;
    serde_json::from_value(raw.clone()).map_err(|e| PlanError::Config(format!("'{name}': {e}")))
}

/// Leaf applying `f` to every input, which must be a table.
fn table_leaf<F>(name: &'static str, f: F) -> Node
where
    F: Fn(&Table) -> tabflow_core::Result<Value> + Send + Sync + 'static,
{
    Node::new(
        FnOperator::each(name, move |v| f(v.as_table().ok_or_else(|| not_a_table(name, &v))?))
            .with_validator(move |inputs| match inputs.iter().find(|v| v.as_table().is_none()) {
                Some(v) => Err(not_a_table(name, v)),
                None => Ok(()),
            }),
    )
}

fn not_a_table(name: &str, v: &Value) -> Error {
    Error::validation(name, format!("expected a table, got {}", v.summary()))
}

fn select(t: &Table, columns: &[String]) -> tabflow_core::Result<Value> {
    let picked = columns
        .iter()
        .map(|c| {
            t.column(c)
                .cloned()
                .ok_or_else(|| Error::exec("select", format!("column '{c}' not found")))
        })
        .collect::<tabflow_core::Result<Vec<Column>>>()?;
    Ok(Value::Table(Table::new(picked)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tabflow_core::types::Scalar;

    fn table() -> Value {
        Value::Table(Table::new(vec![
            Column::new("site", vec![Scalar::Str("a".into()), Scalar::Str("b".into()), Scalar::Str("a".into())]),
            Column::new("hr", vec![Scalar::I64(60), Scalar::I64(72), Scalar::I64(80)]),
        ]))
    }

    #[test]
    fn select_keeps_requested_columns_in_order() {
        let node = registry().make("select", &json!({"columns": ["hr"]})).unwrap();
        let out = node.process(vec![table()]).unwrap();
        assert_eq!(out[0].as_table().unwrap().column_names(), vec!["hr"]);
    }

    #[test]
    fn group_by_yields_pairs() {
        let node = registry().make("group_by", &json!({"key": "site"})).unwrap();
        let out = node.process(vec![table()]).unwrap();
        assert_eq!(out[0].as_list().unwrap().len(), 2);
    }

    #[test]
    fn non_table_input_fails_validation() {
        let node = registry().make("head", &json!({"rows": 1})).unwrap();
        let err = node.process(vec![Value::Scalar(Scalar::I64(1))]).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn missing_config_field_is_rejected() {
        assert!(matches!(registry().make("select", &json!({})), Err(PlanError::Config(_))));
    }
}
