//! YAML → `NodeSpec` parser for operator trees.
//!
//! Example:
//! ```yaml
//! config: { workers: 4 }
//! pipeline:
//!   op: sequence
//!   steps:
//!     - op: leaf
//!       key: drop_na
//!     - op: compose
//!       branches:
//!         - { op: noop }
//!         - { op: print, methods: [shape, head] }
//!     - op: split_join
//!       branches: [ { op: leaf, key: resample }, { op: noop } ]
//!       bind: [1, 0]
//!       join: { op: leaf, key: merge }
//! ```

use serde::{Deserialize, Serialize};

use tabflow_core::config::ExecConfig;
use tabflow_core::types::Scalar;
use tabflow_operators::Inspect;

use crate::error::PlanError;

/// One node of a declarative pipeline, tagged by `op`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum NodeSpec {
    Sequence {
        steps: Vec<NodeSpec>,
    },
    Compose {
        branches: Vec<NodeSpec>,
        #[serde(default)]
        workers: Option<usize>,
    },
    Map {
        operator: Box<NodeSpec>,
    },
    MapIterable {
        operator: Box<NodeSpec>,
    },
    Reduce {
        operator: Box<NodeSpec>,
        #[serde(default)]
        seed: Option<Scalar>,
    },
    Iterate {
        operator: Box<NodeSpec>,
    },
    Split {
        branches: Vec<NodeSpec>,
        #[serde(default)]
        bind: Option<Vec<usize>>,
        #[serde(default)]
        workers: Option<usize>,
    },
    SplitJoin {
        branches: Vec<NodeSpec>,
        #[serde(default)]
        bind: Option<Vec<usize>>,
        join: Box<NodeSpec>,
        #[serde(default)]
        workers: Option<usize>,
    },
    ProcessDataframe {
        operator: Box<NodeSpec>,
        indices: Vec<usize>,
    },
    /// Rebuild `operator` from this spec on every call.
    Scoped {
        operator: Box<NodeSpec>,
    },
    Noop,
    Print {
        #[serde(default)]
        methods: Vec<Inspect>,
        #[serde(default)]
        rows: Option<usize>,
    },
    /// Operator supplied by the registry under `key`.
    Leaf {
        key: String,
        #[serde(default)]
        config: serde_json::Value,
    },
}

/// Optional execution overrides carried by a pipeline document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub workers: Option<usize>,
    pub parallel_threshold: Option<usize>,
    pub print_rows: Option<usize>,
}

impl PipelineConfig {
    /// Overlay the values present in this document onto `cfg`.
    pub fn apply(&self, cfg: &mut ExecConfig) {
        if let Some(v) = self.workers {
            cfg.workers = v;
        }
        if let Some(v) = self.parallel_threshold {
            cfg.parallel_threshold = v;
        }
        if let Some(v) = self.print_rows {
            cfg.print_rows = v;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PipelineDoc {
    #[serde(default)]
    config: Option<PipelineConfig>,
    pipeline: NodeSpec,
}

#[derive(Debug, Clone)]
pub struct ParsedPipeline {
    pub spec: NodeSpec,
    pub config: PipelineConfig,
}

/// Fields each `op` accepts besides the tag itself.
fn allowed_fields(op: &str) -> Option<&'static [&'static str]> {
    Some(match op {
        "sequence" => &["steps"],
        "compose" => &["branches", "workers"],
        "map" | "map_iterable" | "iterate" | "scoped" => &["operator"],
        "reduce" => &["operator", "seed"],
        "split" => &["branches", "bind", "workers"],
        "split_join" => &["branches", "bind", "join", "workers"],
        "process_dataframe" => &["operator", "indices"],
        "noop" => &[],
        "print" => &["methods", "rows"],
        "leaf" => &["key", "config"],
        _ => return None,
    })
}

/// Reject fields an `op` does not know, recursing into child nodes.
///
/// serde skips unknown keys inside internally tagged enums, so a misspelled
/// `bind` would otherwise turn into a positional split.
fn check_node_fields(node: &serde_yaml::Value, path: &str) -> Result<(), serde_yaml::Error> {
    let Some(map) = node.as_mapping() else {
        return Ok(());
    };
    // Missing or unknown ops are reported by the typed pass.
    let Some(op) = map.get("op").and_then(serde_yaml::Value::as_str) else {
        return Ok(());
    };
    let Some(allowed) = allowed_fields(op) else {
        return Ok(());
    };

    for (key, value) in map {
        let Some(key) = key.as_str() else {
            return Err(serde::de::Error::custom(format!("{path}: non-string key in `{op}`")));
        };
        if key == "op" {
            continue;
        }
        if !allowed.contains(&key) {
            return Err(serde::de::Error::custom(format!(
                "{path}: unknown field `{key}` for op `{op}`, expected one of {allowed:?}"
            )));
        }
        match (key, value) {
            ("steps" | "branches", serde_yaml::Value::Sequence(children)) => {
                for (i, child) in children.iter().enumerate() {
                    check_node_fields(child, &format!("{path}.{key}[{i}]"))?;
                }
            }
            ("operator" | "join", child) => check_node_fields(child, &format!("{path}.{key}"))?,
            _ => {}
        }
    }
    Ok(())
}

pub fn parse_yaml_pipeline(yaml_src: &str) -> Result<ParsedPipeline, PlanError> {
    let raw: serde_yaml::Value = serde_yaml::from_str(yaml_src)?;
    if let Some(pipeline) = raw.get("pipeline") {
        check_node_fields(pipeline, "pipeline")?;
    }
    let doc: PipelineDoc = serde_yaml::from_value(raw)?;
    Ok(ParsedPipeline {
        spec: doc.pipeline,
        config: doc.config.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_document() {
        let src = r#"
config: { workers: 3 }
pipeline:
  op: sequence
  steps:
    - { op: leaf, key: drop_na, config: { columns: [hr] } }
    - op: split
      branches: [ { op: noop }, { op: print, methods: [shape] } ]
      bind: [1, 0]
    - op: reduce
      operator: { op: leaf, key: concat }
      seed: 0
"#;
        let parsed = parse_yaml_pipeline(src).unwrap();
        assert_eq!(parsed.config.workers, Some(3));

        let NodeSpec::Sequence { steps } = parsed.spec else {
            panic!("expected a sequence");
        };
        assert_eq!(steps.len(), 3);
        assert!(matches!(&steps[0], NodeSpec::Leaf { key, config } if key == "drop_na" && config["columns"][0] == "hr"));
        assert!(matches!(&steps[1], NodeSpec::Split { bind: Some(b), workers: None, .. } if b == &vec![1, 0]));
        assert!(matches!(&steps[2], NodeSpec::Reduce { seed: Some(Scalar::I64(0)), .. }));
    }

    #[test]
    fn unknown_op_is_a_yaml_error() {
        let err = parse_yaml_pipeline("pipeline: { op: teleport }").unwrap_err();
        assert!(matches!(err, PlanError::Yaml(_)));
    }

    #[test]
    fn misspelled_node_field_is_rejected() {
        let src = "pipeline: { op: split, branches: [{op: noop}, {op: noop}], bnid: [1, 0] }";
        match parse_yaml_pipeline(src) {
            Err(PlanError::Yaml(e)) => assert!(e.to_string().contains("bnid")),
            other => panic!("expected a yaml error, got {other:?}"),
        }
    }

    #[test]
    fn misspelled_field_in_nested_child_is_rejected() {
        let src = r#"
pipeline:
  op: sequence
  steps:
    - op: reduce
      operator: { op: print, method: [shape] }
"#;
        assert!(matches!(parse_yaml_pipeline(src), Err(PlanError::Yaml(_))));
    }

    #[test]
    fn unknown_document_and_config_keys_are_rejected() {
        let top = "pipelne: { op: noop }\npipeline: { op: noop }";
        assert!(matches!(parse_yaml_pipeline(top), Err(PlanError::Yaml(_))));

        let cfg = "config: { worker: 4 }\npipeline: { op: noop }";
        assert!(matches!(parse_yaml_pipeline(cfg), Err(PlanError::Yaml(_))));
    }

    #[test]
    fn leaf_config_keys_are_not_checked() {
        let src = "pipeline: { op: leaf, key: resample, config: { anything: 1 } }";
        assert!(parse_yaml_pipeline(src).is_ok());
    }

    #[test]
    fn document_config_overrides_only_present_fields() {
        let mut cfg = ExecConfig::default();
        PipelineConfig {
            print_rows: Some(20),
            ..Default::default()
        }
        .apply(&mut cfg);
        assert_eq!(cfg.print_rows, 20);
        assert_eq!(cfg.workers, ExecConfig::default().workers);
    }
}
