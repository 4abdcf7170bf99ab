//! NodeSpec → Node lowering.
//!
//! Composites are built directly; `leaf` nodes are resolved through the
//! registry. Every leaf key is resolved while the tree is built, so an unknown
//! key fails here and no operator ever runs.

use tabflow_core::config::ExecConfig;
use tabflow_core::types::Value;
use tabflow_operators::{
    Compose, Iterate, Map, MapIterable, Node, Noop, Print, ProcessDataframe, Reduce, Scoped,
    Sequence, Split, SplitJoin,
};

use crate::dsl::yaml::NodeSpec;
use crate::error::PlanError;
use crate::registry::Registry;

pub fn build(spec: &NodeSpec, registry: &Registry, cfg: &ExecConfig) -> Result<Node, PlanError> {
    let node = match spec {
        NodeSpec::Sequence { steps } => Node::new(Sequence::new(build_all(steps, registry, cfg)?)?),
        NodeSpec::Compose { branches, workers } => {
            let mut op = Compose::new(build_all(branches, registry, cfg)?)?.with_config(cfg);
            if let Some(w) = workers {
                op = op.with_workers(*w);
            }
            Node::new(op)
        }
        NodeSpec::Map { operator } => Node::new(Map::new(build(operator, registry, cfg)?)),
        NodeSpec::MapIterable { operator } => {
            Node::new(MapIterable::new(build(operator, registry, cfg)?))
        }
        NodeSpec::Reduce { operator, seed } => {
            let mut op = Reduce::new(build(operator, registry, cfg)?);
            if let Some(seed) = seed {
                op = op.with_seed(Value::Scalar(seed.clone()));
            }
            Node::new(op)
        }
        NodeSpec::Iterate { operator } => Node::new(Iterate::new(build(operator, registry, cfg)?)),
        NodeSpec::Split {
            branches,
            bind,
            workers,
        } => Node::new(build_split(branches, bind.as_deref(), *workers, registry, cfg)?),
        NodeSpec::SplitJoin {
            branches,
            bind,
            join,
            workers,
        } => {
            let split = build_split(branches, bind.as_deref(), *workers, registry, cfg)?;
            Node::new(SplitJoin::new(split, build(join, registry, cfg)?))
        }
        NodeSpec::ProcessDataframe { operator, indices } => Node::new(ProcessDataframe::new(
            build(operator, registry, cfg)?,
            indices.clone(),
        )?),
        NodeSpec::Scoped { operator } => {
            // Build once up front so a bad subtree is reported at build time.
            build(operator, registry, cfg)?;
            let inner = (**operator).clone();
            let registry = registry.clone();
            let cfg = cfg.clone();
            Node::new(Scoped::new(move || {
                build(&inner, &registry, &cfg)
                    .map_err(|e| tabflow_core::Error::Config(e.to_string()))
            }))
        }
        NodeSpec::Noop => Node::new(Noop),
        NodeSpec::Print { methods, rows } => {
            Node::new(Print::new(methods.clone()).with_rows(rows.unwrap_or(cfg.print_rows)))
        }
        NodeSpec::Leaf { key, config } => registry.make(key, config)?,
    };
    tracing::trace!(op = node.name(), "built node");
    Ok(node)
}

fn build_all(specs: &[NodeSpec], registry: &Registry, cfg: &ExecConfig) -> Result<Vec<Node>, PlanError> {
    specs.iter().map(|s| build(s, registry, cfg)).collect()
}

fn build_split(
    branches: &[NodeSpec],
    bind: Option<&[usize]>,
    workers: Option<usize>,
    registry: &Registry,
    cfg: &ExecConfig,
) -> Result<Split, PlanError> {
    let mut split = Split::new(build_all(branches, registry, cfg)?)?.with_config(cfg);
    if let Some(bind) = bind {
        split = split.with_bind(bind.to_vec())?;
    }
    if let Some(w) = workers {
        split = split.with_workers(w);
    }
    Ok(split)
}
