//! Observer that snapshots observed outputs to disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tabflow_core::types::Value;
use tabflow_operators::{Observer, Operator};

use crate::error::Result;
use crate::writers::csv::CsvWriter;
use crate::writers::json::value_to_json;

/// Writes the first output of every observed call into `dir`.
///
/// Tables land in `NNNN-<operator>.csv`, anything else in `NNNN-<operator>.json`.
/// Write failures are logged and never reach the pipeline.
pub struct CsvSnapshotObserver {
    dir: PathBuf,
    seq: AtomicUsize,
}

impl CsvSnapshotObserver {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            seq: AtomicUsize::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, operator: &str, value: &Value) -> Result<PathBuf> {
        let n = self.seq.fetch_add(1, Ordering::SeqCst);
        let stem = format!("{n:04}-{}", sanitize(operator));
        match value {
            Value::Table(t) => {
                let path = self.dir.join(format!("{stem}.csv"));
                CsvWriter::to_path(&path)?.write_table(t)?;
                Ok(path)
            }
            other => {
                let path = self.dir.join(format!("{stem}.json"));
                fs::write(&path, serde_json::to_vec_pretty(&value_to_json(other))?)?;
                Ok(path)
            }
        }
    }
}

impl Observer for CsvSnapshotObserver {
    fn on_output(&self, operator: &dyn Operator, outputs: &[Value]) {
        let Some(first) = outputs.first() else {
            return;
        };
        match self.write(operator.name(), first) {
            Ok(path) => tracing::debug!(operator = operator.name(), path = %path.display(), "snapshot written"),
            Err(e) => tracing::warn!(operator = operator.name(), error = %e, "snapshot failed"),
        }
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tabflow_core::types::{Column, Scalar, Table};
    use tabflow_operators::{FnOperator, Node};

    #[test]
    fn writes_one_file_per_observed_call() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("snapshots");
        let observer = Arc::new(CsvSnapshotObserver::new(&dir).unwrap());

        let node = Node::new(FnOperator::identity("drop na")).with_observers(vec![observer.clone()]);
        let table = Table::new(vec![Column::new("hr", vec![Scalar::I64(70)])]);
        node.process(vec![Value::Table(table)]).unwrap();
        node.process(vec![Value::Scalar(Scalar::I64(1))]).unwrap();

        assert_eq!(fs::read_to_string(dir.join("0000-drop_na.csv")).unwrap(), "hr\n70\n");
        assert_eq!(fs::read_to_string(dir.join("0001-drop_na.json")).unwrap(), "1");
    }

    #[test]
    fn ragged_table_snapshot_does_not_panic() {
        let tmp = tempfile::tempdir().unwrap();
        let observer = Arc::new(CsvSnapshotObserver::new(tmp.path()).unwrap());
        let node = Node::new(FnOperator::identity("merge")).with_observers(vec![observer]);

        let table = Table::new(vec![
            Column::new("id", vec![Scalar::I64(1), Scalar::I64(2)]),
            Column::new("hr", vec![Scalar::I64(70)]),
        ]);
        node.process(vec![Value::Table(table)]).unwrap();
        assert_eq!(
            fs::read_to_string(tmp.path().join("0000-merge.csv")).unwrap(),
            "id,hr\n1,70\n2,\n"
        );
    }
}
