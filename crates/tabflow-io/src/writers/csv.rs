//! `Table` → CSV.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tabflow_core::types::{Scalar, Table};

use crate::error::Result;

pub struct CsvWriter<W: Write> {
    wtr: csv::Writer<W>,
}

impl CsvWriter<File> {
    pub fn to_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::to_writer(File::create(path)?))
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn to_writer(writer: W) -> Self {
        Self {
            wtr: csv::Writer::from_writer(writer),
        }
    }

    /// Write a header row followed by every row of `table`. Nulls are empty cells.
    pub fn write_table(&mut self, table: &Table) -> Result<()> {
        self.wtr.write_record(table.column_names())?;
        for r in 0..table.num_rows() {
            let row: Vec<String> = table
                .columns
                .iter()
                .map(|c| match c.get(r) {
                    Scalar::Null => String::new(),
                    v => v.to_string(),
                })
                .collect();
            self.wtr.write_record(&row)?;
        }
        self.wtr.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.wtr
            .into_inner()
            .map_err(|e| crate::error::Error::Io(e.into_error()))
    }
}
