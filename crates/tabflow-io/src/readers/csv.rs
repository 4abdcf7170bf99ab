//! CSV → `Table` with per-cell type inference.
//!
//! Empty cells become `Null`; `true`/`false` become booleans; integers and
//! floats are parsed as `I64`/`F64`; anything else stays a string.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tabflow_core::types::{Column, Scalar, Table};

use crate::error::{Error, Result};

pub struct CsvReader<R: Read> {
    rdr: csv::Reader<R>,
    has_headers: bool,
}

impl<R: Read> CsvReader<R> {
    pub fn from_reader(reader: R, has_headers: bool) -> Self {
        let rdr = csv::ReaderBuilder::new()
            .has_headers(has_headers)
            .flexible(true)
            .from_reader(reader);
        Self { rdr, has_headers }
    }

    /// Read every remaining record into one table.
    pub fn read_table(&mut self) -> Result<Table> {
        let mut names: Vec<String> = if self.has_headers {
            self.rdr.headers()?.iter().map(|h| h.trim().to_string()).collect()
        } else {
            Vec::new()
        };

        let mut columns: Vec<Vec<Scalar>> = vec![Vec::new(); names.len()];
        for (row, record) in self.rdr.records().enumerate() {
            let record = record?;
            if names.is_empty() && row == 0 {
                names = (0..record.len()).map(|i| format!("column_{i}")).collect();
                columns = vec![Vec::new(); names.len()];
            }
            if record.len() != names.len() {
                return Err(Error::Ragged {
                    row,
                    expected: names.len(),
                    got: record.len(),
                });
            }
            for (col, field) in columns.iter_mut().zip(record.iter()) {
                col.push(infer_scalar(field));
            }
        }

        Ok(Table::new(
            names
                .into_iter()
                .zip(columns)
                .map(|(name, values)| Column::new(name, values))
                .collect(),
        ))
    }
}

pub fn read_csv_path(path: impl AsRef<Path>) -> Result<Table> {
    let file = File::open(path)?;
    CsvReader::from_reader(file, true).read_table()
}

pub fn infer_scalar(field: &str) -> Scalar {
    let s = field.trim();
    if s.is_empty() {
        return Scalar::Null;
    }
    match s {
        "true" | "TRUE" | "True" => return Scalar::Bool(true),
        "false" | "FALSE" | "False" => return Scalar::Bool(false),
        _ => {}
    }
    if let Ok(i) = s.parse::<i64>() {
        return Scalar::I64(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Scalar::F64(f);
    }
    Scalar::Str(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_cell_types() {
        let data = "subject,age,weight,smoker,site\ns01,54,81.5,true,\ns02,61,,false,north\n";
        let table = CsvReader::from_reader(data.as_bytes(), true).read_table().unwrap();

        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column_names(), vec!["subject", "age", "weight", "smoker", "site"]);
        assert_eq!(table.column("age").unwrap().values, vec![Scalar::I64(54), Scalar::I64(61)]);
        assert_eq!(table.column("weight").unwrap().values, vec![Scalar::F64(81.5), Scalar::Null]);
        assert_eq!(table.column("smoker").unwrap().values[1], Scalar::Bool(false));
        assert_eq!(table.column("site").unwrap().values[1], Scalar::Str("north".into()));
    }

    #[test]
    fn headerless_input_gets_positional_names() {
        let table = CsvReader::from_reader("1,2\n3,4\n".as_bytes(), false).read_table().unwrap();
        assert_eq!(table.column_names(), vec!["column_0", "column_1"]);
        assert_eq!(table.num_rows(), 2);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = CsvReader::from_reader("a,b\n1\n".as_bytes(), true).read_table().unwrap_err();
        assert!(matches!(err, Error::Ragged { row: 0, expected: 2, got: 1 }));
    }
}
