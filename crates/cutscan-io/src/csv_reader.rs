//! CSV file reader

use crate::reader::{EventSource, IoError, IoResult};
use crate::schema::{ColumnTable, TableSchema};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

/// CSV file reader
pub struct CsvReader {
    path: String,
    schema: TableSchema,
    delimiter: u8,
}

impl CsvReader {
    /// Open a comma-separated file
    pub fn open(path: &str) -> IoResult<Self> {
        Self::open_with_delimiter(path, b',')
    }

    /// Open a delimited file with a header row
    pub fn open_with_delimiter(path: &str, delimiter: u8) -> IoResult<Self> {
        if !Path::new(path).exists() {
            return Err(IoError::FileNotFound(path.to_string()));
        }

        let mut reader = Self::csv_reader(path, delimiter)?;
        let schema = Self::scan_schema(&mut reader)?;
        debug!(
            path,
            columns = schema.num_columns(),
            records = schema.num_records,
            "opened table"
        );

        Ok(Self {
            path: path.to_string(),
            schema,
            delimiter,
        })
    }

    fn csv_reader(path: &str, delimiter: u8) -> IoResult<csv::Reader<BufReader<File>>> {
        let file = File::open(path).map_err(|e| IoError::OpenFailed(format!("{}: {}", path, e)))?;
        Ok(csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file)))
    }

    fn scan_schema(reader: &mut csv::Reader<BufReader<File>>) -> IoResult<TableSchema> {
        let headers = reader
            .headers()
            .map_err(|e| IoError::InvalidFormat(e.to_string()))?
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>();

        let mut num_records = 0;
        for result in reader.records() {
            result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
            num_records += 1;
        }

        Ok(TableSchema::new(headers, num_records))
    }
}

impl EventSource for CsvReader {
    fn read_schema(&self) -> IoResult<TableSchema> {
        Ok(self.schema.clone())
    }

    fn read_columns(&self, names: &[&str]) -> IoResult<ColumnTable> {
        let indices = names
            .iter()
            .map(|name| {
                self.schema
                    .column_index(name)
                    .ok_or_else(|| IoError::ColumnNotFound {
                        column: name.to_string(),
                        path: self.path.clone(),
                    })
            })
            .collect::<IoResult<Vec<_>>>()?;

        let mut reader = Self::csv_reader(&self.path, self.delimiter)?;
        let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(self.schema.num_records); names.len()];
        let mut unparsed = 0usize;

        for result in reader.records() {
            let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
            for (values, &index) in columns.iter_mut().zip(&indices) {
                let value = match record.get(index).map(str::parse::<f64>) {
                    Some(Ok(v)) => v,
                    _ => {
                        unparsed += 1;
                        f64::NAN
                    }
                };
                values.push(value);
            }
        }

        if unparsed > 0 {
            warn!(path = %self.path, unparsed, "non-numeric cells read as NaN");
        }

        let mut table = ColumnTable::new(self.schema.num_records);
        for (name, values) in names.iter().zip(columns) {
            table.add_column(*name, values);
        }
        Ok(table)
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn format_name(&self) -> &'static str {
        "CSV"
    }
}
