//! CSV/TSV sample reader

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::reader::{DataReader, IoError, IoResult};
use crate::table::SampleTable;

/// CSV file reader
pub struct CsvReader {
    path: String,
    delimiter: u8,
    has_header: bool,
}

impl CsvReader {
    /// Open a CSV file with a header row
    pub fn open(path: impl AsRef<Path>) -> IoResult<Self> {
        Self::open_with_options(path, b',', true)
    }

    /// Open a delimited file with options
    pub fn open_with_options(
        path: impl AsRef<Path>,
        delimiter: u8,
        has_header: bool,
    ) -> IoResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IoError::FileNotFound(path.display().to_string()));
        }

        Ok(Self {
            path: path.display().to_string(),
            delimiter,
            has_header,
        })
    }

    fn reader(&self) -> IoResult<csv::Reader<BufReader<File>>> {
        let file = File::open(&self.path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        Ok(csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_header)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file)))
    }
}

impl DataReader for CsvReader {
    fn read_table(&self) -> IoResult<SampleTable> {
        let mut reader = self.reader()?;

        let mut columns: Vec<String> = if self.has_header {
            reader
                .headers()
                .map_err(|e| IoError::InvalidFormat(e.to_string()))?
                .iter()
                .map(|s| s.to_string())
                .collect()
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
            let line = record
                .position()
                .map_or(rows.len() + 1, |p| p.line() as usize);

            let row = record
                .iter()
                .map(|cell| parse_cell(cell, line))
                .collect::<IoResult<Vec<f64>>>()?;
            rows.push(row);
        }

        if !self.has_header {
            let width = rows.first().map_or(0, Vec::len);
            columns = (0..width).map(|i| format!("col_{}", i)).collect();
        }

        SampleTable::new(columns, rows)
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn format_name(&self) -> &'static str {
        if self.delimiter == b'\t' {
            "TSV"
        } else {
            "CSV"
        }
    }
}

/// Parse a single cell; empty cells and `nan` become NaN
fn parse_cell(cell: &str, line: usize) -> IoResult<f64> {
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>().map_err(|_| IoError::Parse {
        line,
        message: format!("'{}' is not a number", cell),
    })
}
