//! In-memory sample table

use serde::{Deserialize, Serialize};

use crate::reader::{IoError, IoResult};

/// Samples read from a file: one row per sample, one column per parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleTable {
    /// Column names (header row, or generated `col_N`)
    pub columns: Vec<String>,

    /// Row-major values, each row has `columns.len()` entries
    pub rows: Vec<Vec<f64>>,
}

impl SampleTable {
    /// Create a table, checking that every row matches the header width
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> IoResult<Self> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns.len())
        {
            return Err(IoError::Parse {
                line: i + 1,
                message: format!("expected {} values, found {}", columns.len(), row.len()),
            });
        }
        Ok(Self { columns, rows })
    }

    /// Number of samples
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of parameters
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Copy out a single column by name
    pub fn column(&self, name: &str) -> IoResult<Vec<f64>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| IoError::ColumnNotFound(name.to_string()))?;
        Ok(self.rows.iter().map(|r| r[idx]).collect())
    }

    /// Keep only the named columns, in the given order
    pub fn select(&self, names: &[String]) -> IoResult<Self> {
        let indices = names
            .iter()
            .map(|n| {
                self.column_index(n)
                    .ok_or_else(|| IoError::ColumnNotFound(n.clone()))
            })
            .collect::<IoResult<Vec<_>>>()?;

        Ok(Self {
            columns: names.to_vec(),
            rows: self
                .rows
                .iter()
                .map(|r| indices.iter().map(|&i| r[i]).collect())
                .collect(),
        })
    }
}
