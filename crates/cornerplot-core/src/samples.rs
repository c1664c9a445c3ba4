//! Sample arrays fed to [`corner`](crate::corner::corner)

use cornerplot_io::SampleTable;
use cornerplot_stats::SummaryStats;
use ndarray::{Array2, ArrayView1, Axis};

use crate::error::{CornerError, CornerResult};

/// `nsamples × ndim` array of draws, with optional column labels
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    data: Array2<f64>,
    labels: Option<Vec<String>>,
}

impl Samples {
    /// Wrap an array of shape `(nsamples, ndim)`
    pub fn from_array(data: Array2<f64>) -> CornerResult<Self> {
        let (nsamples, ndim) = data.dim();
        if nsamples == 0 || ndim == 0 {
            return Err(CornerError::Shape(format!(
                "expected at least one sample and one dimension, got {}x{}",
                nsamples, ndim
            )));
        }
        if ndim > nsamples {
            return Err(CornerError::Shape(
                "I don't believe that you want more dimensions than samples!".to_string(),
            ));
        }
        Ok(Self { data, labels: None })
    }

    /// One inner vector per sample
    pub fn from_rows(rows: &[Vec<f64>]) -> CornerResult<Self> {
        let ndim = rows.first().map_or(0, Vec::len);
        if let Some(i) = rows.iter().position(|r| r.len() != ndim) {
            return Err(CornerError::Shape(format!(
                "row {} has {} values, expected {}",
                i,
                rows[i].len(),
                ndim
            )));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let data = Array2::from_shape_vec((rows.len(), ndim), flat)
            .map_err(|e| CornerError::Shape(e.to_string()))?;
        Self::from_array(data)
    }

    /// One inner vector per dimension
    pub fn from_columns(columns: &[Vec<f64>]) -> CornerResult<Self> {
        let nsamples = columns.first().map_or(0, Vec::len);
        if let Some(i) = columns.iter().position(|c| c.len() != nsamples) {
            return Err(CornerError::Shape(format!(
                "column {} has {} values, expected {}",
                i,
                columns[i].len(),
                nsamples
            )));
        }
        let data = Array2::from_shape_fn((nsamples, columns.len()), |(i, j)| columns[j][i]);
        Self::from_array(data)
    }

    /// A single dimension
    pub fn from_1d(values: &[f64]) -> CornerResult<Self> {
        let data = Array2::from_shape_vec((values.len(), 1), values.to_vec())
            .map_err(|e| CornerError::Shape(e.to_string()))?;
        Self::from_array(data)
    }

    /// A table read from disk; its column names become the labels
    pub fn from_table(table: &SampleTable) -> CornerResult<Self> {
        let samples = Self::from_rows(&table.rows)?;
        samples.with_labels(table.columns.clone())
    }

    /// Attach column labels
    pub fn with_labels(mut self, labels: Vec<String>) -> CornerResult<Self> {
        if labels.len() != self.ndim() {
            return Err(CornerError::Shape(format!(
                "{} labels given for {} dimensions",
                labels.len(),
                self.ndim()
            )));
        }
        self.labels = Some(labels);
        Ok(self)
    }

    pub fn nsamples(&self) -> usize {
        self.data.nrows()
    }

    pub fn ndim(&self) -> usize {
        self.data.ncols()
    }

    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// View of dimension `i`
    pub fn column(&self, i: usize) -> ArrayView1<'_, f64> {
        self.data.index_axis(Axis(1), i)
    }

    /// Dimension `i` as an owned vector
    pub fn column_vec(&self, i: usize) -> Vec<f64> {
        self.column(i).to_vec()
    }

    /// Summary statistics of dimension `i`
    pub fn summary(&self, i: usize) -> SummaryStats {
        SummaryStats::from_data(&self.column_vec(i))
    }
}
