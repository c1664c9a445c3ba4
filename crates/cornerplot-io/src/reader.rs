//! Sample table formats and the reader seam
//!
//! A format is chosen from the file extension; each format maps to a
//! `DataReader` that loads the whole table at once.

use std::path::Path;

use thiserror::Error;

use crate::table::SampleTable;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("No such file: {0}")]
    FileNotFound(String),

    #[error("Cannot open {0}")]
    OpenFailed(String),

    #[error("Malformed table: {0}")]
    InvalidFormat(String),

    #[error("No column named '{0}'")]
    ColumnNotFound(String),

    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type IoResult<T> = Result<T, IoError>;

/// Delimited text layouts understood by [`open_file`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma separated, header row
    Csv,
    /// Tab separated, header row
    Tsv,
}

impl TableFormat {
    pub const ALL: [TableFormat; 2] = [TableFormat::Csv, TableFormat::Tsv];

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            TableFormat::Csv => &["csv"],
            TableFormat::Tsv => &["tsv", "tab"],
        }
    }

    pub fn delimiter(self) -> u8 {
        match self {
            TableFormat::Csv => b',',
            TableFormat::Tsv => b'\t',
        }
    }

    /// Case-insensitive lookup by extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.extensions().contains(&ext.as_str()))
    }
}

/// Something that can produce a [`SampleTable`]
pub trait DataReader: Send + Sync {
    fn read_table(&self) -> IoResult<SampleTable>;

    /// Source path, when the reader is backed by a file
    fn path(&self) -> Option<&str> {
        None
    }

    fn format_name(&self) -> &'static str;
}

pub type BoxedReader = Box<dyn DataReader>;

/// Pick a reader for `path` from its extension
pub fn open_file(path: impl AsRef<Path>) -> IoResult<BoxedReader> {
    let path = path.as_ref();
    let format = TableFormat::from_path(path).ok_or_else(|| {
        IoError::InvalidFormat(format!(
            "unrecognised extension on {} (expected one of {})",
            path.display(),
            supported_extensions().join(", ")
        ))
    })?;
    reader_for(path, format)
}

#[cfg(feature = "csv")]
fn reader_for(path: &Path, format: TableFormat) -> IoResult<BoxedReader> {
    let reader = crate::csv_reader::CsvReader::open_with_options(path, format.delimiter(), true)?;
    Ok(Box::new(reader))
}

#[cfg(not(feature = "csv"))]
fn reader_for(path: &Path, _format: TableFormat) -> IoResult<BoxedReader> {
    Err(IoError::InvalidFormat(format!(
        "{}: built without delimited text support",
        path.display()
    )))
}

/// Open and read in one step
pub fn read_table(path: impl AsRef<Path>) -> IoResult<SampleTable> {
    open_file(path)?.read_table()
}

pub fn supported_extensions() -> Vec<&'static str> {
    if cfg!(feature = "csv") {
        TableFormat::ALL
            .iter()
            .flat_map(|f| f.extensions().iter().copied())
            .collect()
    } else {
        Vec::new()
    }
}
