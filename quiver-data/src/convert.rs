//! Extraction of a price column from CSV exports.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::error::NpyError;
use crate::npy::save;

/// Zero-based index of the close price in OHLCVT rows.
pub const CLOSE_COLUMN: usize = 4;

/// Result alias for CSV conversion.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Failures raised while turning a CSV file into a price series.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The CSV file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: std::io::Error,
    },
    /// The CSV reader rejected the input.
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    /// A row is too short to hold the requested column.
    #[error("row {row} has no column {column}")]
    MissingColumn {
        /// One-based row number, headers excluded.
        row: usize,
        /// Requested zero-based column.
        column: usize,
    },
    /// A field could not be parsed as a number.
    #[error("row {row}: '{value}' is not a price")]
    InvalidPrice {
        /// One-based row number, headers excluded.
        row: usize,
        /// Raw field text.
        value: String,
    },
    /// The input holds no data rows.
    #[error("csv file contains no rows")]
    Empty,
    /// Writing the array file failed.
    #[error(transparent)]
    Npy(#[from] NpyError),
}

/// Layout of the CSV input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Zero-based column holding the price.
    pub column: usize,
    /// Whether the first row is a header to skip.
    pub has_headers: bool,
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            column: CLOSE_COLUMN,
            has_headers: false,
            delimiter: b',',
        }
    }
}

/// Parses one numeric column out of every CSV record in `source`.
pub fn read_close_column<R: Read>(source: R, options: &CsvOptions) -> ConvertResult<Vec<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_headers)
        .flexible(true)
        .from_reader(source);

    let mut prices = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = idx + 1;
        let field = record.get(options.column).ok_or(ConvertError::MissingColumn {
            row,
            column: options.column,
        })?;
        let price = field
            .trim()
            .parse::<f64>()
            .map_err(|_| ConvertError::InvalidPrice {
                row,
                value: field.to_string(),
            })?;
        prices.push(price);
    }

    if prices.is_empty() {
        return Err(ConvertError::Empty);
    }
    Ok(prices)
}

/// Reads the configured column of `input` and saves it as an array file at `output`.
///
/// Returns the number of prices written.
pub fn convert_csv(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &CsvOptions,
) -> ConvertResult<usize> {
    let input = input.as_ref();
    let file = File::open(input).map_err(|source| ConvertError::Open {
        path: input.to_path_buf(),
        source,
    })?;
    let prices = read_close_column(BufReader::new(file), options)?;
    save(output.as_ref(), &prices)?;
    debug!(
        input = %input.display(),
        output = %output.as_ref().display(),
        rows = prices.len(),
        "converted csv column"
    );
    Ok(prices.len())
}
