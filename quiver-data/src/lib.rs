//! Loading and persisting price series in the NPY array file format.
//!
//! Only the minimal profile is handled: one-dimensional, little-endian `f64`,
//! C-contiguous arrays. Files are written as format version 1.0. The
//! [`convert`] module turns OHLCV CSV exports into such files.

pub mod convert;
mod error;
pub mod npy;

pub use convert::{convert_csv, read_close_column, ConvertError, ConvertResult, CsvOptions};
pub use error::{NpyError, NpyResult};
pub use npy::{
    inspect, load, load_with, read_array, read_header, save, write_series, NpyArray, NpyHeader,
    NpyVersion, ReadMode,
};
