//! Reader and writer for the minimal NPY array profile.

pub mod header;
mod reader;
mod writer;

pub use header::{NpyHeader, NpyVersion, DESCR_F64_LE, ELEMENT_SIZE, MAGIC};
pub use reader::{inspect, load, load_with, read_array, read_header, NpyArray, ReadMode};
pub use writer::{save, write_series};
