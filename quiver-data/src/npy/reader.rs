use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use serde::Deserialize;
use tracing::{debug, warn};

use super::header::{NpyHeader, NpyVersion, ELEMENT_SIZE, MAGIC};
use crate::error::{eof_as_format, NpyError, NpyResult};

/// How the reader treats a payload that disagrees with the declared shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// Decode every complete element up to end-of-stream and drop a partial tail.
    #[default]
    Lenient,
    /// Require the payload to hold exactly the number of elements in the header.
    Strict,
}

/// A decoded array together with the header it was described by.
#[derive(Debug, Clone, PartialEq)]
pub struct NpyArray {
    pub header: NpyHeader,
    pub data: Vec<f64>,
}

/// Reads and validates the preamble and header, leaving `reader` at the payload.
pub fn read_header<R: Read>(mut reader: R) -> NpyResult<NpyHeader> {
    let mut magic = [0u8; 6];
    eof_as_format(reader.read_exact(&mut magic), "magic preamble")?;
    if &magic != MAGIC {
        return Err(NpyError::format("magic preamble mismatch"));
    }

    let major = eof_as_format(reader.read_u8(), "version")?;
    let minor = eof_as_format(reader.read_u8(), "version")?;
    let version = NpyVersion { major, minor };

    let header_len = match version.length_field_size()? {
        2 => usize::from(eof_as_format(
            reader.read_u16::<LittleEndian>(),
            "header length",
        )?),
        _ => {
            let len = eof_as_format(reader.read_u32::<LittleEndian>(), "header length")?;
            usize::try_from(len).map_err(|_| NpyError::format("header length out of range"))?
        }
    };

    let mut raw = Vec::new();
    (&mut reader)
        .take(header_len as u64)
        .read_to_end(&mut raw)?;
    if raw.len() < header_len {
        return Err(NpyError::format(format!(
            "truncated header: expected {header_len} bytes, found {}",
            raw.len()
        )));
    }
    let text = String::from_utf8(raw).map_err(|_| NpyError::format("header is not valid text"))?;

    let header = NpyHeader::parse(version, header_len, &text)?;
    header.validate()?;
    debug!(%version, header_len, shape = ?header.shape, "parsed array header");
    Ok(header)
}

/// Reads a complete array file from `reader`.
pub fn read_array<R: Read>(mut reader: R, mode: ReadMode) -> NpyResult<NpyArray> {
    let header = read_header(&mut reader)?;

    let mut payload = Vec::new();
    reader.read_to_end(&mut payload)?;

    let chunks = payload.chunks_exact(ELEMENT_SIZE);
    let partial = chunks.remainder().len();
    let data: Vec<f64> = chunks.map(LittleEndian::read_f64).collect();
    if data.is_empty() {
        return Err(NpyError::Empty);
    }

    let declared = header.element_count();
    match mode {
        ReadMode::Strict => {
            let expected = declared
                .checked_mul(ELEMENT_SIZE)
                .ok_or_else(|| NpyError::format("declared shape overflows"))?;
            if payload.len() < expected {
                return Err(NpyError::format(format!(
                    "truncated payload: header declares {declared} elements, found {}",
                    data.len()
                )));
            }
            if payload.len() > expected {
                return Err(NpyError::TrailingBytes {
                    count: payload.len() - expected,
                });
            }
        }
        ReadMode::Lenient => {
            if partial > 0 {
                debug!(bytes = partial, "ignoring incomplete trailing element");
            }
            if data.len() != declared {
                warn!(
                    declared,
                    found = data.len(),
                    "payload length disagrees with header shape"
                );
            }
        }
    }

    Ok(NpyArray { header, data })
}

/// Loads a series from `path`, tolerating a partial trailing element.
pub fn load(path: impl AsRef<Path>) -> NpyResult<Vec<f64>> {
    load_with(path, ReadMode::Lenient)
}

/// Loads a series from `path` using the given read mode.
pub fn load_with(path: impl AsRef<Path>, mode: ReadMode) -> NpyResult<Vec<f64>> {
    let path = path.as_ref();
    let file = open(path)?;
    let array = read_array(BufReader::new(file), mode)?;
    debug!(path = %path.display(), elements = array.data.len(), "loaded array file");
    Ok(array.data)
}

/// Reads only the preamble and header of the file at `path`.
pub fn inspect(path: impl AsRef<Path>) -> NpyResult<NpyHeader> {
    let path = path.as_ref();
    read_header(BufReader::new(open(path)?))
}

fn open(path: &Path) -> NpyResult<File> {
    File::open(path).map_err(|source| NpyError::Open {
        path: path.to_path_buf(),
        source,
    })
}
