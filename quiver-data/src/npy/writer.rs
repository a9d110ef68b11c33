use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::debug;

use super::header::{render_header, NpyVersion, MAGIC};
use crate::error::{NpyError, NpyResult};

/// Serializes `data` as a version 1.0 array file into `writer`.
pub fn write_series<W: Write>(mut writer: W, data: &[f64]) -> NpyResult<()> {
    let header = render_header(data.len());
    let header_len = u16::try_from(header.len())
        .map_err(|_| NpyError::format("header does not fit a version 1.0 length field"))?;

    writer.write_all(MAGIC)?;
    writer.write_u8(NpyVersion::V1_0.major)?;
    writer.write_u8(NpyVersion::V1_0.minor)?;
    writer.write_u16::<LittleEndian>(header_len)?;
    writer.write_all(header.as_bytes())?;
    for value in data {
        writer.write_f64::<LittleEndian>(*value)?;
    }
    Ok(())
}

/// Writes `data` to `path`, replacing any existing file.
pub fn save(path: impl AsRef<Path>, data: &[f64]) -> NpyResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| NpyError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_series(&mut writer, data)?;
    writer.flush()?;
    debug!(path = %path.display(), elements = data.len(), "saved array file");
    Ok(())
}
