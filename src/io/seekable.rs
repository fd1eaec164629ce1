//! Seekable reader trait and positioned-read helpers

use std::io::{Read, Seek, SeekFrom};

use crate::errors::{GeoError, GeoResult};

/// Trait for readers that can both read and seek
///
/// The TIFF reader works against this trait so that tests can feed it an
/// in-memory `Cursor` while the command line feeds it a buffered file.
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}

/// Returns the total length of the stream, restoring the current position.
pub fn stream_len(reader: &mut dyn SeekableReader) -> GeoResult<u64> {
    let position = reader.stream_position()?;
    let len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(position))?;
    Ok(len)
}

/// Reads `len` bytes starting at `offset`.
///
/// Fails with a descriptive error instead of an allocation blow-up when the
/// requested range runs past the end of the stream.
pub fn read_bytes_at(reader: &mut dyn SeekableReader, offset: u64, len: u64) -> GeoResult<Vec<u8>> {
    let total = stream_len(reader)?;
    if offset.checked_add(len).map_or(true, |end| end > total) {
        return Err(GeoError::GenericError(format!(
            "Data range {}..{} exceeds stream length {}",
            offset,
            offset.saturating_add(len),
            total
        )));
    }

    reader.seek(SeekFrom::Start(offset))?;
    let mut buffer = vec![0u8; len as usize];
    reader.read_exact(&mut buffer)?;
    Ok(buffer)
}
