//! TIFF validation utilities
//!
//! Sanity checks that keep a malformed file from sending the reader into
//! huge allocations or endless IFD loops.

use log::error;

use crate::errors::{GeoError, GeoResult};
use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;

/// Validates an IFD offset against the stream length
pub fn validate_ifd_offset(offset: u64, file_size: u64) -> GeoResult<()> {
    if offset >= file_size || offset < header::TIFF_HEADER_SIZE {
        return Err(GeoError::GenericError(format!(
            "Invalid IFD offset: {} (file size: {})",
            offset, file_size
        )));
    }

    Ok(())
}

/// Validates the remainder of a BigTIFF header after the version number
///
/// BigTIFF requires an offset size of 8 followed by a zero word.
pub fn validate_bigtiff_header(
    reader: &mut dyn SeekableReader,
    byte_order_handler: &dyn ByteOrderHandler
) -> GeoResult<()> {
    let offset_size = byte_order_handler.read_u16(reader)?;
    let zeros = byte_order_handler.read_u16(reader)?;

    if offset_size != header::BIGTIFF_OFFSET_SIZE || zeros != 0 {
        error!("Invalid BigTIFF header: offset_size={}, zeros={}", offset_size, zeros);
        return Err(GeoError::InvalidBigTIFFHeader);
    }

    Ok(())
}

/// Checks that every strip or tile addressed by an IFD lies inside the file
pub fn validate_chunks(offsets: &[u64], byte_counts: &[u64], file_size: u64) -> GeoResult<()> {
    if offsets.len() != byte_counts.len() {
        return Err(GeoError::GenericError(format!(
            "Chunk offset count {} does not match byte count entries {}",
            offsets.len(), byte_counts.len()
        )));
    }

    for (index, (&offset, &count)) in offsets.iter().zip(byte_counts).enumerate() {
        if offset.saturating_add(count) > file_size {
            return Err(GeoError::GenericError(format!(
                "Chunk {} ({} bytes at offset {}) extends past end of file ({} bytes)",
                index, count, offset, file_size
            )));
        }
    }

    Ok(())
}
