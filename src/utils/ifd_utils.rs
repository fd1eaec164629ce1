//! IFD utilities
//!
//! Offsets and sizes of Image File Directories, shared by the reader
//! (to find the next-IFD pointer) and the writer (to lay out the file).

use crate::io::seekable::SeekableReader;
use crate::io::byte_order::ByteOrderHandler;
use crate::errors::GeoResult;

/// Reads an IFD offset (first-IFD pointer in the header, or a next-IFD pointer)
pub fn read_ifd_offset(
    reader: &mut dyn SeekableReader,
    is_big_tiff: bool,
    byte_order_handler: &dyn ByteOrderHandler
) -> GeoResult<u64> {
    let offset = if is_big_tiff {
        byte_order_handler.read_u64(reader)?
    } else {
        byte_order_handler.read_u32(reader)? as u64
    };
    Ok(offset)
}

/// Size in bytes of an IFD holding `entry_count` entries
///
/// Classic TIFF: 2-byte count, 12-byte entries, 4-byte next pointer.
/// BigTIFF: 8-byte count, 20-byte entries, 8-byte next pointer.
pub fn calculate_ifd_size(entry_count: usize, is_big_tiff: bool) -> u64 {
    let entry_count = entry_count as u64;
    if is_big_tiff {
        8 + 20 * entry_count + 8
    } else {
        2 + 12 * entry_count + 4
    }
}
