//! TIFF writing utilities
//!
//! Alignment and entry ordering helpers for the GeoTIFF writer.

use crate::errors::GeoResult;
use crate::tiff::ifd::IFDEntry;
use std::io::Write;

/// Align an offset up to the next 4-byte boundary
pub fn align_to_4_bytes(offset: u64) -> u64 {
    (offset + 3) & !3
}

/// Write zero bytes so the next write starts on a 4-byte boundary
pub fn write_padding(writer: &mut impl Write, data_len: usize) -> GeoResult<()> {
    let padding = calculate_padding(data_len);
    if padding > 0 {
        writer.write_all(&[0u8; 3][..padding])?;
    }
    Ok(())
}

/// Padding needed after `data_len` bytes to reach a 4-byte boundary
pub fn calculate_padding(data_len: usize) -> usize {
    (4 - (data_len % 4)) % 4
}

/// Entries sorted by tag number, as the TIFF specification requires
///
/// IFD::add_entry already keeps tags unique, so a stable sort is enough.
pub fn sorted_entries(entries: &[IFDEntry]) -> Vec<IFDEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|entry| entry.tag);
    sorted
}
