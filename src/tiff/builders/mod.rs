//! Tag builders and the file writer used by [`TiffBuilder`](crate::tiff::TiffBuilder)

pub mod basic_tags;
pub mod geo_tags;
pub mod writer;

use std::collections::BTreeMap;

use crate::tiff::ifd::{IFD, IFDEntry};

/// Tag payloads that are written outside the IFD, keyed by (IFD index, tag)
pub type ExternalData = BTreeMap<(usize, u16), Vec<u8>>;

/// Pixel data per IFD
pub type ImageData = BTreeMap<usize, Vec<u8>>;

/// Adds an entry whose values are stored as raw bytes
///
/// The writer decides whether the bytes go inline or after the IFDs.
pub fn add_data_tag(
    ifd: &mut IFD,
    external_data: &mut ExternalData,
    ifd_index: usize,
    tag: u16,
    field_type: u16,
    count: u64,
    data: Vec<u8>,
) {
    ifd.add_entry(IFDEntry::new(tag, field_type, count, 0));
    external_data.insert((ifd_index, tag), data);
}
