//! GeoTIFF file writer
//!
//! Output is always little-endian. The file is laid out as: header, IFDs,
//! out-of-line tag data, image data, each block aligned to 4 bytes.

use std::collections::BTreeMap;
use std::io::{Seek, SeekFrom, Write};

use log::debug;

use crate::errors::{GeoError, GeoResult};
use crate::tiff::constants::{header, tags};
use crate::tiff::ifd::IFD;
use crate::utils::{ifd_utils, write_utils};
use super::{ExternalData, ImageData};

/// Where each block of the file starts
struct Layout {
    ifd_offsets: Vec<u64>,
    data_offsets: BTreeMap<(usize, u16), u64>,
    image_offsets: BTreeMap<usize, u64>,
}

pub struct WriterBuilder;

impl WriterBuilder {
    /// Writes a complete TIFF to `writer`
    pub fn write<W: Write + Seek>(
        writer: &mut W,
        is_big_tiff: bool,
        ifds: &[IFD],
        image_data: &ImageData,
        external_data: &ExternalData,
    ) -> GeoResult<()> {
        let sorted_ifds: Vec<IFD> = ifds
            .iter()
            .map(|ifd| {
                let mut sorted = ifd.clone();
                sorted.entries = write_utils::sorted_entries(&ifd.entries);
                sorted
            })
            .collect();

        let layout = Self::calculate_layout(&sorted_ifds, image_data, external_data, is_big_tiff)?;
        let first_ifd_offset = layout.ifd_offsets.first().copied().unwrap_or(0);

        Self::write_header(writer, first_ifd_offset, is_big_tiff)?;

        for (index, ifd) in sorted_ifds.iter().enumerate() {
            let next_offset = layout.ifd_offsets.get(index + 1).copied().unwrap_or(0);
            writer.seek(SeekFrom::Start(layout.ifd_offsets[index]))?;
            Self::write_ifd(writer, ifd, index, next_offset, &layout, external_data, is_big_tiff)?;
        }

        for (key, offset) in &layout.data_offsets {
            if let Some(data) = external_data.get(key) {
                writer.seek(SeekFrom::Start(*offset))?;
                writer.write_all(data)?;
                write_utils::write_padding(writer, data.len())?;
            }
        }

        for (index, offset) in &layout.image_offsets {
            if let Some(data) = image_data.get(index) {
                writer.seek(SeekFrom::Start(*offset))?;
                writer.write_all(data)?;
                write_utils::write_padding(writer, data.len())?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Total file size for the given content, used to decide on BigTIFF
    pub fn estimated_size(ifds: &[IFD], image_data: &ImageData, external_data: &ExternalData, is_big_tiff: bool) -> u64 {
        let header_size = if is_big_tiff { header::BIG_TIFF_HEADER_SIZE } else { header::TIFF_HEADER_SIZE };
        let ifd_size: u64 = ifds
            .iter()
            .map(|ifd| ifd_utils::calculate_ifd_size(ifd.entry_count(), is_big_tiff))
            .sum();
        let data_size: u64 = external_data
            .values()
            .chain(image_data.values())
            .map(|d| write_utils::align_to_4_bytes(d.len() as u64))
            .sum();
        header_size + ifd_size + data_size
    }

    fn calculate_layout(
        ifds: &[IFD],
        image_data: &ImageData,
        external_data: &ExternalData,
        is_big_tiff: bool,
    ) -> GeoResult<Layout> {
        let inline_size = if is_big_tiff { 8 } else { 4 };
        let mut current = if is_big_tiff { header::BIG_TIFF_HEADER_SIZE } else { header::TIFF_HEADER_SIZE };

        let mut ifd_offsets = Vec::with_capacity(ifds.len());
        for ifd in ifds {
            ifd_offsets.push(current);
            current = write_utils::align_to_4_bytes(current + ifd_utils::calculate_ifd_size(ifd.entry_count(), is_big_tiff));
        }

        let mut data_offsets = BTreeMap::new();
        for (key, data) in external_data {
            if data.len() > inline_size {
                data_offsets.insert(*key, current);
                current = write_utils::align_to_4_bytes(current + data.len() as u64);
            }
        }

        let mut image_offsets = BTreeMap::new();
        for (index, data) in image_data {
            image_offsets.insert(*index, current);
            current = write_utils::align_to_4_bytes(current + data.len() as u64);
        }

        if !is_big_tiff && current > u32::MAX as u64 {
            return Err(GeoError::GenericError(format!(
                "{} bytes do not fit in a classic TIFF; BigTIFF is required",
                current
            )));
        }
        debug!("Laid out {} IFD(s), file size {} bytes", ifds.len(), current);

        Ok(Layout {
            ifd_offsets,
            data_offsets,
            image_offsets,
        })
    }

    fn write_header(writer: &mut impl Write, first_ifd_offset: u64, is_big_tiff: bool) -> GeoResult<()> {
        writer.write_all(&header::LITTLE_ENDIAN_MARKER)?;

        if is_big_tiff {
            writer.write_all(&header::BIG_TIFF_VERSION.to_le_bytes())?;
            writer.write_all(&header::BIGTIFF_OFFSET_SIZE.to_le_bytes())?;
            writer.write_all(&[0u8, 0])?;
            writer.write_all(&first_ifd_offset.to_le_bytes())?;
        } else {
            writer.write_all(&header::TIFF_VERSION.to_le_bytes())?;
            writer.write_all(&(first_ifd_offset as u32).to_le_bytes())?;
        }

        Ok(())
    }

    fn write_ifd(
        writer: &mut impl Write,
        ifd: &IFD,
        ifd_index: usize,
        next_offset: u64,
        layout: &Layout,
        external_data: &ExternalData,
        is_big_tiff: bool,
    ) -> GeoResult<()> {
        let field_len = if is_big_tiff { 8 } else { 4 };

        if is_big_tiff {
            writer.write_all(&(ifd.entry_count() as u64).to_le_bytes())?;
        } else {
            writer.write_all(&(ifd.entry_count() as u16).to_le_bytes())?;
        }

        for entry in &ifd.entries {
            writer.write_all(&entry.tag.to_le_bytes())?;
            writer.write_all(&entry.field_type.to_le_bytes())?;
            if is_big_tiff {
                writer.write_all(&entry.count.to_le_bytes())?;
            } else {
                writer.write_all(&(entry.count as u32).to_le_bytes())?;
            }

            let key = (ifd_index, entry.tag);
            let mut field = [0u8; 8];
            if entry.tag == tags::STRIP_OFFSETS {
                let offset = layout.image_offsets.get(&ifd_index).copied().unwrap_or(0);
                field.copy_from_slice(&offset.to_le_bytes());
            } else if let Some(offset) = layout.data_offsets.get(&key) {
                field.copy_from_slice(&offset.to_le_bytes());
            } else if let Some(data) = external_data.get(&key) {
                field[..data.len()].copy_from_slice(data);
            } else {
                field.copy_from_slice(&entry.value_offset.to_le_bytes());
            }
            writer.write_all(&field[..field_len])?;
        }

        if is_big_tiff {
            writer.write_all(&next_offset.to_le_bytes())?;
        } else {
            writer.write_all(&(next_offset as u32).to_le_bytes())?;
        }

        Ok(())
    }
}
